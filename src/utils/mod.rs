pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "daybook=info";

/// Initializes the global tracing subscriber once.
///
/// `RUST_LOG` replaces the `daybook=info` default when set. The optional
/// directive, usually the config's `log_filter`, is layered on top of either.
pub fn init_tracing(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let mut filter = EnvFilter::default();
        for raw in filter_directives(env.as_deref(), directive) {
            match raw.parse::<Directive>() {
                Ok(parsed) => filter = filter.add_directive(parsed),
                Err(err) => eprintln!("ignoring invalid log filter `{raw}`: {err}"),
            }
        }

        // try_init: a test harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        tracing::info!("Daybook tracing initialized.");
    });
}

/// Directives in the order they are applied; later ones win per target.
fn filter_directives<'a>(env: Option<&'a str>, extra: Option<&'a str>) -> Vec<&'a str> {
    let base: Vec<&str> = match env.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect(),
        None => vec![DEFAULT_DIRECTIVE],
    };
    base.into_iter()
        .chain(extra.map(str::trim).filter(|value| !value.is_empty()))
        .collect()
}
