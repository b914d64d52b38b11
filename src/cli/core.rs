//! Shell context, dispatch, and the CLI error types.

use std::io;

use daybook_config::{Config, ConfigError, ConfigManager};
use daybook_core::CoreError;
use daybook_storage_json::JsonStateStorage;
use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use uuid::Uuid;

use crate::cli::commands::{self, CommandDefinition, CommandRegistry};
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::{currency::format_amount, errors::DaybookError, store::AppStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Daybook(#[from] DaybookError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Daybook(err.into())
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: AppStore,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Reads the config, initializes tracing, and opens the JSON state file.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::default_location();
        let (config, config_error) = match manager.load() {
            Ok(config) => (config, None),
            Err(err) => (Config::default(), Some(err)),
        };
        crate::init_with_filter(config.log_filter.as_deref());
        if let Some(err) = config_error {
            tracing::warn!(error = %err, path = %manager.config_path().display(), "using default config");
        }

        let storage =
            JsonStateStorage::with_retention(config.resolve_data_dir(), config.backup_retention)?;
        let store = AppStore::with_defaults(Box::new(storage));
        let context = Self::with_store(mode, store, config);
        context.report_load();
        Ok(context)
    }

    pub fn with_store(mode: CliMode, store: AppStore, config: Config) -> Self {
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            store,
            config,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        }
    }

    fn report_load(&self) {
        let summary = self.store.load_summary();
        for note in &summary.migrations {
            cli_io::print_info(format!("Migration: {note}"));
        }
        for warning in &summary.warnings {
            cli_io::print_warning(warning);
        }
        if let Some(reason) = &summary.fallback_reason {
            cli_io::print_warning(format!("Saved data could not be read ({reason}); starting fresh."));
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|def| def.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        Ok(self.confirm("Exit shell?")?)
    }

    /// Always `true` in script mode.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Daybook(err) if err.is_no_active_day() => {
                cli_io::print_error(&err);
                cli_io::print_hint("Try `start-day 100` to open today's log.");
            }
            other => cli_io::print_error(other),
        }
        Ok(())
    }

    /// Warns when the last mutation could not be written to disk.
    pub(crate) fn warn_if_unsaved(&self) {
        if let Some(reason) = self.store.last_save_error() {
            cli_io::print_warning(format!("Changes are kept in memory but were not saved: {reason}"));
        }
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        format_amount(amount, &self.store.state().settings.currency)
    }

    pub(crate) fn resolve_transaction(&self, prefix: &str) -> Result<Uuid, CommandError> {
        let state = self.store.state();
        resolve_prefix("transaction", prefix, state.transactions.iter().map(|txn| txn.id))
    }

    pub(crate) fn resolve_debt(&self, prefix: &str) -> Result<Uuid, CommandError> {
        let state = self.store.state();
        resolve_prefix("debt", prefix, state.debts.iter().map(|debt| debt.id))
    }
}

fn resolve_prefix(
    kind: &str,
    prefix: &str,
    ids: impl Iterator<Item = Uuid>,
) -> Result<Uuid, CommandError> {
    let needle = prefix.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(CommandError::InvalidArguments(format!("{kind} id is required")));
    }
    let matches: Vec<Uuid> = ids.filter(|id| id.to_string().starts_with(&needle)).collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CommandError::InvalidArguments(format!(
            "no {kind} matches `{prefix}`"
        ))),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{prefix}` matches {} {kind}s; type more characters",
            matches.len()
        ))),
    }
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))
}

pub(crate) fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

/// Splits `key=value` arguments, rejecting anything else.
pub(crate) fn parse_assignments<'a>(args: &[&'a str]) -> Result<Vec<(String, &'a str)>, CommandError> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(key, value)| (key.trim().to_ascii_lowercase(), value))
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!("expected key=value, got `{arg}`"))
                })
        })
        .collect()
}
