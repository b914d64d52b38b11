/// Compile-time metadata embedded by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: env!("DAYBOOK_BUILD_HASH"),
        git_status: env!("DAYBOOK_BUILD_STATUS"),
        timestamp: env!("DAYBOOK_BUILD_TIMESTAMP"),
        target: env!("DAYBOOK_BUILD_TARGET"),
        profile: env!("DAYBOOK_BUILD_PROFILE"),
        rustc: env!("DAYBOOK_BUILD_RUSTC"),
    }
}
