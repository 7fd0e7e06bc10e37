//! Logging setup for embedding applications.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber at INFO, overridable through `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init() -> bool {
    init_with_level(tracing::Level::INFO)
}

/// Install a fmt subscriber with `level` as the default directive.
pub fn init_with_level(level: tracing::Level) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .is_ok()
}
