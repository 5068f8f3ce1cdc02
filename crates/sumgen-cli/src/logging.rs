//! Log output for the binary. The libraries only emit `tracing` events.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `SUMGEN_LOG=sumgen_compiler=debug`.
pub const LOG_ENV: &str = "SUMGEN_LOG";

const DEFAULT_FILTER: &str = "warn";

pub fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init() {
    let directives = std::env::var(LOG_ENV).ok();
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod logging_tests;
