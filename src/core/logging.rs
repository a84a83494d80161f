//! Diagnostic logging setup
//!
//! Logs always go to stderr so stdout stays machine-readable.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map the global verbosity flags to a log level
pub fn level_for(quiet: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence when set.
pub fn init(quiet: bool, verbose: bool) {
    let level = level_for(quiet, verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("texcat={}", level.as_str().to_lowercase())));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
