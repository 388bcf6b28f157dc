//! Diagnostic logging setup
//!
//! Diagnostics go to stderr through tracing. `RUST_LOG` takes precedence;
//! otherwise `--verbose` selects debug and the default is warn.

use tracing_subscriber::EnvFilter;

/// Filter directive used when RUST_LOG is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "nvm_prune=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
