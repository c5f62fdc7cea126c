//! Logging setup using `tracing-subscriber`.
//!
//! Events go to stderr so stdout stays clean for markup and JSON output.
//! `RUST_LOG` takes precedence over `--verbose`.

use tracing_subscriber::EnvFilter;

/// Default filter without `--verbose`.
const QUIET_FILTER: &str = "warn";
/// Default filter with `--verbose`.
const VERBOSE_FILTER: &str = "debug";

pub(crate) fn init(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { QUIET_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when running under a harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
