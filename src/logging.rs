//! Log output setup.
//!
//! Everything logs through `tracing`. Output goes to stderr so that command
//! output on stdout stays machine-readable; verbosity follows `RUST_LOG` and
//! defaults to `info`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    // A subscriber may already be installed (e.g. by an embedding binary).
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
