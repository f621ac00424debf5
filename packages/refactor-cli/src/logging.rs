//! Logging setup for the command line tools

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber. `RUST_LOG` wins unless `verbose` is set;
/// the fallback level is `warn`.
pub fn init(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A second initialization (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
