use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a verbosity level when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool, debug: bool) -> &'static str {
    if debug {
        "cyscan=trace,info"
    } else if verbose {
        "cyscan=debug,warn"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays free for
/// the scan output. Calling this twice is harmless; the second call is ignored.
pub fn init(verbose: bool, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, debug)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(debug))
        .try_init();
}
