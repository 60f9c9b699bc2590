//! Tracing subscriber setup for the command-line binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a compact stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `info`, or at
/// `debug` when `verbose` is true.
pub fn init_logger(verbose: bool) {
    let default_directive = if verbose {
        "employer_cost_engine=debug,info"
    } else {
        "employer_cost_engine=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
