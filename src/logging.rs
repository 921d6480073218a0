//! Logging setup for hosts that do not install their own subscriber.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a stderr `fmt` subscriber. `RUST_LOG` overrides `default_filter`.
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .is_ok()
}

/// Subscriber for unit tests; output is captured per test.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("spark_regions=trace"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}
