// boresight_sim/src/lib.rs

// This prelude is for convenience for the binary and the integration tests.
pub mod prelude;

pub mod cli;
pub mod error;
pub mod simulation;

/// Installs the global `tracing` subscriber: formatted console output, filtered by
/// `RUST_LOG` when set and by `default_filter` otherwise.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Layer};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();
}
