//! Centralized logging setup with dual output (stdout + registry.log)

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Initialize logging with dual output: stdout + registry.log file
///
/// Both outputs use the level from the RUST_LOG environment variable,
/// defaulting to "info". The appender guard is forgotten to keep the file
/// writer alive for the program lifetime.
pub fn init_logging() {
    let file_appender = tracing_appender::rolling::never(".", "registry.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let stdout_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(stdout_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .init();

    std::mem::forget(_guard);
}
