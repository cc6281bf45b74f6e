use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use stationreg::args::Args;
use stationreg::capture::{CaptureTrigger, CommandCapture, NoopCapture};
use stationreg::{
    create_default_config, load_config, AdmissionGate, MemoryStore, RegistryServer, StatsEngine,
};

fn main() -> Result<()> {
    stationreg::logging::init_logging();

    let args = Args::parse();

    let num_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    let worker_threads = args.threads.unwrap_or(num_cpus);

    info!(
        "Starting station registry with {} worker threads",
        worker_threads
    );
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;
    rt.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let mut config = if std::path::Path::new(&args.config).exists() {
        load_config(&args.config)?
    } else {
        warn!(
            "Config file '{}' not found, creating default config",
            args.config
        );
        let default_config = create_default_config();
        let config_toml = toml::to_string_pretty(&default_config)?;
        std::fs::write(&args.config, &config_toml)?;
        info!("Created default config file: {}", args.config);
        default_config
    };
    args.apply_to(&mut config);
    config.validate()?;

    let store = Arc::new(MemoryStore::new());
    let capture: Arc<dyn CaptureTrigger> = match config.capture.command.as_deref() {
        Some(command) if config.capture.enabled => {
            info!(
                "Capture dispatch enabled: '{}' (deadline {:?})",
                command,
                config.capture.deadline()
            );
            Arc::new(CommandCapture::new(command, config.capture.deadline()))
        }
        _ => Arc::new(NoopCapture),
    };

    let gate = Arc::new(AdmissionGate::new(
        store.clone(),
        capture,
        config.registration.window(),
    ));
    let stats = Arc::new(StatsEngine::new(
        store,
        config.query.stations_max_age.clone(),
        config.query.stations_limit,
    ));
    let server = Arc::new(RegistryServer::new(
        gate,
        stats,
        config.registration.v1_failure_mode,
    ));

    let listen_addr = config.server.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await?;
    info!(
        "Station registry listening on {} (rate-limit window {}s)",
        listen_addr,
        config.registration.min_delay_secs
    );

    tokio::spawn(async {
        shutdown_signal().await;
        info!("Shutdown signal received, exiting");
        std::process::exit(0);
    });

    server.run(listener).await
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
