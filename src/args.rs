//! Command-line argument parsing for the registry binary

use clap::Parser;

/// Command-line arguments, each overriding its config-file counterpart
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Weather station registry service")]
pub struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "REGISTRY_PORT")]
    pub port: Option<u16>,

    /// Host to bind to (overrides config file)
    #[arg(long, env = "REGISTRY_HOST")]
    pub host: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", env = "REGISTRY_CONFIG")]
    pub config: String,

    /// Number of worker threads (default: CPU cores)
    #[arg(short, long)]
    pub threads: Option<usize>,
}

impl Args {
    /// Fold CLI overrides into the loaded configuration
    pub fn apply_to(&self, config: &mut crate::config::Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
    }
}
