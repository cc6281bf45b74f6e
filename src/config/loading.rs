//! Configuration loading from files and environment variables
//!
//! TOML file first, then `REGISTRY_*` environment variables on top so
//! container deployments can override without editing the file.

use anyhow::{Context, Result};

use super::types::Config;

/// Load configuration from a TOML file, then apply environment overrides
pub fn load_config(config_path: &str) -> Result<Config> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file '{}'", config_path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file '{}'", config_path))?;

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Configuration used when no file exists; also written out as a starter
pub fn create_default_config() -> Config {
    Config::default()
}

/// Apply `REGISTRY_*` environment variables over the loaded config.
///
/// Recognized: `REGISTRY_HOST`, `REGISTRY_PORT`, `REGISTRY_MIN_DELAY_SECS`.
fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(host) = std::env::var("REGISTRY_HOST") {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var("REGISTRY_PORT") {
        config.server.port = port
            .parse()
            .with_context(|| format!("Invalid REGISTRY_PORT '{}'", port))?;
    }
    if let Ok(delay) = std::env::var("REGISTRY_MIN_DELAY_SECS") {
        config.registration.min_delay_secs = delay
            .parse()
            .with_context(|| format!("Invalid REGISTRY_MIN_DELAY_SECS '{}'", delay))?;
    }
    Ok(())
}
