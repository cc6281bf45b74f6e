//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults;

/// How the v1 endpoint reports validation failures.
///
/// Two generations of this behavior have existed in the wild; clients of
/// one inspect the body, clients of the other the status code. Selectable
/// rather than hard-coded so either population can be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum V1FailureMode {
    /// Current generation: status 200 with a `FAIL. <reason>` body
    #[default]
    FailBody,
    /// Older generation: status 400 with the bare reason
    StatusCode,
}

/// Main registry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub registration: RegistrationConfig,
    pub query: QueryConfig,
    pub capture: CaptureConfig,
}

/// Listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host/IP to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8420;

    /// Formatted listen address, e.g. "0.0.0.0:8420"
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
        }
    }
}

/// Admission-control settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Rate-limit window in seconds: a station may register at most once
    /// per window. Slightly under the clients' daily post interval.
    pub min_delay_secs: u64,
    /// v1 failure-reporting generation
    pub v1_failure_mode: V1FailureMode,
}

impl RegistrationConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.min_delay_secs)
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: defaults::min_delay_secs(),
            v1_failure_mode: V1FailureMode::default(),
        }
    }
}

/// Listing/stats query settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Default listing window in compact duration notation
    pub stations_max_age: String,
    /// Default maximum stations per listing response
    pub stations_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stations_max_age: defaults::stations_max_age(),
            stations_limit: defaults::stations_limit(),
        }
    }
}

/// Capture side-job settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Dispatch a capture job when a brand-new station registers
    pub enabled: bool,
    /// External command to run; receives the station URL as its argument
    pub command: Option<String>,
    /// Deadline for one capture run, seconds
    pub timeout_secs: u64,
}

impl CaptureConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: None,
            timeout_secs: defaults::capture_timeout_secs(),
        }
    }
}
