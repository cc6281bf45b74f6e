//! Fire-and-forget capture dispatch for newly registered stations
//!
//! After a brand-new station is admitted, an external tool is asked to
//! capture a screenshot of the station's web page. The dispatch is fully
//! decoupled from the request path: it runs on a detached task under an
//! enforced deadline, and its failure or hang never propagates back to
//! the caller.

use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::constants::capture::DEFAULT_TIMEOUT_SECS;

/// Seam for the capture collaborator
pub trait CaptureTrigger: Send + Sync {
    /// Schedule a capture for `station_url`. Must return immediately.
    fn dispatch(&self, station_url: &str);
}

/// Disabled capture: every dispatch is a no-op
#[derive(Debug, Default)]
pub struct NoopCapture;

impl CaptureTrigger for NoopCapture {
    fn dispatch(&self, _station_url: &str) {}
}

/// Runs a configured external command with the station URL as its single
/// argument, bounded by a deadline.
#[derive(Debug, Clone)]
pub struct CommandCapture {
    command: String,
    deadline: Duration,
}

impl CommandCapture {
    pub fn new(command: impl Into<String>, deadline: Duration) -> Self {
        Self {
            command: command.into(),
            deadline,
        }
    }

    pub fn with_default_deadline(command: impl Into<String>) -> Self {
        Self::new(command, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl CaptureTrigger for CommandCapture {
    fn dispatch(&self, station_url: &str) {
        let command = self.command.clone();
        let deadline = self.deadline;
        let station_url = station_url.to_string();

        tokio::spawn(async move {
            debug!("dispatching capture for {}", station_url);
            let run = async {
                Command::new(&command)
                    .arg(&station_url)
                    .kill_on_drop(true)
                    .status()
                    .await
            };
            match timeout(deadline, run).await {
                Ok(Ok(status)) if status.success() => {
                    debug!("capture for {} completed", station_url);
                }
                Ok(Ok(status)) => {
                    warn!("capture for {} exited with {}", station_url, status);
                }
                Ok(Err(e)) => {
                    warn!("capture for {} failed to start: {}", station_url, e);
                }
                Err(_) => {
                    // kill_on_drop reaps the child when the timeout fires
                    warn!(
                        "capture for {} exceeded {:?} deadline, killed",
                        station_url, deadline
                    );
                }
            }
        });
    }
}
