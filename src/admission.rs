//! Admission control for inbound registrations
//!
//! Validation, then the per-station serialized check-then-write through the
//! store, then the optional capture dispatch when a never-seen station is
//! admitted. Handlers for both API generations funnel through here.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::capture::CaptureTrigger;
use crate::error::RegistryError;
use crate::station::RawRegistration;
use crate::store::{RegisterOutcome, StationStore};
use crate::validation::validate;

/// An accepted registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First-ever registration for this station
    Created,
    /// Existing record overwritten, window had elapsed
    Refreshed,
}

/// Gate in front of the store enforcing at-most-one-accepted-per-window
pub struct AdmissionGate {
    store: Arc<dyn StationStore>,
    capture: Arc<dyn CaptureTrigger>,
    window: Duration,
}

impl AdmissionGate {
    pub fn new(
        store: Arc<dyn StationStore>,
        capture: Arc<dyn CaptureTrigger>,
        window: Duration,
    ) -> Self {
        Self {
            store,
            capture,
            window,
        }
    }

    /// The configured rate-limit window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject a registration stamped with the current wall clock
    pub async fn register(
        &self,
        raw: &RawRegistration,
        peer: IpAddr,
    ) -> Result<Admission, RegistryError> {
        self.register_at(raw, peer, unix_now()).await
    }

    /// Admit or reject a registration as of `now` (epoch seconds).
    ///
    /// A rejected registration produces zero store mutations. On acceptance
    /// of a brand-new station the capture job is dispatched fire-and-forget.
    pub async fn register_at(
        &self,
        raw: &RawRegistration,
        peer: IpAddr,
        now: i64,
    ) -> Result<Admission, RegistryError> {
        let mut record = validate(raw)?;
        record.last_addr = peer.to_string();
        record.last_seen = now;
        let station_url = record.station_url.clone();

        match self.store.register(record, self.window).await? {
            RegisterOutcome::Created => {
                info!("registered new station {}", station_url);
                self.capture.dispatch(&station_url);
                Ok(Admission::Created)
            }
            RegisterOutcome::Refreshed => {
                debug!("refreshed station {}", station_url);
                Ok(Admission::Refreshed)
            }
            RegisterOutcome::RateLimited { elapsed } => {
                debug!(
                    "rate-limited station {} ({}s into {}s window)",
                    station_url,
                    elapsed,
                    self.window.as_secs()
                );
                Err(RegistryError::RateLimited { elapsed })
            }
        }
    }
}

/// Current wall clock as Unix epoch seconds, rounded like the stations do
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
