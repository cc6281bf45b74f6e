//! Store seam for persisted station state
//!
//! The registry core never caches records across requests; every admission
//! decision re-reads current state through this interface. The one
//! concurrency requirement lives here: [`StationStore::register`] is a
//! transactional conditional update, serialized per `station_url`, so two
//! concurrent duplicate submissions can never both pass the window check.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::station::StationRecord;

/// Storage collaborator failure. The only error class surfaced as a 5xx.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage backend inconsistent: {0}")]
    Inconsistent(String),
}

/// Outcome of a conditional registration upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// First-ever record for this `station_url`
    Created,
    /// Existing record fully overwritten, `last_seen` advanced
    Refreshed,
    /// Window not yet elapsed; nothing written
    RateLimited {
        /// Seconds since the last accepted registration
        elapsed: u64,
    },
}

/// Range-scan filter over `last_seen`
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryFilter {
    /// Keep records with `last_seen >= since`
    pub since: Option<i64>,
    /// Truncate the ascending result to this many records
    pub limit: Option<usize>,
}

/// Narrow read/write interface over the persistent station table.
///
/// Implementations must make `register` serializable per key: the
/// read-decide-write for one `station_url` is a critical section, while
/// registrations for different stations must not block one another.
#[async_trait]
pub trait StationStore: Send + Sync {
    /// Fetch the live record for a station, if it has ever been seen
    async fn get(&self, station_url: &str) -> Result<Option<StationRecord>, StoreError>;

    /// Conditional upsert: insert if new, overwrite if the rate-limit
    /// `window` has elapsed since the existing `last_seen`, otherwise
    /// reject without writing. `record.last_seen` must already carry the
    /// admission time.
    async fn register(
        &self,
        record: StationRecord,
        window: Duration,
    ) -> Result<RegisterOutcome, StoreError>;

    /// Range scan by `last_seen`, ascending, bounded by the filter
    async fn query(&self, filter: QueryFilter) -> Result<Vec<StationRecord>, StoreError>;
}
