//! In-memory station store
//!
//! Keyed on `station_url` in a `DashMap`. The entry API holds the shard
//! lock for the whole check-then-write, which gives `register` its per-key
//! serializability without blocking registrations for other stations on
//! other shards.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::Duration;

use super::{QueryFilter, RegisterOutcome, StationStore, StoreError};
use crate::station::StationRecord;

/// Process-local implementation of [`StationStore`].
///
/// Suitable for a single-process deployment and for tests; a relational
/// backend would express the same conditional update as a row-locked
/// transaction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    stations: DashMap<String, StationRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[async_trait]
impl StationStore for MemoryStore {
    async fn get(&self, station_url: &str) -> Result<Option<StationRecord>, StoreError> {
        Ok(self.stations.get(station_url).map(|r| r.value().clone()))
    }

    async fn register(
        &self,
        record: StationRecord,
        window: Duration,
    ) -> Result<RegisterOutcome, StoreError> {
        let record = record.clamp_to_schema();
        // Entry holds the shard lock until the decision is committed
        match self.stations.entry(record.station_url.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(RegisterOutcome::Created)
            }
            Entry::Occupied(mut slot) => {
                // Signed compare so a skewed clock can never move last_seen
                // backward through the overwrite branch
                let elapsed = record.last_seen.saturating_sub(slot.get().last_seen);
                if elapsed < window.as_secs() as i64 {
                    return Ok(RegisterOutcome::RateLimited {
                        elapsed: elapsed.max(0) as u64,
                    });
                }
                slot.insert(record);
                Ok(RegisterOutcome::Refreshed)
            }
        }
    }

    async fn query(&self, filter: QueryFilter) -> Result<Vec<StationRecord>, StoreError> {
        let mut records: Vec<StationRecord> = self
            .stations
            .iter()
            .filter(|entry| filter.since.map_or(true, |s| entry.value().last_seen >= s))
            .map(|entry| entry.value().clone())
            .collect();

        // Ascending by last_seen; key as a tiebreaker for a stable order
        records.sort_by(|a, b| {
            a.last_seen
                .cmp(&b.last_seen)
                .then_with(|| a.station_url.cmp(&b.station_url))
        });

        if let Some(limit) = filter.limit {
            records.truncate(limit);
        }
        Ok(records)
    }
}
