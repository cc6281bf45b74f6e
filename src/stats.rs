//! Time-filtered retrieval and aggregated statistics
//!
//! Two read-only query shapes over the store: the active-station listing
//! and the per-field cumulative stats series. Both share the mutually
//! exclusive `since`/`max_age` time filter; only the listing applies a
//! default window when neither is given.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::consolidate::{self, InfoField};
use crate::duration::parse_duration;
use crate::error::QueryError;
use crate::station::StationRecord;
use crate::store::{QueryFilter, StationStore, StoreError};

/// Bucket key for records whose info field is absent
const MISSING_VALUE: &str = "N/A";

/// Unresolved time-filter parameters as they arrived on the wire
#[derive(Debug, Clone, Default)]
pub struct TimeParams {
    /// Absolute epoch-seconds cutoff
    pub since: Option<String>,
    /// Relative age in compact duration notation
    pub max_age: Option<String>,
}

impl TimeParams {
    /// Resolve to an effective `since` cutoff as of `now`.
    ///
    /// Exactly one of `since`/`max_age` may be given; both is a caller
    /// error. When neither is given, `default_max_age` (if any) applies.
    /// A parse failure is always an error, never a silent default.
    pub fn resolve(&self, now: i64, default_max_age: Option<&str>) -> Result<Option<i64>, QueryError> {
        match (&self.since, &self.max_age) {
            (Some(_), Some(_)) => Err(QueryError::ConflictingTimeFilters),
            (Some(since), None) => {
                let since: i64 = since
                    .parse()
                    .map_err(|_| QueryError::BadSince(since.clone()))?;
                Ok(Some(since))
            }
            (None, Some(max_age)) => Ok(Some(age_cutoff(now, parse_duration(max_age)?))),
            (None, None) => match default_max_age {
                Some(age) => Ok(Some(age_cutoff(now, parse_duration(age)?))),
                None => Ok(None),
            },
        }
    }
}

/// Cutoff for an age in seconds, saturating so an absurdly large but
/// grammatically valid age means "everything" rather than wrapping.
fn age_cutoff(now: i64, age_secs: u64) -> i64 {
    now.saturating_sub(i64::try_from(age_secs).unwrap_or(i64::MAX))
}

/// One canonical group's series: timestamps ascending with the running
/// total of records seen at or before each. Serializes as the two-array
/// `[timestamps, counts]` wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSeries(pub Vec<i64>, pub Vec<u64>);

impl StatsSeries {
    pub fn timestamps(&self) -> &[i64] {
        &self.0
    }

    pub fn counts(&self) -> &[u64] {
        &self.1
    }
}

/// Stats/listing engine over the store. Read-only, no locking.
pub struct StatsEngine {
    store: Arc<dyn StationStore>,
    default_max_age: String,
    default_limit: usize,
}

impl StatsEngine {
    pub fn new(
        store: Arc<dyn StationStore>,
        default_max_age: impl Into<String>,
        default_limit: usize,
    ) -> Self {
        Self {
            store,
            default_max_age: default_max_age.into(),
            default_limit,
        }
    }

    /// Active-station listing: records with `last_seen >= since`, ascending,
    /// at most `limit` (configured default when unspecified). When neither
    /// time filter is supplied, the configured default window applies.
    pub async fn list(
        &self,
        time: &TimeParams,
        limit: Option<usize>,
        now: i64,
    ) -> Result<Vec<StationRecord>, ListError> {
        let since = time.resolve(now, Some(&self.default_max_age))?;
        let filter = QueryFilter {
            since,
            limit: Some(limit.unwrap_or(self.default_limit)),
        };
        Ok(self.store.query(filter).await?)
    }

    /// Per-field statistics: group matching records by (optionally
    /// consolidated) value and build each group's cumulative series. No
    /// default time bound; full history when neither filter is given.
    pub async fn stats(
        &self,
        field: InfoField,
        time: &TimeParams,
        consolidate: bool,
        now: i64,
    ) -> Result<BTreeMap<String, StatsSeries>, ListError> {
        let since = time.resolve(now, None)?;
        let records = self
            .store
            .query(QueryFilter {
                since,
                limit: None,
            })
            .await?;

        let mut groups: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        for record in &records {
            let value = match record.info_value(field) {
                Some(v) if consolidate => consolidate::consolidate(field, v),
                Some(v) => v.to_string(),
                None => MISSING_VALUE.to_string(),
            };
            groups.entry(value).or_default().push(record.last_seen);
        }

        Ok(groups
            .into_iter()
            .map(|(value, timestamps)| (value, cumulative_series(timestamps)))
            .collect())
    }
}

/// Collapse a group's raw `last_seen` multiset into distinct ascending
/// timestamps paired with a running total. Non-decreasing by construction;
/// the final count equals the group size.
pub fn cumulative_series(mut timestamps: Vec<i64>) -> StatsSeries {
    timestamps.sort_unstable();
    let mut times = Vec::new();
    let mut counts = Vec::new();
    let mut total: u64 = 0;
    for ts in timestamps {
        total += 1;
        match counts.last_mut() {
            // Same timestamp, bump the running total in place
            Some(count) if times.last() == Some(&ts) => *count = total,
            _ => {
                times.push(ts);
                counts.push(total);
            }
        }
    }
    StatsSeries(times, counts)
}

/// Listing/stats failure: either caller input or the store
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}
