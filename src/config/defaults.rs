//! Default values for configuration fields
//!
//! Centralizes the serde default functions so the TOML schema and the
//! constants module agree.

use crate::constants;

/// Default rate-limit window (23 hours)
#[inline]
pub fn min_delay_secs() -> u64 {
    constants::admission::DEFAULT_MIN_DELAY_SECS
}

/// Default listing window in duration notation
#[inline]
pub fn stations_max_age() -> String {
    constants::query::DEFAULT_MAX_AGE.to_string()
}

/// Default maximum stations per listing response
#[inline]
pub fn stations_limit() -> usize {
    constants::query::DEFAULT_LIMIT
}

/// Default capture deadline, seconds
#[inline]
pub fn capture_timeout_secs() -> u64 {
    constants::capture::DEFAULT_TIMEOUT_SECS
}
