//! Constants used throughout the registry
//!
//! Centralizes schema widths and protocol defaults so handlers, store,
//! and config agree on one definition.

/// Column widths inherited from the relational schema.
///
/// The store clamps string fields to these on write; no other layer
/// enforces lengths.
pub mod schema {
    pub const STATION_URL: usize = 255;
    pub const DESCRIPTION: usize = 255;
    pub const STATION_TYPE: usize = 64;
    pub const STATION_MODEL: usize = 128;
    pub const WEEWX_INFO: usize = 64;
    pub const PYTHON_INFO: usize = 64;
    pub const PLATFORM_INFO: usize = 128;
    pub const CONFIG_PATH: usize = 64;
    pub const ENTRY_PATH: usize = 64;

    /// Sized for IPv6 literals
    pub const LAST_ADDR: usize = 44;
}

/// Registration admission defaults
pub mod admission {
    /// Default rate-limit window (23 hours), slightly under the stations'
    /// daily post interval so clock drift never locks a station out.
    pub const DEFAULT_MIN_DELAY_SECS: u64 = 23 * 3600;

    /// Rejection reason reported to rate-limited stations
    pub const RATE_LIMIT_REASON: &str = "Registering too frequently";
}

/// Query defaults for the v2 surfaces
pub mod query {
    /// Default listing window when neither `since` nor `max_age` is given
    pub const DEFAULT_MAX_AGE: &str = "30d";

    /// Default maximum number of stations returned by a listing
    pub const DEFAULT_LIMIT: usize = 2000;

    /// Body returned for malformed v2 time parameters
    pub const BADLY_FORMED: &str = "Badly formed request";
}

/// Capture side-job defaults
pub mod capture {
    /// Default deadline for one capture dispatch, so a hung capture tool
    /// can never accumulate orphaned background work.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}
