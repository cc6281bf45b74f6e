//! Error taxonomy for the registry core
//!
//! Registration-path failures (validation, rate limiting) are reported to
//! the caller as reasoned bodies per API generation, never as 5xx. Query
//! malformations are 400-class. Storage failures are the only class that
//! surfaces as a server error.

use thiserror::Error;

use crate::consolidate::UnknownInfoField;
use crate::duration::DurationError;
use crate::store::StoreError;
use crate::validation::ValidationFailure;

/// Failure on the registration path
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// Window not yet elapsed; `elapsed` is seconds since the last accepted
    /// registration for this station
    #[error("{}", crate::constants::admission::RATE_LIMIT_REASON)]
    RateLimited { elapsed: u64 },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Malformed query-side input, reported as a 400 and never partially executed
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Specify 'max_age' or 'since', but not both")]
    ConflictingTimeFilters,

    #[error("bad max_age: {0}")]
    BadMaxAge(#[from] DurationError),

    #[error("bad since value '{0}'")]
    BadSince(String),

    #[error(transparent)]
    UnknownInfoField(#[from] UnknownInfoField),
}
