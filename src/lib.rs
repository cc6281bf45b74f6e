//! Registry service for self-reporting weather station installations
//!
//! Stations post periodic heartbeat/identity records; the registry
//! validates them, admits at most one per station per rate-limit window,
//! and answers time-windowed listings and per-field cumulative statistics
//! over the collected history.
//!
//! The core pipeline is admission control (validation → rate-limited,
//! idempotent upsert keyed by station identity) plus the stats engine
//! (time-filtered retrieval, value consolidation, cumulative bucketing).
//! The store and the capture tool are external collaborators behind
//! narrow trait seams.

pub mod admission;
pub mod args;
pub mod capture;
pub mod config;
pub mod consolidate;
pub mod constants;
pub mod duration;
pub mod error;
pub mod http;
pub mod logging;
pub mod station;
pub mod stats;
pub mod store;
pub mod validation;

pub use admission::{Admission, AdmissionGate};
pub use capture::{CaptureTrigger, CommandCapture, NoopCapture};
pub use config::{create_default_config, load_config, Config, V1FailureMode};
pub use consolidate::{consolidate, InfoField};
pub use duration::{parse_duration, DurationError};
pub use error::{QueryError, RegistryError};
pub use http::RegistryServer;
pub use station::{RawRegistration, StationRecord};
pub use stats::{StatsEngine, StatsSeries, TimeParams};
pub use store::{MemoryStore, QueryFilter, RegisterOutcome, StationStore, StoreError};
pub use validation::{validate, ValidationFailure};
