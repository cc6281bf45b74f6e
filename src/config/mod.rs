//! Configuration module
//!
//! Types, defaults, loading, and validation for the registry service.

mod defaults;
mod loading;
mod types;
mod validation;

pub use loading::{create_default_config, load_config};
pub use types::{
    CaptureConfig, Config, QueryConfig, RegistrationConfig, ServerConfig, V1FailureMode,
};
