//! Configuration validation
//!
//! Semantic checks that cannot be expressed in the types: the default
//! listing age must parse as a duration, limits must be usable, and an
//! enabled capture needs a command to run.

use anyhow::Result;

use super::types::Config;
use crate::duration::parse_duration;

impl Config {
    /// Validate the configuration before the service starts
    pub fn validate(&self) -> Result<()> {
        parse_duration(&self.query.stations_max_age).map_err(|e| {
            anyhow::anyhow!(
                "query.stations_max_age '{}' is not a valid duration: {}",
                self.query.stations_max_age,
                e
            )
        })?;

        if self.query.stations_limit == 0 {
            return Err(anyhow::anyhow!("query.stations_limit must be at least 1"));
        }

        if self.capture.enabled && self.capture.command.is_none() {
            return Err(anyhow::anyhow!(
                "capture.enabled requires capture.command to be set"
            ));
        }

        if self.capture.timeout_secs == 0 {
            return Err(anyhow::anyhow!("capture.timeout_secs must be at least 1"));
        }

        Ok(())
    }
}
