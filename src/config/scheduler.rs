//! Background status sweep configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Status sweep scheduling
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between sweeps
    #[serde(default = "default_interval")]
    pub status_sweep_interval_secs: u64,

    /// Run the sweep in the background at all
    #[serde(default = "default_enabled")]
    pub status_sweep_enabled: bool,
}

impl SchedulerConfig {
    pub fn status_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.status_sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.status_sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            status_sweep_interval_secs: default_interval(),
            status_sweep_enabled: default_enabled(),
        }
    }
}

fn default_interval() -> u64 {
    300
}

fn default_enabled() -> bool {
    true
}
