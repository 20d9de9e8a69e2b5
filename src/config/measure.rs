//! Measurement configuration module.
//!
//! This module defines the workload used to measure false-positive rates.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest key count a single measurement may use.
pub const MAX_KEYS: usize = 100_000_000;

/// Measurement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasureConfig {
    /// Number of keys inserted; the same number of non-keys is queried
    pub keys: usize,

    /// Seed of the key generator
    pub key_seed: u64,

    /// Whether to print reports as JSON
    pub json: bool,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            keys: 1_000_000,
            key_seed: 0x4b4f_4e41,
            json: false,
        }
    }
}

impl Validate for MeasureConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.keys == 0 || self.keys > MAX_KEYS {
            return Err(ConfigError::ValueOutOfRange {
                key: "measure.keys".to_string(),
                message: format!("must be between 1 and {MAX_KEYS}, got {}", self.keys),
            });
        }

        Ok(())
    }
}
