//! Filter configuration module.
//!
//! This module defines which filter the tool builds and how it is sized.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use crate::filters::{FilterConfig, FilterKind, DEFAULT_BITS_PER_KEY};
use serde::{Deserialize, Serialize};

/// Filter settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterSettings {
    /// Filter to build (None for every kind)
    pub kind: Option<FilterKind>,

    /// Space budget in bits per key
    pub bits_per_key: f64,

    /// Hash seed (None for a random seed per filter)
    pub seed: Option<u64>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            kind: None,
            bits_per_key: DEFAULT_BITS_PER_KEY,
            seed: None,
        }
    }
}

impl FilterSettings {
    /// The kinds these settings select.
    pub fn kinds(&self) -> Vec<FilterKind> {
        match self.kind {
            Some(kind) => vec![kind],
            None => FilterKind::ALL.to_vec(),
        }
    }

    /// Library configuration for building filters from these settings.
    pub fn to_filter_config(&self) -> FilterConfig {
        let config = FilterConfig::new().with_bits_per_key(self.bits_per_key);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

impl Validate for FilterSettings {
    fn validate(&self) -> ConfigResult<()> {
        if self.to_filter_config().validate().is_err() || self.bits_per_key == 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "filter.bits_per_key".to_string(),
                message: format!("must be a positive finite number, got {}", self.bits_per_key),
            });
        }

        Ok(())
    }
}
