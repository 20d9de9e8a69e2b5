// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Construction parameters shared by the filter family.

use crate::filters::error::{FilterError, FilterResult};
use crate::filters::hash::random_seed;

/// Default space budget, in bits per inserted key.
pub const DEFAULT_BITS_PER_KEY: f64 = 8.0;

/// Configuration for building a filter.
///
/// A filter is sized once, from the number of keys it is built for and the
/// bits-per-key budget. The probe count and the array sizes are derived from
/// those two numbers and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Space budget in bits per key
    bits_per_key: f64,

    /// Hash seed; when `None` a random seed is drawn for every filter built
    seed: Option<u64>,
}

impl FilterConfig {
    /// Create a new default configuration.
    ///
    /// Default values:
    /// - bits_per_key: 8.0
    /// - seed: None (random per filter)
    pub fn new() -> Self {
        Self {
            bits_per_key: DEFAULT_BITS_PER_KEY,
            seed: None,
        }
    }

    /// Set the space budget in bits per key.
    pub fn with_bits_per_key(mut self, bits_per_key: f64) -> Self {
        self.bits_per_key = bits_per_key;
        self
    }

    /// Fix the hash seed, making every filter built from this configuration
    /// reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that the budget can size a filter.
    pub fn validate(&self) -> FilterResult<()> {
        if !self.bits_per_key.is_finite() || self.bits_per_key < 0.0 {
            return Err(FilterError::InvalidBitsPerKey(self.bits_per_key));
        }
        Ok(())
    }

    /// Get the bits-per-key budget
    pub fn bits_per_key(&self) -> f64 {
        self.bits_per_key
    }

    /// Get the fixed seed, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The seed for a new filter: the fixed one, or a fresh random draw.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(random_seed)
    }

    /// Number of probes per key, `max(1, round(bits_per_key * ln 2))`.
    ///
    /// This minimises the false-positive probability for the budget.
    pub fn hash_functions(&self) -> usize {
        (self.bits_per_key * std::f64::consts::LN_2).round().max(1.0) as usize
    }

    /// Number of presence bits requested for `entry_count` keys.
    ///
    /// A filter for zero keys is sized as if for one.
    pub fn data_bits(&self, entry_count: usize) -> u64 {
        (entry_count.max(1) as f64 * self.bits_per_key) as u64
    }

    /// Number of 64-bit words holding the presence bits, at least one.
    pub fn word_count(&self, entry_count: usize) -> usize {
        words_for(self.data_bits(entry_count))
    }

    /// Number of 64-bit words holding 4-bit counters for `entry_count` keys.
    pub fn counter_word_count(&self, entry_count: usize) -> usize {
        words_for((4.0 * entry_count.max(1) as f64 * self.bits_per_key) as u64)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn words_for(bits: u64) -> usize {
    (bits.div_ceil(64) as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.bits_per_key(), 8.0);
        assert_eq!(config.seed(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = FilterConfig::new().with_bits_per_key(12.5).with_seed(42);

        assert_eq!(config.bits_per_key(), 12.5);
        assert_eq!(config.seed(), Some(42));
        assert_eq!(config.resolve_seed(), 42);
    }

    #[test]
    fn test_hash_functions() {
        assert_eq!(FilterConfig::new().hash_functions(), 6);
        assert_eq!(FilterConfig::new().with_bits_per_key(10.0).hash_functions(), 7);
        assert_eq!(FilterConfig::new().with_bits_per_key(1.0).hash_functions(), 1);
        assert_eq!(FilterConfig::new().with_bits_per_key(0.0).hash_functions(), 1);
    }

    #[test]
    fn test_sizing() {
        let config = FilterConfig::new();

        assert_eq!(config.data_bits(3), 24);
        assert_eq!(config.word_count(3), 1);
        assert_eq!(config.word_count(8), 1);
        assert_eq!(config.word_count(9), 2);
        assert_eq!(config.word_count(1000), 125);
        assert_eq!(config.counter_word_count(1000), 500);
    }

    #[test]
    fn test_zero_keys_clamped() {
        let config = FilterConfig::new();
        assert_eq!(config.data_bits(0), config.data_bits(1));
        assert_eq!(config.word_count(0), 1);

        let empty_budget = FilterConfig::new().with_bits_per_key(0.0);
        assert_eq!(empty_budget.word_count(100), 1);
        assert_eq!(empty_budget.counter_word_count(100), 1);
    }

    #[test]
    fn test_invalid_bits_per_key() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let config = FilterConfig::new().with_bits_per_key(bad);
            assert!(matches!(
                config.validate(),
                Err(FilterError::InvalidBitsPerKey(_))
            ));
        }
    }
}
