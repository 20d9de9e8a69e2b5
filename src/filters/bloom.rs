// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The classic Bloom filter.

use crate::filters::config::FilterConfig;
use crate::filters::error::FilterResult;
use crate::filters::hash::{reduce, Probes};
use crate::filters::Filter;

/// A standard k-probe Bloom filter over 64-bit keys.
///
/// Each probe value `a` picks a word with `reduce(a, words)` and a bit inside
/// that word with the low six bits of `a`. Bits are only ever set, so there are
/// no false negatives.
///
/// # Examples
///
/// ```
/// use kona_filters_lib::filters::{Bloom, Filter};
///
/// let filter = Bloom::construct(&[1, 2, 3], 8.0).unwrap();
///
/// assert!(filter.may_contain(1));
/// assert_eq!(filter.hash_count(), 6);
/// assert_eq!(filter.bit_count(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct Bloom {
    /// Number of probes per key
    k: usize,

    /// Hash seed owned by this instance
    seed: u64,

    /// Presence bits
    data: Vec<u64>,
}

impl Bloom {
    /// Create an empty filter sized for `entry_count` keys.
    pub fn with_config(entry_count: usize, config: &FilterConfig) -> FilterResult<Self> {
        config.validate()?;
        let words = config.word_count(entry_count);
        let k = config.hash_functions();
        tracing::debug!(entry_count, words, k, "Allocating Bloom filter");

        Ok(Self {
            k,
            seed: config.resolve_seed(),
            data: vec![0; words],
        })
    }

    /// Insert a key.
    pub fn add(&mut self, key: u64) {
        let words = self.data.len();
        for a in Probes::new(key, self.seed, self.k) {
            self.data[reduce(a, words)] |= 1u64 << (a & 63);
        }
    }

    /// Reset every bit, keeping size and seed.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Fraction of bits currently set, between 0.0 and 1.0.
    pub fn fill_ratio(&self) -> f64 {
        let set_bits: u64 = self.data.iter().map(|word| u64::from(word.count_ones())).sum();
        set_bits as f64 / self.bit_count() as f64
    }

    /// Number of probes per key
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// The seed this filter hashes with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Filter for Bloom {
    fn build(keys: &[u64], config: &FilterConfig) -> FilterResult<Self> {
        let mut filter = Self::with_config(keys.len(), config)?;
        for &key in keys {
            filter.add(key);
        }
        Ok(filter)
    }

    fn may_contain(&self, key: u64) -> bool {
        let words = self.data.len();
        Probes::new(key, self.seed, self.k)
            .all(|a| self.data[reduce(a, words)] & (1u64 << (a & 63)) != 0)
    }

    fn bit_count(&self) -> u64 {
        self.data.len() as u64 * 64
    }
}
