// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The succinct counting Bloom filter.

use crate::filters::config::FilterConfig;
use crate::filters::error::{FilterError, FilterResult};
use crate::filters::hash::{reduce, Probes};
use crate::filters::succinct::stream::BracketStream;
use crate::filters::Filter;

/// A counting Bloom filter whose counters live in a [`BracketStream`].
///
/// Lookups read only the presence bitmap, so they cost exactly what a plain
/// Bloom filter lookup costs. Counts are unbounded and take space in
/// proportion to how large they are, instead of a fixed four bits each.
///
/// # Examples
///
/// ```
/// use kona_filters_lib::filters::{Filter, FilterConfig, SuccinctCountingBloom};
///
/// let config = FilterConfig::new().with_seed(7);
/// let mut filter = SuccinctCountingBloom::with_config(100, &config).unwrap();
///
/// filter.add(42);
/// filter.add(42);
/// assert!(filter.may_contain(42));
/// assert!(filter.count_estimate(42) >= 2);
///
/// filter.remove(42).unwrap();
/// filter.remove(42).unwrap();
/// assert!(!filter.may_contain(42));
/// ```
#[derive(Debug, Clone)]
pub struct SuccinctCountingBloom {
    /// Number of probes per key
    k: usize,

    /// Hash seed owned by this instance
    seed: u64,

    /// Number of 64-bit words of logical positions
    array_size: usize,

    /// Counter storage
    stream: BracketStream,
}

impl SuccinctCountingBloom {
    /// Create an empty filter sized for `entry_count` keys.
    pub fn with_config(entry_count: usize, config: &FilterConfig) -> FilterResult<Self> {
        config.validate()?;
        let array_size = config.word_count(entry_count);
        let k = config.hash_functions();
        tracing::debug!(entry_count, array_size, k, "Allocating succinct counting Bloom filter");

        Ok(Self {
            k,
            seed: config.resolve_seed(),
            array_size,
            stream: BracketStream::new(array_size),
        })
    }

    /// Insert a key, incrementing the counter at each of its positions.
    ///
    /// Inserting the same key twice counts it twice.
    pub fn add(&mut self, key: u64) {
        for a in Probes::new(key, self.seed, self.k) {
            let pos = self.position(a);
            self.stream.increment(pos);
        }
    }

    /// Remove one previously inserted copy of a key.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::CountUnderflow`] if any position of the key
    /// holds fewer counts than the key needs, which means the key was never
    /// added (or was already removed). Nothing is changed in that case.
    pub fn remove(&mut self, key: u64) -> FilterResult<()> {
        let mut positions = self.positions(key);
        positions.sort_unstable();

        // A key may probe the same position more than once.
        for run in positions.chunk_by(|a, b| a == b) {
            let position = run[0];
            if (self.stream.read_count(position) as usize) < run.len() {
                tracing::warn!(key, position, "Remove of a key that is not in the filter");
                return Err(FilterError::CountUnderflow { position });
            }
        }
        for position in positions {
            self.stream.decrement(position)?;
        }
        Ok(())
    }

    /// Upper bound on how many times `key` was added: the smallest count
    /// among its positions.
    pub fn count_estimate(&self, key: u64) -> u32 {
        Probes::new(key, self.seed, self.k)
            .map(|a| self.stream.read_count(self.position(a)))
            .min()
            .unwrap_or(0)
    }

    /// Number of probes per key
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// The seed this filter hashes with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Counter storage, for inspection.
    pub fn stream(&self) -> &BracketStream {
        &self.stream
    }

    fn positions(&self, key: u64) -> Vec<usize> {
        Probes::new(key, self.seed, self.k)
            .map(|a| self.position(a))
            .collect()
    }

    /// Word from the high bits of the probe, bit within it from the low six.
    #[inline]
    fn position(&self, a: u32) -> usize {
        reduce(a, self.array_size) * 64 + (a & 63) as usize
    }
}

impl Filter for SuccinctCountingBloom {
    fn build(keys: &[u64], config: &FilterConfig) -> FilterResult<Self> {
        let mut filter = Self::with_config(keys.len(), config)?;
        for &key in keys {
            filter.add(key);
        }
        Ok(filter)
    }

    fn may_contain(&self, key: u64) -> bool {
        Probes::new(key, self.seed, self.k).all(|a| self.stream.is_present(self.position(a)))
    }

    fn bit_count(&self) -> u64 {
        self.stream.bit_count()
    }
}
