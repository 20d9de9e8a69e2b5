// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! A counting Bloom filter with fixed 4-bit counters.

use crate::filters::config::FilterConfig;
use crate::filters::error::FilterResult;
use crate::filters::hash::{reduce, Probes};
use crate::filters::Filter;

/// Counters packed per 64-bit word.
const SLOTS_PER_WORD: usize = 16;

/// A counting Bloom filter with a 4-bit counter per slot.
///
/// Counters are packed sixteen to a word. A key is present when every one of
/// its k counters is non-zero.
///
/// Increments are plain wrapping additions on the packed word: a counter that
/// reaches 16 carries into its neighbour (the top counter of a word carries
/// out of it). Counters do not saturate, so a slot hit more than fifteen times
/// corrupts its neighbour.
#[derive(Debug, Clone)]
pub struct CountingBloom {
    /// Number of probes per key
    k: usize,

    /// Hash seed owned by this instance
    seed: u64,

    /// Packed 4-bit counters
    counts: Vec<u64>,
}

impl CountingBloom {
    /// Create an empty filter sized for `entry_count` keys.
    pub fn with_config(entry_count: usize, config: &FilterConfig) -> FilterResult<Self> {
        config.validate()?;
        let words = config.counter_word_count(entry_count);
        let k = config.hash_functions();
        tracing::debug!(entry_count, words, k, "Allocating counting Bloom filter");

        Ok(Self {
            k,
            seed: config.resolve_seed(),
            counts: vec![0; words],
        })
    }

    /// Insert a key, incrementing each of its counters.
    pub fn add(&mut self, key: u64) {
        let slots = self.slot_count();
        for a in Probes::new(key, self.seed, self.k) {
            self.increment_slot(reduce(a, slots));
        }
    }

    /// Number of probes per key
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// The seed this filter hashes with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn slot_count(&self) -> usize {
        self.counts.len() * SLOTS_PER_WORD
    }

    fn increment_slot(&mut self, slot: usize) {
        let word = &mut self.counts[slot / SLOTS_PER_WORD];
        *word = word.wrapping_add(slot_unit(slot));
    }

    fn slot_value(&self, slot: usize) -> u64 {
        (self.counts[slot / SLOTS_PER_WORD] >> slot_shift(slot)) & 0xf
    }
}

impl Filter for CountingBloom {
    fn build(keys: &[u64], config: &FilterConfig) -> FilterResult<Self> {
        let mut filter = Self::with_config(keys.len(), config)?;
        for &key in keys {
            filter.add(key);
        }
        Ok(filter)
    }

    fn may_contain(&self, key: u64) -> bool {
        let slots = self.slot_count();
        Probes::new(key, self.seed, self.k).all(|a| self.slot_value(reduce(a, slots)) != 0)
    }

    fn bit_count(&self) -> u64 {
        self.counts.len() as u64 * 64
    }
}

#[inline]
fn slot_shift(slot: usize) -> u32 {
    ((slot % SLOTS_PER_WORD) * 4) as u32
}

#[inline]
fn slot_unit(slot: usize) -> u64 {
    1u64 << slot_shift(slot)
}
