// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! False-positive measurement for the filter family.

use fnv::FnvHashSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::filters::{FilterConfig, FilterKind, FilterResult};

/// Outcome of measuring one filter kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterReport {
    /// Filter that was measured
    pub kind: FilterKind,

    /// Number of keys inserted
    pub keys: usize,

    /// Number of non-keys queried
    pub queries: usize,

    /// Configured budget
    pub bits_per_key_budget: f64,

    /// Bits actually used per inserted key
    pub bits_per_key: f64,

    /// Probes per key
    pub hash_functions: usize,

    /// Inserted keys reported absent; anything but zero is a bug
    pub false_negatives: usize,

    /// Fraction of non-keys reported present
    pub fpp: f64,

    /// Expected fraction for a Bloom filter of the same shape
    pub theoretical_fpp: f64,
}

/// `count` distinct keys drawn from a generator seeded with `seed`.
pub fn unique_random_keys(count: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = FnvHashSet::with_capacity_and_hasher(count, Default::default());
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let key: u64 = rng.random();
        if seen.insert(key) {
            keys.push(key);
        }
    }
    keys
}

/// `(1 - e^(-k n / m))^k` for `k` probes, `n` keys and `m` positions.
pub fn theoretical_fpp(hash_functions: usize, keys: usize, positions: u64) -> f64 {
    let k = hash_functions as f64;
    let fill = 1.0 - (-k * keys as f64 / positions as f64).exp();
    fill.powf(k)
}

/// Build a filter of `kind` from `keys` and measure it against `non_keys`.
///
/// `non_keys` must not share keys with `keys`, otherwise true positives are
/// counted as false ones.
pub fn measure(
    kind: FilterKind,
    config: &FilterConfig,
    keys: &[u64],
    non_keys: &[u64],
) -> FilterResult<FilterReport> {
    let filter = kind.build(keys, config)?;

    let false_negatives = keys.iter().filter(|&&key| !filter.may_contain(key)).count();
    if false_negatives > 0 {
        tracing::error!(%kind, false_negatives, "Filter lost inserted keys");
    }
    let false_positives = non_keys.iter().filter(|&&key| filter.may_contain(key)).count();

    let hash_functions = config.hash_functions();
    let positions = config.word_count(keys.len()) as u64 * 64;
    let report = FilterReport {
        kind,
        keys: keys.len(),
        queries: non_keys.len(),
        bits_per_key_budget: config.bits_per_key(),
        bits_per_key: filter.bit_count() as f64 / keys.len().max(1) as f64,
        hash_functions,
        false_negatives,
        fpp: false_positives as f64 / non_keys.len().max(1) as f64,
        theoretical_fpp: theoretical_fpp(hash_functions, keys.len(), positions),
    };
    tracing::debug!(%kind, fpp = report.fpp, bits_per_key = report.bits_per_key, "Measured filter");
    Ok(report)
}
