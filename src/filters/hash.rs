// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Hashing utilities shared by every filter in the family.
//!
//! All filters hash a key exactly once with [`hash64`] and derive the k probe
//! values from the two 32-bit halves of that hash (double hashing). Each filter
//! then maps a probe value into its own index space with [`reduce`].

/// Mixes `key` with `seed` into a 64-bit hash.
///
/// This is the 64-bit finalizer of MurmurHash3 applied to `key + seed`, which is
/// cheap and has good avalanche behaviour for integer keys.
#[inline]
pub fn hash64(key: u64, seed: u64) -> u64 {
    let mut x = key.wrapping_add(seed);
    x = (x ^ (x >> 33)).wrapping_mul(0xff51_afd7_ed55_8ccd);
    x = (x ^ (x >> 33)).wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    x ^ (x >> 33)
}

/// Maps a 32-bit hash uniformly into `[0, n)` without a division.
///
/// Multiply-high range reduction: the result is the top 32 bits of `hash * n`.
/// `n` must be below 2^32.
#[inline]
pub fn reduce(hash: u32, n: usize) -> usize {
    debug_assert!(n as u64 <= u32::MAX as u64 + 1);
    ((u64::from(hash) * n as u64) >> 32) as usize
}

/// Draws a fresh seed from the process-wide generator.
pub fn random_seed() -> u64 {
    rand::random::<u64>()
}

/// The k probe values of one key.
///
/// For `h = hash64(key, seed)` the sequence is `a, a + b, a + 2b, ...` with
/// `a = h >> 32` and `b = h & 0xffff_ffff`, using wrapping 32-bit arithmetic.
/// Every filter consumes the raw values and applies its own mapping.
#[derive(Debug, Clone)]
pub struct Probes {
    a: u32,
    b: u32,
    remaining: usize,
}

impl Probes {
    /// Creates the probe sequence for `key`.
    pub fn new(key: u64, seed: u64, hash_count: usize) -> Self {
        let hash = hash64(key, seed);
        Self {
            a: (hash >> 32) as u32,
            b: hash as u32,
            remaining: hash_count,
        }
    }
}

impl Iterator for Probes {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.a;
        self.a = self.a.wrapping_add(self.b);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Probes {}
