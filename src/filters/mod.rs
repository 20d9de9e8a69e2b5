// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Approximate-membership filters over 64-bit keys.
//!
//! Three filters share one hashing scheme and one sizing rule, so they can be
//! compared directly at the same bits-per-key budget:
//!
//! - [`Bloom`]: the classic bit array. Smallest, no removal.
//! - [`CountingBloom`]: a 4-bit counter per slot, four times the size.
//! - [`SuccinctCountingBloom`]: counters stored as a [`BracketStream`], a
//!   little over twice the size of [`Bloom`] with the same lookup cost.
//!
//! All of them answer "definitely absent" or "possibly present". A key that
//! was inserted (and not removed) is always reported present.
//!
//! # Example
//!
//! ```
//! use kona_filters_lib::filters::{Filter, FilterConfig, FilterKind};
//!
//! let keys: Vec<u64> = (0..10_000).collect();
//! let config = FilterConfig::new().with_bits_per_key(10.0).with_seed(1);
//!
//! for kind in FilterKind::ALL {
//!     let filter = kind.build(&keys, &config).unwrap();
//!     assert!(keys.iter().all(|&key| filter.may_contain(key)));
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Module declarations
mod bloom;
mod config;
mod counting_bloom;
mod error;
pub mod hash;
pub mod measure;
pub mod succinct;

// Re-exports
pub use bloom::Bloom;
pub use config::{FilterConfig, DEFAULT_BITS_PER_KEY};
pub use counting_bloom::CountingBloom;
pub use error::{FilterError, FilterResult};
pub use succinct::{BracketStream, SuccinctCountingBloom};

/// The contract every filter in the family fulfils.
pub trait Filter {
    /// Build a filter holding `keys` with a budget of `bits_per_key` bits per
    /// key and a random seed.
    fn construct(keys: &[u64], bits_per_key: f64) -> FilterResult<Self>
    where
        Self: Sized,
    {
        Self::build(keys, &FilterConfig::new().with_bits_per_key(bits_per_key))
    }

    /// Build a filter holding `keys`, sized and seeded by `config`.
    fn build(keys: &[u64], config: &FilterConfig) -> FilterResult<Self>
    where
        Self: Sized;

    /// `false` means the key was definitely not inserted; `true` means it
    /// probably was.
    fn may_contain(&self, key: u64) -> bool;

    /// Memory used by the filter's arrays, in bits.
    fn bit_count(&self) -> u64;
}

/// Selects one filter of the family by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// [`Bloom`]
    Bloom,
    /// [`CountingBloom`]
    CountingBloom,
    /// [`SuccinctCountingBloom`]
    SuccinctCountingBloom,
}

impl FilterKind {
    /// Every kind, smallest footprint first.
    pub const ALL: [FilterKind; 3] = [
        FilterKind::Bloom,
        FilterKind::SuccinctCountingBloom,
        FilterKind::CountingBloom,
    ];

    /// Name used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Bloom => "bloom",
            FilterKind::CountingBloom => "counting_bloom",
            FilterKind::SuccinctCountingBloom => "succinct_counting_bloom",
        }
    }

    /// Build a filter of this kind.
    pub fn build(&self, keys: &[u64], config: &FilterConfig) -> FilterResult<Box<dyn Filter>> {
        Ok(match self {
            FilterKind::Bloom => Box::new(Bloom::build(keys, config)?),
            FilterKind::CountingBloom => Box::new(CountingBloom::build(keys, config)?),
            FilterKind::SuccinctCountingBloom => {
                Box::new(SuccinctCountingBloom::build(keys, config)?)
            }
        })
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| FilterError::InvalidConfiguration(format!("unknown filter kind '{s}'")))
    }
}
