// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Succinct counting Bloom filter.
//!
//! A counting Bloom filter keeps a counter per position so keys can be removed
//! again. The usual layout spends four bits on every counter, which makes it
//! four times the size of the plain Bloom filter, and a busy counter still
//! overflows at sixteen.
//!
//! This module stores the counters in a [`BracketStream`] instead: one
//! presence bit per position, one continuation bit per position, and one level
//! mark per sixteen positions. The presence bitmap alone answers lookups.
//! Counters above one borrow free cells to their right, so the total space is
//! a little over twice the plain filter, and no counter ever overflows.
//!
//! # Example
//!
//! ```
//! use kona_filters_lib::filters::{Filter, SuccinctCountingBloom};
//!
//! let keys: Vec<u64> = (0..1000).collect();
//! let mut filter = SuccinctCountingBloom::construct(&keys, 10.0).unwrap();
//!
//! assert!(keys.iter().all(|&key| filter.may_contain(key)));
//!
//! for &key in &keys {
//!     filter.remove(key).unwrap();
//! }
//! assert!(filter.stream().is_zeroed());
//! ```
//!
//! # Performance Characteristics
//!
//! - Lookup: k probes into the presence bitmap, no decoding
//! - Insert and remove: proportional to the distance to the nearest checkpoint
//!   with no open bracket, which is small while the filter is not overfull

mod filter;
mod stream;

// Re-exports
pub use filter::SuccinctCountingBloom;
pub use stream::BracketStream;

#[cfg(test)]
mod tests;
