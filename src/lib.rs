//! Kona Filters Library
//!
//! Approximate-membership filters over 64-bit keys: the classic Bloom
//! filter, a counting Bloom filter with 4-bit counters, and a succinct
//! counting Bloom filter that supports removal at a little over twice the
//! space of the plain filter.
//!
//! The [`filters`] module is the library proper. [`config`] and [`error`]
//! carry the application layer used by the `kona_filters` binary, which
//! measures false-positive rates.
//!
//! # Architecture
//!
//! - One hash per key, k probes derived by double hashing
//! - Sizing from a bits-per-key budget, fixed at construction
//! - Explicit error types; removal of a key that was never added is an error

pub mod config;
pub mod error;
pub mod filters;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for the Kona filters library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
