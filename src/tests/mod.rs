//! Test modules for the Kona filters tool.
//!
//! Filter unit tests live next to the code they cover; the property-based
//! suite for the bracket stream lives in `filters::succinct::tests`. This
//! module holds the application-layer tests.

pub mod config_tests;
