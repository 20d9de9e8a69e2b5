// Copyright (c) 2025 Kona Filters Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the filter family.

/// Errors that can occur in filter operations.
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum FilterError {
    /// The bits-per-key budget is negative, NaN or infinite
    #[error("Invalid bits per key: {0}")]
    InvalidBitsPerKey(f64),

    /// A decrement hit a position whose count is already zero
    #[error("Count underflow at position {position}: remove without matching add")]
    CountUnderflow {
        /// Logical position of the empty counter
        position: usize,
    },

    /// The filter has an invalid configuration
    #[error("Invalid filter configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for filter operations
pub type FilterResult<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FilterError::CountUnderflow { position: 17 };
        assert_eq!(
            err.to_string(),
            "Count underflow at position 17: remove without matching add"
        );

        let err = FilterError::InvalidConfiguration("unknown kind".to_string());
        assert_eq!(err.to_string(), "Invalid filter configuration: unknown kind");
    }

    #[test]
    fn test_error_equality() {
        let err1 = FilterError::InvalidBitsPerKey(-1.0);
        let err2 = FilterError::InvalidBitsPerKey(-1.0);
        let err3 = FilterError::CountUnderflow { position: 0 };

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
