//! Error types for palette configuration.

use std::num::ParseIntError;

use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has the wrong number of digits (expected 3 or 6 after '#').
    #[error("invalid hex color length {0} (expected 3 or 6 digits)")]
    InvalidLength(usize),

    #[error("invalid hex digit: {0}")]
    InvalidHex(#[from] ParseIntError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ParseColorError::InvalidLength(4).to_string(),
            "invalid hex color length 4 (expected 3 or 6 digits)"
        );
        let err = ParseColorError::from(u8::from_str_radix("zz", 16).unwrap_err());
        assert!(err.to_string().starts_with("invalid hex digit"));
    }
}
