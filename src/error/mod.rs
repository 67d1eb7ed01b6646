//! Error types for refbuf.

use thiserror::Error;

/// Errors that can occur while setting up a reference buffer.
///
/// Appends and reads never fail: they report rejection or short reads through
/// [`AppendOutcome`](crate::AppendOutcome) and
/// [`ReadOutcome`](crate::ReadOutcome) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefBufError {
    /// The region is too small to hold the header.
    #[error("capacity error: region of {actual} bytes is smaller than the {required}-byte header")]
    Capacity {
        /// The length of the supplied region.
        actual: usize,
        /// The minimum length required.
        required: usize,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

/// Result type for refbuf operations.
pub type Result<T> = std::result::Result<T, RefBufError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_capacity() {
        let err = RefBufError::Capacity {
            actual: 3,
            required: 8,
        };
        let s = err.to_string();
        assert!(s.contains("capacity error"));
        assert!(s.contains("3 bytes"));
    }

    #[test]
    fn test_display_invalid_config() {
        let err = RefBufError::InvalidConfig {
            message: "slot count must be non-zero",
        };
        assert_eq!(err.to_string(), "invalid config: slot count must be non-zero");
    }
}
