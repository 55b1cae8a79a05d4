//! Error types for Solbound domain values

use thiserror::Error;

/// Result type for type-level parsing
pub type Result<T> = std::result::Result<T, TypesError>;

/// Errors raised while parsing or validating domain values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// Input was not valid base58
    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    /// Decoded value had the wrong byte length
    #[error("Invalid length for {kind}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Secret key material of an unsupported size
    #[error("Secret key material must be 32 or 64 bytes, got {0}")]
    InvalidSecretLength(usize),
}
