//! Validation errors raised by the note primitives.
use thiserror::Error;

/// Errors that can occur while deriving note values or Merkle paths
#[derive(Error, Debug)]
pub enum PrivacyError {
    /// A value that should be a base-10 integer is not
    #[error("Invalid decimal integer: {0:?}")]
    InvalidDecimal(String),

    /// Merkle height must be at least one level
    #[error("Invalid Merkle height: must be >= 1, got {0}")]
    InvalidHeight(usize),

    /// Explicit siblings or path bits do not match the configured height
    #[error("Invalid {what} length: expected {expected}, got {got}")]
    PathLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Path index bits are 0 or 1
    #[error("Invalid path bit at level {level}: {bit}")]
    InvalidPathBit { level: usize, bit: u8 },

    /// Poseidon rejected its inputs
    #[error("Poseidon error: {0}")]
    Poseidon(#[from] light_poseidon::PoseidonError),
}

/// Result type for note operations
pub type Result<T> = std::result::Result<T, PrivacyError>;
