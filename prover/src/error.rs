//! Error definitions for input assembly and proof encoding.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProverError {
    /// Proof or public signals do not have the shape the verifier expects
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Reading or writing an artifact failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input artifact is not valid JSON
    #[error("Malformed artifact {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Note or Merkle inputs were rejected
    #[error(transparent)]
    Validation(#[from] pool_privacy::PrivacyError),
}

impl ProverError {
    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ProverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProverError::encoding("pi_a needs 2 elements, got 1");
        assert_eq!(err.to_string(), "Encoding error: pi_a needs 2 elements, got 1");

        let err = ProverError::Io {
            path: PathBuf::from("build/proof.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "I/O error on build/proof.json: missing");
    }
}
