//! Note Commitments
//!
//! ```text
//! Commitment = Poseidon(secret, denom_index)
//! ```
//!
//! The commitment is the Merkle leaf. It hides the secret while binding the
//! note to its denomination.

use std::fmt;

use crate::error::Result;
use crate::field::FieldElement;
use crate::note::Note;
use crate::poseidon::hash2;

/// A note commitment (Merkle leaf)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment(pub FieldElement);

impl Commitment {
    /// Derive the leaf for a note
    pub fn derive(note: &Note) -> Result<Self> {
        let leaf = hash2(note.secret_field(), FieldElement::from(note.denom_index))?;
        Ok(Self(leaf))
    }

    pub fn to_field(&self) -> FieldElement {
        self.0
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use proptest::prelude::*;

    #[test]
    fn test_commitment_matches_hash2() {
        let note = Note::new(BigUint::from(5u64), 0);
        let expected = hash2(FieldElement::from(5u64), FieldElement::zero()).unwrap();
        assert_eq!(note.commitment().unwrap().to_field(), expected);
    }

    #[test]
    fn test_commitment_binding() {
        let secret = BigUint::from(42u64);
        let c1 = Commitment::derive(&Note::new(secret.clone(), 0)).unwrap();
        let c2 = Commitment::derive(&Note::new(secret, 1)).unwrap();
        assert_ne!(
            c1, c2,
            "different denominations should produce different commitments"
        );
    }

    #[test]
    fn test_commitment_hiding() {
        let c1 = Commitment::derive(&Note::new(BigUint::from(1u64), 0)).unwrap();
        let c2 = Commitment::derive(&Note::new(BigUint::from(2u64), 0)).unwrap();
        assert_ne!(c1, c2, "different secrets should produce different commitments");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn commitment_is_deterministic(secret in any::<u128>(), denom in 0u64..16) {
            let note = Note::new(BigUint::from(secret), denom);
            prop_assert_eq!(note.commitment().unwrap(), note.commitment().unwrap());
        }
    }
}
