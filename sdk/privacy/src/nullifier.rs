//! Nullifiers
//!
//! ```text
//! Nullifier = Poseidon(secret)
//! ```
//!
//! Revealing the nullifier marks the note spent without revealing the secret.
//! Rejecting a nullifier seen before is the ledger's job, not this crate's.

use std::fmt;

use num_bigint::BigUint;

use crate::error::Result;
use crate::field::FieldElement;
use crate::poseidon::hash1;

/// A nullifier - unique tag for a spent note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nullifier(pub FieldElement);

impl Nullifier {
    /// Derive the nullifier from the note secret alone
    pub fn derive(secret: &BigUint) -> Result<Self> {
        Ok(Self(hash1(FieldElement::from_biguint(secret))?))
    }

    pub fn to_field(&self) -> FieldElement {
        self.0
    }
}

impl fmt::Display for Nullifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_nullifier_deterministic() {
        let secret = BigUint::from(123_456_789u64);
        let n1 = Nullifier::derive(&secret).unwrap();
        let n2 = Nullifier::derive(&secret).unwrap();
        assert_eq!(n1, n2, "same secret should produce same nullifier");
    }

    #[test]
    fn test_nullifier_matches_hash1() {
        let n = Nullifier::derive(&BigUint::from(5u64)).unwrap();
        assert_eq!(n.to_field(), hash1(FieldElement::from(5u64)).unwrap());
    }

    #[test]
    fn test_nullifiers_pairwise_distinct() {
        let mut rng = StdRng::seed_from_u64(0x4e554c4c);
        let mut secrets = HashSet::new();
        while secrets.len() < 1_000 {
            let bytes: [u8; 31] = rng.r#gen();
            secrets.insert(BigUint::from_bytes_be(&bytes));
        }

        let nullifiers: HashSet<Nullifier> = secrets
            .iter()
            .map(|s| Nullifier::derive(s).unwrap())
            .collect();

        assert_eq!(nullifiers.len(), secrets.len());
    }

    #[test]
    fn test_nullifier_independent_of_denomination() {
        use crate::note::Note;
        let a = Note::new(BigUint::from(77u64), 0).nullifier().unwrap();
        let b = Note::new(BigUint::from(77u64), 3).nullifier().unwrap();
        assert_eq!(a, b);
    }
}
