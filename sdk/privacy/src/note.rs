//! Shielded Notes
//!
//! A Note is the private half of a pool deposit.
//!
//! ```text
//! Note = {
//!     secret: BigUint,    // Spending secret (ideally < field order)
//!     denom_index: u64,   // Index into the pool's denomination table
//! }
//! ```
//!
//! The secret is kept exactly as supplied. It is reduced into the field only
//! when hashed, so artifacts echo the caller's value verbatim.

use num_bigint::BigUint;
use rand::Rng;

use crate::commitment::Commitment;
use crate::error::Result;
use crate::field::{FieldElement, parse_decimal};
use crate::nullifier::Nullifier;

/// Upper bound of the demo secret range (inclusive)
const DEMO_SECRET_MAX: u64 = 10_000_000_000;

/// A shielded note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Spending secret, never reduced
    pub secret: BigUint,
    /// Denomination index
    pub denom_index: u64,
}

impl Note {
    pub fn new(secret: BigUint, denom_index: u64) -> Self {
        Self {
            secret,
            denom_index,
        }
    }

    /// Parse the secret from a base-10 string
    pub fn from_decimal(secret: &str, denom_index: u64) -> Result<Self> {
        Ok(Self::new(parse_decimal(secret)?, denom_index))
    }

    /// Create a note with a small pseudo-random secret in `[1, 10^10]`.
    ///
    /// NOT suitable for protecting real value: the secret space is tiny and
    /// the generator is not required to be cryptographic. Demo runs only.
    pub fn demo<R: Rng>(rng: &mut R, denom_index: u64) -> Self {
        let secret = rng.gen_range(1..=DEMO_SECRET_MAX);
        log::warn!(
            "Using a pseudo-random demo note secret ({} bits of entropy at most); do not deposit real funds against it",
            u64::BITS - DEMO_SECRET_MAX.leading_zeros()
        );
        Self::new(BigUint::from(secret), denom_index)
    }

    /// Secret reduced into the field
    pub fn secret_field(&self) -> FieldElement {
        FieldElement::from_biguint(&self.secret)
    }

    /// Leaf commitment: `P(secret, denom_index)`
    pub fn commitment(&self) -> Result<Commitment> {
        Commitment::derive(self)
    }

    /// Spend marker: `P(secret)`
    pub fn nullifier(&self) -> Result<Nullifier> {
        Nullifier::derive(&self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_demo_secret_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let note = Note::demo(&mut rng, 2);
            assert!(note.secret >= BigUint::from(1u64));
            assert!(note.secret <= BigUint::from(DEMO_SECRET_MAX));
            assert_eq!(note.denom_index, 2);
        }
    }

    #[test]
    fn test_secret_kept_unreduced() {
        let above_order =
            "21888242871839275222246405745257275088548364400416034343698204186575808495622";
        let note = Note::from_decimal(above_order, 0).unwrap();
        assert_eq!(note.secret.to_string(), above_order);
        assert_eq!(note.secret_field(), FieldElement::from(5u64));
    }

    #[test]
    fn test_rejects_malformed_secret() {
        assert!(Note::from_decimal("12abc", 0).is_err());
        assert!(Note::from_decimal("", 0).is_err());
    }
}
