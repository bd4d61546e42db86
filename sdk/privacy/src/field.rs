//! BN254 scalar field elements with canonical decimal/hex renderings.
//!
//! Circuit inputs carry every field element as an exact base-10 string, and
//! the helper metadata carries `0x` + 64 hex digits (big-endian). Both
//! renderings live here so every caller pads and reduces the same way.

use std::fmt;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField, Zero};
use num_bigint::BigUint;

use crate::error::{PrivacyError, Result};

/// An element of the BN254 scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(pub Fr);

impl FieldElement {
    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    /// Reduce an arbitrary-precision integer into the field
    pub fn from_biguint(value: &BigUint) -> Self {
        Self(Fr::from_le_bytes_mod_order(&value.to_bytes_le()))
    }

    /// Parse a base-10 string, reducing modulo the field order
    pub fn from_decimal(s: &str) -> Result<Self> {
        parse_decimal(s).map(|v| Self::from_biguint(&v))
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.0.into_bigint().to_bytes_le())
    }

    /// Exact base-10 rendering
    pub fn to_decimal(&self) -> String {
        self.to_biguint().to_string()
    }

    /// `0x` followed by exactly 64 lowercase hex digits, big-endian
    pub fn to_hex(&self) -> String {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut word = [0u8; 32];
        word[32 - bytes.len()..].copy_from_slice(&bytes);
        format!("0x{}", hex::encode(word))
    }

    pub fn inner(&self) -> Fr {
        self.0
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self(Fr::from(value))
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

/// Parse an unsigned base-10 integer of arbitrary size.
///
/// Only ASCII digits are accepted: no sign, whitespace or separators.
pub fn parse_decimal(s: &str) -> Result<BigUint> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PrivacyError::InvalidDecimal(s.to_string()));
    }
    BigUint::parse_bytes(s.as_bytes(), 10).ok_or_else(|| PrivacyError::InvalidDecimal(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODULUS: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    #[test]
    fn test_hex_padding() {
        assert_eq!(FieldElement::zero().to_hex(), format!("0x{}", "0".repeat(64)));
        assert_eq!(
            FieldElement::from(1u64).to_hex(),
            format!("0x{}1", "0".repeat(63))
        );
    }

    #[test]
    fn test_decimal_roundtrip() {
        let big = "1234567890123456789012345678901234567890";
        let f = FieldElement::from_decimal(big).unwrap();
        assert_eq!(f.to_decimal(), big);
        assert_eq!(f.to_string(), big);
    }

    #[test]
    fn test_reduces_mod_order() {
        assert_eq!(FieldElement::from_decimal(MODULUS).unwrap(), FieldElement::zero());

        let p_plus_five = parse_decimal(MODULUS).unwrap() + 5u32;
        assert_eq!(FieldElement::from_biguint(&p_plus_five), FieldElement::from(5u64));
    }

    #[test]
    fn test_rejects_non_decimal() {
        for bad in ["", "-1", "0x10", "12 ", "1_000", "+7"] {
            assert!(
                FieldElement::from_decimal(bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }
}
