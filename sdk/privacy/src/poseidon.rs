use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};

use crate::error::Result;
use crate::field::FieldElement;

/// Poseidon configuration for the pool
///
/// Field: BN254 Fr (254 bits)
/// Parameters: circomlib (x^5 S-box, 8 full rounds, width = inputs + 1)
///
/// Matches `circomlibjs` `poseidon([..])` and the circuit's `Poseidon(n)`
/// template, so off-circuit values agree with in-circuit recomputation.
fn hash(inputs: &[Fr]) -> Result<FieldElement> {
    let mut poseidon = Poseidon::<Fr>::new_circom(inputs.len())?;
    Ok(FieldElement(poseidon.hash(inputs)?))
}

/// Single-input Poseidon: `P(a)`
pub fn hash1(a: FieldElement) -> Result<FieldElement> {
    hash(&[a.0])
}

/// Two-input Poseidon: `P(a, b)`
pub fn hash2(a: FieldElement, b: FieldElement) -> Result<FieldElement> {
    hash(&[a.0, b.0])
}
