//! Groth16 proof encoding for the on-chain verifier adapter
//!
//! The adapter takes the proof as the static ABI tuple
//! `(uint256[2], uint256[2][2], uint256[2])`:
//!
//! ```text
//! offset  word
//! 0x00    A[0]
//! 0x20    A[1]
//! 0x40    B[0][0]
//! 0x60    B[0][1]
//! 0x80    B[1][0]
//! 0xa0    B[1][1]
//! 0xc0    C[0]
//! 0xe0    C[1]
//! ```
//!
//! B is taken row-major exactly as the prover emitted it. All inputs are
//! validated before anything is returned, so callers never hold a partially
//! encoded proof.

use std::str::FromStr;

use alloy::primitives::U256;
use alloy::sol_types::SolValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProverError, Result};

/// Length of one ABI word
pub const WORD_LEN: usize = 32;

/// Encoded length of `(uint256[2], uint256[2][2], uint256[2])`
pub const ENCODED_PROOF_LEN: usize = 8 * WORD_LEN;

/// Number of public signals the membership circuit exposes
pub const PUBLIC_SIGNAL_COUNT: usize = 3;

/// `proof.json` as written by the prover.
///
/// Kept as raw JSON so every shape problem (missing key, short array,
/// non-string element) surfaces as an encoding error rather than a parse
/// error.
#[derive(Clone, Debug, Deserialize)]
pub struct ProofFile(pub Value);

/// A Groth16 proof as verifier words
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrothProof {
    pub a: [U256; 2],
    pub b: [[U256; 2]; 2],
    pub c: [U256; 2],
}

impl GrothProof {
    /// Extract `pi_a`, `pi_b`, `pi_c` from a `proof.json` document.
    ///
    /// snarkjs appends the projective coordinate (`"1"`, or a third row for
    /// `pi_b`); entries beyond the first two are ignored.
    pub fn from_proof_json(doc: &Value) -> Result<Self> {
        let proof = doc
            .get("proof")
            .ok_or_else(|| ProverError::encoding("proof.json has no \"proof\" object"))?;

        let b_rows = array_at_least(proof.get("pi_b"), "pi_b", 2)?;
        Ok(Self {
            a: pair(proof.get("pi_a"), "pi_a")?,
            b: [
                pair(Some(&b_rows[0]), "pi_b[0]")?,
                pair(Some(&b_rows[1]), "pi_b[1]")?,
            ],
            c: pair(proof.get("pi_c"), "pi_c")?,
        })
    }

    /// ABI-encode as `(uint256[2], uint256[2][2], uint256[2])`
    pub fn encode(&self) -> EncodedProof {
        EncodedProof((self.a, self.b, self.c).abi_encode_params())
    }

    /// Decode the static tuple back into words
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ENCODED_PROOF_LEN {
            return Err(ProverError::encoding(format!(
                "encoded proof must be {ENCODED_PROOF_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let w: Vec<U256> = bytes
            .chunks_exact(WORD_LEN)
            .map(U256::from_be_slice)
            .collect();

        Ok(Self {
            a: [w[0], w[1]],
            b: [[w[2], w[3]], [w[4], w[5]]],
            c: [w[6], w[7]],
        })
    }
}

/// ABI bytes of a proof
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedProof(pub Vec<u8>);

impl EncodedProof {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// `0x`-prefixed hex text
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

/// The circuit's public signals `[root, nullifier, denomIndex]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicSignals {
    pub root: U256,
    pub nullifier: U256,
    pub denom_index: U256,
    /// Decimal strings exactly as read
    pub raw: Vec<String>,
}

impl PublicSignals {
    pub fn from_json(doc: &Value) -> Result<Self> {
        let items = doc
            .as_array()
            .ok_or_else(|| ProverError::encoding("public.json must be an array"))?;
        if items.len() != PUBLIC_SIGNAL_COUNT {
            return Err(ProverError::encoding(format!(
                "public.json must hold exactly {PUBLIC_SIGNAL_COUNT} signals, got {}",
                items.len()
            )));
        }

        let raw = items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_str().map(str::to_string).ok_or_else(|| {
                    ProverError::encoding(format!("public signal {i} is not a decimal string"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            root: parse_word(&raw[0], "root")?,
            nullifier: parse_word(&raw[1], "nullifier")?,
            denom_index: parse_word(&raw[2], "denomIndex")?,
            raw,
        })
    }

    /// Hex companion record (`public.hex.json`)
    pub fn to_record(&self) -> PublicSignalRecord {
        PublicSignalRecord {
            root: to_hex_word(self.root),
            nullifier: to_hex_word(self.nullifier),
            denom_index: self.raw[2].clone(),
            signals: self.raw.clone(),
        }
    }
}

/// `public.hex.json`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSignalRecord {
    pub root: String,
    pub nullifier: String,
    #[serde(rename = "denomIndex")]
    pub denom_index: String,
    #[serde(rename = "pub")]
    pub signals: Vec<String>,
}

/// Both outputs of one encoding run, built fully in memory
#[derive(Clone, Debug)]
pub struct EncodedOutputs {
    pub proof: GrothProof,
    pub proof_bytes: EncodedProof,
    pub public: PublicSignalRecord,
}

/// Validate and encode a proof and its public signals
pub fn encode_outputs(proof_doc: &Value, public_doc: &Value) -> Result<EncodedOutputs> {
    let proof = GrothProof::from_proof_json(proof_doc)?;
    let signals = PublicSignals::from_json(public_doc)?;

    Ok(EncodedOutputs {
        proof,
        proof_bytes: proof.encode(),
        public: signals.to_record(),
    })
}

/// `0x` followed by exactly 64 hex digits, big-endian
pub fn to_hex_word(value: U256) -> String {
    format!("0x{}", hex::encode(value.to_be_bytes::<WORD_LEN>()))
}

fn array_at_least<'a>(value: Option<&'a Value>, name: &str, min: usize) -> Result<&'a Vec<Value>> {
    let items = value
        .ok_or_else(|| ProverError::encoding(format!("proof is missing {name}")))?
        .as_array()
        .ok_or_else(|| ProverError::encoding(format!("{name} must be an array")))?;
    if items.len() < min {
        return Err(ProverError::encoding(format!(
            "{name} needs {min} elements, got {}",
            items.len()
        )));
    }
    Ok(items)
}

fn pair(value: Option<&Value>, name: &str) -> Result<[U256; 2]> {
    let items = array_at_least(value, name, 2)?;
    let word = |i: usize| {
        let s = items[i]
            .as_str()
            .ok_or_else(|| ProverError::encoding(format!("{name}[{i}] is not a decimal string")))?;
        parse_word(s, &format!("{name}[{i}]"))
    };
    Ok([word(0)?, word(1)?])
}

/// Parse a base-10 string into a 256-bit word
fn parse_word(s: &str, name: &str) -> Result<U256> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProverError::encoding(format!(
            "{name} is not a decimal integer: {s:?}"
        )));
    }
    U256::from_str(s).map_err(|e| ProverError::encoding(format!("{name} does not fit in uint256: {e}")))
}
