//! Circuit input assembly
//!
//! Packages a note, its Merkle path and its nullifier into the record the
//! membership circuit reads (`input.json`), plus a human-readable companion
//! (`input.meta.json`) carrying hex renderings of the public values.
//!
//! Every big integer is an exact base-10 string. Field elements exceed 2^64
//! (and 2^53 for JS consumers), so no native numeric type is ever emitted
//! for them.

use pool_privacy::{FieldElement, HashOrder, MerkleProof, MerkleProofBuilder, Note};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Private circuit inputs (witness)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateInputs {
    #[serde(rename = "noteSecret")]
    pub secret: String,
    #[serde(rename = "denomIndexPriv")]
    pub denom_index: u64,
    #[serde(rename = "pathElements")]
    pub path_elements: Vec<String>,
    #[serde(rename = "pathIndex")]
    pub path_index: Vec<u8>,
}

/// Public inputs checked by the verifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    #[serde(rename = "root_pub")]
    pub root: String,
    #[serde(rename = "nullifier_pub")]
    pub nullifier: String,
    #[serde(rename = "denomIndex_pub")]
    pub denom_index: u64,
}

/// Full circuit input, serialized flat as `input.json`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitInput {
    #[serde(flatten)]
    pub private: PrivateInputs,
    #[serde(flatten)]
    pub public: PublicInputs,
}

/// Companion record (`input.meta.json`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputMeta {
    pub note_secret: String,
    pub denom_index: u64,
    pub root_hex: String,
    pub nullifier_hex: String,
}

/// Everything produced for one note
#[derive(Clone, Debug)]
pub struct AssembledInput {
    pub input: CircuitInput,
    pub meta: InputMeta,
    pub proof: MerkleProof,
    pub nullifier: FieldElement,
}

/// Builds circuit inputs for a fixed tree height
#[derive(Clone, Debug)]
pub struct CircuitInputAssembler {
    builder: MerkleProofBuilder,
}

impl CircuitInputAssembler {
    pub fn new(height: usize, order: HashOrder) -> Result<Self> {
        Ok(Self {
            builder: MerkleProofBuilder::new(height)?.with_order(order),
        })
    }

    /// Use an explicit authentication path instead of the all-zero demo path
    pub fn with_path(mut self, siblings: Vec<FieldElement>, bits: Vec<u8>) -> Self {
        self.builder = self.builder.with_siblings(siblings).with_path_bits(bits);
        self
    }

    pub fn assemble(&self, note: &Note) -> Result<AssembledInput> {
        let leaf = note.commitment()?.to_field();
        let nullifier = note.nullifier()?.to_field();
        let proof = self.builder.build(leaf)?;

        let secret = note.secret.to_string();
        let input = CircuitInput {
            private: PrivateInputs {
                secret: secret.clone(),
                denom_index: note.denom_index,
                path_elements: proof.path.elements_decimal(),
                path_index: proof.path.indices.clone(),
            },
            public: PublicInputs {
                root: proof.root.to_decimal(),
                nullifier: nullifier.to_decimal(),
                denom_index: note.denom_index,
            },
        };

        let meta = InputMeta {
            note_secret: secret,
            denom_index: note.denom_index,
            root_hex: proof.root.to_hex(),
            nullifier_hex: nullifier.to_hex(),
        };

        log::info!(
            "Assembled circuit input: height={} denom={} nullifier={}",
            self.builder.height(),
            note.denom_index,
            meta.nullifier_hex
        );

        Ok(AssembledInput {
            input,
            meta,
            proof,
            nullifier,
        })
    }
}
