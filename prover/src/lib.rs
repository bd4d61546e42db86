//! Privacy Pool Prover Plumbing
//!
//! Everything between the note primitives and the external Groth16 prover:
//!
//! ```text
//!  Note ──▶ circuit_input ──▶ input.json ──▶ [external prover]
//!                                                  │
//!         proof.bytes ◀── encoding ◀── proof.json + public.json
//! ```
//!
//! `circuit_input` and `encoding` are pure; `artifacts` owns the build
//! directory and writes only fully validated outputs.

pub mod artifacts;
pub mod circuit_input;
pub mod encoding;
pub mod error;

pub use artifacts::ArtifactDir;
pub use circuit_input::{AssembledInput, CircuitInput, CircuitInputAssembler, InputMeta};
pub use encoding::{
    EncodedOutputs, EncodedProof, GrothProof, ProofFile, PublicSignalRecord, PublicSignals,
    encode_outputs, to_hex_word,
};
pub use error::{ProverError, Result};
