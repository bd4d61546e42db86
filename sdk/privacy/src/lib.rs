//! Privacy Pool SDK
//!
//! Note primitives for shielded deposits: commitments, nullifiers and the
//! fixed-height Merkle path the membership circuit consumes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Note {secret, denom}                    │
//! │         │                                        │              │
//! │         ▼                                        ▼              │
//! │  ┌──────────────────┐                   ┌──────────────────┐    │
//! │  │   Commitment     │                   │    Nullifier     │    │
//! │  │ P(secret, denom) │                   │   P(secret)      │    │
//! │  └──────────────────┘                   └──────────────────┘    │
//! │         │                                        │              │
//! │         ▼                                        │              │
//! │  ┌──────────────────┐                            │              │
//! │  │  Merkle path     │── root ────────────────────┤              │
//! │  │  (height H)      │                            ▼              │
//! │  └──────────────────┘                  public circuit inputs    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All hashing is circom-compatible Poseidon over the BN254 scalar field, so
//! values computed here match what the circuit recomputes in-constraint.

pub mod commitment;
pub mod error;
pub mod field;
pub mod merkle;
pub mod note;
pub mod nullifier;
pub mod poseidon;

pub use commitment::Commitment;
pub use error::{PrivacyError, Result};
pub use field::FieldElement;
pub use merkle::{DEFAULT_HEIGHT, HashOrder, MerklePath, MerkleProof, MerkleProofBuilder};
pub use note::Note;
pub use nullifier::Nullifier;
pub use poseidon::{hash1, hash2};
