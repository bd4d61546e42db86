//! Merkle authentication paths for note commitments
//!
//! Builds the fixed-height path the membership circuit consumes and recomputes
//! the root from it.
//!
//! ```text
//!                    Root
//!                   /    \
//!                 H1      S2
//!                /  \
//!              H0    S1
//!             /  \
//!         Leaf    S0          (S_i = sibling at level i)
//! ```
//!
//! Without explicit siblings the builder synthesizes `H` zero siblings. That
//! is the degenerate empty-tree topology used by the demo, not a lookup in a
//! real commitment tree.

use crate::error::{PrivacyError, Result};
use crate::field::FieldElement;
use crate::poseidon::hash2;

/// Default tree height used by the membership circuit
pub const DEFAULT_HEIGHT: usize = 20;

/// How each level orders `(current, sibling)` before hashing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashOrder {
    /// Current value is always the left operand; path bits are informational.
    /// This is what the demo circuit recomputes.
    #[default]
    LeftAlways,
    /// Bit 0 puts the current value on the left, bit 1 on the right
    FollowPathBits,
}

/// A Merkle path proving inclusion of a leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerklePath {
    /// Sibling hashes from leaf to root
    pub elements: Vec<FieldElement>,
    /// Position bits (0 = left, 1 = right)
    pub indices: Vec<u8>,
}

impl MerklePath {
    pub fn height(&self) -> usize {
        self.elements.len()
    }

    /// Recompute the root from `leaf` under the given ordering policy
    pub fn compute_root(&self, leaf: FieldElement, order: HashOrder) -> Result<FieldElement> {
        if self.indices.len() != self.elements.len() {
            return Err(PrivacyError::PathLength {
                what: "path index",
                expected: self.elements.len(),
                got: self.indices.len(),
            });
        }

        let mut current = leaf;
        for (level, (sibling, bit)) in self.elements.iter().zip(&self.indices).enumerate() {
            current = match (order, *bit) {
                (HashOrder::FollowPathBits, 1) => hash2(*sibling, current)?,
                _ => hash2(current, *sibling)?,
            };
            log::debug!("merkle level {level}: bit={bit} node={current}");
        }

        Ok(current)
    }

    /// Verify that this path proves inclusion of `leaf` in `root`
    pub fn verify(&self, leaf: FieldElement, root: FieldElement, order: HashOrder) -> bool {
        self.compute_root(leaf, order)
            .map(|computed| computed == root)
            .unwrap_or(false)
    }

    /// Siblings as decimal strings (circuit `pathElements`)
    pub fn elements_decimal(&self) -> Vec<String> {
        self.elements.iter().map(FieldElement::to_decimal).collect()
    }
}

/// Output of [`MerkleProofBuilder::build`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    pub leaf: FieldElement,
    pub root: FieldElement,
    pub path: MerklePath,
}

/// Builds a fixed-height authentication path and its root
#[derive(Debug, Clone)]
pub struct MerkleProofBuilder {
    height: usize,
    siblings: Option<Vec<FieldElement>>,
    path_bits: Option<Vec<u8>>,
    order: HashOrder,
}

impl MerkleProofBuilder {
    pub fn new(height: usize) -> Result<Self> {
        if height == 0 {
            return Err(PrivacyError::InvalidHeight(height));
        }
        Ok(Self {
            height,
            siblings: None,
            path_bits: None,
            order: HashOrder::default(),
        })
    }

    /// Use explicit siblings instead of the all-zero demo path
    pub fn with_siblings(mut self, siblings: Vec<FieldElement>) -> Self {
        self.siblings = Some(siblings);
        self
    }

    /// Use explicit position bits instead of all zeros
    pub fn with_path_bits(mut self, bits: Vec<u8>) -> Self {
        self.path_bits = Some(bits);
        self
    }

    pub fn with_order(mut self, order: HashOrder) -> Self {
        self.order = order;
        self
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn order(&self) -> HashOrder {
        self.order
    }

    /// Build the path for `leaf` and recompute the root
    pub fn build(&self, leaf: FieldElement) -> Result<MerkleProof> {
        let elements = match &self.siblings {
            Some(siblings) => {
                self.check_len("sibling", siblings.len())?;
                siblings.clone()
            }
            None => vec![FieldElement::zero(); self.height],
        };

        let indices = match &self.path_bits {
            Some(bits) => {
                self.check_len("path index", bits.len())?;
                if let Some((level, bit)) = bits.iter().enumerate().find(|(_, b)| **b > 1) {
                    return Err(PrivacyError::InvalidPathBit { level, bit: *bit });
                }
                bits.clone()
            }
            None => vec![0u8; self.height],
        };

        let path = MerklePath { elements, indices };
        let root = path.compute_root(leaf, self.order)?;
        log::info!("Built Merkle path: height={} root={}", self.height, root.to_hex());

        Ok(MerkleProof { leaf, root, path })
    }

    fn check_len(&self, what: &'static str, got: usize) -> Result<()> {
        if got != self.height {
            return Err(PrivacyError::PathLength {
                what,
                expected: self.height,
                got,
            });
        }
        Ok(())
    }
}
