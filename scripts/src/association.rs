//! Demo association root
//!
//! ```text
//! root = keccak256(commitment_1 || commitment_2 || ... || commitment_n)
//! ```
//!
//! Commitments are the indexed `commitment` topic of every `Deposit` event in
//! the block range, ordered by `(block, logIndex)`.
//!
//! NOT a production association set: there is no incremental accumulator, no
//! membership proof, and the root changes with every new deposit. An empty
//! range still yields a root, `keccak256("")`.

use alloy::primitives::{Address, B256, keccak256};
use pool_config::BlockRange;

use crate::ledger::{Ledger, LedgerError, Result};

/// Concatenation hash over commitments, in the given order
pub fn association_root(commitments: &[B256]) -> B256 {
    let packed: Vec<u8> = commitments
        .iter()
        .flat_map(|c| c.as_slice().iter().copied())
        .collect();
    keccak256(&packed)
}

/// Result of one aggregation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationReport {
    pub pool: Address,
    pub from_block: u64,
    pub to_block: u64,
    /// In ledger order
    pub commitments: Vec<B256>,
    pub root: B256,
}

pub struct AssociationRootAggregator<'a, L> {
    ledger: &'a L,
}

impl<'a, L: Ledger> AssociationRootAggregator<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Collect `Deposit` commitments in `range` and fold them into a root.
    ///
    /// An open upper bound resolves to the ledger head at call time.
    pub async fn aggregate(&self, pool: Address, range: BlockRange) -> Result<AssociationReport> {
        let to_block = match range.to {
            Some(to) => to,
            None => self.ledger.head_block().await?,
        };
        if range.from > to_block {
            return Err(LedgerError::Validation(format!(
                "FROM_BLOCK {} is after TO_BLOCK {}",
                range.from, to_block
            )));
        }

        let mut logs = self.ledger.deposit_logs(pool, range.from, to_block).await?;
        logs.sort_by_key(|l| (l.block_number, l.log_index));

        let commitments: Vec<B256> = logs.iter().map(|l| l.commitment).collect();
        for l in &logs {
            log::debug!(
                "deposit block={} index={} commitment={}",
                l.block_number,
                l.log_index,
                l.commitment
            );
        }

        let root = association_root(&commitments);
        log::info!(
            "Association root over {} deposits in [{}, {}]: {}",
            commitments.len(),
            range.from,
            to_block,
            root
        );

        Ok(AssociationReport {
            pool,
            from_block: range.from,
            to_block,
            commitments,
            root,
        })
    }
}
