//! Association root publishing
//!
//! Submits a root to `publishAssociationRoot(bytes32)`. The root is only
//! shape-checked (32 bytes, done when it is parsed); nothing here ties it to
//! any particular deposit set. Publishing the same root twice sends two
//! transactions.

use alloy::primitives::{Address, B256};

use crate::ledger::{Ledger, Result, TxOutcome};

pub struct RootPublisher<'a, L> {
    ledger: &'a L,
}

impl<'a, L: Ledger> RootPublisher<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    pub async fn publish(&self, pool: Address, root: B256) -> Result<TxOutcome> {
        log::info!("Publishing association root {root} to {pool}");
        self.ledger.publish_association_root(pool, root).await
    }
}
