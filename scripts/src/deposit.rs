//! Demo deposit flow
//!
//! 1. `approve(pool, amount)` on the ERC20 token
//! 2. `deposit(amount, commitment)` on the pool
//!
//! Each step waits for confirmation before the next is sent. A failed
//! approval stops the flow with no deposit submitted.

use alloy::primitives::utils::format_units;
use pool_config::DepositSettings;

use crate::ledger::{Ledger, Result, TxOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipts {
    pub approve: TxOutcome,
    pub deposit: TxOutcome,
}

pub struct DepositFlow<'a, L> {
    ledger: &'a L,
}

impl<'a, L: Ledger> DepositFlow<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    pub async fn run(&self, settings: &DepositSettings) -> Result<DepositReceipts> {
        log::info!(
            "Depositing {} wei (~{} units) into {} with commitment {}",
            settings.amount,
            format_units(settings.amount, settings.decimals).unwrap_or_default(),
            settings.pool,
            settings.commitment
        );

        let approve = self
            .ledger
            .approve(settings.token, settings.pool, settings.amount)
            .await?;
        let deposit = self
            .ledger
            .deposit(settings.pool, settings.amount, settings.commitment)
            .await?;

        Ok(DepositReceipts { approve, deposit })
    }
}
