//! Privacy Pool Ledger Scripts
//!
//! Everything that talks to the pool contract:
//!
//! - [`association`]: toy association root over `Deposit` logs
//! - [`publisher`]: `publishAssociationRoot(bytes32)`
//! - [`deposit`]: ERC20 approve + `deposit(amount, commitment)`
//!
//! All of them go through the [`Ledger`] trait; [`EvmLedger`] is the alloy
//! implementation used by the bins.

pub mod association;
pub mod deposit;
pub mod ledger;
pub mod output;
pub mod publisher;

pub use association::{AssociationReport, AssociationRootAggregator, association_root};
pub use deposit::{DepositFlow, DepositReceipts};
pub use ledger::{DepositLog, EvmLedger, Ledger, LedgerError, Result, TxOutcome};
pub use publisher::RootPublisher;
