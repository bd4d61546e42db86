//! Deposit demo ERC20 into the privacy pool
//!
//! Approves the pool for the amount, then calls `deposit(amount, commitment)`.
//!
//! Usage:
//!   POOL=0x... ERC20_TOKEN_ADDRESS=0x... AMOUNT_UNITS=1 cargo run --package pool-scripts --bin deposit
//!
//! Environment variables:
//!   POOL                        - Pool address (default: PRIVACY_POOL_ADDRESS)
//!   ERC20_TOKEN_ADDRESS         - Token address (required)
//!   AMOUNT                      - Amount in wei, or
//!   AMOUNT_UNITS + DECIMALS     - Human amount (DECIMALS default: 18)
//!   COMMITMENT                  - 32-byte hex commitment (default: 0x11 then zeros)
//!   PRIVATE_KEY                 - Signer key (required)

use anyhow::{Context, Result};
use pool_config::PoolConfig;
use pool_scripts::output::*;
use pool_scripts::{DepositFlow, EvmLedger, Ledger};

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    print_header("Deposit to Privacy Pool");

    let config = PoolConfig::load().context("Failed to load configuration")?;
    let settings = config.deposit_settings()?;
    let ledger_settings = config.ledger_settings()?;
    ledger_settings.require_signer()?;

    let ledger = EvmLedger::connect(&ledger_settings)?;
    print_field("Chain", ledger.chain_id().await?);
    if let Some(sender) = ledger.sender() {
        print_field("Caller", sender);
    }
    print_field("Pool", settings.pool);
    print_field("Token", settings.token);
    print_field("Amount", format!("{} wei", settings.amount));
    print_field("Commitment", settings.commitment);

    print_waiting("Approving allowance, then depositing...");
    let receipts = DepositFlow::new(&ledger)
        .run(&settings)
        .await
        .context("Deposit failed")?;

    print_field("Approve tx", receipts.approve.tx_hash);
    print_field("Deposit tx", receipts.deposit.tx_hash);
    print_success("Deposit complete.");
    Ok(())
}
