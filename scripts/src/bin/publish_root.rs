//! Publish an association root
//!
//! Usage:
//!   cargo run --package pool-scripts --bin publish_root -- 0x<64 hex digits>
//!
//! Environment variables:
//!   PRIVACY_POOL_ADDRESS - Pool address (required)
//!   ROOT                 - Root to publish, if not passed as the argument
//!   PRIVATE_KEY          - Signer key (required)
//!   RPC_URL / JSC_RPC_KEY, RPC_TIMEOUT_SECS

use anyhow::{Context, Result};
use pool_config::PoolConfig;
use pool_scripts::output::*;
use pool_scripts::{EvmLedger, Ledger, RootPublisher};

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    print_header("Publish Association Root");

    let root_arg = std::env::args().nth(1);

    let config = PoolConfig::load().context("Failed to load configuration")?;
    let settings = config.publish_settings(root_arg.as_deref())?;
    let ledger_settings = config.ledger_settings()?;
    ledger_settings.require_signer()?;

    let ledger = EvmLedger::connect(&ledger_settings)?;
    print_field("Chain", ledger.chain_id().await?);
    if let Some(sender) = ledger.sender() {
        print_field("Signer", sender);
    }
    print_field("Pool", settings.pool);
    print_field("Root", settings.root);

    print_waiting("Sending transaction...");
    let outcome = RootPublisher::new(&ledger)
        .publish(settings.pool, settings.root)
        .await
        .context("Failed to publish root")?;

    print_field("Tx", outcome.tx_hash);
    print_success("Root published.");
    Ok(())
}
