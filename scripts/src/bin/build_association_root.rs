//! Build the demo association root
//!
//! Reads `Deposit` events from the pool, hashes the concatenated commitments
//! with keccak256, and optionally publishes the result.
//!
//! Usage:
//!   PRIVACY_POOL_ADDRESS=0x... cargo run --package pool-scripts --bin build_association_root
//!
//! Environment variables:
//!   PRIVACY_POOL_ADDRESS - Pool address (required)
//!   FROM_BLOCK           - First block, inclusive (default: 0)
//!   TO_BLOCK             - Last block, inclusive (default: latest)
//!   PUBLISH              - "1" to publish the computed root (needs PRIVATE_KEY)
//!   RPC_URL / JSC_RPC_KEY, RPC_TIMEOUT_SECS

use anyhow::{Context, Result};
use pool_config::PoolConfig;
use pool_scripts::output::*;
use pool_scripts::{AssociationRootAggregator, EvmLedger, RootPublisher};

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    print_header("Build Association Root (demo)");

    let config = PoolConfig::load().context("Failed to load configuration")?;
    let settings = config.association_settings()?;
    let ledger_settings = config.ledger_settings()?;
    if settings.publish {
        ledger_settings.require_signer()?;
    }

    let ledger = EvmLedger::connect(&ledger_settings)?;
    print_field("RPC", ledger_settings.endpoint.redacted());
    print_field("Pool", settings.pool);

    let report = AssociationRootAggregator::new(&ledger)
        .aggregate(settings.pool, settings.range)
        .await
        .context("Failed to aggregate deposits")?;

    print_field("Blocks", format!("{}..={}", report.from_block, report.to_block));
    print_field("Deposits", report.commitments.len());
    print_field("Root", report.root);

    if settings.publish {
        print_waiting("Publishing root...");
        let outcome = RootPublisher::new(&ledger)
            .publish(settings.pool, report.root)
            .await
            .context("Failed to publish root")?;
        print_field("Tx", outcome.tx_hash);
        print_success("Root published.");
    } else {
        print_info("Set PUBLISH=1 to publish this root");
    }

    Ok(())
}
