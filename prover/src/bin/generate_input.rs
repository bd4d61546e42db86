//! Circuit input generator
//!
//! Derives the commitment, nullifier and Merkle path for one note and writes
//! `input.json` + `input.meta.json` into the build directory.
//!
//! Usage:
//!   NOTE_SECRET=123456789 DENOM_INDEX=0 cargo run --package pool-prover --bin generate_input
//!
//! Environment variables:
//!   NOTE_SECRET - Decimal note secret (default: pseudo-random demo secret)
//!   DENOM_INDEX - Denomination index (default: 0)
//!   HEIGHT      - Merkle tree height (default: 20)
//!   HASH_ORDER  - "left" (default) or "bits"
//!   BUILD_DIR   - Output directory (default: build)

use anyhow::{Context, Result};
use pool_config::{PoolConfig, SecretSource};
use pool_privacy::Note;
use pool_prover::{ArtifactDir, CircuitInputAssembler};

fn main() -> Result<()> {
    env_logger::init();

    let config = PoolConfig::load().context("Failed to load configuration")?;
    let settings = config.note_settings()?;
    let artifacts = ArtifactDir::new(config.artifact_settings().build_dir);

    let note = match settings.secret {
        SecretSource::Provided(secret) => Note::new(secret, settings.denom_index),
        SecretSource::DemoRandom => Note::demo(&mut rand::thread_rng(), settings.denom_index),
    };

    let assembled = CircuitInputAssembler::new(settings.height, settings.hash_order)?
        .assemble(&note)
        .context("Failed to assemble circuit input")?;

    artifacts
        .write_circuit_input(&assembled)
        .context("Failed to write circuit input")?;

    println!("Wrote {}", artifacts.input_path().display());
    println!("  root:      {}", assembled.meta.root_hex);
    println!("  nullifier: {}", assembled.meta.nullifier_hex);
    println!("  denom:     {}", assembled.meta.denom_index);

    Ok(())
}
