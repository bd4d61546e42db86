//! Proof encoder
//!
//! Turns the external prover's `proof.json` + `public.json` into the
//! verifier's ABI bytes (`proof.bytes`) and a hex companion record
//! (`public.hex.json`). Nothing is written if either input is invalid.
//!
//! Usage:
//!   cargo run --package pool-prover --bin encode_proof
//!
//! Environment variables:
//!   BUILD_DIR          - Artifact directory (default: build)
//!   PROOF_BYTES_FORMAT - "binary" (default) or "hex"

use anyhow::{Context, Result};
use pool_config::PoolConfig;
use pool_prover::ArtifactDir;

fn main() -> Result<()> {
    env_logger::init();

    let config = PoolConfig::load().context("Failed to load configuration")?;
    let settings = config.artifact_settings();
    let artifacts = ArtifactDir::new(settings.build_dir);

    let outputs = artifacts
        .encode_proof_artifacts(settings.proof_bytes_format)
        .with_context(|| format!("Failed to encode proof in {}", artifacts.root().display()))?;

    println!("Wrote {}", artifacts.proof_bytes_path().display());
    println!("  root:      {}", outputs.public.root);
    println!("  nullifier: {}", outputs.public.nullifier);
    println!("  denom:     {}", outputs.public.denom_index);

    Ok(())
}
