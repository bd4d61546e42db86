use std::fs;

use alloy::primitives::U256;
use num_bigint::BigUint;
use pool_config::ProofBytesFormat;
use pool_privacy::{HashOrder, Note};
use pool_prover::{ArtifactDir, CircuitInputAssembler, GrothProof, ProverError, PublicSignalRecord};
use serde_json::{Value, json};

fn write_prover_outputs(dir: &ArtifactDir, proof: Value, public: Value) {
    fs::create_dir_all(dir.root()).unwrap();
    fs::write(dir.proof_path(), serde_json::to_vec(&proof).unwrap()).unwrap();
    fs::write(dir.public_path(), serde_json::to_vec(&public).unwrap()).unwrap();
}

fn snarkjs_proof() -> Value {
    json!({
        "pi_a": ["11", "12", "1"],
        "pi_b": [["21", "22"], ["23", "24"], ["1", "0"]],
        "pi_c": ["31", "32", "1"],
        "protocol": "groth16",
        "curve": "bn128"
    })
}

#[test]
fn circuit_input_written_to_build_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = ArtifactDir::new(tmp.path().join("build"));

    let note = Note::new(BigUint::from(5u64), 0);
    let assembled = CircuitInputAssembler::new(2, HashOrder::LeftAlways)
        .unwrap()
        .assemble(&note)
        .unwrap();
    dir.write_circuit_input(&assembled).unwrap();

    let input: Value = serde_json::from_slice(&fs::read(dir.input_path()).unwrap()).unwrap();
    assert_eq!(input["noteSecret"], "5");
    assert_eq!(input["root_pub"], assembled.proof.root.to_decimal());

    let meta: Value = serde_json::from_slice(&fs::read(dir.input_meta_path()).unwrap()).unwrap();
    assert_eq!(meta["rootHex"], assembled.meta.root_hex);
    assert_eq!(meta["nullifierHex"], assembled.meta.nullifier_hex);
}

#[test]
fn binary_proof_bytes_and_hex_record() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = ArtifactDir::new(tmp.path());
    write_prover_outputs(&dir, json!({ "proof": snarkjs_proof() }), json!(["1", "2", "0"]));

    dir.encode_proof_artifacts(ProofBytesFormat::Binary).unwrap();

    let bytes = fs::read(dir.proof_bytes_path()).unwrap();
    assert_eq!(bytes.len(), 256);
    let decoded = GrothProof::decode(&bytes).unwrap();
    assert_eq!(decoded.a, [U256::from(11u64), U256::from(12u64)]);
    assert_eq!(
        decoded.b,
        [
            [U256::from(21u64), U256::from(22u64)],
            [U256::from(23u64), U256::from(24u64)]
        ]
    );
    assert_eq!(decoded.c, [U256::from(31u64), U256::from(32u64)]);

    let record: PublicSignalRecord =
        serde_json::from_slice(&fs::read(dir.public_hex_path()).unwrap()).unwrap();
    assert_eq!(record.root, format!("0x{}1", "0".repeat(63)));
    assert_eq!(record.nullifier, format!("0x{}2", "0".repeat(63)));
    assert_eq!(record.denom_index, "0");
    assert_eq!(record.signals, vec!["1", "2", "0"]);
}

#[test]
fn hex_proof_bytes() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = ArtifactDir::new(tmp.path());
    write_prover_outputs(&dir, json!({ "proof": snarkjs_proof() }), json!(["1", "2", "0"]));

    let outputs = dir.encode_proof_artifacts(ProofBytesFormat::Hex).unwrap();

    let text = fs::read_to_string(dir.proof_bytes_path()).unwrap();
    assert!(text.starts_with("0x"));
    assert_eq!(text.len(), 2 + 512);
    assert_eq!(text, outputs.proof_bytes.to_hex());
}

#[test]
fn short_pi_a_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = ArtifactDir::new(tmp.path());
    let mut proof = snarkjs_proof();
    proof["pi_a"] = json!(["11"]);
    write_prover_outputs(&dir, json!({ "proof": proof }), json!(["1", "2", "0"]));

    let err = dir.encode_proof_artifacts(ProofBytesFormat::Binary).unwrap_err();
    assert!(matches!(err, ProverError::Encoding(_)));
    assert!(!dir.proof_bytes_path().exists());
    assert!(!dir.public_hex_path().exists());
}

#[test]
fn wrong_public_count_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = ArtifactDir::new(tmp.path());
    write_prover_outputs(&dir, json!({ "proof": snarkjs_proof() }), json!(["1", "2"]));

    assert!(dir.encode_proof_artifacts(ProofBytesFormat::Binary).is_err());
    assert!(!dir.proof_bytes_path().exists());
    assert!(!dir.public_hex_path().exists());
}

#[test]
fn invalid_json_is_malformed() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = ArtifactDir::new(tmp.path());
    fs::write(dir.proof_path(), b"{ not json").unwrap();
    fs::write(dir.public_path(), b"[\"1\",\"2\",\"0\"]").unwrap();

    let err = dir.encode_proof_artifacts(ProofBytesFormat::Binary).unwrap_err();
    assert!(matches!(err, ProverError::Malformed { .. }));
}

#[test]
fn failed_companion_write_leaves_no_proof_bytes() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = ArtifactDir::new(tmp.path());
    write_prover_outputs(&dir, json!({ "proof": snarkjs_proof() }), json!(["1", "2", "0"]));
    // Occupy the staging path of public.hex.json so its write fails
    fs::create_dir_all(tmp.path().join("public.hex.json.tmp")).unwrap();

    let err = dir.encode_proof_artifacts(ProofBytesFormat::Binary).unwrap_err();
    assert!(matches!(err, ProverError::Io { .. }));
    assert!(!dir.proof_bytes_path().exists());
    assert!(!tmp.path().join("proof.bytes.tmp").exists());
    assert!(!dir.public_hex_path().exists());
}
