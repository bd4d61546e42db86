//! Build directory layout and artifact I/O
//!
//! Outputs that belong together are staged as sibling temp files and only
//! renamed into place once every one of them has been written, so a reader
//! never observes a half-written artifact or one without its companion.

use std::fs;
use std::path::{Path, PathBuf};

use pool_config::ProofBytesFormat;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::circuit_input::AssembledInput;
use crate::encoding::{EncodedOutputs, ProofFile, encode_outputs};
use crate::error::{ProverError, Result};

pub const INPUT_FILE: &str = "input.json";
pub const INPUT_META_FILE: &str = "input.meta.json";
pub const PROOF_FILE: &str = "proof.json";
pub const PUBLIC_FILE: &str = "public.json";
pub const PROOF_BYTES_FILE: &str = "proof.bytes";
pub const PUBLIC_HEX_FILE: &str = "public.hex.json";

/// The build directory shared with the external prover
#[derive(Clone, Debug)]
pub struct ArtifactDir {
    root: PathBuf,
}

impl ArtifactDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn input_path(&self) -> PathBuf {
        self.root.join(INPUT_FILE)
    }

    pub fn input_meta_path(&self) -> PathBuf {
        self.root.join(INPUT_META_FILE)
    }

    pub fn proof_path(&self) -> PathBuf {
        self.root.join(PROOF_FILE)
    }

    pub fn public_path(&self) -> PathBuf {
        self.root.join(PUBLIC_FILE)
    }

    pub fn proof_bytes_path(&self) -> PathBuf {
        self.root.join(PROOF_BYTES_FILE)
    }

    pub fn public_hex_path(&self) -> PathBuf {
        self.root.join(PUBLIC_HEX_FILE)
    }

    /// Write `input.json` and `input.meta.json`
    pub fn write_circuit_input(&self, assembled: &AssembledInput) -> Result<()> {
        self.ensure_root()?;
        commit_all(vec![
            (self.input_path(), json_bytes(&self.input_path(), &assembled.input)?),
            (self.input_meta_path(), json_bytes(&self.input_meta_path(), &assembled.meta)?),
        ])?;
        log::info!("Wrote {} and {}", INPUT_FILE, INPUT_META_FILE);
        Ok(())
    }

    /// Read `proof.json` + `public.json`, encode, then write `proof.bytes`
    /// and `public.hex.json`.
    ///
    /// Nothing is written unless both inputs validate.
    pub fn encode_proof_artifacts(&self, format: ProofBytesFormat) -> Result<EncodedOutputs> {
        let proof: ProofFile = read_json(&self.proof_path())?;
        let public: serde_json::Value = read_json(&self.public_path())?;

        let outputs = encode_outputs(&proof.0, &public)?;

        let bytes = match format {
            ProofBytesFormat::Binary => outputs.proof_bytes.as_bytes().to_vec(),
            ProofBytesFormat::Hex => outputs.proof_bytes.to_hex().into_bytes(),
        };
        let len = bytes.len();
        let public_hex = json_bytes(&self.public_hex_path(), &outputs.public)?;
        commit_all(vec![
            (self.proof_bytes_path(), bytes),
            (self.public_hex_path(), public_hex),
        ])?;

        log::info!(
            "Wrote {} ({:?}, {} bytes) and {}",
            PROOF_BYTES_FILE,
            format,
            len,
            PUBLIC_HEX_FILE
        );
        Ok(outputs)
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| ProverError::Io {
            path: self.root.clone(),
            source,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read(path).map_err(|source| ProverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| ProverError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn json_bytes<T: Serialize>(path: &Path, value: &T) -> Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(value).map_err(|source| ProverError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    data.push(b'\n');
    Ok(data)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Write every file to its temp path, then rename them all into place.
///
/// If any temp write fails, the temps already written are removed and no
/// target is touched.
fn commit_all(files: Vec<(PathBuf, Vec<u8>)>) -> Result<()> {
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());

    for (path, data) in files {
        let tmp = tmp_path(&path);
        let written = match path.parent() {
            Some(parent) => fs::create_dir_all(parent).and_then(|_| fs::write(&tmp, &data)),
            None => fs::write(&tmp, &data),
        };
        if let Err(source) = written {
            for (staged_tmp, _) in &staged {
                let _ = fs::remove_file(staged_tmp);
            }
            return Err(ProverError::Io { path, source });
        }
        staged.push((tmp, path));
    }

    for (tmp, path) in staged {
        fs::rename(&tmp, &path).map_err(|source| ProverError::Io { path, source })?;
    }
    Ok(())
}
