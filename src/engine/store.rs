//! On-disk layout for the embedded engine.
//!
//! One directory per wallet under the storage path, holding a single
//! `wallet.json` metadata file. Keys are never written to disk; unlock
//! attempts are verified against a salted SHA-256 check value. Export
//! artifacts are standalone JSON files carrying the same check-value scheme
//! for the export key.

use crate::ffi::code;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub(crate) const METADATA_FILE: &str = "wallet.json";
pub(crate) const EXPORT_FORMAT: &str = "beevault-export@v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WalletMetadata {
    pub id: String,
    pub storage_type: String,
    pub key_derivation_method: String,
    pub salt: String,
    pub key_check: String,
    #[serde(default)]
    pub records: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ExportArtifact {
    pub format: String,
    pub id: String,
    pub storage_type: String,
    pub salt: String,
    pub key_check: String,
    #[serde(default)]
    pub records: BTreeMap<String, serde_json::Value>,
}

pub(crate) fn key_check(salt: &str, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

pub(crate) fn fresh_salt() -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    hex::encode(salt)
}

impl WalletMetadata {
    pub fn new(id: &str, storage_type: &str, key_derivation_method: &str, key: &str) -> Self {
        let salt = fresh_salt();
        let key_check = key_check(&salt, key);
        Self {
            id: id.to_string(),
            storage_type: storage_type.to_string(),
            key_derivation_method: key_derivation_method.to_string(),
            salt,
            key_check,
            records: BTreeMap::new(),
        }
    }

    pub fn verify_key(&self, key: &str) -> bool {
        key_check(&self.salt, key) == self.key_check
    }

    /// Re-encrypt under a new key: fresh salt, fresh check value.
    pub fn set_key(&mut self, key: &str) {
        self.salt = fresh_salt();
        self.key_check = key_check(&self.salt, key);
    }
}

impl ExportArtifact {
    pub fn new(meta: &WalletMetadata, export_key: &str) -> Self {
        let salt = fresh_salt();
        let key_check = key_check(&salt, export_key);
        Self {
            format: EXPORT_FORMAT.to_string(),
            id: meta.id.clone(),
            storage_type: meta.storage_type.clone(),
            salt,
            key_check,
            records: meta.records.clone(),
        }
    }

    pub fn verify_key(&self, key: &str) -> bool {
        key_check(&self.salt, key) == self.key_check
    }
}

pub(crate) fn load_metadata(dir: &Path) -> Result<WalletMetadata, i32> {
    let raw = fs::read_to_string(dir.join(METADATA_FILE))
        .map_err(|_| code::WALLET_STORAGE_ERROR)?;
    serde_json::from_str(&raw).map_err(|_| code::WALLET_DECODING_ERROR)
}

pub(crate) fn save_metadata(dir: &Path, meta: &WalletMetadata) -> Result<(), i32> {
    let raw = serde_json::to_string_pretty(meta).map_err(|_| code::WALLET_STORAGE_ERROR)?;
    fs::write(dir.join(METADATA_FILE), raw).map_err(|_| code::IO_ERROR)
}

pub(crate) fn load_artifact(path: &Path) -> Result<ExportArtifact, i32> {
    let raw = fs::read_to_string(path).map_err(|_| code::IO_ERROR)?;
    let artifact: ExportArtifact =
        serde_json::from_str(&raw).map_err(|_| code::WALLET_DECODING_ERROR)?;
    if artifact.format != EXPORT_FORMAT {
        return Err(code::WALLET_DECODING_ERROR);
    }
    Ok(artifact)
}

/// Write an export artifact to a path that must not exist yet.
///
/// `create_new` makes the existence check part of the write, so two racing
/// exports to one path cannot both succeed.
pub(crate) fn save_artifact(path: &Path, artifact: &ExportArtifact) -> Result<(), i32> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|_| code::IO_ERROR)?;
    }
    let raw = serde_json::to_string_pretty(artifact).map_err(|_| code::WALLET_STORAGE_ERROR)?;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => code::EXPORT_PATH_EXISTS,
            _ => code::IO_ERROR,
        })?;
    file.write_all(raw.as_bytes()).map_err(|_| code::IO_ERROR)
}
