//! Configuration records - plain values serialized as the engine's wire JSON.
//!
//! No behavior beyond defaulting: storage type falls back to `"default"`,
//! storage/export/import paths fall back to fixed subdirectories of the data
//! root (`$BEEVAULT_HOME`, else `~/.beevault`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_STORAGE_TYPE: &str = "default";

/// Identity and storage backend of a wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_config: Option<StorageConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl WalletConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    pub fn with_storage_type(mut self, storage_type: impl Into<String>) -> Self {
        self.storage_type = Some(storage_type.into());
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_config = Some(StorageConfig { path: Some(path.into()) });
        self
    }

    /// Fill the fields the caller left unset. Applied before serialization so
    /// the engine always receives a complete record.
    pub(crate) fn defaulted(mut self) -> Self {
        self.storage_type.get_or_insert_with(|| DEFAULT_STORAGE_TYPE.into());
        let storage = self.storage_config.get_or_insert_with(StorageConfig::default);
        storage.path.get_or_insert_with(default_wallet_dir);
        self
    }
}

/// Cryptographic unlocking material. Keys pass through to the engine; this
/// crate never inspects or stores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletCredential {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rekey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_credentials: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_derivation_method: Option<String>,
}

impl WalletCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), ..Default::default() }
    }

    pub fn with_rekey(mut self, rekey: impl Into<String>) -> Self {
        self.rekey = Some(rekey.into());
        self
    }

    pub fn with_key_derivation_method(mut self, method: impl Into<String>) -> Self {
        self.key_derivation_method = Some(method.into());
        self
    }
}

/// Destination and passphrase for an export artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_derivation_method: Option<String>,
}

impl ExportConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), ..Default::default() }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub(crate) fn defaulted(mut self) -> Self {
        self.path.get_or_insert_with(default_export_path);
        self
    }
}

/// Source and passphrase of a previously exported artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_derivation_method: Option<String>,
}

impl ImportConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), ..Default::default() }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub(crate) fn defaulted(mut self) -> Self {
        self.path.get_or_insert_with(default_export_path);
        self
    }
}

/// Data root: `$BEEVAULT_HOME`, else `~/.beevault`.
pub fn default_home() -> PathBuf {
    std::env::var("BEEVAULT_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".beevault")
        })
}

/// Default wallet storage directory: `<root>/wallet`.
pub fn default_wallet_dir() -> PathBuf {
    default_home().join("wallet")
}

/// Default export/import artifact path: `<root>/export`.
pub fn default_export_path() -> PathBuf {
    default_home().join("export")
}
