//! Wallet lifecycle - blocking facade over the callback bridge.
//!
//! Each call submits through [`ops`], suspends on the pending reply until the
//! engine's callback (or a short-circuit failure) resolves it, and unwraps
//! the single result. Async callers can use [`ops`] directly and
//! `.recv().await` the reply instead.
//!
//! | Call | Returns |
//! |------|---------|
//! | `create_wallet(config, credential)` | `()` |
//! | `open_wallet(config, credential)` | `WalletHandle` |
//! | `close_wallet(handle)` | `()` |
//! | `delete_wallet(config, credential)` | `()` |
//! | `export_wallet(handle, export_config)` | `()` |
//! | `import_wallet(config, credential, import_config)` | `()` |
//!
//! Operations on different command handles are unordered, even against the
//! same wallet; callers sequence dependent calls themselves.

mod config;
pub mod ops;

pub use config::{
    default_export_path, default_home, default_wallet_dir, ExportConfig, ImportConfig,
    StorageConfig, WalletConfig, WalletCredential, DEFAULT_STORAGE_TYPE,
};

use crate::error::{WalletError, WalletResult};
use crate::ffi::WalletHandle;

/// Create a new wallet under the given identity.
pub fn create_wallet(config: &WalletConfig, credential: &WalletCredential) -> WalletResult<()> {
    ops::create_wallet(config, credential).wait().map(|_| ())
}

/// Open a previously created wallet and return its session handle.
///
/// Passing `rekey` in the credential re-encrypts the wallet under the new
/// key; subsequent opens must use it as `key`.
pub fn open_wallet(config: &WalletConfig, credential: &WalletCredential) -> WalletResult<WalletHandle> {
    ops::open_wallet(config, credential)
        .wait()?
        .ok_or(WalletError::MissingPayload)
}

/// Close an open wallet session.
pub fn close_wallet(wallet_handle: WalletHandle) -> WalletResult<()> {
    ops::close_wallet(wallet_handle).wait().map(|_| ())
}

/// Delete a closed wallet and its storage.
pub fn delete_wallet(config: &WalletConfig, credential: &WalletCredential) -> WalletResult<()> {
    ops::delete_wallet(config, credential).wait().map(|_| ())
}

/// Export an open wallet to an artifact at `export_config.path`.
pub fn export_wallet(wallet_handle: WalletHandle, export_config: &ExportConfig) -> WalletResult<()> {
    ops::export_wallet(wallet_handle, export_config).wait().map(|_| ())
}

/// Create a new wallet and populate it from a previously exported artifact.
pub fn import_wallet(
    config: &WalletConfig,
    credential: &WalletCredential,
    import_config: &ImportConfig,
) -> WalletResult<()> {
    ops::import_wallet(config, credential, import_config).wait().map(|_| ())
}
