//! Beevault: synchronous binding to the native vault engine's wallet API.
//!
//! The engine runs every operation on threads it owns and reports completion
//! through a callback carrying an opaque integer command handle. This crate
//! turns that callback protocol into plain blocking calls.
//!
//! # Architecture
//!
//! ```text
//! wallet (facade, blocks)
//!     │
//!     ├── wallet::ops (default config → serialize → allocate → submit)
//!     │        │
//!     │        ▼
//!     │   bridge (command handle ↔ single-shot reply registry)
//!     │        │                              ▲
//!     │        ▼                              │ resolve
//!     │   ffi::NativeApi ──► engine ──► bridge callbacks
//!     │   (fixed C contract)  (worker threads, file-backed)
//!     ▼
//! PendingReply::wait (the one suspension point per call)
//! ```
//!
//! Failures arrive through the same reply channel no matter which stage
//! produced them, from marshaling up to the completion callback, so a caller
//! always gets exactly one [`WalletError`] or one success payload.
//!
//! # Operations
//!
//! | Call | Returns |
//! |------|---------|
//! | [`wallet::create_wallet`] | `()` |
//! | [`wallet::open_wallet`] | [`WalletHandle`] |
//! | [`wallet::close_wallet`] | `()` |
//! | [`wallet::delete_wallet`] | `()` |
//! | [`wallet::export_wallet`] | `()` |
//! | [`wallet::import_wallet`] | `()` |
//!
//! # Usage
//!
//! ```ignore
//! use beevault::{wallet, WalletConfig, WalletCredential};
//!
//! let config = WalletConfig::new("alice");
//! let credential = WalletCredential::new("secret");
//!
//! wallet::create_wallet(&config, &credential)?;
//! let handle = wallet::open_wallet(&config, &credential)?;
//! // ...
//! wallet::close_wallet(handle)?;
//! ```

pub mod bridge;
pub mod error;
pub mod ffi;
pub mod logging;
pub mod wallet;

mod engine;

pub use bridge::{OperationResult, PendingReply};
pub use error::{translate, ErrorKind, WalletError, WalletResult};
pub use ffi::{set_native_api, CommandHandle, NativeApi, WalletHandle};
pub use logging::init_logging;
pub use wallet::{ExportConfig, ImportConfig, StorageConfig, WalletConfig, WalletCredential};
