//! Error taxonomy - engine status codes mapped to caller-facing errors.
//!
//! Every failure, whether it happened before submission (marshaling), at
//! submission (synchronous engine rejection) or after (callback with a
//! nonzero code), converges on [`WalletError`] so callers unwrap one shape.

use crate::ffi::code;
use std::fmt;

/// Classified engine failure. Unknown codes degrade to [`ErrorKind::Unknown`]
/// instead of failing the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParam,
    InvalidState,
    InvalidStructure,
    Io,
    InvalidWalletHandle,
    WalletAlreadyExists,
    WalletNotFound,
    WalletAlreadyOpened,
    AccessDenied,
    DecodingError,
    StorageError,
    ExportPathExists,
    ImportPathNotFound,
    Unknown,
}

impl ErrorKind {
    pub fn from_code(code: i32) -> Self {
        match code {
            code::INVALID_PARAM => ErrorKind::InvalidParam,
            code::INVALID_STATE => ErrorKind::InvalidState,
            code::INVALID_STRUCTURE => ErrorKind::InvalidStructure,
            code::IO_ERROR => ErrorKind::Io,
            code::INVALID_WALLET_HANDLE => ErrorKind::InvalidWalletHandle,
            code::WALLET_ALREADY_EXISTS => ErrorKind::WalletAlreadyExists,
            code::WALLET_NOT_FOUND => ErrorKind::WalletNotFound,
            code::WALLET_ALREADY_OPENED => ErrorKind::WalletAlreadyOpened,
            code::WALLET_ACCESS_DENIED => ErrorKind::AccessDenied,
            code::WALLET_DECODING_ERROR => ErrorKind::DecodingError,
            code::WALLET_STORAGE_ERROR => ErrorKind::StorageError,
            code::EXPORT_PATH_EXISTS => ErrorKind::ExportPathExists,
            code::IMPORT_PATH_NOT_FOUND => ErrorKind::ImportPathNotFound,
            _ => ErrorKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidParam => "invalid parameter",
            ErrorKind::InvalidState => "invalid engine state",
            ErrorKind::InvalidStructure => "invalid configuration structure",
            ErrorKind::Io => "i/o error",
            ErrorKind::InvalidWalletHandle => "invalid wallet handle",
            ErrorKind::WalletAlreadyExists => "wallet already exists",
            ErrorKind::WalletNotFound => "wallet not found",
            ErrorKind::WalletAlreadyOpened => "wallet already opened",
            ErrorKind::AccessDenied => "wallet access denied",
            ErrorKind::DecodingError => "wallet decoding failed",
            ErrorKind::StorageError => "wallet storage failed",
            ErrorKind::ExportPathExists => "export path already exists",
            ErrorKind::ImportPathNotFound => "import path not found",
            ErrorKind::Unknown => "unrecognized engine error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by wallet operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WalletError {
    /// Configuration could not be marshaled; the engine was never called.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The engine reported a nonzero status code.
    #[error("{kind} (code {code})")]
    Engine { kind: ErrorKind, code: i32 },
    /// The engine resolved a value-returning operation without its payload.
    #[error("engine resolved without the expected payload")]
    MissingPayload,
    /// The reply channel closed before resolution. Signals a bridge bug.
    #[error("reply channel dropped before resolution")]
    BridgeGone,
}

impl WalletError {
    /// Taxonomy bucket of the failure regardless of origin stage.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::InvalidConfig(_) => ErrorKind::InvalidParam,
            WalletError::Engine { kind, .. } => *kind,
            WalletError::MissingPayload | WalletError::BridgeGone => ErrorKind::InvalidState,
        }
    }
}

pub type WalletResult<T> = Result<T, WalletError>;

/// Map a native status code onto the taxonomy.
pub fn translate(code: i32) -> WalletError {
    WalletError::Engine {
        kind: ErrorKind::from_code(code),
        code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_codes() {
        assert_eq!(translate(code::WALLET_NOT_FOUND).kind(), ErrorKind::WalletNotFound);
        assert_eq!(translate(code::WALLET_ALREADY_OPENED).kind(), ErrorKind::WalletAlreadyOpened);
        assert_eq!(translate(code::WALLET_ACCESS_DENIED).kind(), ErrorKind::AccessDenied);
        assert_eq!(translate(code::EXPORT_PATH_EXISTS).kind(), ErrorKind::ExportPathExists);
    }

    #[test]
    fn test_translate_unknown_code_degrades() {
        let err = translate(9999);
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.to_string(), "unrecognized engine error (code 9999)");
    }

    #[test]
    fn test_marshal_errors_classify_as_invalid_param() {
        let err = WalletError::InvalidConfig("interior NUL".into());
        assert_eq!(err.kind(), ErrorKind::InvalidParam);
    }
}
