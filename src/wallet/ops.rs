//! Operation marshalers - non-blocking submission, one routine per operation.
//!
//! Common shape: default the config, serialize it, allocate a command handle,
//! submit to the engine, hand the reply back without waiting. A marshaling
//! failure or a nonzero synchronous status resolves the already-allocated
//! handle through the same reply channel a callback would use, so the
//! consuming side never distinguishes where the failure happened.

use super::config::{ExportConfig, ImportConfig, WalletConfig, WalletCredential};
use crate::bridge::{self, PendingReply};
use crate::error::{translate, WalletError};
use crate::ffi::{self, code, CommandHandle, WalletHandle};
use serde::Serialize;
use std::ffi::CString;

fn marshal<T: Serialize>(value: &T) -> Result<CString, WalletError> {
    let json = serde_json::to_string(value).map_err(|e| WalletError::InvalidConfig(e.to_string()))?;
    CString::new(json).map_err(|e| WalletError::InvalidConfig(e.to_string()))
}

fn short_circuit(handle: CommandHandle, err: WalletError, reply: PendingReply) -> PendingReply {
    bridge::resolve(handle, Err(err));
    reply
}

fn check_submit(handle: CommandHandle, rc: i32) {
    if rc != code::SUCCESS {
        // No callback will follow; terminate the caller's wait here.
        bridge::resolve(handle, Err(translate(rc)));
    }
}

/// Submit a create-wallet call.
pub fn create_wallet(config: &WalletConfig, credential: &WalletCredential) -> PendingReply {
    let (handle, reply) = bridge::allocate();
    let args = marshal(&config.clone().defaulted()).and_then(|c| Ok((c, marshal(credential)?)));
    let (config_json, credential_json) = match args {
        Ok(args) => args,
        Err(err) => return short_circuit(handle, err, reply),
    };
    tracing::debug!(id = %config.id, handle, "create_wallet submitted");
    let rc = (ffi::api().create_wallet)(
        handle,
        config_json.as_ptr(),
        credential_json.as_ptr(),
        bridge::on_empty,
    );
    check_submit(handle, rc);
    reply
}

/// Submit an open-wallet call; resolves with the wallet handle.
pub fn open_wallet(config: &WalletConfig, credential: &WalletCredential) -> PendingReply {
    let (handle, reply) = bridge::allocate();
    let args = marshal(&config.clone().defaulted()).and_then(|c| Ok((c, marshal(credential)?)));
    let (config_json, credential_json) = match args {
        Ok(args) => args,
        Err(err) => return short_circuit(handle, err, reply),
    };
    tracing::debug!(id = %config.id, handle, "open_wallet submitted");
    let rc = (ffi::api().open_wallet)(
        handle,
        config_json.as_ptr(),
        credential_json.as_ptr(),
        bridge::on_wallet_handle,
    );
    check_submit(handle, rc);
    reply
}

/// Submit a close-wallet call. No configuration to marshal.
pub fn close_wallet(wallet_handle: WalletHandle) -> PendingReply {
    let (handle, reply) = bridge::allocate();
    tracing::debug!(wallet_handle, handle, "close_wallet submitted");
    let rc = (ffi::api().close_wallet)(handle, wallet_handle, bridge::on_empty);
    check_submit(handle, rc);
    reply
}

/// Submit a delete-wallet call.
pub fn delete_wallet(config: &WalletConfig, credential: &WalletCredential) -> PendingReply {
    let (handle, reply) = bridge::allocate();
    let args = marshal(&config.clone().defaulted()).and_then(|c| Ok((c, marshal(credential)?)));
    let (config_json, credential_json) = match args {
        Ok(args) => args,
        Err(err) => return short_circuit(handle, err, reply),
    };
    tracing::debug!(id = %config.id, handle, "delete_wallet submitted");
    let rc = (ffi::api().delete_wallet)(
        handle,
        config_json.as_ptr(),
        credential_json.as_ptr(),
        bridge::on_empty,
    );
    check_submit(handle, rc);
    reply
}

/// Submit an export-wallet call for an open wallet session.
pub fn export_wallet(wallet_handle: WalletHandle, export_config: &ExportConfig) -> PendingReply {
    let (handle, reply) = bridge::allocate();
    let export_json = match marshal(&export_config.clone().defaulted()) {
        Ok(json) => json,
        Err(err) => return short_circuit(handle, err, reply),
    };
    tracing::debug!(wallet_handle, handle, "export_wallet submitted");
    let rc = (ffi::api().export_wallet)(handle, wallet_handle, export_json.as_ptr(), bridge::on_empty);
    check_submit(handle, rc);
    reply
}

/// Submit an import-wallet call: creates the wallet described by `config` and
/// populates it from the artifact named by `import_config`.
pub fn import_wallet(
    config: &WalletConfig,
    credential: &WalletCredential,
    import_config: &ImportConfig,
) -> PendingReply {
    let (handle, reply) = bridge::allocate();
    let args = marshal(&config.clone().defaulted()).and_then(|c| {
        Ok((c, marshal(credential)?, marshal(&import_config.clone().defaulted())?))
    });
    let (config_json, credential_json, import_json) = match args {
        Ok(args) => args,
        Err(err) => return short_circuit(handle, err, reply),
    };
    tracing::debug!(id = %config.id, handle, "import_wallet submitted");
    let rc = (ffi::api().import_wallet)(
        handle,
        config_json.as_ptr(),
        credential_json.as_ptr(),
        import_json.as_ptr(),
        bridge::on_empty,
    );
    check_submit(handle, rc);
    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_nul_short_circuits_through_reply() {
        // CString rejects interior NUL; the engine is never reached and the
        // error still arrives through the reply channel.
        let config = WalletConfig::new("bad\0id").with_storage_path("/tmp/unused");
        let reply = create_wallet(&config, &WalletCredential::new("k"));
        let err = reply.wait().unwrap_err();
        assert!(matches!(err, WalletError::InvalidConfig(_)));
    }
}
