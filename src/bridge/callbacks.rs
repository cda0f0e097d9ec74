//! Callback adapter - the completion sinks handed to the engine.
//!
//! These run on threads the engine owns: no blocking, no I/O beyond handing
//! the decoded result to the registry.

use super::resolve;
use crate::error::translate;
use crate::ffi::{code, CommandHandle, WalletHandle};

pub(crate) extern "C" fn on_empty(command_handle: CommandHandle, err: i32) {
    let result = if err == code::SUCCESS {
        Ok(None)
    } else {
        Err(translate(err))
    };
    resolve(command_handle, result);
}

pub(crate) extern "C" fn on_wallet_handle(
    command_handle: CommandHandle,
    err: i32,
    wallet_handle: WalletHandle,
) {
    let result = if err == code::SUCCESS {
        Ok(Some(wallet_handle))
    } else {
        Err(translate(err))
    };
    resolve(command_handle, result);
}
