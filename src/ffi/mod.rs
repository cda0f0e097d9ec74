//! Fixed call contract with the native vault engine.
//!
//! The engine performs all work on threads it owns. Every entry point takes
//! a caller-chosen command handle and a callback reference, and returns an
//! immediate status code: [`code::SUCCESS`] means the call was accepted and
//! the callback will fire exactly once with that command handle; any other
//! value means the call failed synchronously and no callback will follow.
//!
//! String arguments are NUL-terminated JSON, valid only for the duration of
//! the call. An engine must copy them before returning.

use once_cell::sync::OnceCell;
use std::os::raw::c_char;

/// Correlates one submitted operation with its completion callback.
pub type CommandHandle = i32;

/// Engine-owned identifier of an open wallet session. Opaque to this crate.
pub type WalletHandle = i32;

/// Completion callback for operations without a payload.
pub type ResponseEmptyCb = extern "C" fn(command_handle: CommandHandle, err: i32);

/// Completion callback for operations that yield a wallet handle.
pub type ResponseHandleCb =
    extern "C" fn(command_handle: CommandHandle, err: i32, wallet_handle: WalletHandle);

/// Status codes the engine reports, synchronously or through a callback.
///
/// The set is closed on the engine side; codes outside it are surfaced as a
/// generic unrecognized error rather than rejected.
pub mod code {
    pub const SUCCESS: i32 = 0;

    pub const INVALID_PARAM: i32 = 100;
    pub const INVALID_STATE: i32 = 101;
    pub const INVALID_STRUCTURE: i32 = 102;
    pub const IO_ERROR: i32 = 103;

    pub const INVALID_WALLET_HANDLE: i32 = 200;
    pub const WALLET_ALREADY_EXISTS: i32 = 201;
    pub const WALLET_NOT_FOUND: i32 = 202;
    pub const WALLET_ALREADY_OPENED: i32 = 203;
    pub const WALLET_ACCESS_DENIED: i32 = 204;
    pub const WALLET_DECODING_ERROR: i32 = 205;
    pub const WALLET_STORAGE_ERROR: i32 = 206;
    pub const EXPORT_PATH_EXISTS: i32 = 207;
    pub const IMPORT_PATH_NOT_FOUND: i32 = 208;
}

/// Entry points of the native engine, one per wallet-lifecycle operation.
#[derive(Clone, Copy)]
pub struct NativeApi {
    pub create_wallet: extern "C" fn(
        command_handle: CommandHandle,
        config: *const c_char,
        credentials: *const c_char,
        cb: ResponseEmptyCb,
    ) -> i32,
    pub open_wallet: extern "C" fn(
        command_handle: CommandHandle,
        config: *const c_char,
        credentials: *const c_char,
        cb: ResponseHandleCb,
    ) -> i32,
    pub close_wallet: extern "C" fn(
        command_handle: CommandHandle,
        wallet_handle: WalletHandle,
        cb: ResponseEmptyCb,
    ) -> i32,
    pub delete_wallet: extern "C" fn(
        command_handle: CommandHandle,
        config: *const c_char,
        credentials: *const c_char,
        cb: ResponseEmptyCb,
    ) -> i32,
    pub export_wallet: extern "C" fn(
        command_handle: CommandHandle,
        wallet_handle: WalletHandle,
        export_config: *const c_char,
        cb: ResponseEmptyCb,
    ) -> i32,
    pub import_wallet: extern "C" fn(
        command_handle: CommandHandle,
        config: *const c_char,
        credentials: *const c_char,
        import_config: *const c_char,
        cb: ResponseEmptyCb,
    ) -> i32,
}

static NATIVE_API: OnceCell<NativeApi> = OnceCell::new();

/// Install an alternative engine vtable.
///
/// Must run before the first wallet operation; once an operation has been
/// submitted the vtable is fixed for the life of the process. Returns the
/// rejected vtable if one was already installed.
pub fn set_native_api(api: NativeApi) -> Result<(), NativeApi> {
    NATIVE_API.set(api)
}

/// Active engine vtable, defaulting to the embedded engine.
pub(crate) fn api() -> &'static NativeApi {
    NATIVE_API.get_or_init(crate::engine::native_api)
}
