//! Embedded reference engine implementing the native call contract.
//!
//! Stands in for a dynamically linked engine so the contract is exercisable
//! without external binaries; `ffi::set_native_api` swaps in a real one.
//! Each entry point copies its C-string arguments, returns immediately, and
//! completes on a worker thread it owns, reporting through the supplied
//! callback with the caller's command handle. File-backed storage, no real
//! encryption: unlocking is verified against salted check values only.

mod store;

use crate::ffi::{code, CommandHandle, NativeApi, ResponseEmptyCb, ResponseHandleCb, WalletHandle};
use crate::wallet::{
    default_export_path, default_wallet_dir, ExportConfig, ImportConfig, WalletConfig,
    WalletCredential, DEFAULT_STORAGE_TYPE,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ffi::CStr;
use std::fs;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};
use std::thread;

const DEFAULT_KDF: &str = "argon2i";

pub(crate) fn native_api() -> NativeApi {
    NativeApi {
        create_wallet,
        open_wallet,
        close_wallet,
        delete_wallet,
        export_wallet,
        import_wallet,
    }
}

struct OpenWallet {
    dir: PathBuf,
}

struct EngineState {
    open: HashMap<WalletHandle, OpenWallet>,
    next_handle: WalletHandle,
}

static STATE: Lazy<std::sync::Mutex<EngineState>> = Lazy::new(|| {
    std::sync::Mutex::new(EngineState {
        open: HashMap::new(),
        next_handle: 1,
    })
});

fn lock_state() -> std::sync::MutexGuard<'static, EngineState> {
    STATE.lock().unwrap_or_else(|p| p.into_inner())
}

/// Copy a NUL-terminated UTF-8 argument before the pointer goes stale.
fn read_c_str(ptr: *const c_char) -> Result<String, i32> {
    if ptr.is_null() {
        return Err(code::INVALID_PARAM);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(str::to_owned)
        .map_err(|_| code::INVALID_PARAM)
}

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, i32> {
    serde_json::from_str(json).map_err(|_| code::INVALID_STRUCTURE)
}

fn wallet_dir(config: &WalletConfig) -> PathBuf {
    config
        .storage_config
        .as_ref()
        .and_then(|s| s.path.clone())
        .unwrap_or_else(default_wallet_dir)
        .join(&config.id)
}

/// Create a wallet directory and write its metadata. A failed write removes
/// the directory again; a leftover empty directory would make a retried
/// create report already-exists while open reports not-found.
fn materialize_wallet(dir: &Path, meta: &store::WalletMetadata) -> Result<(), i32> {
    fs::create_dir_all(dir).map_err(|_| code::IO_ERROR)?;
    if let Err(status) = store::save_metadata(dir, meta) {
        let _ = fs::remove_dir_all(dir);
        return Err(status);
    }
    Ok(())
}

// --- entry points -----------------------------------------------------------

extern "C" fn create_wallet(
    command_handle: CommandHandle,
    config: *const c_char,
    credentials: *const c_char,
    cb: ResponseEmptyCb,
) -> i32 {
    let (config, credentials) = match (read_c_str(config), read_c_str(credentials)) {
        (Ok(c), Ok(k)) => (c, k),
        _ => return code::INVALID_PARAM,
    };
    thread::spawn(move || {
        let status = do_create(&config, &credentials).err().unwrap_or(code::SUCCESS);
        cb(command_handle, status);
    });
    code::SUCCESS
}

extern "C" fn open_wallet(
    command_handle: CommandHandle,
    config: *const c_char,
    credentials: *const c_char,
    cb: ResponseHandleCb,
) -> i32 {
    let (config, credentials) = match (read_c_str(config), read_c_str(credentials)) {
        (Ok(c), Ok(k)) => (c, k),
        _ => return code::INVALID_PARAM,
    };
    thread::spawn(move || match do_open(&config, &credentials) {
        Ok(handle) => cb(command_handle, code::SUCCESS, handle),
        Err(status) => cb(command_handle, status, 0),
    });
    code::SUCCESS
}

extern "C" fn close_wallet(
    command_handle: CommandHandle,
    wallet_handle: WalletHandle,
    cb: ResponseEmptyCb,
) -> i32 {
    thread::spawn(move || {
        let status = do_close(wallet_handle).err().unwrap_or(code::SUCCESS);
        cb(command_handle, status);
    });
    code::SUCCESS
}

extern "C" fn delete_wallet(
    command_handle: CommandHandle,
    config: *const c_char,
    credentials: *const c_char,
    cb: ResponseEmptyCb,
) -> i32 {
    let (config, credentials) = match (read_c_str(config), read_c_str(credentials)) {
        (Ok(c), Ok(k)) => (c, k),
        _ => return code::INVALID_PARAM,
    };
    thread::spawn(move || {
        let status = do_delete(&config, &credentials).err().unwrap_or(code::SUCCESS);
        cb(command_handle, status);
    });
    code::SUCCESS
}

extern "C" fn export_wallet(
    command_handle: CommandHandle,
    wallet_handle: WalletHandle,
    export_config: *const c_char,
    cb: ResponseEmptyCb,
) -> i32 {
    let export_config = match read_c_str(export_config) {
        Ok(e) => e,
        Err(status) => return status,
    };
    thread::spawn(move || {
        let status = do_export(wallet_handle, &export_config).err().unwrap_or(code::SUCCESS);
        cb(command_handle, status);
    });
    code::SUCCESS
}

extern "C" fn import_wallet(
    command_handle: CommandHandle,
    config: *const c_char,
    credentials: *const c_char,
    import_config: *const c_char,
    cb: ResponseEmptyCb,
) -> i32 {
    let args = match (read_c_str(config), read_c_str(credentials), read_c_str(import_config)) {
        (Ok(c), Ok(k), Ok(i)) => (c, k, i),
        _ => return code::INVALID_PARAM,
    };
    thread::spawn(move || {
        let (config, credentials, import_config) = args;
        let status = do_import(&config, &credentials, &import_config)
            .err()
            .unwrap_or(code::SUCCESS);
        cb(command_handle, status);
    });
    code::SUCCESS
}

// --- operation bodies -------------------------------------------------------

fn do_create(config_json: &str, credentials_json: &str) -> Result<(), i32> {
    let config: WalletConfig = parse(config_json)?;
    let credentials: WalletCredential = parse(credentials_json)?;
    if config.id.trim().is_empty() {
        return Err(code::INVALID_PARAM);
    }
    let dir = wallet_dir(&config);
    if dir.exists() {
        return Err(code::WALLET_ALREADY_EXISTS);
    }
    let storage_type = config.storage_type.as_deref().unwrap_or(DEFAULT_STORAGE_TYPE);
    let kdf = credentials.key_derivation_method.as_deref().unwrap_or(DEFAULT_KDF);
    let meta = store::WalletMetadata::new(&config.id, storage_type, kdf, &credentials.key);
    materialize_wallet(&dir, &meta)
}

fn do_open(config_json: &str, credentials_json: &str) -> Result<WalletHandle, i32> {
    let config: WalletConfig = parse(config_json)?;
    let credentials: WalletCredential = parse(credentials_json)?;
    let dir = wallet_dir(&config);
    if !dir.join(store::METADATA_FILE).exists() {
        return Err(code::WALLET_NOT_FOUND);
    }

    // Open table is checked and updated under one lock so two racing opens
    // of the same wallet cannot both succeed.
    let mut state = lock_state();
    if state.open.values().any(|w| w.dir == dir) {
        return Err(code::WALLET_ALREADY_OPENED);
    }

    let mut meta = store::load_metadata(&dir)?;
    if !meta.verify_key(&credentials.key) {
        return Err(code::WALLET_ACCESS_DENIED);
    }
    if let Some(rekey) = credentials.rekey.as_deref().filter(|r| !r.is_empty()) {
        meta.set_key(rekey);
        store::save_metadata(&dir, &meta)?;
    }

    let handle = state.next_handle;
    state.next_handle += 1;
    state.open.insert(handle, OpenWallet { dir });
    Ok(handle)
}

fn do_close(wallet_handle: WalletHandle) -> Result<(), i32> {
    let mut state = lock_state();
    state
        .open
        .remove(&wallet_handle)
        .map(|_| ())
        .ok_or(code::INVALID_WALLET_HANDLE)
}

fn do_delete(config_json: &str, credentials_json: &str) -> Result<(), i32> {
    let config: WalletConfig = parse(config_json)?;
    let credentials: WalletCredential = parse(credentials_json)?;
    let dir = wallet_dir(&config);
    if !dir.join(store::METADATA_FILE).exists() {
        return Err(code::WALLET_NOT_FOUND);
    }
    {
        let state = lock_state();
        if state.open.values().any(|w| w.dir == dir) {
            return Err(code::INVALID_STATE);
        }
    }
    let meta = store::load_metadata(&dir)?;
    if !meta.verify_key(&credentials.key) {
        return Err(code::WALLET_ACCESS_DENIED);
    }
    fs::remove_dir_all(&dir).map_err(|_| code::IO_ERROR)
}

fn do_export(wallet_handle: WalletHandle, export_json: &str) -> Result<(), i32> {
    let export_config: ExportConfig = parse(export_json)?;
    let dir = {
        let state = lock_state();
        state
            .open
            .get(&wallet_handle)
            .map(|w| w.dir.clone())
            .ok_or(code::INVALID_WALLET_HANDLE)?
    };
    let path = export_config.path.unwrap_or_else(default_export_path);
    let meta = store::load_metadata(&dir)?;
    let artifact = store::ExportArtifact::new(&meta, &export_config.key);
    // save_artifact refuses an existing path atomically.
    store::save_artifact(&path, &artifact)
}

fn do_import(config_json: &str, credentials_json: &str, import_json: &str) -> Result<(), i32> {
    let config: WalletConfig = parse(config_json)?;
    let credentials: WalletCredential = parse(credentials_json)?;
    let import_config: ImportConfig = parse(import_json)?;
    if config.id.trim().is_empty() {
        return Err(code::INVALID_PARAM);
    }
    let path = import_config.path.unwrap_or_else(default_export_path);
    if !path.exists() {
        return Err(code::IMPORT_PATH_NOT_FOUND);
    }
    let artifact = store::load_artifact(&path)?;
    if !artifact.verify_key(&import_config.key) {
        return Err(code::WALLET_ACCESS_DENIED);
    }
    let dir = wallet_dir(&config);
    if dir.exists() {
        return Err(code::WALLET_ALREADY_EXISTS);
    }
    let storage_type = config.storage_type.as_deref().unwrap_or(DEFAULT_STORAGE_TYPE);
    let kdf = credentials.key_derivation_method.as_deref().unwrap_or(DEFAULT_KDF);
    let mut meta = store::WalletMetadata::new(&config.id, storage_type, kdf, &credentials.key);
    meta.records = artifact.records;
    materialize_wallet(&dir, &meta)
}
