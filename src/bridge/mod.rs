//! Command-handle registry - correlates submitted calls with callbacks.
//!
//! The engine's completion callback carries only the integer command handle,
//! so this map is the one piece of intentional shared mutable state in the
//! crate: insert on allocate, remove on resolve, never exposed raw. Handles
//! come from a process-wide counter and are not reused while pending.
//!
//! Each entry owns the sender half of a single-shot channel. Sending never
//! blocks, so resolution is safe on the engine's callback thread, and a value
//! sent before the caller waits is buffered. The short-circuit paths in
//! `wallet::ops` rely on that: a synchronous failure is delivered through the
//! same channel the callback would have used.

mod callbacks;

pub(crate) use callbacks::{on_empty, on_wallet_handle};

use crate::error::WalletError;
use crate::ffi::{CommandHandle, WalletHandle};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Outcome of one submitted operation: an optional wallet handle, or the
/// translated failure from whichever stage produced it.
pub type OperationResult = Result<Option<WalletHandle>, WalletError>;

// Counter is never reclaimed; i32 wraparound is unguarded at wallet-lifecycle
// call volume.
static NEXT_HANDLE: AtomicI32 = AtomicI32::new(1);

static PENDING: Lazy<Mutex<HashMap<CommandHandle, oneshot::Sender<OperationResult>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Consumer side of one in-flight operation. Exactly one value is delivered.
pub struct PendingReply {
    rx: oneshot::Receiver<OperationResult>,
}

impl PendingReply {
    /// Block until the operation resolves.
    ///
    /// This is the single suspension point of a facade call. Must not run on
    /// an async executor thread; use [`PendingReply::recv`] there instead.
    pub fn wait(self) -> OperationResult {
        self.rx
            .blocking_recv()
            .unwrap_or_else(|_| Err(WalletError::BridgeGone))
    }

    /// Await resolution without blocking the executor.
    pub async fn recv(self) -> OperationResult {
        self.rx.await.unwrap_or_else(|_| Err(WalletError::BridgeGone))
    }
}

/// Register a fresh command handle and hand back its reply channel.
pub(crate) fn allocate() -> (CommandHandle, PendingReply) {
    let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
    let (tx, rx) = oneshot::channel();
    let mut pending = PENDING.lock().unwrap_or_else(|p| p.into_inner());
    let prev = pending.insert(handle, tx);
    debug_assert!(prev.is_none(), "command handle {handle} reused while pending");
    (handle, PendingReply { rx })
}

/// Deliver the result for a handle and drop the registration.
///
/// The engine reports each handle exactly once; a resolution for a handle
/// that is not registered is a contract violation and is logged and dropped.
pub(crate) fn resolve(handle: CommandHandle, result: OperationResult) {
    let tx = {
        let mut pending = PENDING.lock().unwrap_or_else(|p| p.into_inner());
        pending.remove(&handle)
    };
    match tx {
        // A dropped receiver is fine: the caller abandoned the reply and the
        // entry is consumed here either way.
        Some(tx) => {
            let _ = tx.send(result);
        }
        None => tracing::warn!(handle, "resolution for unregistered command handle dropped"),
    }
}
