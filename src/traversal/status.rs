//! Fetch-in-flight deduplication across concurrent workers.

use hashbrown::HashMap;
use parking_lot::Mutex;
use tokio::sync::watch;

/// Concurrent status map for per-node work deduplication.
///
/// The first caller to register a pending node gets ownership (`true`) and
/// must call [`complete`](Self::complete) when its work finishes or fails;
/// later callers for the same node get `false` and a receiver resolving on
/// that completion. Explicitly constructed and shared — no global map.
#[derive(Debug, Default)]
pub struct StatusMap {
    pending: Mutex<HashMap<String, PendingEntry>>,
}

#[derive(Debug)]
struct PendingEntry {
    done_tx: watch::Sender<bool>,
    done_rx: watch::Receiver<bool>,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register intent to work on `id`. `(true, rx)` means the caller owns
    /// the work; `(false, rx)` means someone else does and `rx` resolves to
    /// `true` when they finish.
    pub fn try_commit(&self, id: &str) -> (bool, watch::Receiver<bool>) {
        let mut pending = self.pending.lock();
        if let Some(entry) = pending.get(id) {
            return (false, entry.done_rx.clone());
        }
        let (done_tx, done_rx) = watch::channel(false);
        let receiver = done_rx.clone();
        pending.insert(id.to_owned(), PendingEntry { done_tx, done_rx });
        (true, receiver)
    }

    /// Mark `id` done and wake every waiter. A later `try_commit` for the
    /// same id starts fresh ownership.
    pub fn complete(&self, id: &str) {
        if let Some(entry) = self.pending.lock().remove(id) {
            // waiters hold cloned receivers, so the send cannot be missed
            let _ = entry.done_tx.send(true);
        }
    }
}
