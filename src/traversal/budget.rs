//! Shared, atomically decremented traversal budget.

use std::sync::atomic::{AtomicI64, Ordering};

/// A bounded counter of remaining node visits.
///
/// The decrement is a single atomic operation, so one `Budget` may be
/// shared by reference across multiple concurrent traversals to enforce a
/// global node-visit cap. Construct it explicitly and pass it in — there
/// is no global budget.
#[derive(Debug)]
pub struct Budget {
    remaining: AtomicI64,
}

impl Budget {
    pub fn new(node_visits: i64) -> Self {
        Self { remaining: AtomicI64::new(node_visits) }
    }

    /// Charge one node visit. Returns `false` when the budget was already
    /// exhausted; the counter may go negative under contention, which only
    /// ever makes later calls fail as well.
    pub fn consume(&self) -> bool {
        self.remaining.fetch_sub(1, Ordering::SeqCst) > 0
    }

    pub fn remaining(&self) -> i64 {
        self.remaining.load(Ordering::SeqCst)
    }
}
