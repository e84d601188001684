use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, SqlTaskError};

/// Cooperative cancellation handle for a running invocation.
///
/// The caller keeps a clone and calls [`cancel`](CancellationToken::cancel)
/// from any thread; the executors check the token before every network-bound
/// step (open, execute, commit, rollback, close) and abort with
/// [`SqlTaskError::Cancelled`] instead of a database error.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from any thread, idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails with [`SqlTaskError::Cancelled`] once cancellation was requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(SqlTaskError::Cancelled)
        } else {
            Ok(())
        }
    }
}
