//! Cooperative cancellation for background save, load, and export

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ChiselError, ChiselResult};

/// Shared flag checked between row chunks of long grid operations.
///
/// Clones share the same flag, so the host keeps one and hands another to
/// the worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`ChiselError::Cancelled`] once cancellation was requested
    pub fn check(&self) -> ChiselResult<()> {
        if self.is_cancelled() {
            return Err(ChiselError::Cancelled);
        }
        Ok(())
    }
}

/// Check an optional token
#[inline]
pub(crate) fn checkpoint(token: Option<&CancelToken>) -> ChiselResult<()> {
    token.map_or(Ok(()), CancelToken::check)
}
