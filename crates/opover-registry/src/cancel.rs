//! Host cancellation flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use opover_core::{Cancellable, Cancelled};

/// Shared flag a host raises to abort in-flight lookups.
///
/// Clones share the same flag. Once raised it stays raised; hosts start a
/// new pass with a fresh flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once the flag is raised.
    #[inline]
    pub fn check(&self) -> Cancellable<()> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
