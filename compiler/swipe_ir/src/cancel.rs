//! Cooperative cancellation shared between the loader and the orchestrator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheap, clonable cancellation flag.
///
/// Stages poll [`is_cancelled`](Self::is_cancelled) between units of work
/// (packages, generators) and return a cancellation diagnostic when set.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
