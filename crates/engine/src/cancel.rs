//! External cancellation signal for a running workflow.
//!
//! Observed only between actions, never mid-tool-call. A
//! plain `Arc<AtomicBool>` is enough: there is exactly one writer (the
//! caller asking for cancellation) and exactly one reader (the engine's
//! own execution loop).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cheap, cloneable cancellation flag shared between a run's caller and
/// the engine executing it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
