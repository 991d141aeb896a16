//! Cooperative cancellation for the row loop.
//!
//! The binary's Ctrl-C handler cancels the token; [`super::run_pipeline`] checks it before each
//! row and stops enriching once it is set, then flushes whatever was written so far.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared between a signal handler and the row loop.
///
/// Cloning yields another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Returns `true` if the token was already cancelled.
    pub fn cancel(&self) -> bool {
        self.cancelled.swap(true, Ordering::SeqCst)
    }

    /// Whether cancellation has been requested through any handle.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());

        assert!(!handle.cancel());
        assert!(token.is_cancelled());
        assert!(token.cancel());
    }
}
