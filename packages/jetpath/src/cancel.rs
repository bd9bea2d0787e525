//! Cooperative cancellation for decode sessions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation handle.
///
/// Install a clone on a session with
/// [`set_cancel_token`](crate::StreamDecoder::set_cancel_token) and call
/// [`cancel`](Self::cancel) from any thread; the dispatcher checks the flag
/// once per iteration and stops with
/// [`StreamError::Canceled`](crate::StreamError::Canceled) at the next
/// structural token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_canceled());
        token.cancel();
        assert!(other.is_canceled());
        token.cancel();
        assert!(token.is_canceled());
    }
}
