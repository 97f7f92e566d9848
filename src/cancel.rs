use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ParlinesError, Result};

/// Shared flag for aborting a run between iterations.
///
/// Clones share the same flag, so one clone can be handed to another thread
/// and cancelled from there.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Returns `Err(Cancelled)` once cancellation has been requested.
    ///
    /// # Errors
    ///
    /// Returns `ParlinesError::Cancelled` tagged with `stage`.
    pub fn check(&self, stage: &'static str) -> Result<()> {
        if self.is_cancelled() {
            Err(ParlinesError::Cancelled { stage })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(token.check("segment").is_ok());
        other.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(
            token.check("segment"),
            Err(ParlinesError::Cancelled { stage: "segment" })
        ));
    }
}
