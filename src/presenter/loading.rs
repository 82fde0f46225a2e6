//! Modal loading indicator

use std::sync::Arc;
use tokio::sync::watch;

/// The loading overlay: `Some(message)` while visible
#[derive(Clone)]
pub struct LoadingOverlay {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl Default for LoadingOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingOverlay {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Show the overlay until the returned guard drops
    #[must_use = "the overlay hides when the guard is dropped"]
    pub fn show(&self, message: impl Into<String>) -> LoadingGuard {
        self.tx.send_replace(Some(message.into()));
        LoadingGuard {
            tx: Arc::clone(&self.tx),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}

/// Hides the overlay on drop
pub struct LoadingGuard {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.tx.send_replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_hides_overlay() {
        let overlay = LoadingOverlay::new();
        assert!(overlay.current().is_none());

        {
            let _guard = overlay.show("Processing attendance...");
            assert_eq!(overlay.current().as_deref(), Some("Processing attendance..."));
        }

        assert!(overlay.current().is_none());
    }
}
