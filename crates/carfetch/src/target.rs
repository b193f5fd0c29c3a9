//! The single output slot that presentation overwrites.

use std::sync::Arc;

use tokio::sync::watch;

/// Handle to one markup slot.
///
/// Every write replaces the whole content. Clones share the slot, so two
/// orchestrators holding clones race on it and whichever finishes last wins.
/// Writes are synchronous so a plain completion callback can perform them.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    slot: Arc<watch::Sender<String>>,
}

impl RenderTarget {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self { slot: Arc::new(tx) }
    }

    /// Overwrite the slot with `markup`.
    pub fn replace(&self, markup: String) {
        self.slot.send_replace(markup);
    }

    /// Snapshot of the current markup.
    pub fn contents(&self) -> String {
        self.slot.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.replace(String::new());
    }

    /// Receive a notification every time the slot is overwritten.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.slot.subscribe()
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::new()
    }
}
