//! Per-frame event registration
//!
//! Mirrors the `+=`/`-=` event model of the sensor SDKs: every `subscribe`
//! adds one handler, `unsubscribe` removes exactly that handler.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Frame callback. `None` means the SDK signalled a frame that could not be acquired.
pub type FrameHandler<F> = Arc<dyn Fn(Option<&F>) + Send + Sync>;

/// Handle returned by `subscribe`, needed to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct FrameEvent<F> {
    next_id: AtomicU64,
    handlers: RwLock<Vec<(SubscriptionId, FrameHandler<F>)>>,
}

impl<F> FrameEvent<F> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handlers: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, handler: FrameHandler<F>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, handler));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    /// Invoke every handler on the calling thread
    pub fn raise(&self, frame: Option<&F>) {
        // Snapshot so a handler may unsubscribe without deadlocking
        let handlers: Vec<FrameHandler<F>> = self
            .handlers
            .read()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            handler(frame);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl<F> Default for FrameEvent<F> {
    fn default() -> Self {
        Self::new()
    }
}
