// Debounce for the free-text search box.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

/// Clones share one generation counter, so every keystroke handler can hold
/// its own copy while only the latest call wins.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, generation: Arc::new(AtomicU64::new(0)) }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the delay. Returns `false` when a later call superseded
    /// this one in the meantime.
    pub async fn settle(&self) -> bool {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        let latest = self.generation.load(Ordering::SeqCst) == ticket;
        if !latest {
            trace!(ticket, "Superseded by a newer keystroke");
        }
        latest
    }

    /// Invalidates any pending call.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
