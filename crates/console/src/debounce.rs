//! Trailing-edge debounce for search input.
//!
//! Each call to [`Debouncer::settle`] supersedes the previous one; only the
//! call that is still the latest once the quiet period elapses resolves to
//! `true`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait out the quiet period. Returns `false` if another call arrived
    /// in the meantime.
    pub async fn settle(&self) -> bool {
        let ticket = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tokio::time::sleep(self.delay).await;
        self.generation.load(Ordering::Acquire) == ticket
    }
}
