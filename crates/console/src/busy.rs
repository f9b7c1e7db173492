use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ConsoleError, ConsoleResult};

/// Holds a manager's single mutation slot until dropped.
#[derive(Debug)]
pub(crate) struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    /// Claim the slot, or fail with [`ConsoleError::Busy`] if it is taken.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> ConsoleResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ConsoleError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
