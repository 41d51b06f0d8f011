/*!
 * Sticky Flag Bitset
 */

use crate::core::codes::ErrorCode;
use crate::core::limits::FLAG_COUNT;
use crate::core::sync::BinarySemaphore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

/// 64 sticky flags behind a binary semaphore
///
/// Slots are atomics only for interior mutability; every access happens
/// with the semaphore held, so `Relaxed` is sufficient.
pub struct FlagStore {
    semaphore: Arc<BinarySemaphore>,
    slots: [AtomicBool; FLAG_COUNT],
}

impl FlagStore {
    pub fn new(semaphore: Arc<BinarySemaphore>) -> Self {
        Self {
            semaphore,
            slots: [const { AtomicBool::new(false) }; FLAG_COUNT],
        }
    }

    /// A store with a private semaphore, for hosts without a semaphore table
    pub fn standalone() -> Self {
        Self::new(Arc::new(BinarySemaphore::new("flags")))
    }

    #[inline]
    fn slot(&self, flag: i16) -> Option<&AtomicBool> {
        usize::try_from(flag).ok().and_then(|idx| self.slots.get(idx))
    }

    /// Set `flag`, returning whether it was already set
    pub fn test_and_set(&self, flag: i16) -> Result<bool, ErrorCode> {
        let slot = self.slot(flag).ok_or(ErrorCode::PARAMETER)?;

        let guard = self.semaphore.acquire();
        let previous = slot.load(Ordering::Relaxed);
        slot.store(true, Ordering::Relaxed);
        drop(guard);

        trace!(flag, previous, "flag set");
        Ok(previous)
    }

    /// Clear `flag`; out-of-range indices are ignored without error
    pub fn clear(&self, flag: i16) {
        let Some(slot) = self.slot(flag) else {
            return;
        };

        let _guard = self.semaphore.acquire();
        slot.store(false, Ordering::Relaxed);
    }

    /// Legacy `set_flag`: previous value (0/1) or `E_PARAMETER`
    pub fn set_flag(&self, flag: i16) -> i16 {
        match self.test_and_set(flag) {
            Ok(previous) => previous as i16,
            Err(code) => code.raw(),
        }
    }

    /// Read a flag without modifying it
    pub fn is_set(&self, flag: i16) -> bool {
        match self.slot(flag) {
            Some(slot) => {
                let _guard = self.semaphore.acquire();
                slot.load(Ordering::Relaxed)
            }
            None => false,
        }
    }

    pub fn semaphore(&self) -> &Arc<BinarySemaphore> {
        &self.semaphore
    }
}

impl std::fmt::Debug for FlagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagStore")
            .field("semaphore", &self.semaphore.name())
            .finish_non_exhaustive()
    }
}
