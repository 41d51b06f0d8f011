/*!
 * Binary Semaphores
 *
 * `SemaphoreTable` mirrors the host's named semaphore service: create fails
 * when the name is already taken, destroy removes it, and holders block on
 * a `parking_lot::Condvar` until the current owner releases.
 */

use crate::core::data_structures::InlineString;
use crate::core::errors::{ShimError, ShimResult};
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// A binary semaphore with RAII release
pub struct BinarySemaphore {
    name: InlineString,
    locked: Mutex<bool>,
    released: Condvar,
}

impl BinarySemaphore {
    pub fn new(name: impl Into<InlineString>) -> Self {
        Self {
            name: name.into(),
            locked: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Block until the semaphore is free, then take it
    pub fn acquire(&self) -> SemaphoreGuard<'_> {
        let mut locked = self.locked.lock();
        while *locked {
            self.released.wait(&mut locked);
        }
        *locked = true;
        SemaphoreGuard { semaphore: self }
    }

    /// Take the semaphore, giving up after `timeout`
    pub fn try_acquire_for(&self, timeout: Duration) -> Option<SemaphoreGuard<'_>> {
        let deadline = Instant::now() + timeout;
        let mut locked = self.locked.lock();
        while *locked {
            if self.released.wait_until(&mut locked, deadline).timed_out() && *locked {
                trace!(semaphore = %self.name, "acquire timed out");
                return None;
            }
        }
        *locked = true;
        Some(SemaphoreGuard { semaphore: self })
    }

    /// Whether some caller currently holds the semaphore
    pub fn is_held(&self) -> bool {
        *self.locked.lock()
    }

    fn release(&self) {
        let mut locked = self.locked.lock();
        *locked = false;
        drop(locked);
        self.released.notify_one();
    }
}

impl std::fmt::Debug for BinarySemaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinarySemaphore")
            .field("name", &self.name)
            .field("held", &self.is_held())
            .finish()
    }
}

/// Releases the semaphore when dropped
#[must_use = "the semaphore is released as soon as the guard is dropped"]
pub struct SemaphoreGuard<'a> {
    semaphore: &'a BinarySemaphore,
}

impl Drop for SemaphoreGuard<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}

/// Process-wide registry of named semaphores
pub struct SemaphoreTable {
    semaphores: DashMap<InlineString, Arc<BinarySemaphore>, RandomState>,
}

impl SemaphoreTable {
    pub fn new() -> Self {
        Self {
            semaphores: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// The table shared by every module in this process
    pub fn global() -> &'static SemaphoreTable {
        static GLOBAL: OnceLock<SemaphoreTable> = OnceLock::new();
        GLOBAL.get_or_init(SemaphoreTable::new)
    }

    /// Create a semaphore; fails if the name is already in use
    pub fn create(&self, name: &str) -> ShimResult<Arc<BinarySemaphore>> {
        match self.semaphores.entry(InlineString::from(name)) {
            Entry::Occupied(_) => Err(ShimError::SemaphoreUnavailable(name.into())),
            Entry::Vacant(slot) => {
                let semaphore = Arc::new(BinarySemaphore::new(name));
                slot.insert(Arc::clone(&semaphore));
                debug!(semaphore = name, "semaphore created");
                Ok(semaphore)
            }
        }
    }

    /// Destroy a semaphore by name
    pub fn destroy(&self, name: &str) -> ShimResult<()> {
        match self.semaphores.remove(name) {
            Some(_) => {
                debug!(semaphore = name, "semaphore destroyed");
                Ok(())
            }
            None => Err(ShimError::SemaphoreMissing(name.into())),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<BinarySemaphore>> {
        self.semaphores.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.semaphores.contains_key(name)
    }
}

impl Default for SemaphoreTable {
    fn default() -> Self {
        Self::new()
    }
}
