/*!
 * Budget Allocator
 *
 * Accounts allocations against a fixed byte budget and hands out opaque,
 * never-reused block references. No bytes are actually reserved: callers
 * only ever see the references.
 */

use super::traits::HostAllocator;
use crate::core::types::BlockRef;
use ahash::RandomState;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{trace, warn};

/// Block references are spaced by this granularity
const BLOCK_ALIGN: usize = 16;

/// First reference handed out (zero is the null block)
const FIRST_BLOCK: BlockRef = 0x1000;

struct BudgetState {
    blocks: HashMap<BlockRef, usize, RandomState>,
    used: usize,
    next: BlockRef,
}

/// Allocator statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorStats {
    pub capacity: usize,
    pub used: usize,
    pub blocks: usize,
}

impl AllocatorStats {
    pub fn available(&self) -> usize {
        self.capacity - self.used
    }
}

pub struct BudgetAllocator {
    capacity: usize,
    state: Mutex<BudgetState>,
}

impl BudgetAllocator {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(BudgetState {
                blocks: HashMap::with_hasher(RandomState::new()),
                used: 0,
                next: FIRST_BLOCK,
            }),
        }
    }

    pub fn stats(&self) -> AllocatorStats {
        let state = self.state.lock();
        AllocatorStats {
            capacity: self.capacity,
            used: state.used,
            blocks: state.blocks.len(),
        }
    }

    /// Size of a live block
    pub fn block_size(&self, block: BlockRef) -> Option<usize> {
        self.state.lock().blocks.get(&block).copied()
    }

    fn allocate_locked(&self, state: &mut BudgetState, size: usize) -> Option<BlockRef> {
        if size == 0 || size > self.capacity - state.used {
            return None;
        }

        let span = size.div_ceil(BLOCK_ALIGN) * BLOCK_ALIGN;
        let block = state.next;
        state.next = u32::try_from(span)
            .ok()
            .and_then(|span| state.next.checked_add(span))?;

        state.blocks.insert(block, size);
        state.used += size;
        Some(block)
    }
}

impl HostAllocator for BudgetAllocator {
    fn allocate(&self, size: usize) -> Option<BlockRef> {
        let mut state = self.state.lock();
        let block = self.allocate_locked(&mut state, size);
        match block {
            Some(block) => trace!(block, size, used = state.used, "block allocated"),
            None => warn!(size, used = state.used, capacity = self.capacity, "allocation refused"),
        }
        block
    }

    fn free(&self, block: BlockRef) {
        let mut state = self.state.lock();
        if let Some(size) = state.blocks.remove(&block) {
            state.used -= size;
            trace!(block, size, "block freed");
        }
    }

    fn query_free(&self, _flag: i16) -> i32 {
        // Without fragmentation the largest block and the total coincide
        let available = self.capacity - self.state.lock().used;
        i32::try_from(available).unwrap_or(i32::MAX)
    }

    fn reallocate(&self, block: BlockRef, new_size: usize) -> Option<BlockRef> {
        if block == 0 {
            return self.allocate(new_size);
        }

        let mut state = self.state.lock();
        let old_size = state.blocks.get(&block).copied()?;

        if new_size == 0 {
            state.blocks.remove(&block);
            state.used -= old_size;
            return None;
        }

        if new_size <= old_size {
            state.blocks.insert(block, new_size);
            state.used -= old_size - new_size;
            return Some(block);
        }

        // Growing: the old block only goes away once the new one exists
        if new_size - old_size > self.capacity - state.used {
            return None;
        }
        state.blocks.remove(&block);
        state.used -= old_size;
        let moved = self.allocate_locked(&mut state, new_size);
        if moved.is_none() {
            state.blocks.insert(block, old_size);
            state.used += old_size;
        }
        moved
    }
}

impl std::fmt::Debug for BudgetAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetAllocator")
            .field("stats", &self.stats())
            .finish()
    }
}
