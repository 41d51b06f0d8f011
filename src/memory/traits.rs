/*!
 * Allocator Traits
 */

use crate::core::types::BlockRef;

/// Allocator interface consumed by the `KR*` table entries
pub trait HostAllocator: Send + Sync {
    /// Allocate `size` bytes, `None` when the pool is exhausted
    fn allocate(&self, size: usize) -> Option<BlockRef>;

    /// Return a block; unknown references are ignored
    fn free(&self, block: BlockRef);

    /// Free space: `flag == 0` asks for the largest block, anything else for the total
    fn query_free(&self, flag: i16) -> i32;

    /// Resize a block, possibly moving it
    fn reallocate(&self, block: BlockRef, new_size: usize) -> Option<BlockRef>;
}
