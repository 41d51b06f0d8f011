/*!
 * Host Allocator
 *
 * The `KRmalloc` family forwards to a [`HostAllocator`]. [`BudgetAllocator`]
 * is a byte-budget implementation for hosts without their own pool.
 */

mod budget;
mod traits;

pub use budget::{AllocatorStats, BudgetAllocator};
pub use traits::HostAllocator;
