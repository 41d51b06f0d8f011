/*!
 * Synchronization Primitives
 *
 * Named binary semaphores standing in for the host OS's process-wide
 * semaphore service. The flag store is the only consumer.
 */

mod semaphore;

pub use semaphore::{BinarySemaphore, SemaphoreGuard, SemaphoreTable};
