/*!
 * Flag Store
 *
 * Sticky one-shot flags shared between legacy callers, each slot read and
 * written only while the flag semaphore is held.
 */

mod store;

pub use store::FlagStore;
