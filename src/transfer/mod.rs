/*!
 * Data Transfer
 *
 * Uniform send/receive wrappers over the engine. No buffering happens here;
 * the only translation is fitting counts into the signed 16-bit return slot.
 */

mod facade;

pub use facade::{clamp_count, DataTransfer};
