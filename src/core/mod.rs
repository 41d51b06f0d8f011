/*!
 * Core Module
 * Fundamental shim types, status codes and error handling
 */

pub mod codes;
pub mod data_structures;
pub mod errors;
pub mod limits;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use codes::{status_of, ErrorCode, FALSE, TCP_ACTIVE, TCP_PASSIVE, TRUE};
pub use errors::{ShimError, ShimResult};
pub use types::*;
