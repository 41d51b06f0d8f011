/*!
 * Socket Engine
 *
 * The socket-style stack the shim translates into. The core only talks to
 * the [`SocketEngine`] trait; [`StdSocketEngine`] is a `std::net` backed
 * implementation for running the shim on a regular host.
 */

mod std_engine;
mod traits;

pub use std_engine::{io_error_code, StdSocketEngine};
pub use traits::SocketEngine;

#[cfg(test)]
pub use traits::MockSocketEngine;
