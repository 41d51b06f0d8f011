/*!
 * Configuration
 *
 * `ShimConfig` holds the knobs read at start-up; `HostConfig` is the record
 * shared with the host runtime through the driver header.
 */

mod host;
mod shim;

pub use host::{HostConfig, SharedHostConfig};
pub use shim::ShimConfig;
