/*!
 * Host Configuration Block
 *
 * Written once by the lifecycle controller, read by the host whenever it
 * likes. `ArcSwap` gives readers a consistent snapshot without locking.
 */

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::sync::Arc;

/// The STinG configuration record as far as this module fills it in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Address clients should consider their own
    pub client_ip: Ipv4Addr,
    /// Default IP time-to-live
    pub ttl: u8,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            client_ip: Ipv4Addr::UNSPECIFIED,
            ttl: 64,
        }
    }
}

/// Configuration block as exposed to the host
pub type SharedHostConfig = Arc<ArcSwap<HostConfig>>;
