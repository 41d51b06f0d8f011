/*!
 * Core Types
 * Values exchanged between the table, the managers and the collaborators
 */

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Connection handle, owned by the socket engine
pub type Handle = i16;

/// Opaque reference to a block handed out by the host allocator
pub type BlockRef = u32;

/// IP protocol numbers reported in connection info blocks
pub const PROTO_TCP: u16 = 6;
pub const PROTO_UDP: u16 = 17;

/// Fully resolved address tuple handed to the engine's connect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoints {
    pub local_host: Ipv4Addr,
    pub local_port: u16,
    pub remote_host: Ipv4Addr,
    pub remote_port: u16,
}

impl Endpoints {
    /// A passive endpoint accepts any remote host and port
    #[inline]
    pub fn is_passive(&self) -> bool {
        self.remote_host.is_unspecified() && self.remote_port == 0
    }
}

/// TCP connection states as reported to legacy callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum TcpState {
    Closed = 0,
    Listen = 1,
    SynSent = 2,
    SynReceived = 3,
    Established = 4,
    FinWait1 = 5,
    FinWait2 = 6,
    CloseWait = 7,
    Closing = 8,
    LastAck = 9,
    TimeWait = 10,
}

/// Connection information block (CIB), owned by the engine
///
/// Shared with callers through `Arc`; the shim never copies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub protocol: u16,
    pub local_port: u16,
    pub remote_port: u16,
    pub remote_host: Ipv4Addr,
    pub local_host: Ipv4Addr,
    pub state: TcpState,
}

/// Shared reference to an engine-owned info block
pub type InfoRef = Arc<ConnectionInfo>;

/// Network data block (NDB): one chunk of received data
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkBlock {
    pub data: Vec<u8>,
}

impl NetworkBlock {
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Outcome of a host name lookup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    /// Canonical (or reverse-resolved) name, when the engine knows it
    pub canonical_name: Option<String>,
    pub addresses: Vec<Ipv4Addr>,
}
