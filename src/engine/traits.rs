/*!
 * Socket Engine Traits
 * Primitives consumed by the connection manager and transfer façade
 */

use crate::core::codes::ErrorCode;
use crate::core::types::{Endpoints, Handle, InfoRef, NetworkBlock, Resolution};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Socket engine interface
///
/// Every fallible call reports a legacy [`ErrorCode`]; the shim hands those
/// back to callers unchanged.
#[cfg_attr(test, mockall::automock)]
pub trait SocketEngine: Send + Sync {
    /// Take a fresh descriptor from the engine's pool
    fn open_descriptor(&self) -> Result<Handle, ErrorCode>;

    /// Turn a descriptor into a TCP connection (or listener when passive)
    fn connect(&self, handle: Handle, endpoints: Endpoints) -> Result<(), ErrorCode>;

    /// Turn a descriptor into a UDP socket aimed at the remote pair
    fn udp_bind(&self, handle: Handle, remote_host: Ipv4Addr, remote_port: u16)
        -> Result<(), ErrorCode>;

    /// Release the descriptor and whatever it carries
    fn close(&self, handle: Handle);

    fn read(&self, handle: Handle, buf: &mut [u8]) -> Result<usize, ErrorCode>;

    fn write(&self, handle: Handle, data: &[u8]) -> Result<usize, ErrorCode>;

    /// Read up to and excluding `delimiter`, consuming it
    fn read_until(&self, handle: Handle, buf: &mut [u8], delimiter: u8)
        -> Result<usize, ErrorCode>;

    /// Next received chunk as a network data block
    fn read_packet(&self, handle: Handle) -> Option<NetworkBlock>;

    /// Bytes readable without blocking
    fn pending_bytes(&self, handle: Handle) -> Result<usize, ErrorCode>;

    /// Block until the connection is ready, or `timeout` elapses
    fn wait(&self, handle: Handle, timeout: Duration) -> Result<(), ErrorCode>;

    fn lookup_connection(&self, handle: Handle) -> Option<InfoRef>;

    /// Resolve `name`, returning at most `max_addresses` addresses
    fn resolve(&self, name: &str, max_addresses: usize) -> Result<Resolution, ErrorCode>;

    fn get_variable(&self, name: &str) -> Option<String>;

    fn set_variable(&self, name: &str, value: &str) -> Result<(), ErrorCode>;
}
