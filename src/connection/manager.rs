/*!
 * Connection Manager
 * Handle lifecycle on top of the socket engine
 */

use super::request::OpenRequest;
use crate::core::codes::ErrorCode;
use crate::core::types::{Handle, InfoRef};
use crate::engine::SocketEngine;
use crate::monitoring::span_operation;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Opens, closes and inspects engine connections
///
/// Holds no per-connection state: handles and their info blocks belong to
/// the engine.
#[derive(Clone)]
pub struct ConnectionManager {
    engine: Arc<dyn SocketEngine>,
}

impl ConnectionManager {
    pub fn new(engine: Arc<dyn SocketEngine>) -> Self {
        Self { engine }
    }

    /// Take a descriptor and run `setup` on it, releasing it if setup fails
    fn with_descriptor<F>(&self, setup: F) -> Result<Handle, ErrorCode>
    where
        F: FnOnce(Handle) -> Result<(), ErrorCode>,
    {
        let handle = self.engine.open_descriptor()?;

        if let Err(code) = setup(handle) {
            self.engine.close(handle);
            trace!(handle, code = code.raw(), "descriptor released after failed setup");
            return Err(code);
        }

        Ok(handle)
    }

    /// `TCP_open`: classify the request and establish the connection
    pub fn open(&self, request: &OpenRequest) -> Result<Handle, ErrorCode> {
        let span = span_operation("tcp_open");
        let _guard = span.enter();

        let shape = match request.classify() {
            Ok(shape) => shape,
            Err(code) => {
                span.record_error("sentinel port without connection block");
                return Err(code);
            }
        };
        span.record("shape", shape.name());

        let endpoints = shape.endpoints();
        debug!(
            remote = %endpoints.remote_host,
            remote_port = endpoints.remote_port,
            local_port = endpoints.local_port,
            shape = shape.name(),
            "opening TCP connection"
        );

        let result = self.with_descriptor(|handle| self.engine.connect(handle, endpoints));
        match result {
            Ok(handle) => {
                span.record_debug("handle", handle);
                span.record_result(true);
            }
            Err(code) => span.record_error(code.describe()),
        }
        result
    }

    /// `TCP_close`: the legacy contract has no close failure
    pub fn close(&self, handle: Handle) -> ErrorCode {
        self.engine.close(handle);
        debug!(handle, "TCP connection closed");
        ErrorCode::NORMAL
    }

    /// `UDP_open`: same descriptor discipline as TCP
    pub fn udp_open(&self, remote_host: Ipv4Addr, remote_port: u16) -> Result<Handle, ErrorCode> {
        let span = span_operation("udp_open");
        let _guard = span.enter();

        let result = self
            .with_descriptor(|handle| self.engine.udp_bind(handle, remote_host, remote_port));
        match result {
            Ok(handle) => {
                span.record_debug("handle", handle);
                span.record_result(true);
            }
            Err(code) => span.record_error(code.describe()),
        }
        result
    }

    /// `UDP_close`: always 0
    pub fn udp_close(&self, handle: Handle) -> i16 {
        self.engine.close(handle);
        debug!(handle, "UDP socket closed");
        0
    }

    /// `TCP_wait_state`: the engine's verdict, unchanged
    pub fn wait_state(&self, handle: Handle, timeout: Duration) -> Result<(), ErrorCode> {
        self.engine.wait(handle, timeout)
    }

    /// `CNgetinfo`: the engine-owned info block, or `E_BADHANDLE`
    pub fn get_info(&self, handle: Handle) -> Result<InfoRef, ErrorCode> {
        self.engine
            .lookup_connection(handle)
            .ok_or(ErrorCode::BADHANDLE)
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager").finish_non_exhaustive()
    }
}
