/*!
 * Transfer Façade
 */

use crate::core::codes::ErrorCode;
use crate::core::limits::MAX_LEGACY_COUNT;
use crate::core::types::{Handle, NetworkBlock};
use crate::engine::SocketEngine;
use std::sync::Arc;
use tracing::trace;

/// Fit a byte count into the legacy return slot
#[inline]
pub fn clamp_count(count: usize) -> i16 {
    count.min(MAX_LEGACY_COUNT) as i16
}

/// Longest prefix a single legacy call may move
#[inline]
fn legacy_window(len: usize) -> usize {
    len.min(MAX_LEGACY_COUNT)
}

/// Forwards transfers to the engine
#[derive(Clone)]
pub struct DataTransfer {
    engine: Arc<dyn SocketEngine>,
}

impl DataTransfer {
    pub fn new(engine: Arc<dyn SocketEngine>) -> Self {
        Self { engine }
    }

    /// `TCP_send`/`UDP_send`: bytes written
    pub fn send(&self, handle: Handle, data: &[u8]) -> Result<i16, ErrorCode> {
        let window = &data[..legacy_window(data.len())];
        let written = self.engine.write(handle, window)?;
        trace!(handle, written, "sent");
        Ok(clamp_count(written))
    }

    /// `CNget_block`: bytes read into `buf`
    pub fn receive_block(&self, handle: Handle, buf: &mut [u8]) -> Result<i16, ErrorCode> {
        let window = legacy_window(buf.len());
        let read = self.engine.read(handle, &mut buf[..window])?;
        Ok(clamp_count(read))
    }

    /// `CNget_char`: one byte, or `E_NODATA` when nothing was read
    pub fn receive_byte(&self, handle: Handle) -> Result<u8, ErrorCode> {
        let mut byte = [0u8; 1];
        match self.engine.read(handle, &mut byte)? {
            0 => Err(ErrorCode::NODATA),
            _ => Ok(byte[0]),
        }
    }

    /// `CNgets`: bytes read before `delimiter`
    pub fn receive_delimited(
        &self,
        handle: Handle,
        buf: &mut [u8],
        delimiter: u8,
    ) -> Result<i16, ErrorCode> {
        let window = legacy_window(buf.len());
        let read = self
            .engine
            .read_until(handle, &mut buf[..window], delimiter)?;
        Ok(clamp_count(read))
    }

    /// `CNbyte_count`: pending bytes, capped at 32767
    pub fn pending_count(&self, handle: Handle) -> Result<i16, ErrorCode> {
        self.engine.pending_bytes(handle).map(clamp_count)
    }

    /// `CNget_NDB`: next received block
    pub fn receive_packet(&self, handle: Handle) -> Option<NetworkBlock> {
        self.engine.read_packet(handle)
    }
}

impl std::fmt::Debug for DataTransfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTransfer").finish_non_exhaustive()
    }
}
