/*!
 * Transport
 *
 * The collaborators and managers every table entry works against.
 */

use crate::connection::ConnectionManager;
use crate::core::codes::{ErrorCode, FALSE, TRUE};
use crate::engine::SocketEngine;
use crate::flags::FlagStore;
use crate::memory::HostAllocator;
use crate::transfer::{clamp_count, DataTransfer};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

/// Value `getvstr` reports for a variable that was never set
const UNSET_VARIABLE: &str = "0";

pub struct Transport {
    engine: Arc<dyn SocketEngine>,
    allocator: Arc<dyn HostAllocator>,
    flags: Arc<FlagStore>,
    connections: ConnectionManager,
    transfer: DataTransfer,
}

impl Transport {
    pub fn new(
        engine: Arc<dyn SocketEngine>,
        allocator: Arc<dyn HostAllocator>,
        flags: Arc<FlagStore>,
    ) -> Self {
        Self {
            connections: ConnectionManager::new(Arc::clone(&engine)),
            transfer: DataTransfer::new(Arc::clone(&engine)),
            engine,
            allocator,
            flags,
        }
    }

    #[inline]
    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    #[inline]
    pub fn transfer(&self) -> &DataTransfer {
        &self.transfer
    }

    #[inline]
    pub fn flags(&self) -> &FlagStore {
        &self.flags
    }

    #[inline]
    pub fn allocator(&self) -> &dyn HostAllocator {
        self.allocator.as_ref()
    }

    /// `resolve`: addresses written into `addresses`, or the engine's error
    ///
    /// The canonical name goes to `canonical` when the caller asked for it.
    pub fn resolve(
        &self,
        name: &str,
        canonical: Option<&mut String>,
        addresses: &mut [u32],
    ) -> Result<i16, ErrorCode> {
        let resolution = self.engine.resolve(name, addresses.len())?;

        if let (Some(out), Some(found)) = (canonical, resolution.canonical_name) {
            *out = found;
        }

        let mut written = 0usize;
        for (slot, addr) in addresses.iter_mut().zip(&resolution.addresses) {
            *slot = u32::from(*addr);
            written += 1;
        }
        debug!(name, written, "resolved");
        Ok(clamp_count(written))
    }

    /// `getvstr`
    pub fn get_variable(&self, name: &str) -> Cow<'static, str> {
        match self.engine.get_variable(name) {
            Some(value) => Cow::Owned(value),
            None => Cow::Borrowed(UNSET_VARIABLE),
        }
    }

    /// `setvstr`: TRUE when the engine accepted the value
    pub fn set_variable(&self, name: &str, value: &str) -> i16 {
        match self.engine.set_variable(name, value) {
            Ok(()) => TRUE,
            Err(_) => FALSE,
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
