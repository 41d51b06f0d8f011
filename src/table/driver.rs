/*!
 * Driver Header
 *
 * What a host finds when it looks for the transport layer: the magic
 * token, the table lookup, the ETM hook and the configuration block.
 */

use super::capability::CapabilityTable;
use crate::config::{HostConfig, SharedHostConfig};
use crate::core::limits::DRIVER_MAGIC;
use std::sync::Arc;
use tracing::debug;

/// Whether `header` starts with the driver magic
///
/// Hosts keep the magic in a fixed-size, NUL-padded field; trailing NULs
/// are ignored, anything else must match exactly.
pub fn is_stik_driver(header: &[u8]) -> bool {
    let magic = DRIVER_MAGIC.as_bytes();
    match header.strip_prefix(magic) {
        Some(rest) => rest.iter().all(|&b| b == 0),
        None => false,
    }
}

/// The `DRV_LIST` record
#[derive(Debug)]
pub struct DriverList {
    magic: &'static str,
    table: CapabilityTable,
    config: SharedHostConfig,
    next: Option<Box<DriverList>>,
}

impl DriverList {
    pub fn new(table: CapabilityTable, config: SharedHostConfig) -> Self {
        Self {
            magic: DRIVER_MAGIC,
            table,
            config,
            next: None,
        }
    }

    #[inline]
    pub fn magic(&self) -> &'static str {
        self.magic
    }

    /// `get_dftab`: the table whose module name is exactly `name`
    pub fn get_dftab(&self, name: &str) -> Option<&CapabilityTable> {
        let found = self.table.module() == name;
        debug!(name, found, "driver table lookup");
        found.then_some(&self.table)
    }

    /// `ETM_exec`: no modules to run, always 0
    pub fn etm_exec(&self, _name: &str) -> i16 {
        0
    }

    /// The host configuration block
    #[inline]
    pub fn config(&self) -> &SharedHostConfig {
        &self.config
    }

    /// Current snapshot of the configuration block
    pub fn config_snapshot(&self) -> Arc<HostConfig> {
        self.config.load_full()
    }

    /// Link to a chained driver; this layer never chains one
    #[inline]
    pub fn next(&self) -> Option<&DriverList> {
        self.next.as_deref()
    }
}
