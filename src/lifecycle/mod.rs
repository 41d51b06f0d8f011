/*!
 * Lifecycle Controller
 *
 * Brings the interface up (flag semaphore, configuration block, table) and
 * takes it down again. The semaphore lives exactly as long as the
 * [`StikInterface`] value.
 */

use crate::config::{HostConfig, ShimConfig};
use crate::core::errors::ShimResult;
use crate::core::limits::FLAG_SEMAPHORE;
use crate::core::sync::SemaphoreTable;
use crate::engine::SocketEngine;
use crate::flags::FlagStore;
use crate::memory::HostAllocator;
use crate::monitoring::span_operation;
use crate::table::{CapabilityTable, DriverList, Transport};
use arc_swap::ArcSwap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, error, info};

/// A running transport interface
pub struct StikInterface<'a> {
    semaphores: &'a SemaphoreTable,
    driver: DriverList,
}

impl<'a> StikInterface<'a> {
    /// `init_stik_if`: claim the flag semaphore and publish the driver
    ///
    /// Fails when the semaphore already exists, which means another
    /// interface is live in this semaphore table.
    pub fn initialize(
        semaphores: &'a SemaphoreTable,
        engine: Arc<dyn SocketEngine>,
        allocator: Arc<dyn HostAllocator>,
        config: &ShimConfig,
    ) -> ShimResult<Self> {
        let span = span_operation("stik_init");
        let _guard = span.enter();

        let semaphore = match semaphores.create(FLAG_SEMAPHORE) {
            Ok(semaphore) => semaphore,
            Err(e) => {
                error!("Unable to obtain STiK flag semaphore");
                span.record_error(&e.to_string());
                return Err(e);
            }
        };

        let host_config = Arc::new(ArcSwap::from_pointee(HostConfig {
            client_ip: Ipv4Addr::LOCALHOST,
            ttl: config.ttl,
        }));

        let flags = Arc::new(FlagStore::new(semaphore));
        let table = CapabilityTable::new(Transport::new(engine, allocator, flags));
        let driver = DriverList::new(table, host_config);

        info!(
            magic = driver.magic(),
            client_ip = %Ipv4Addr::LOCALHOST,
            ttl = config.ttl,
            "STiK interface initialized"
        );
        span.record_result(true);

        Ok(Self { semaphores, driver })
    }

    #[inline]
    pub fn driver(&self) -> &DriverList {
        &self.driver
    }

    /// `cleanup_stik_if`: release the flag semaphore
    pub fn teardown(self) {
        debug!("STiK interface teardown requested");
    }
}

impl Drop for StikInterface<'_> {
    fn drop(&mut self) {
        match self.semaphores.destroy(FLAG_SEMAPHORE) {
            Ok(()) => info!("STiK interface torn down"),
            Err(e) => debug!(error = %e, "flag semaphore already gone"),
        }
    }
}

impl std::fmt::Debug for StikInterface<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StikInterface")
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}
