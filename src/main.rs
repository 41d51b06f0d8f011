/*!
 * STiK Transport Shim - Main Entry Point
 *
 * Brings the interface up on the host's socket stack, checks that the
 * driver header is discoverable, logs the table manifest and shuts down.
 */

use miette::IntoDiagnostic;
use std::sync::Arc;
use tracing::info;

use stik_shim::core::limits::TRANSPORT_DRIVER;
use stik_shim::{
    init_tracing, is_stik_driver, BudgetAllocator, SemaphoreTable, ShimConfig, ShimError,
    StdSocketEngine, StikInterface,
};

fn main() -> miette::Result<()> {
    init_tracing();

    info!("STiK transport shim starting...");
    let config = ShimConfig::from_env()?;
    info!(
        allocator_budget = config.allocator_budget,
        connect_timeout_ms = config.connect_timeout_ms,
        variables = config.variables.len(),
        "configuration loaded"
    );

    let engine = Arc::new(StdSocketEngine::new(&config));
    let allocator = Arc::new(BudgetAllocator::new(config.allocator_budget));

    let interface = StikInterface::initialize(SemaphoreTable::global(), engine, allocator, &config)?;
    let driver = interface.driver();

    if !is_stik_driver(driver.magic().as_bytes()) {
        return Err(ShimError::BadMagic.into());
    }

    let table = driver
        .get_dftab(TRANSPORT_DRIVER)
        .ok_or_else(|| ShimError::TableNotFound(TRANSPORT_DRIVER.into()))?;

    let manifest = serde_json::to_string_pretty(&table.manifest()).into_diagnostic()?;
    info!(
        module = table.module(),
        version = table.version(),
        author = table.author(),
        entries = table.entries().len(),
        "capability table ready"
    );
    info!("{manifest}");

    interface.teardown();
    info!("STiK transport shim stopped");
    Ok(())
}
