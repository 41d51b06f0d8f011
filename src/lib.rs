/*!
 * STiK Transport Shim Library
 * Legacy STiK/STinG transport table on top of a socket-style stack
 */

pub mod config;
pub mod connection;
pub mod core;
pub mod engine;
pub mod errtext;
pub mod flags;
pub mod lifecycle;
pub mod memory;
pub mod monitoring;
pub mod table;
pub mod transfer;

// Re-exports
pub use config::{HostConfig, ShimConfig, SharedHostConfig};
pub use connection::{ConnectionBlock, ConnectionManager, OpenRequest, OpenShape};
pub use self::core::{
    status_of, ConnectionInfo, Endpoints, ErrorCode, Handle, InfoRef, NetworkBlock, Resolution,
    ShimError, ShimResult, TcpState, FALSE, TCP_ACTIVE, TCP_PASSIVE, TRUE,
};
pub use self::core::sync::{BinarySemaphore, SemaphoreTable};
pub use engine::{io_error_code, SocketEngine, StdSocketEngine};
pub use flags::FlagStore;
pub use lifecycle::StikInterface;
pub use memory::{AllocatorStats, BudgetAllocator, HostAllocator};
pub use monitoring::{init_tracing, span_call, span_operation, CallSpan, OperationSpan};
pub use table::{is_stik_driver, Call, CapabilityTable, DriverList, Reply, TableManifest, Transport};
pub use transfer::{clamp_count, DataTransfer};
