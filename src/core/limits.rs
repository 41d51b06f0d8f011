/*!
 * System Limits and Constants
 *
 * Centralized location for the numeric boundaries of the legacy contract.
 * Values here are part of the external ABI unless marked otherwise.
 */

use std::time::Duration;

// =============================================================================
// FLAG STORE
// =============================================================================

/// Number of sticky flags shared between legacy callers
pub const FLAG_COUNT: usize = 64;

/// Name of the process-wide semaphore guarding the flags
pub const FLAG_SEMAPHORE: &str = "STFL";

// =============================================================================
// RETURN SLOT
// =============================================================================

/// Largest count that fits the signed 16-bit return slot
/// Anything above would read as a negative error code
pub const MAX_LEGACY_COUNT: usize = i16::MAX as usize;

// =============================================================================
// ERROR CODE RANGES
// =============================================================================

/// Magnitudes above this carry an encoded OS errno
pub const OS_ERROR_BASE: i32 = 1000;

/// Magnitudes above this are never recognized
pub const UNRECOGNIZED_BOUND: i32 = 2000;

// =============================================================================
// CAPABILITY TABLE
// =============================================================================

/// Driver header magic used by hosts to recognize the module
pub const DRIVER_MAGIC: &str = "STiKmagic";

/// Category tag and lookup name of the only table provided
pub const TRANSPORT_DRIVER: &str = "TRANSPORT_TCPIP";

/// Table format version expected by STinG-era clients
pub const TABLE_FORMAT_VERSION: &str = "01.13";

/// Entries in the table, reserved ones included
pub const TABLE_SLOTS: usize = 48;

/// Number of reserved trailing slots
pub const RESERVED_SLOTS: usize = 4;

/// Position of the first reserved slot
pub const FIRST_RESERVED_SLOT: usize = TABLE_SLOTS - RESERVED_SLOTS;

// =============================================================================
// ENGINE DEFAULTS (not part of the ABI)
// =============================================================================

/// Default active-open connect timeout for the std engine
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval while waiting on a passive open
pub const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// First descriptor handed out by the std engine
pub const FIRST_DESCRIPTOR: i16 = 1;

/// Upper bound on simultaneously open engine descriptors
pub const MAX_DESCRIPTORS: usize = 256;

/// Largest peek buffer used to count pending bytes
pub const PENDING_PEEK_LIMIT: usize = 64 * 1024;

/// Largest UDP datagram read into a network data block
pub const MAX_DATAGRAM: usize = 65_507;

/// Default allocator budget (the classic STiK 100KB memory pool)
pub const DEFAULT_ALLOCATOR_BUDGET: usize = 100 * 1024;
