/*!
 * Error Text Table
 */

use crate::core::codes::ErrorCode;
use crate::core::limits::{OS_ERROR_BASE, UNRECOGNIZED_BOUND};

/// Returned for every code without a description
pub const UNRECOGNIZED: &str = "Unrecognized error";

/// Descriptions indexed by code magnitude
pub static ERROR_TEXT: [Option<&str>; ErrorCode::LAST as usize + 1] = [
    Some("No error occured"),
    Some("Output buffer is full"),
    Some("No data available"),
    Some("EOF from remote"),
    Some("Reset received from remote"),
    Some("Unacceptable packet received, reset"),
    Some("Something failed due to lack of memory"),
    Some("Connection refused by remote"),
    Some("A SYN was received in the window"),
    Some("Bad connection handle used."),
    Some("The connection is in LISTEN state"),
    Some("No free CCB's available"),
    Some("No connection matches this packet (TCP)"),
    Some("Failure to connect to remote port (TCP)"),
    Some("Invalid TCP_close() requested"),
    Some("A user function timed out"),
    Some("A connection timed out"),
    Some("Can't resolve the hostname"),
    Some("Domain name or dotted dec. bad format"),
    Some("The modem disconnected"),
    Some("Hostname does not exist"),
    Some("Resolver Work limit reached"),
    Some("No nameservers could be found for query"),
    Some("Bad format of DS query"),
    Some("Destination unreachable"),
    Some("No address records exist for host"),
    Some("Routine unavailable"),
    Some("Locked by another application"),
    Some("Error during fragmentation"),
    Some("Time To Live of an IP packet exceeded"),
    Some("Problem with a parameter"),
    Some("Input buffer is too small for data"),
    Some("Function is not available"),
];

/// OS-level errno description lookup
pub trait OsErrorText: Send + Sync {
    fn os_error_text(&self, errno: i32) -> &'static str;
}

/// Platform errno descriptions via `nix`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemErrorText;

impl OsErrorText for SystemErrorText {
    fn os_error_text(&self, errno: i32) -> &'static str {
        nix::errno::Errno::from_raw(errno).desc()
    }
}

/// Describe `code` using the platform errno descriptions
pub fn describe(code: i16) -> &'static str {
    describe_with(&SystemErrorText, code)
}

/// Describe `code`, delegating encoded OS errors to `os`
///
/// The range checks use the magnitude, but the table bound check uses the
/// signed value. A negative code therefore only fails the bound check
/// through the table lookup itself.
pub fn describe_with(os: &dyn OsErrorText, code: i16) -> &'static str {
    let magnitude = (code as i32).abs();

    if magnitude > UNRECOGNIZED_BOUND {
        return UNRECOGNIZED;
    }

    if magnitude > OS_ERROR_BASE {
        return os.os_error_text(magnitude - OS_ERROR_BASE);
    }

    if code > ErrorCode::LAST {
        return UNRECOGNIZED;
    }

    ERROR_TEXT
        .get(magnitude as usize)
        .copied()
        .flatten()
        .unwrap_or(UNRECOGNIZED)
}
