/*!
 * Legacy Status Codes
 * The signed 16-bit result space shared by every table operation
 *
 * Non-negative values are successful results (handles, byte counts, flag
 * values); negative values are errors. Codes in the ±(1000, 2000] range
 * carry an encoded OS errno and are passed through from the engine untouched.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Legacy error code, always stored with its original sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ErrorCode(i16);

impl ErrorCode {
    pub const NORMAL: Self = Self(0);
    pub const OBUFFULL: Self = Self(-1);
    pub const NODATA: Self = Self(-2);
    pub const EOF: Self = Self(-3);
    pub const RRESET: Self = Self(-4);
    pub const UA: Self = Self(-5);
    pub const NOMEM: Self = Self(-6);
    pub const REFUSE: Self = Self(-7);
    pub const BADSYN: Self = Self(-8);
    pub const BADHANDLE: Self = Self(-9);
    pub const LISTEN: Self = Self(-10);
    pub const NOCCB: Self = Self(-11);
    pub const NOCONNECTION: Self = Self(-12);
    pub const CONNECTFAIL: Self = Self(-13);
    pub const BADCLOSE: Self = Self(-14);
    pub const USERTIMEOUT: Self = Self(-15);
    pub const CNTIMEOUT: Self = Self(-16);
    pub const CANTRESOLVE: Self = Self(-17);
    pub const BADDNAME: Self = Self(-18);
    pub const LOSTCARRIER: Self = Self(-19);
    pub const NOHOSTNAME: Self = Self(-20);
    pub const DNSWORKLIMIT: Self = Self(-21);
    pub const NONAMESERVER: Self = Self(-22);
    pub const DNSBADFORMAT: Self = Self(-23);
    pub const UNREACHABLE: Self = Self(-24);
    pub const DNSNOADDR: Self = Self(-25);
    pub const NOROUTINE: Self = Self(-26);
    pub const LOCKED: Self = Self(-27);
    pub const FRAGMENT: Self = Self(-28);
    pub const TTLEXCEED: Self = Self(-29);
    pub const PARAMETER: Self = Self(-30);
    pub const BIGBUF: Self = Self(-31);
    pub const FNAVAIL: Self = Self(-32);

    /// Highest magnitude with an entry in the description table
    pub const LAST: i16 = 32;

    #[inline]
    pub const fn from_raw(code: i16) -> Self {
        Self(code)
    }

    /// Encode an OS errno the way the engine reports it (`-(1000 + errno)`)
    #[inline]
    pub fn from_os_errno(errno: i32) -> Self {
        let magnitude = (1000 + errno.clamp(1, 1000)) as i16;
        Self(-magnitude)
    }

    #[inline]
    pub const fn raw(self) -> i16 {
        self.0
    }

    /// Whether this code lies in the encoded OS error range
    #[inline]
    pub const fn is_os_error(self) -> bool {
        let magnitude = (self.0 as i32).abs();
        magnitude > 1000 && magnitude <= 2000
    }

    /// Human-readable description, see [`crate::errtext::describe`]
    #[inline]
    pub fn describe(self) -> &'static str {
        crate::errtext::describe(self.0)
    }
}

impl From<ErrorCode> for i16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.describe(), self.0)
    }
}

impl std::error::Error for ErrorCode {}

/// Legacy boolean results (`TRUE`/`FALSE` in the table contract)
pub const TRUE: i16 = 1;
pub const FALSE: i16 = 0;

/// Port sentinels that switch `TCP_open` into parameter-block mode
pub const TCP_ACTIVE: u16 = 0x0000;
pub const TCP_PASSIVE: u16 = 0xFFFF;

/// Collapse a status-or-value result into the single legacy return slot
#[inline]
pub fn status_of<T: Into<i16>>(result: Result<T, ErrorCode>) -> i16 {
    match result {
        Ok(value) => value.into(),
        Err(code) => code.raw(),
    }
}
