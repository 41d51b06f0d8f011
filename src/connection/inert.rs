/*!
 * Inert Legacy Surface
 *
 * Entries that must occupy their table slot but have nothing to translate
 * to: modem control, serial ports, ICMP, raw sockets, per-connection
 * options. Each returns a fixed value and never touches the engine.
 * These are permanent; the underlying stack handles carriers, kicking and
 * acknowledgements on its own.
 */

use crate::core::codes::{ErrorCode, FALSE};

/// `carrier_detect`: the stack may use several links, so always 0 (unknown)
#[inline]
pub fn carrier_detect() -> i16 {
    0
}

/// `TCP_ack_wait`
#[inline]
pub fn ack_wait() -> i16 {
    ErrorCode::NORMAL.raw()
}

/// `CNkick`
#[inline]
pub fn kick() -> i16 {
    ErrorCode::NORMAL.raw()
}

/// `housekeep`
#[inline]
pub fn housekeep() {}

/// `ser_disable`
#[inline]
pub fn serial_disable() {}

/// `ser_enable`
#[inline]
pub fn serial_enable() {}

/// `on_port`: dialers are not supported
#[inline]
pub fn port_on() -> i16 {
    ErrorCode::NOROUTINE.raw()
}

/// `off_port`
#[inline]
pub fn port_off() {}

/// `query_port`
#[inline]
pub fn port_query() -> i16 {
    ErrorCode::NOROUTINE.raw()
}

/// `cntrl_port`
#[inline]
pub fn port_control() -> i16 {
    ErrorCode::NODATA.raw()
}

/// `ICMP_send`
#[inline]
pub fn icmp_send() -> i16 {
    ErrorCode::NOROUTINE.raw()
}

/// `ICMP_handler`: registration always refused
#[inline]
pub fn icmp_handler() -> i16 {
    FALSE
}

/// `ICMP_discard`
#[inline]
pub fn icmp_discard() {}

/// `TCP_info`
#[inline]
pub fn tcp_info() -> i16 {
    ErrorCode::BADHANDLE.raw()
}

/// `UDP_info`
#[inline]
pub fn udp_info() -> i16 {
    ErrorCode::BADHANDLE.raw()
}

/// `RAW_open`
#[inline]
pub fn raw_open() -> i16 {
    ErrorCode::NOROUTINE.raw()
}

/// `RAW_close`
#[inline]
pub fn raw_close() -> i16 {
    ErrorCode::BADHANDLE.raw()
}

/// `RAW_out`
#[inline]
pub fn raw_out() -> i16 {
    ErrorCode::BADHANDLE.raw()
}

/// `CN_setopt`
#[inline]
pub fn set_option() -> i16 {
    ErrorCode::NOROUTINE.raw()
}

/// `CN_getopt`
#[inline]
pub fn get_option() -> i16 {
    ErrorCode::NOROUTINE.raw()
}

/// `CNfree_NDB`: blocks are owned values and go away when dropped
#[inline]
pub fn free_block() {}

/// Reserved trailing slots
#[inline]
pub fn reserved() -> i16 {
    ErrorCode::NOROUTINE.raw()
}
