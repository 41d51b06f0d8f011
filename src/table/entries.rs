/*!
 * Table Entries
 *
 * One handler per position. A handler handed a call meant for another
 * position answers `E_PARAMETER` without touching anything.
 */

use super::call::{Call, Reply};
use super::transport::Transport;
use crate::connection::inert;
use crate::core::codes::{status_of, ErrorCode};
use crate::core::limits::TABLE_SLOTS;
use crate::core::types::BlockRef;
use crate::errtext;
use std::borrow::Cow;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Entry point signature shared by every slot
pub type Handler = for<'a> fn(&Transport, Call<'a>) -> Reply;

/// One named slot of the capability table
#[derive(Clone, Copy)]
pub struct TableEntry {
    pub name: &'static str,
    pub handler: Handler,
}

impl std::fmt::Debug for TableEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

const fn entry(name: &'static str, handler: Handler) -> TableEntry {
    TableEntry { name, handler }
}

/// The table, in the order legacy clients index it
pub static ENTRIES: [TableEntry; TABLE_SLOTS] = [
    entry("KRmalloc", kr_malloc),
    entry("KRfree", kr_free),
    entry("KRgetfree", kr_getfree),
    entry("KRrealloc", kr_realloc),
    entry("get_err_text", get_err_text),
    entry("getvstr", getvstr),
    entry("carrier_detect", carrier_detect),
    entry("TCP_open", tcp_open),
    entry("TCP_close", tcp_close),
    entry("TCP_send", tcp_send),
    entry("TCP_wait_state", tcp_wait_state),
    entry("TCP_ack_wait", tcp_ack_wait),
    entry("UDP_open", udp_open),
    entry("UDP_close", udp_close),
    entry("UDP_send", udp_send),
    entry("CNkick", cn_kick),
    entry("CNbyte_count", cn_byte_count),
    entry("CNget_char", cn_get_char),
    entry("CNget_NDB", cn_get_ndb),
    entry("CNget_block", cn_get_block),
    entry("housekeep", housekeep),
    entry("resolve", resolve),
    entry("ser_disable", ser_disable),
    entry("ser_enable", ser_enable),
    entry("set_flag", set_flag),
    entry("clear_flag", clear_flag),
    entry("CNgetinfo", cn_getinfo),
    entry("on_port", on_port),
    entry("off_port", off_port),
    entry("setvstr", setvstr),
    entry("query_port", query_port),
    entry("CNgets", cn_gets),
    entry("ICMP_send", icmp_send),
    entry("ICMP_handler", icmp_handler),
    entry("ICMP_discard", icmp_discard),
    entry("TCP_info", tcp_info),
    entry("cntrl_port", cntrl_port),
    entry("UDP_info", udp_info),
    entry("RAW_open", raw_open),
    entry("RAW_close", raw_close),
    entry("RAW_out", raw_out),
    entry("CN_setopt", cn_setopt),
    entry("CN_getopt", cn_getopt),
    entry("CNfree_NDB", cn_free_ndb),
    entry("reserved1", reserved),
    entry("reserved2", reserved),
    entry("reserved3", reserved),
    entry("reserved4", reserved),
];

#[inline]
fn mismatch() -> Reply {
    Reply::Status(ErrorCode::PARAMETER.raw())
}

/// Legacy timeouts are whole seconds; negative means do not wait
#[inline]
fn seconds(timeout: i16) -> Duration {
    Duration::from_secs(u64::try_from(timeout).unwrap_or(0))
}

/// Negative sizes can never be satisfied
#[inline]
fn block_size(size: i32) -> Option<usize> {
    usize::try_from(size).ok()
}

// =============================================================================
// ALLOCATOR
// =============================================================================

fn kr_malloc(t: &Transport, call: Call<'_>) -> Reply {
    let Call::KrMalloc { size } = call else {
        return mismatch();
    };
    Reply::Block(block_size(size).and_then(|size| t.allocator().allocate(size)))
}

fn kr_free(t: &Transport, call: Call<'_>) -> Reply {
    let Call::KrFree { block } = call else {
        return mismatch();
    };
    t.allocator().free(block);
    Reply::Unit
}

fn kr_getfree(t: &Transport, call: Call<'_>) -> Reply {
    let Call::KrGetFree { flag } = call else {
        return mismatch();
    };
    Reply::Size(t.allocator().query_free(flag))
}

fn kr_realloc(t: &Transport, call: Call<'_>) -> Reply {
    let Call::KrRealloc { block, size } = call else {
        return mismatch();
    };
    let moved: Option<BlockRef> = match block_size(size) {
        Some(size) => t.allocator().reallocate(block, size),
        None => None,
    };
    Reply::Block(moved)
}

// =============================================================================
// TEXT AND VARIABLES
// =============================================================================

fn get_err_text(_: &Transport, call: Call<'_>) -> Reply {
    let Call::GetErrText { code } = call else {
        return mismatch();
    };
    Reply::Text(Cow::Borrowed(errtext::describe(code)))
}

fn getvstr(t: &Transport, call: Call<'_>) -> Reply {
    let Call::GetVStr { name } = call else {
        return mismatch();
    };
    Reply::Text(t.get_variable(name))
}

fn setvstr(t: &Transport, call: Call<'_>) -> Reply {
    let Call::SetVStr { name, value } = call else {
        return mismatch();
    };
    Reply::Status(t.set_variable(name, value))
}

fn resolve(t: &Transport, call: Call<'_>) -> Reply {
    let Call::Resolve {
        name,
        canonical,
        addresses,
    } = call
    else {
        return mismatch();
    };
    Reply::Status(status_of(t.resolve(name, canonical, addresses)))
}

// =============================================================================
// CONNECTIONS
// =============================================================================

fn tcp_open(t: &Transport, call: Call<'_>) -> Reply {
    let Call::TcpOpen(request) = call else {
        return mismatch();
    };
    Reply::Status(status_of(t.connections().open(&request)))
}

fn tcp_close(t: &Transport, call: Call<'_>) -> Reply {
    let Call::TcpClose { handle, .. } = call else {
        return mismatch();
    };
    Reply::Status(t.connections().close(handle).raw())
}

fn tcp_wait_state(t: &Transport, call: Call<'_>) -> Reply {
    let Call::TcpWaitState { handle, timeout, .. } = call else {
        return mismatch();
    };
    let result = t.connections().wait_state(handle, seconds(timeout));
    Reply::Status(status_of(result.map(|()| ErrorCode::NORMAL)))
}

fn udp_open(t: &Transport, call: Call<'_>) -> Reply {
    let Call::UdpOpen {
        remote_host,
        remote_port,
    } = call
    else {
        return mismatch();
    };
    let result = t
        .connections()
        .udp_open(Ipv4Addr::from(remote_host), remote_port);
    Reply::Status(status_of(result))
}

fn udp_close(t: &Transport, call: Call<'_>) -> Reply {
    let Call::UdpClose { handle } = call else {
        return mismatch();
    };
    Reply::Status(t.connections().udp_close(handle))
}

fn cn_getinfo(t: &Transport, call: Call<'_>) -> Reply {
    let Call::CnGetInfo { handle } = call else {
        return mismatch();
    };
    Reply::Info(t.connections().get_info(handle))
}

// =============================================================================
// TRANSFER
// =============================================================================

fn tcp_send(t: &Transport, call: Call<'_>) -> Reply {
    let Call::TcpSend { handle, data } = call else {
        return mismatch();
    };
    Reply::Status(status_of(t.transfer().send(handle, data)))
}

fn udp_send(t: &Transport, call: Call<'_>) -> Reply {
    let Call::UdpSend { handle, data } = call else {
        return mismatch();
    };
    Reply::Status(status_of(t.transfer().send(handle, data)))
}

fn cn_byte_count(t: &Transport, call: Call<'_>) -> Reply {
    let Call::CnByteCount { handle } = call else {
        return mismatch();
    };
    Reply::Status(status_of(t.transfer().pending_count(handle)))
}

fn cn_get_char(t: &Transport, call: Call<'_>) -> Reply {
    let Call::CnGetChar { handle } = call else {
        return mismatch();
    };
    Reply::Status(status_of(t.transfer().receive_byte(handle)))
}

fn cn_get_ndb(t: &Transport, call: Call<'_>) -> Reply {
    let Call::CnGetNdb { handle } = call else {
        return mismatch();
    };
    Reply::Packet(t.transfer().receive_packet(handle))
}

fn cn_get_block(t: &Transport, call: Call<'_>) -> Reply {
    let Call::CnGetBlock { handle, buf } = call else {
        return mismatch();
    };
    Reply::Status(status_of(t.transfer().receive_block(handle, buf)))
}

fn cn_gets(t: &Transport, call: Call<'_>) -> Reply {
    let Call::CnGets {
        handle,
        buf,
        delimiter,
    } = call
    else {
        return mismatch();
    };
    Reply::Status(status_of(t.transfer().receive_delimited(handle, buf, delimiter)))
}

// =============================================================================
// FLAGS
// =============================================================================

fn set_flag(t: &Transport, call: Call<'_>) -> Reply {
    let Call::SetFlag { flag } = call else {
        return mismatch();
    };
    Reply::Status(t.flags().set_flag(flag))
}

fn clear_flag(t: &Transport, call: Call<'_>) -> Reply {
    let Call::ClearFlag { flag } = call else {
        return mismatch();
    };
    t.flags().clear(flag);
    Reply::Unit
}

// =============================================================================
// INERT SLOTS
// =============================================================================

fn carrier_detect(_: &Transport, call: Call<'_>) -> Reply {
    let Call::CarrierDetect = call else {
        return mismatch();
    };
    Reply::Status(inert::carrier_detect())
}

fn tcp_ack_wait(_: &Transport, call: Call<'_>) -> Reply {
    let Call::TcpAckWait { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::ack_wait())
}

fn cn_kick(_: &Transport, call: Call<'_>) -> Reply {
    let Call::CnKick { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::kick())
}

fn housekeep(_: &Transport, call: Call<'_>) -> Reply {
    let Call::Housekeep = call else {
        return mismatch();
    };
    inert::housekeep();
    Reply::Unit
}

fn ser_disable(_: &Transport, call: Call<'_>) -> Reply {
    let Call::SerDisable = call else {
        return mismatch();
    };
    inert::serial_disable();
    Reply::Unit
}

fn ser_enable(_: &Transport, call: Call<'_>) -> Reply {
    let Call::SerEnable = call else {
        return mismatch();
    };
    inert::serial_enable();
    Reply::Unit
}

fn on_port(_: &Transport, call: Call<'_>) -> Reply {
    let Call::OnPort { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::port_on())
}

fn off_port(_: &Transport, call: Call<'_>) -> Reply {
    let Call::OffPort { .. } = call else {
        return mismatch();
    };
    inert::port_off();
    Reply::Unit
}

fn query_port(_: &Transport, call: Call<'_>) -> Reply {
    let Call::QueryPort { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::port_query())
}

fn cntrl_port(_: &Transport, call: Call<'_>) -> Reply {
    let Call::CntrlPort { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::port_control())
}

fn icmp_send(_: &Transport, call: Call<'_>) -> Reply {
    let Call::IcmpSend { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::icmp_send())
}

fn icmp_handler(_: &Transport, call: Call<'_>) -> Reply {
    let Call::IcmpHandler { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::icmp_handler())
}

fn icmp_discard(_: &Transport, call: Call<'_>) -> Reply {
    let Call::IcmpDiscard(_) = call else {
        return mismatch();
    };
    inert::icmp_discard();
    Reply::Unit
}

fn tcp_info(_: &Transport, call: Call<'_>) -> Reply {
    let Call::TcpInfo { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::tcp_info())
}

fn udp_info(_: &Transport, call: Call<'_>) -> Reply {
    let Call::UdpInfo { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::udp_info())
}

fn raw_open(_: &Transport, call: Call<'_>) -> Reply {
    let Call::RawOpen { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::raw_open())
}

fn raw_close(_: &Transport, call: Call<'_>) -> Reply {
    let Call::RawClose { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::raw_close())
}

fn raw_out(_: &Transport, call: Call<'_>) -> Reply {
    let Call::RawOut { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::raw_out())
}

fn cn_setopt(_: &Transport, call: Call<'_>) -> Reply {
    let Call::CnSetopt { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::set_option())
}

fn cn_getopt(_: &Transport, call: Call<'_>) -> Reply {
    let Call::CnGetopt { .. } = call else {
        return mismatch();
    };
    Reply::Status(inert::get_option())
}

fn cn_free_ndb(_: &Transport, call: Call<'_>) -> Reply {
    let Call::CnFreeNdb(block) = call else {
        return mismatch();
    };
    drop(block);
    inert::free_block();
    Reply::Unit
}

/// Trailing slots answer every call the same way
fn reserved(_: &Transport, _: Call<'_>) -> Reply {
    Reply::Status(inert::reserved())
}
