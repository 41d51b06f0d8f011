/*!
 * Table Calls
 *
 * One variant per table position, carrying that entry's parameters.
 */

use crate::connection::OpenRequest;
use crate::core::codes::ErrorCode;
use crate::core::limits::FIRST_RESERVED_SLOT;
use crate::core::types::{BlockRef, Handle, InfoRef, NetworkBlock};
use std::borrow::Cow;

/// Arguments of one table invocation
#[derive(Debug)]
pub enum Call<'a> {
    KrMalloc { size: i32 },
    KrFree { block: BlockRef },
    KrGetFree { flag: i16 },
    KrRealloc { block: BlockRef, size: i32 },
    GetErrText { code: i16 },
    GetVStr { name: &'a str },
    CarrierDetect,
    TcpOpen(OpenRequest),
    TcpClose { handle: Handle, timeout: i16 },
    TcpSend { handle: Handle, data: &'a [u8] },
    TcpWaitState { handle: Handle, state: i16, timeout: i16 },
    TcpAckWait { handle: Handle, timeout: i16 },
    UdpOpen { remote_host: u32, remote_port: u16 },
    UdpClose { handle: Handle },
    UdpSend { handle: Handle, data: &'a [u8] },
    CnKick { handle: Handle },
    CnByteCount { handle: Handle },
    CnGetChar { handle: Handle },
    CnGetNdb { handle: Handle },
    CnGetBlock { handle: Handle, buf: &'a mut [u8] },
    Housekeep,
    Resolve {
        name: &'a str,
        canonical: Option<&'a mut String>,
        addresses: &'a mut [u32],
    },
    SerDisable,
    SerEnable,
    SetFlag { flag: i16 },
    ClearFlag { flag: i16 },
    CnGetInfo { handle: Handle },
    OnPort { port: &'a str },
    OffPort { port: &'a str },
    SetVStr { name: &'a str, value: &'a str },
    QueryPort { port: &'a str },
    CnGets { handle: Handle, buf: &'a mut [u8], delimiter: u8 },
    IcmpSend { destination: u32, data: &'a [u8] },
    IcmpHandler { install: bool },
    IcmpDiscard(Option<NetworkBlock>),
    TcpInfo { handle: Handle },
    CntrlPort { port: &'a str },
    UdpInfo { handle: Handle },
    RawOpen { protocol: u8 },
    RawClose { handle: Handle },
    RawOut { handle: Handle, data: &'a [u8] },
    CnSetopt { handle: Handle, option: i16 },
    CnGetopt { handle: Handle, option: i16 },
    CnFreeNdb(Option<NetworkBlock>),
    Reserved(usize),
}

impl Call<'_> {
    /// Table position this call belongs to
    pub fn ordinal(&self) -> usize {
        match self {
            Call::KrMalloc { .. } => 0,
            Call::KrFree { .. } => 1,
            Call::KrGetFree { .. } => 2,
            Call::KrRealloc { .. } => 3,
            Call::GetErrText { .. } => 4,
            Call::GetVStr { .. } => 5,
            Call::CarrierDetect => 6,
            Call::TcpOpen(_) => 7,
            Call::TcpClose { .. } => 8,
            Call::TcpSend { .. } => 9,
            Call::TcpWaitState { .. } => 10,
            Call::TcpAckWait { .. } => 11,
            Call::UdpOpen { .. } => 12,
            Call::UdpClose { .. } => 13,
            Call::UdpSend { .. } => 14,
            Call::CnKick { .. } => 15,
            Call::CnByteCount { .. } => 16,
            Call::CnGetChar { .. } => 17,
            Call::CnGetNdb { .. } => 18,
            Call::CnGetBlock { .. } => 19,
            Call::Housekeep => 20,
            Call::Resolve { .. } => 21,
            Call::SerDisable => 22,
            Call::SerEnable => 23,
            Call::SetFlag { .. } => 24,
            Call::ClearFlag { .. } => 25,
            Call::CnGetInfo { .. } => 26,
            Call::OnPort { .. } => 27,
            Call::OffPort { .. } => 28,
            Call::SetVStr { .. } => 29,
            Call::QueryPort { .. } => 30,
            Call::CnGets { .. } => 31,
            Call::IcmpSend { .. } => 32,
            Call::IcmpHandler { .. } => 33,
            Call::IcmpDiscard(_) => 34,
            Call::TcpInfo { .. } => 35,
            Call::CntrlPort { .. } => 36,
            Call::UdpInfo { .. } => 37,
            Call::RawOpen { .. } => 38,
            Call::RawClose { .. } => 39,
            Call::RawOut { .. } => 40,
            Call::CnSetopt { .. } => 41,
            Call::CnGetopt { .. } => 42,
            Call::CnFreeNdb(_) => 43,
            Call::Reserved(slot) => FIRST_RESERVED_SLOT + slot,
        }
    }
}

/// Result of one table invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The signed 16-bit return slot
    Status(i16),
    /// `KRgetfree`
    Size(i32),
    /// `KRmalloc`/`KRrealloc`: `None` is the null block
    Block(Option<BlockRef>),
    /// `get_err_text`/`getvstr`
    Text(Cow<'static, str>),
    /// `CNgetinfo`: `Err(E_BADHANDLE)` stands in for the legacy sentinel pointer
    Info(Result<InfoRef, ErrorCode>),
    /// `CNget_NDB`
    Packet(Option<NetworkBlock>),
    /// Entries without a result
    Unit,
}

impl Reply {
    /// The value a caller would see in the 16-bit return slot
    ///
    /// Non-status replies report `E_NORMAL`, except a failed info lookup
    /// which reports its sentinel code.
    pub fn status(&self) -> i16 {
        match self {
            Reply::Status(status) => *status,
            Reply::Info(Err(code)) => code.raw(),
            _ => ErrorCode::NORMAL.raw(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Reply::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_info(self) -> Option<Result<InfoRef, ErrorCode>> {
        match self {
            Reply::Info(info) => Some(info),
            _ => None,
        }
    }

    pub fn into_packet(self) -> Option<NetworkBlock> {
        match self {
            Reply::Packet(packet) => packet,
            _ => None,
        }
    }
}
