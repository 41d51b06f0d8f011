/*!
 * Capability Table Tests
 * Layout, lookup and end-to-end calls through table positions
 */

mod common;

use common::FakeEngine;
use pretty_assertions::assert_eq;
use std::net::Ipv4Addr;
use std::sync::Arc;
use stik_shim::table::ENTRIES;
use stik_shim::{
    BudgetAllocator, Call, CapabilityTable, ConnectionBlock, ErrorCode, FlagStore, OpenRequest,
    Reply, TcpState, Transport, TCP_ACTIVE,
};

const LAYOUT: [&str; 48] = [
    "KRmalloc", "KRfree", "KRgetfree", "KRrealloc", "get_err_text", "getvstr",
    "carrier_detect", "TCP_open", "TCP_close", "TCP_send", "TCP_wait_state", "TCP_ack_wait",
    "UDP_open", "UDP_close", "UDP_send", "CNkick", "CNbyte_count", "CNget_char", "CNget_NDB",
    "CNget_block", "housekeep", "resolve", "ser_disable", "ser_enable", "set_flag",
    "clear_flag", "CNgetinfo", "on_port", "off_port", "setvstr", "query_port", "CNgets",
    "ICMP_send", "ICMP_handler", "ICMP_discard", "TCP_info", "cntrl_port", "UDP_info",
    "RAW_open", "RAW_close", "RAW_out", "CN_setopt", "CN_getopt", "CNfree_NDB",
    "reserved1", "reserved2", "reserved3", "reserved4",
];

fn table() -> (Arc<FakeEngine>, CapabilityTable) {
    let engine = FakeEngine::new(16);
    let transport = Transport::new(
        engine.clone(),
        Arc::new(BudgetAllocator::new(2048)),
        Arc::new(FlagStore::standalone()),
    );
    (engine, CapabilityTable::new(transport))
}

#[test]
fn test_layout_is_fixed() {
    let names: Vec<&str> = ENTRIES.iter().map(|entry| entry.name).collect();
    assert_eq!(names, LAYOUT.to_vec());
}

#[test]
fn test_call_variants_match_positions() {
    let (_, table) = table();
    let mut buf = [0u8; 4];
    let mut addrs = [0u32; 1];
    let calls = vec![
        Call::KrMalloc { size: 1 },
        Call::KrFree { block: 0 },
        Call::KrGetFree { flag: 0 },
        Call::KrRealloc { block: 0, size: 0 },
        Call::GetErrText { code: 0 },
        Call::GetVStr { name: "X" },
        Call::CarrierDetect,
        Call::TcpOpen(OpenRequest::new(0u32, 1)),
        Call::TcpClose { handle: 0, timeout: 0 },
        Call::TcpSend { handle: 0, data: b"" },
        Call::TcpWaitState { handle: 0, state: 0, timeout: 0 },
        Call::TcpAckWait { handle: 0, timeout: 0 },
        Call::UdpOpen { remote_host: 0, remote_port: 0 },
        Call::UdpClose { handle: 0 },
        Call::UdpSend { handle: 0, data: b"" },
        Call::CnKick { handle: 0 },
        Call::CnByteCount { handle: 0 },
        Call::CnGetChar { handle: 0 },
        Call::CnGetNdb { handle: 0 },
        Call::CnGetBlock { handle: 0, buf: &mut buf },
        Call::Housekeep,
        Call::Resolve { name: "x", canonical: None, addresses: &mut addrs },
        Call::SerDisable,
        Call::SerEnable,
        Call::SetFlag { flag: 0 },
        Call::ClearFlag { flag: 0 },
        Call::CnGetInfo { handle: 0 },
        Call::OnPort { port: "" },
        Call::OffPort { port: "" },
        Call::SetVStr { name: "X", value: "" },
        Call::QueryPort { port: "" },
    ];

    for (ordinal, call) in calls.into_iter().enumerate() {
        assert_eq!(call.ordinal(), ordinal);
        assert_eq!(table.entries()[ordinal].name, LAYOUT[ordinal]);
    }
}

#[test]
fn test_table_identity() {
    let (_, table) = table();
    assert_eq!(table.module(), "TRANSPORT_TCPIP");
    assert_eq!(table.version(), "01.13");
    assert_eq!(table.position("CNgetinfo"), Some(26));
    assert_eq!(table.position("nonexistent"), None);
}

#[test]
fn test_inert_slots_through_table() {
    let (_, table) = table();
    let expected = [
        (6, Call::CarrierDetect, 0),
        (11, Call::TcpAckWait { handle: 1, timeout: 5 }, 0),
        (15, Call::CnKick { handle: 1 }, 0),
        (27, Call::OnPort { port: "Modem 1" }, -26),
        (30, Call::QueryPort { port: "Modem 1" }, -26),
        (32, Call::IcmpSend { destination: 0x7F00_0001, data: b"ping" }, -26),
        (33, Call::IcmpHandler { install: true }, 0),
        (35, Call::TcpInfo { handle: 1 }, -9),
        (36, Call::CntrlPort { port: "Modem 1" }, -2),
        (37, Call::UdpInfo { handle: 1 }, -9),
        (38, Call::RawOpen { protocol: 1 }, -26),
        (39, Call::RawClose { handle: 1 }, -9),
        (40, Call::RawOut { handle: 1, data: b"" }, -9),
        (41, Call::CnSetopt { handle: 1, option: 1 }, -26),
        (42, Call::CnGetopt { handle: 1, option: 1 }, -26),
    ];

    for (ordinal, call, status) in expected {
        assert_eq!(table.call(ordinal, call), Reply::Status(status), "slot {ordinal}");
    }
    for slot in 0..4 {
        assert_eq!(table.dispatch(Call::Reserved(slot)).status(), -26);
    }
    for call in [Call::Housekeep, Call::SerDisable, Call::SerEnable, Call::OffPort { port: "x" }] {
        assert_eq!(table.dispatch(call), Reply::Unit);
    }
    assert_eq!(table.dispatch(Call::IcmpDiscard(None)), Reply::Unit);
    assert_eq!(table.dispatch(Call::CnFreeNdb(None)), Reply::Unit);
}

#[test]
fn test_tcp_session_through_table() {
    let (engine, table) = table();
    let block = ConnectionBlock {
        remote_host: Ipv4Addr::new(10, 0, 0, 1),
        remote_port: 80,
        local_host: Ipv4Addr::new(10, 0, 0, 2),
        local_port: 5000,
    };

    let handle = table
        .dispatch(Call::TcpOpen(OpenRequest::with_block(0x0004_0000, TCP_ACTIVE, block)))
        .status();
    assert!(handle > 0);

    let info = table
        .dispatch(Call::CnGetInfo { handle })
        .into_info()
        .unwrap()
        .unwrap();
    assert_eq!(info.state, TcpState::Established);
    assert_eq!(info.local_port, 5000);

    assert_eq!(
        table.dispatch(Call::TcpWaitState { handle, state: 4, timeout: 1 }).status(),
        0
    );
    assert_eq!(table.dispatch(Call::TcpSend { handle, data: b"hello" }).status(), 5);
    assert_eq!(engine.sent(handle), b"hello");

    engine.push_incoming(handle, b"hi\r\n");
    assert_eq!(table.dispatch(Call::CnByteCount { handle }).status(), 4);
    assert_eq!(table.dispatch(Call::CnGetChar { handle }).status(), i16::from(b'h'));

    let mut line = [0u8; 8];
    let n = table
        .dispatch(Call::CnGets { handle, buf: &mut line, delimiter: b'\n' })
        .status();
    assert_eq!(&line[..n as usize], b"i\r");
    assert_eq!(table.dispatch(Call::CnGetChar { handle }).status(), -2);

    assert_eq!(table.dispatch(Call::TcpClose { handle, timeout: 0 }).status(), 0);
    assert_eq!(
        table.dispatch(Call::CnGetInfo { handle }).into_info().unwrap(),
        Err(ErrorCode::BADHANDLE)
    );
    assert_eq!(engine.outstanding(), 0);
}

#[test]
fn test_udp_session_through_table() {
    let (engine, table) = table();

    let handle = table
        .dispatch(Call::UdpOpen { remote_host: 0xC000_0235, remote_port: 53 })
        .status();
    assert!(handle > 0);
    assert_eq!(table.dispatch(Call::UdpSend { handle, data: b"query" }).status(), 5);

    engine.push_incoming(handle, b"answer");
    let packet = table.dispatch(Call::CnGetNdb { handle }).into_packet().unwrap();
    assert_eq!(packet.data, b"answer");
    assert_eq!(table.dispatch(Call::CnFreeNdb(Some(packet))), Reply::Unit);

    let mut block = [0u8; 4];
    assert_eq!(table.dispatch(Call::CnGetBlock { handle, buf: &mut block }).status(), 0);
    assert_eq!(table.dispatch(Call::UdpClose { handle }).status(), 0);
}

#[test]
fn test_error_text_and_variables() {
    let (_, table) = table();

    let reply = table.dispatch(Call::GetErrText { code: -7 });
    assert_eq!(reply.text(), Some("Connection refused by remote"));
    let reply = table.dispatch(Call::GetErrText { code: 5000 });
    assert_eq!(reply.text(), Some("Unrecognized error"));

    assert_eq!(table.dispatch(Call::GetVStr { name: "HOSTNAME" }).text(), Some("0"));
    assert_eq!(
        table.dispatch(Call::SetVStr { name: "HOSTNAME", value: "falcon" }).status(),
        1
    );
    assert_eq!(
        table.dispatch(Call::GetVStr { name: "HOSTNAME" }).text(),
        Some("falcon")
    );
    assert_eq!(table.dispatch(Call::SetVStr { name: "", value: "x" }).status(), 0);
}

#[test]
fn test_resolve_through_table() {
    let (_, table) = table();

    let mut canonical = String::new();
    let mut addrs = [0u32; 2];
    let status = table
        .dispatch(Call::Resolve {
            name: "multi.example",
            canonical: Some(&mut canonical),
            addresses: &mut addrs,
        })
        .status();
    assert_eq!(status, 2);
    assert_eq!(addrs, [0xC000_0201, 0xC000_0202]);
    assert!(canonical.is_empty());

    let mut addrs = [0u32; 2];
    let status = table
        .dispatch(Call::Resolve { name: "nowhere", canonical: None, addresses: &mut addrs })
        .status();
    assert_eq!(status, ErrorCode::CANTRESOLVE.raw());
}

#[test]
fn test_allocator_through_table() {
    let (_, table) = table();

    let Reply::Block(Some(block)) = table.dispatch(Call::KrMalloc { size: 512 }) else {
        panic!("KRmalloc refused a fitting request");
    };
    assert_eq!(table.dispatch(Call::KrMalloc { size: 4096 }), Reply::Block(None));
    assert_eq!(table.dispatch(Call::KrGetFree { flag: 0 }), Reply::Size(1536));

    let Reply::Block(Some(grown)) = table.dispatch(Call::KrRealloc { block, size: 1024 }) else {
        panic!("KRrealloc refused a fitting request");
    };
    assert_eq!(table.dispatch(Call::KrGetFree { flag: 1 }), Reply::Size(1024));
    assert_eq!(table.dispatch(Call::KrRealloc { block: grown, size: 0 }), Reply::Block(None));
    assert_eq!(table.dispatch(Call::KrGetFree { flag: 1 }), Reply::Size(2048));
}
