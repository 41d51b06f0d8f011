/*!
 * Transfer Façade Tests
 */

use crate::common::FakeEngine;
use pretty_assertions::assert_eq;
use std::net::Ipv4Addr;
use stik_shim::{ConnectionManager, DataTransfer, ErrorCode, OpenRequest};

fn connected() -> (std::sync::Arc<FakeEngine>, DataTransfer, i16) {
    let engine = FakeEngine::new(4);
    let manager = ConnectionManager::new(engine.clone());
    let handle = manager
        .open(&OpenRequest::new(Ipv4Addr::new(10, 0, 0, 1), 80))
        .unwrap();
    (engine.clone(), DataTransfer::new(engine), handle)
}

#[test]
fn test_send_forwards_bytes() {
    let (engine, transfer, handle) = connected();

    assert_eq!(transfer.send(handle, b"GET / HTTP/1.0\r\n\r\n"), Ok(18));
    assert_eq!(engine.sent(handle), b"GET / HTTP/1.0\r\n\r\n");
}

#[test]
fn test_oversized_send_is_windowed() {
    let (engine, transfer, handle) = connected();
    let payload = vec![0x55u8; 40_000];

    assert_eq!(transfer.send(handle, &payload), Ok(32767));
    assert_eq!(engine.sent(handle).len(), 32767);
}

#[test]
fn test_receive_byte() {
    let (engine, transfer, handle) = connected();

    assert_eq!(transfer.receive_byte(handle), Err(ErrorCode::NODATA));

    engine.push_incoming(handle, &[0xFF, b'A']);
    assert_eq!(transfer.receive_byte(handle), Ok(0xFF));
    assert_eq!(transfer.receive_byte(handle), Ok(b'A'));
    assert_eq!(transfer.receive_byte(handle), Err(ErrorCode::NODATA));
    assert_eq!(transfer.receive_byte(99), Err(ErrorCode::BADHANDLE));
}

#[test]
fn test_pending_count_clamped() {
    let (engine, transfer, handle) = connected();

    engine.push_incoming(handle, b"abc");
    assert_eq!(transfer.pending_count(handle), Ok(3));

    engine.set_pending(handle, 100_000);
    assert_eq!(transfer.pending_count(handle), Ok(32767));
}

#[test]
fn test_receive_block_and_delimited() {
    let (engine, transfer, handle) = connected();
    engine.push_incoming(handle, b"USER atari\nPASS st\n");

    let mut line = [0u8; 32];
    let n = transfer.receive_delimited(handle, &mut line, b'\n').unwrap();
    assert_eq!(&line[..n as usize], b"USER atari");

    let mut small = [0u8; 2];
    assert_eq!(
        transfer.receive_delimited(handle, &mut small, b'\n'),
        Err(ErrorCode::BIGBUF)
    );

    let mut block = [0u8; 4];
    assert_eq!(transfer.receive_block(handle, &mut block), Ok(4));
    assert_eq!(&block, b"PASS");
}

#[test]
fn test_receive_packet() {
    let (engine, transfer, handle) = connected();
    assert!(transfer.receive_packet(handle).is_none());

    engine.push_incoming(handle, b"datagram");
    let block = transfer.receive_packet(handle).unwrap();
    assert_eq!(block.data, b"datagram");
    assert!(transfer.receive_packet(handle).is_none());
}
