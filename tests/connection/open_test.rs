/*!
 * Open Request Tests
 * The three TCP_open shapes and descriptor accounting
 */

use crate::common::FakeEngine;
use pretty_assertions::assert_eq;
use std::net::Ipv4Addr;
use std::time::Duration;
use stik_shim::{
    ConnectionBlock, ConnectionManager, Endpoints, ErrorCode, OpenRequest, TcpState, TCP_ACTIVE,
    TCP_PASSIVE,
};

#[test]
fn test_passive_open_listens_on_port() {
    let engine = FakeEngine::new(8);
    let manager = ConnectionManager::new(engine.clone());

    let handle = manager.open(&OpenRequest::new(0u32, 8080)).unwrap();

    assert_eq!(
        engine.connects(),
        vec![(
            handle,
            Endpoints {
                local_host: Ipv4Addr::UNSPECIFIED,
                local_port: 8080,
                remote_host: Ipv4Addr::UNSPECIFIED,
                remote_port: 0,
            }
        )]
    );
    assert_eq!(manager.get_info(handle).unwrap().state, TcpState::Listen);
}

#[test]
fn test_parameter_block_open_uses_exact_tuple() {
    let engine = FakeEngine::new(8);
    let manager = ConnectionManager::new(engine.clone());
    let block = ConnectionBlock {
        remote_host: Ipv4Addr::new(10, 0, 0, 1),
        remote_port: 80,
        local_host: Ipv4Addr::new(10, 0, 0, 2),
        local_port: 5000,
    };

    for mode in [TCP_ACTIVE, TCP_PASSIVE] {
        let handle = manager
            .open(&OpenRequest::with_block(0x0010_0000, mode, block))
            .unwrap();
        let (_, endpoints) = *engine.connects().last().unwrap();

        assert_eq!(endpoints.remote_host, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(endpoints.remote_port, 80);
        assert_eq!(endpoints.local_host, Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(endpoints.local_port, 5000);
        manager.close(handle);
    }
}

#[test]
fn test_active_open_uses_any_local() {
    let engine = FakeEngine::new(8);
    let manager = ConnectionManager::new(engine.clone());

    manager
        .open(&OpenRequest::new(Ipv4Addr::new(192, 0, 2, 7), 23))
        .unwrap();

    let (_, endpoints) = engine.connects()[0];
    assert_eq!(endpoints.remote_host, Ipv4Addr::new(192, 0, 2, 7));
    assert_eq!(endpoints.remote_port, 23);
    assert_eq!(endpoints.local_host, Ipv4Addr::UNSPECIFIED);
    assert_eq!(endpoints.local_port, 0);
}

#[test]
fn test_sentinel_without_block_is_rejected() {
    let engine = FakeEngine::new(8);
    let manager = ConnectionManager::new(engine.clone());

    let result = manager.open(&OpenRequest::new(0x0A00_0001u32, TCP_PASSIVE));

    assert_eq!(result, Err(ErrorCode::PARAMETER));
    assert!(engine.connects().is_empty());
    assert_eq!(engine.outstanding(), 0);
}

#[test]
fn test_failed_connect_releases_descriptor() {
    let engine = FakeEngine::new(1);
    let manager = ConnectionManager::new(engine.clone());
    engine.fail_connect_with(ErrorCode::REFUSE);

    for _ in 0..5 {
        let result = manager.open(&OpenRequest::new(Ipv4Addr::new(10, 0, 0, 1), 80));
        assert_eq!(result, Err(ErrorCode::REFUSE));
        assert_eq!(engine.outstanding(), 0);
    }
}

#[test]
fn test_exhausted_pool_skips_connect() {
    let engine = FakeEngine::new(1);
    let manager = ConnectionManager::new(engine.clone());
    manager.open(&OpenRequest::new(0u32, 21)).unwrap();

    let result = manager.open(&OpenRequest::new(0u32, 22));

    assert_eq!(result, Err(ErrorCode::NOCCB));
    assert_eq!(engine.connects().len(), 1);
}

#[test]
fn test_close_always_normal() {
    let engine = FakeEngine::new(4);
    let manager = ConnectionManager::new(engine.clone());
    let handle = manager.open(&OpenRequest::new(0u32, 8080)).unwrap();

    assert_eq!(manager.close(handle), ErrorCode::NORMAL);
    assert_eq!(manager.close(handle), ErrorCode::NORMAL);
    assert_eq!(engine.outstanding(), 0);
    assert_eq!(manager.get_info(handle), Err(ErrorCode::BADHANDLE));
}

#[test]
fn test_udp_open_and_failure() {
    let engine = FakeEngine::new(4);
    let manager = ConnectionManager::new(engine.clone());

    let handle = manager.udp_open(Ipv4Addr::new(192, 0, 2, 53), 53).unwrap();
    let info = manager.get_info(handle).unwrap();
    assert_eq!(info.protocol, 17);
    assert_eq!(info.remote_port, 53);
    assert_eq!(manager.udp_close(handle), 0);

    engine.fail_connect_with(ErrorCode::UNREACHABLE);
    assert_eq!(
        manager.udp_open(Ipv4Addr::new(192, 0, 2, 53), 53),
        Err(ErrorCode::UNREACHABLE)
    );
    assert_eq!(engine.outstanding(), 0);
}

#[test]
fn test_wait_state_passthrough() {
    let engine = FakeEngine::new(4);
    let manager = ConnectionManager::new(engine.clone());
    let handle = manager.open(&OpenRequest::new(0u32, 8080)).unwrap();

    assert_eq!(manager.wait_state(handle, Duration::from_secs(1)), Ok(()));
    assert_eq!(
        manager.wait_state(handle + 100, Duration::from_secs(1)),
        Err(ErrorCode::BADHANDLE)
    );
}
