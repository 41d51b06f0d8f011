/*!
 * Shared test fixtures
 * In-memory socket engine with descriptor-pool accounting
 */

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use stik_shim::core::types::{PROTO_TCP, PROTO_UDP};
use stik_shim::{
    ConnectionInfo, Endpoints, ErrorCode, Handle, InfoRef, NetworkBlock, Resolution,
    SocketEngine, TcpState,
};

#[derive(Default)]
struct FakeConnection {
    info: Option<InfoRef>,
    inbox: VecDeque<u8>,
    outbox: Vec<u8>,
    pending_override: Option<usize>,
}

#[derive(Default)]
struct FakeState {
    next: Handle,
    open: HashMap<Handle, FakeConnection>,
    connects: Vec<(Handle, Endpoints)>,
    connect_failure: Option<ErrorCode>,
    variables: HashMap<String, String>,
}

/// Socket engine that keeps everything in memory
pub struct FakeEngine {
    capacity: usize,
    state: Mutex<FakeState>,
}

impl FakeEngine {
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            capacity,
            state: Mutex::new(FakeState {
                next: 1,
                ..Default::default()
            }),
        })
    }

    /// Every subsequent connect/udp_bind fails with `code`
    pub fn fail_connect_with(&self, code: ErrorCode) {
        self.state.lock().connect_failure = Some(code);
    }

    /// Descriptors currently taken from the pool
    pub fn outstanding(&self) -> usize {
        self.state.lock().open.len()
    }

    pub fn connects(&self) -> Vec<(Handle, Endpoints)> {
        self.state.lock().connects.clone()
    }

    pub fn push_incoming(&self, handle: Handle, data: &[u8]) {
        if let Some(conn) = self.state.lock().open.get_mut(&handle) {
            conn.inbox.extend(data);
        }
    }

    pub fn set_pending(&self, handle: Handle, count: usize) {
        if let Some(conn) = self.state.lock().open.get_mut(&handle) {
            conn.pending_override = Some(count);
        }
    }

    pub fn sent(&self, handle: Handle) -> Vec<u8> {
        self.state
            .lock()
            .open
            .get(&handle)
            .map(|conn| conn.outbox.clone())
            .unwrap_or_default()
    }

    fn bind(&self, handle: Handle, info: ConnectionInfo) -> Result<(), ErrorCode> {
        let mut state = self.state.lock();
        if let Some(code) = state.connect_failure {
            return Err(code);
        }
        let conn = state.open.get_mut(&handle).ok_or(ErrorCode::BADHANDLE)?;
        conn.info = Some(Arc::new(info));
        Ok(())
    }
}

impl SocketEngine for FakeEngine {
    fn open_descriptor(&self) -> Result<Handle, ErrorCode> {
        let mut state = self.state.lock();
        if state.open.len() >= self.capacity {
            return Err(ErrorCode::NOCCB);
        }
        let handle = state.next;
        state.next += 1;
        state.open.insert(handle, FakeConnection::default());
        Ok(handle)
    }

    fn connect(&self, handle: Handle, endpoints: Endpoints) -> Result<(), ErrorCode> {
        self.state.lock().connects.push((handle, endpoints));
        let state = if endpoints.is_passive() {
            TcpState::Listen
        } else {
            TcpState::Established
        };
        self.bind(
            handle,
            ConnectionInfo {
                protocol: PROTO_TCP,
                local_port: endpoints.local_port,
                remote_port: endpoints.remote_port,
                remote_host: endpoints.remote_host,
                local_host: endpoints.local_host,
                state,
            },
        )
    }

    fn udp_bind(&self, handle: Handle, remote_host: Ipv4Addr, remote_port: u16) -> Result<(), ErrorCode> {
        self.bind(
            handle,
            ConnectionInfo {
                protocol: PROTO_UDP,
                local_port: 40000,
                remote_port,
                remote_host,
                local_host: Ipv4Addr::LOCALHOST,
                state: TcpState::Established,
            },
        )
    }

    fn close(&self, handle: Handle) {
        self.state.lock().open.remove(&handle);
    }

    fn read(&self, handle: Handle, buf: &mut [u8]) -> Result<usize, ErrorCode> {
        let mut state = self.state.lock();
        let conn = state.open.get_mut(&handle).ok_or(ErrorCode::BADHANDLE)?;
        let n = buf.len().min(conn.inbox.len());
        for (slot, byte) in buf.iter_mut().zip(conn.inbox.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&self, handle: Handle, data: &[u8]) -> Result<usize, ErrorCode> {
        let mut state = self.state.lock();
        let conn = state.open.get_mut(&handle).ok_or(ErrorCode::BADHANDLE)?;
        conn.outbox.extend_from_slice(data);
        Ok(data.len())
    }

    fn read_until(&self, handle: Handle, buf: &mut [u8], delimiter: u8) -> Result<usize, ErrorCode> {
        let mut state = self.state.lock();
        let conn = state.open.get_mut(&handle).ok_or(ErrorCode::BADHANDLE)?;
        let line_len = conn
            .inbox
            .iter()
            .position(|&b| b == delimiter)
            .ok_or(ErrorCode::NODATA)?;
        if line_len > buf.len() {
            return Err(ErrorCode::BIGBUF);
        }
        let line: Vec<u8> = conn.inbox.drain(..=line_len).collect();
        buf[..line_len].copy_from_slice(&line[..line_len]);
        Ok(line_len)
    }

    fn read_packet(&self, handle: Handle) -> Option<NetworkBlock> {
        let mut state = self.state.lock();
        let conn = state.open.get_mut(&handle)?;
        if conn.inbox.is_empty() {
            return None;
        }
        Some(NetworkBlock {
            data: conn.inbox.drain(..).collect(),
        })
    }

    fn pending_bytes(&self, handle: Handle) -> Result<usize, ErrorCode> {
        let state = self.state.lock();
        let conn = state.open.get(&handle).ok_or(ErrorCode::BADHANDLE)?;
        Ok(conn.pending_override.unwrap_or(conn.inbox.len()))
    }

    fn wait(&self, handle: Handle, _timeout: Duration) -> Result<(), ErrorCode> {
        let state = self.state.lock();
        match state.open.get(&handle) {
            Some(conn) if conn.info.is_some() => Ok(()),
            Some(_) => Err(ErrorCode::NOCONNECTION),
            None => Err(ErrorCode::BADHANDLE),
        }
    }

    fn lookup_connection(&self, handle: Handle) -> Option<InfoRef> {
        self.state.lock().open.get(&handle).and_then(|conn| conn.info.clone())
    }

    fn resolve(&self, name: &str, max_addresses: usize) -> Result<Resolution, ErrorCode> {
        match name {
            "localhost" => Ok(Resolution {
                canonical_name: Some("localhost.localdomain".into()),
                addresses: vec![Ipv4Addr::LOCALHOST; 1.min(max_addresses)],
            }),
            "multi.example" => Ok(Resolution {
                canonical_name: None,
                addresses: (1..=4)
                    .map(|i| Ipv4Addr::new(192, 0, 2, i))
                    .take(max_addresses)
                    .collect(),
            }),
            _ => Err(ErrorCode::CANTRESOLVE),
        }
    }

    fn get_variable(&self, name: &str) -> Option<String> {
        self.state.lock().variables.get(name).cloned()
    }

    fn set_variable(&self, name: &str, value: &str) -> Result<(), ErrorCode> {
        if name.is_empty() {
            return Err(ErrorCode::PARAMETER);
        }
        self.state
            .lock()
            .variables
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}
