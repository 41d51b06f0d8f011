/*!
 * Std Socket Engine
 * `std::net` sockets behind legacy descriptors
 */

use super::traits::SocketEngine;
use crate::config::ShimConfig;
use crate::core::codes::ErrorCode;
use crate::core::limits::{
    ACCEPT_POLL_INTERVAL, FIRST_DESCRIPTOR, MAX_DATAGRAM, MAX_DESCRIPTORS, PENDING_PEEK_LIMIT,
};
use crate::core::types::{
    ConnectionInfo, Endpoints, Handle, InfoRef, NetworkBlock, Resolution, TcpState, PROTO_TCP,
    PROTO_UDP,
};
use crate::monitoring::span_operation;
use ahash::RandomState;
use crossbeam_queue::SegQueue;
use dashmap::DashMap;
use nix::sys::socket::{self, MsgFlags};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{
    IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener, TcpStream, ToSocketAddrs, UdpSocket,
};
use std::os::fd::AsRawFd;
use std::sync::atomic::{AtomicI16, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Map an I/O error onto the legacy code space
pub fn io_error_code(err: &io::Error) -> ErrorCode {
    match err.kind() {
        ErrorKind::ConnectionRefused => ErrorCode::REFUSE,
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => ErrorCode::RRESET,
        ErrorKind::TimedOut => ErrorCode::CNTIMEOUT,
        ErrorKind::WouldBlock => ErrorCode::NODATA,
        ErrorKind::UnexpectedEof => ErrorCode::EOF,
        ErrorKind::NotConnected => ErrorCode::NOCONNECTION,
        ErrorKind::InvalidInput => ErrorCode::PARAMETER,
        _ => match err.raw_os_error() {
            Some(errno) if is_unreachable(errno) => ErrorCode::UNREACHABLE,
            Some(errno) => ErrorCode::from_os_errno(errno),
            None => ErrorCode::CONNECTFAIL,
        },
    }
}

fn is_unreachable(errno: i32) -> bool {
    errno == nix::errno::Errno::EHOSTUNREACH as i32
        || errno == nix::errno::Errno::ENETUNREACH as i32
}

/// What a descriptor currently carries; the variant is the type tag
#[derive(Debug)]
enum Socket {
    Unbound,
    Listener(TcpListener),
    Stream(TcpStream),
    Udp(UdpSocket),
}

impl Socket {
    fn type_name(&self) -> &'static str {
        match self {
            Socket::Unbound => "Unbound",
            Socket::Listener(_) => "TcpListener",
            Socket::Stream(_) => "TcpStream",
            Socket::Udp(_) => "UdpSocket",
        }
    }

    /// A second owner of the same OS socket, so I/O runs without holding the table
    fn try_clone(&self) -> io::Result<Socket> {
        Ok(match self {
            Socket::Unbound => Socket::Unbound,
            Socket::Listener(listener) => Socket::Listener(listener.try_clone()?),
            Socket::Stream(stream) => Socket::Stream(stream.try_clone()?),
            Socket::Udp(socket) => Socket::Udp(socket.try_clone()?),
        })
    }
}

#[derive(Debug)]
struct Slot {
    socket: Socket,
    info: Option<InfoRef>,
}

fn v4(addr: SocketAddr) -> (Ipv4Addr, u16) {
    match addr.ip() {
        IpAddr::V4(ip) => (ip, addr.port()),
        IpAddr::V6(ip) => (ip.to_ipv4_mapped().unwrap_or(Ipv4Addr::UNSPECIFIED), addr.port()),
    }
}

fn stream_info(stream: &TcpStream) -> io::Result<ConnectionInfo> {
    let (local_host, local_port) = v4(stream.local_addr()?);
    let (remote_host, remote_port) = v4(stream.peer_addr()?);
    Ok(ConnectionInfo {
        protocol: PROTO_TCP,
        local_port,
        remote_port,
        remote_host,
        local_host,
        state: TcpState::Established,
    })
}

/// Peek without blocking and without touching the socket's mode
///
/// The descriptor's file status is shared with every clone of the stream,
/// so toggling `O_NONBLOCK` here would leak into concurrent writers.
fn peek_now(stream: &TcpStream, buf: &mut [u8]) -> io::Result<usize> {
    socket::recv(
        stream.as_raw_fd(),
        buf,
        MsgFlags::MSG_PEEK | MsgFlags::MSG_DONTWAIT,
    )
    .map_err(io::Error::from)
}

/// Bytes readable right now; `Ok(None)` when the peer has closed
fn peek_pending(stream: &TcpStream, limit: usize) -> io::Result<Option<usize>> {
    let mut window = vec![0u8; limit.max(1)];
    match peek_now(stream, &mut window) {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(Some(0)),
        Err(e) => Err(e),
    }
}

/// Socket engine over the host's `std::net` stack
///
/// # Design
/// - One `DashMap` holds every descriptor, whatever it carries
/// - Released descriptors go to a lock-free `SegQueue` and are handed out again
/// - Passive opens bind a listener; the first wait or read promotes it to the
///   accepted stream
/// - Reads never block: with nothing buffered they report `E_NODATA`
pub struct StdSocketEngine {
    next_handle: AtomicI16,
    free_handles: SegQueue<Handle>,
    sockets: DashMap<Handle, Slot, RandomState>,
    variables: DashMap<String, String, RandomState>,
    connect_timeout: Duration,
}

impl StdSocketEngine {
    pub fn new(config: &ShimConfig) -> Self {
        let span = span_operation("socket_engine_init");
        let _guard = span.enter();

        let variables = DashMap::with_hasher(RandomState::new());
        for (name, value) in &config.variables {
            variables.insert(name.clone(), value.clone());
        }
        debug!(
            variables = variables.len(),
            connect_timeout_ms = config.connect_timeout_ms,
            "std socket engine initialized"
        );
        span.record_result(true);

        Self {
            next_handle: AtomicI16::new(FIRST_DESCRIPTOR),
            free_handles: SegQueue::new(),
            sockets: DashMap::with_hasher(RandomState::new()),
            variables,
            connect_timeout: config.connect_timeout(),
        }
    }

    /// Number of descriptors currently handed out
    pub fn open_count(&self) -> usize {
        self.sockets.len()
    }

    fn allocate_handle(&self) -> Option<Handle> {
        if let Some(recycled) = self.free_handles.pop() {
            trace!(handle = recycled, "recycled descriptor");
            return Some(recycled);
        }

        let limit = FIRST_DESCRIPTOR as usize + MAX_DESCRIPTORS;
        let handle = self
            .next_handle
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                ((next as usize) < limit).then_some(next + 1)
            })
            .ok()?;
        trace!(handle, "allocated new descriptor");
        Some(handle)
    }

    fn socket(&self, handle: Handle) -> Result<Socket, ErrorCode> {
        let slot = self.sockets.get(&handle).ok_or(ErrorCode::BADHANDLE)?;
        slot.socket.try_clone().map_err(|e| io_error_code(&e))
    }

    fn install(&self, handle: Handle, socket: Socket, info: ConnectionInfo) -> Result<(), ErrorCode> {
        let mut slot = self.sockets.get_mut(&handle).ok_or(ErrorCode::BADHANDLE)?;
        trace!(handle, kind = socket.type_name(), "descriptor bound");
        slot.socket = socket;
        slot.info = Some(Arc::new(info));
        Ok(())
    }

    /// Accept on a listening descriptor, polling until `deadline`
    ///
    /// `None` tries exactly once. On success the descriptor carries the
    /// accepted stream from then on.
    fn promote(
        &self,
        handle: Handle,
        listener: &TcpListener,
        deadline: Option<Instant>,
    ) -> Result<Option<TcpStream>, ErrorCode> {
        loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    stream.set_nonblocking(false).map_err(|e| io_error_code(&e))?;
                    let info = stream_info(&stream).map_err(|e| io_error_code(&e))?;
                    let accepted = stream.try_clone().map_err(|e| io_error_code(&e))?;
                    self.install(handle, Socket::Stream(stream), info)?;
                    debug!(handle, %peer, "passive connection accepted");
                    return Ok(Some(accepted));
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => match deadline {
                    Some(deadline) if Instant::now() < deadline => {
                        std::thread::sleep(ACCEPT_POLL_INTERVAL)
                    }
                    _ => return Ok(None),
                },
                Err(e) => return Err(io_error_code(&e)),
            }
        }
    }

    /// The connected stream behind `handle`, accepting once if still listening
    fn stream(&self, handle: Handle) -> Result<Option<TcpStream>, ErrorCode> {
        match self.socket(handle)? {
            Socket::Stream(stream) => Ok(Some(stream)),
            Socket::Listener(listener) => self.promote(handle, &listener, None),
            Socket::Unbound | Socket::Udp(_) => Err(ErrorCode::NOCONNECTION),
        }
    }

    fn listen(&self, handle: Handle, endpoints: Endpoints) -> Result<(), ErrorCode> {
        let bind = SocketAddrV4::new(endpoints.local_host, endpoints.local_port);
        let listener = TcpListener::bind(bind).map_err(|e| io_error_code(&e))?;
        listener.set_nonblocking(true).map_err(|e| io_error_code(&e))?;

        let (local_host, local_port) = v4(listener.local_addr().map_err(|e| io_error_code(&e))?);
        let info = ConnectionInfo {
            protocol: PROTO_TCP,
            local_port,
            remote_port: 0,
            remote_host: Ipv4Addr::UNSPECIFIED,
            local_host,
            state: TcpState::Listen,
        };
        debug!(handle, local_port, "listening");
        self.install(handle, Socket::Listener(listener), info)
    }

    fn dial(&self, handle: Handle, endpoints: Endpoints) -> Result<(), ErrorCode> {
        let remote = SocketAddr::V4(SocketAddrV4::new(endpoints.remote_host, endpoints.remote_port));
        if endpoints.local_port != 0 || !endpoints.local_host.is_unspecified() {
            // std cannot bind before connecting; the OS picks the local side
            trace!(handle, local_port = endpoints.local_port, "local endpoint not honoured");
        }

        let stream = TcpStream::connect_timeout(&remote, self.connect_timeout)
            .map_err(|e| io_error_code(&e))?;
        let info = stream_info(&stream).map_err(|e| io_error_code(&e))?;
        self.install(handle, Socket::Stream(stream), info)
    }
}

impl SocketEngine for StdSocketEngine {
    fn open_descriptor(&self) -> Result<Handle, ErrorCode> {
        let handle = self.allocate_handle().ok_or_else(|| {
            warn!(limit = MAX_DESCRIPTORS, "descriptor pool exhausted");
            ErrorCode::NOCCB
        })?;
        self.sockets.insert(
            handle,
            Slot {
                socket: Socket::Unbound,
                info: None,
            },
        );
        Ok(handle)
    }

    fn connect(&self, handle: Handle, endpoints: Endpoints) -> Result<(), ErrorCode> {
        if endpoints.is_passive() {
            self.listen(handle, endpoints)
        } else {
            self.dial(handle, endpoints)
        }
    }

    fn udp_bind(&self, handle: Handle, remote_host: Ipv4Addr, remote_port: u16) -> Result<(), ErrorCode> {
        let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0))
            .map_err(|e| io_error_code(&e))?;
        socket
            .connect(SocketAddrV4::new(remote_host, remote_port))
            .map_err(|e| io_error_code(&e))?;
        socket.set_nonblocking(true).map_err(|e| io_error_code(&e))?;

        let (local_host, local_port) = v4(socket.local_addr().map_err(|e| io_error_code(&e))?);
        let info = ConnectionInfo {
            protocol: PROTO_UDP,
            local_port,
            remote_port,
            remote_host,
            local_host,
            state: TcpState::Established,
        };
        self.install(handle, Socket::Udp(socket), info)
    }

    fn close(&self, handle: Handle) {
        if let Some((_, slot)) = self.sockets.remove(&handle) {
            if let Socket::Stream(stream) = &slot.socket {
                let _ = stream.shutdown(std::net::Shutdown::Both);
            }
            trace!(handle, kind = slot.socket.type_name(), "descriptor closed");
            self.free_handles.push(handle);
        }
    }

    fn read(&self, handle: Handle, buf: &mut [u8]) -> Result<usize, ErrorCode> {
        if let Socket::Udp(socket) = self.socket(handle)? {
            return socket.recv(buf).map_err(|e| io_error_code(&e));
        }

        let mut stream = self.stream(handle)?.ok_or(ErrorCode::NODATA)?;
        if buf.is_empty() {
            return Ok(0);
        }
        let pending = peek_pending(&stream, buf.len())
            .map_err(|e| io_error_code(&e))?
            .ok_or(ErrorCode::EOF)?;
        if pending == 0 {
            return Err(ErrorCode::NODATA);
        }
        stream.read(&mut buf[..pending]).map_err(|e| io_error_code(&e))
    }

    fn write(&self, handle: Handle, data: &[u8]) -> Result<usize, ErrorCode> {
        match self.socket(handle)? {
            Socket::Udp(socket) => socket.send(data).map_err(|e| io_error_code(&e)),
            _ => {
                let mut stream = self.stream(handle)?.ok_or(ErrorCode::NOCONNECTION)?;
                stream.write_all(data).map_err(|e| io_error_code(&e))?;
                Ok(data.len())
            }
        }
    }

    fn read_until(&self, handle: Handle, buf: &mut [u8], delimiter: u8) -> Result<usize, ErrorCode> {
        let mut stream = self.stream(handle)?.ok_or(ErrorCode::NODATA)?;

        let mut window = vec![0u8; PENDING_PEEK_LIMIT];
        let peeked = match peek_now(&stream, &mut window) {
            Ok(0) => return Err(ErrorCode::EOF),
            Ok(n) => n,
            Err(e) => return Err(io_error_code(&e)),
        };

        let Some(line_len) = window[..peeked].iter().position(|&b| b == delimiter) else {
            return Err(if peeked >= buf.len() {
                ErrorCode::BIGBUF
            } else {
                ErrorCode::NODATA
            });
        };
        if line_len > buf.len() {
            return Err(ErrorCode::BIGBUF);
        }

        let mut line = vec![0u8; line_len + 1];
        stream.read_exact(&mut line).map_err(|e| io_error_code(&e))?;
        buf[..line_len].copy_from_slice(&line[..line_len]);
        Ok(line_len)
    }

    fn read_packet(&self, handle: Handle) -> Option<NetworkBlock> {
        let mut data = match self.socket(handle).ok()? {
            Socket::Udp(socket) => {
                let mut data = vec![0u8; MAX_DATAGRAM];
                let n = socket.recv(&mut data).ok()?;
                data.truncate(n);
                data
            }
            _ => {
                let mut stream = self.stream(handle).ok()??;
                let pending = peek_pending(&stream, PENDING_PEEK_LIMIT).ok()??;
                if pending == 0 {
                    return None;
                }
                let mut data = vec![0u8; pending];
                let n = stream.read(&mut data).ok()?;
                data.truncate(n);
                data
            }
        };
        data.shrink_to_fit();
        Some(NetworkBlock { data })
    }

    fn pending_bytes(&self, handle: Handle) -> Result<usize, ErrorCode> {
        match self.socket(handle)? {
            Socket::Udp(socket) => {
                let mut window = vec![0u8; MAX_DATAGRAM];
                match socket.peek(&mut window) {
                    Ok(n) => Ok(n),
                    Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
                    Err(e) => Err(io_error_code(&e)),
                }
            }
            _ => match self.stream(handle)? {
                Some(stream) => peek_pending(&stream, PENDING_PEEK_LIMIT)
                    .map_err(|e| io_error_code(&e))?
                    .ok_or(ErrorCode::EOF),
                None => Ok(0),
            },
        }
    }

    fn wait(&self, handle: Handle, timeout: Duration) -> Result<(), ErrorCode> {
        match self.socket(handle)? {
            Socket::Listener(listener) => {
                let deadline = Instant::now() + timeout;
                self.promote(handle, &listener, Some(deadline))?
                    .map(|_| ())
                    .ok_or(ErrorCode::CNTIMEOUT)
            }
            Socket::Stream(_) | Socket::Udp(_) => Ok(()),
            Socket::Unbound => Err(ErrorCode::NOCONNECTION),
        }
    }

    fn lookup_connection(&self, handle: Handle) -> Option<InfoRef> {
        self.sockets.get(&handle).and_then(|slot| slot.info.clone())
    }

    fn resolve(&self, name: &str, max_addresses: usize) -> Result<Resolution, ErrorCode> {
        let span = span_operation("resolve");
        let _guard = span.enter();
        span.record("name", name);

        if name.is_empty() {
            span.record_error("empty name");
            return Err(ErrorCode::BADDNAME);
        }

        let addrs = (name, 0u16).to_socket_addrs().map_err(|e| {
            span.record_error(&e.to_string());
            ErrorCode::CANTRESOLVE
        })?;

        let mut addresses: Vec<Ipv4Addr> = Vec::new();
        for addr in addrs {
            if let SocketAddr::V4(v4) = addr {
                if !addresses.contains(v4.ip()) {
                    addresses.push(*v4.ip());
                }
            }
        }
        if addresses.is_empty() {
            span.record_error("no IPv4 address");
            return Err(ErrorCode::DNSNOADDR);
        }
        addresses.truncate(max_addresses);

        span.record_result(true);
        Ok(Resolution {
            canonical_name: Some(name.to_string()),
            addresses,
        })
    }

    fn get_variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).map(|value| value.clone())
    }

    fn set_variable(&self, name: &str, value: &str) -> Result<(), ErrorCode> {
        if name.is_empty() {
            return Err(ErrorCode::PARAMETER);
        }
        self.variables.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

impl std::fmt::Debug for StdSocketEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdSocketEngine")
            .field("open", &self.sockets.len())
            .field("recycled", &self.free_handles.len())
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
