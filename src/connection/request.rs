/*!
 * Open Requests
 *
 * A `TCP_open` call carries two values, and which of three shapes it takes
 * is decided purely by those values:
 *
 * 1. remote host 0: passive open, the port field is the local port
 * 2. port `TCP_ACTIVE`/`TCP_PASSIVE`: the host field refers to a
 *    connection address block carrying all four values
 * 3. anything else: plain active open to host:port
 */

use crate::core::codes::{ErrorCode, TCP_ACTIVE, TCP_PASSIVE};
use crate::core::types::Endpoints;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Connection address block (CAB) handed over with parameter-block opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionBlock {
    pub remote_host: Ipv4Addr,
    pub remote_port: u16,
    pub local_host: Ipv4Addr,
    pub local_port: u16,
}

/// Raw `TCP_open` arguments as the caller supplied them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenRequest {
    pub remote_host: u32,
    pub remote_port: u16,
    /// The block `remote_host` refers to, when the caller passed one
    pub block: Option<ConnectionBlock>,
}

/// Classified open request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenShape {
    Passive { local_port: u16 },
    ParameterBlock(ConnectionBlock),
    Active { remote_host: Ipv4Addr, remote_port: u16 },
}

impl OpenRequest {
    /// STiK-style open: `remote_host == 0` listens on `remote_port`
    pub fn new(remote_host: impl Into<u32>, remote_port: u16) -> Self {
        Self {
            remote_host: remote_host.into(),
            remote_port,
            block: None,
        }
    }

    /// STinG-style open; `reference` is the host's (non-zero) address of `block`
    pub fn with_block(reference: u32, mode: u16, block: ConnectionBlock) -> Self {
        Self {
            remote_host: reference,
            remote_port: mode,
            block: Some(block),
        }
    }

    /// Pick the request's shape from its field values
    ///
    /// A sentinel port without an attached block is a malformed request.
    pub fn classify(&self) -> Result<OpenShape, ErrorCode> {
        if self.remote_host == 0 {
            return Ok(OpenShape::Passive {
                local_port: self.remote_port,
            });
        }

        if self.remote_port == TCP_ACTIVE || self.remote_port == TCP_PASSIVE {
            return self
                .block
                .map(OpenShape::ParameterBlock)
                .ok_or(ErrorCode::PARAMETER);
        }

        Ok(OpenShape::Active {
            remote_host: Ipv4Addr::from(self.remote_host),
            remote_port: self.remote_port,
        })
    }
}

impl OpenShape {
    pub fn name(&self) -> &'static str {
        match self {
            OpenShape::Passive { .. } => "passive",
            OpenShape::ParameterBlock(_) => "parameter_block",
            OpenShape::Active { .. } => "active",
        }
    }

    /// The address tuple the engine is asked to connect with
    pub fn endpoints(&self) -> Endpoints {
        match *self {
            OpenShape::Passive { local_port } => Endpoints {
                local_host: Ipv4Addr::UNSPECIFIED,
                local_port,
                remote_host: Ipv4Addr::UNSPECIFIED,
                remote_port: 0,
            },
            OpenShape::ParameterBlock(block) => Endpoints {
                local_host: block.local_host,
                local_port: block.local_port,
                remote_host: block.remote_host,
                remote_port: block.remote_port,
            },
            OpenShape::Active {
                remote_host,
                remote_port,
            } => Endpoints {
                local_host: Ipv4Addr::UNSPECIFIED,
                local_port: 0,
                remote_host,
                remote_port,
            },
        }
    }
}
