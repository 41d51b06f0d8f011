/*!
 * Capability Table
 */

use super::call::{Call, Reply};
use super::entries::{TableEntry, ENTRIES};
use super::transport::Transport;
use crate::core::codes::ErrorCode;
use crate::core::limits::{TABLE_FORMAT_VERSION, TRANSPORT_DRIVER};
use crate::monitoring::span_call;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// The `TPL` structure: module identity plus the ordered entry points
#[derive(Debug)]
pub struct CapabilityTable {
    module: &'static str,
    author: String,
    version: &'static str,
    entries: &'static [TableEntry],
    transport: Transport,
}

/// Serializable description of a table, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableManifest {
    pub module: String,
    pub author: String,
    pub version: String,
    pub entries: Vec<EntryManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryManifest {
    pub ordinal: usize,
    pub name: String,
}

impl CapabilityTable {
    pub fn new(transport: Transport) -> Self {
        Self {
            module: TRANSPORT_DRIVER,
            author: format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            version: TABLE_FORMAT_VERSION,
            entries: &ENTRIES,
            transport,
        }
    }

    #[inline]
    pub fn module(&self) -> &'static str {
        self.module
    }

    #[inline]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[inline]
    pub fn version(&self) -> &'static str {
        self.version
    }

    #[inline]
    pub fn entries(&self) -> &'static [TableEntry] {
        self.entries
    }

    #[inline]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Position of `name` in the table
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Invoke the entry at `ordinal` the way a legacy client would
    ///
    /// Positions past the end answer `E_NOROUTINE`.
    pub fn call(&self, ordinal: usize, call: Call<'_>) -> Reply {
        let Some(entry) = self.entries.get(ordinal) else {
            trace!(ordinal, "call past end of table");
            return Reply::Status(ErrorCode::NOROUTINE.raw());
        };

        let span = span_call(entry.name, ordinal);
        let _guard = span.enter();
        let reply = (entry.handler)(&self.transport, call);
        span.record_status(reply.status());
        reply
    }

    /// Invoke whichever entry `call` belongs to
    #[inline]
    pub fn dispatch(&self, call: Call<'_>) -> Reply {
        self.call(call.ordinal(), call)
    }

    pub fn manifest(&self) -> TableManifest {
        TableManifest {
            module: self.module.to_string(),
            author: self.author.clone(),
            version: self.version.to_string(),
            entries: self
                .entries
                .iter()
                .enumerate()
                .map(|(ordinal, entry)| EntryManifest {
                    ordinal,
                    name: entry.name.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockSocketEngine;
    use crate::flags::FlagStore;
    use crate::memory::BudgetAllocator;
    use std::sync::Arc;

    fn table() -> CapabilityTable {
        CapabilityTable::new(Transport::new(
            Arc::new(MockSocketEngine::new()),
            Arc::new(BudgetAllocator::new(4096)),
            Arc::new(FlagStore::standalone()),
        ))
    }

    #[test]
    fn test_identity() {
        let table = table();
        assert_eq!(table.module(), "TRANSPORT_TCPIP");
        assert_eq!(table.version(), "01.13");
        assert!(table.author().starts_with("stik-shim v"));
    }

    #[test]
    fn test_mismatched_call_rejected() {
        let table = table();
        let reply = table.call(24, Call::ClearFlag { flag: 3 });
        assert_eq!(reply, Reply::Status(ErrorCode::PARAMETER.raw()));
        assert!(!table.transport().flags().is_set(3));
    }

    #[test]
    fn test_out_of_range_ordinal() {
        let table = table();
        assert_eq!(table.call(48, Call::Housekeep).status(), -26);
        assert_eq!(table.call(46, Call::Housekeep).status(), -26);
    }

    #[test]
    fn test_dispatch_flags() {
        let table = table();
        assert_eq!(table.dispatch(Call::SetFlag { flag: 7 }).status(), 0);
        assert_eq!(table.dispatch(Call::SetFlag { flag: 7 }).status(), 1);
        assert_eq!(table.dispatch(Call::ClearFlag { flag: 7 }), Reply::Unit);
        assert_eq!(table.dispatch(Call::SetFlag { flag: 64 }).status(), -30);
    }

    #[test]
    fn test_allocator_forwarding() {
        let table = table();
        let Reply::Block(Some(block)) = table.dispatch(Call::KrMalloc { size: 100 }) else {
            panic!("allocation failed");
        };
        assert_eq!(table.dispatch(Call::KrMalloc { size: -1 }), Reply::Block(None));
        assert_eq!(table.dispatch(Call::KrGetFree { flag: 1 }), Reply::Size(4096 - 100));
        assert_eq!(table.dispatch(Call::KrFree { block }), Reply::Unit);
        assert_eq!(table.dispatch(Call::KrGetFree { flag: 1 }), Reply::Size(4096));
    }

    #[test]
    fn test_manifest_order() {
        let manifest = table().manifest();
        assert_eq!(manifest.entries.len(), 48);
        assert_eq!(manifest.entries[7].name, "TCP_open");
        assert_eq!(manifest.entries[43].name, "CNfree_NDB");
    }
}
