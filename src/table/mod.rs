/*!
 * Capability Table
 *
 * The fixed, ordered operation table handed to the host, and the driver
 * header hosts use to find it. Callers address entries by position, so the
 * order in [`ENTRIES`] is the compatibility contract.
 */

mod call;
mod capability;
mod driver;
mod entries;
mod transport;

pub use call::{Call, Reply};
pub use capability::{CapabilityTable, EntryManifest, TableManifest};
pub use driver::{is_stik_driver, DriverList};
pub use entries::{Handler, TableEntry, ENTRIES};
pub use transport::Transport;
