/*!
 * Connection Lifecycle
 *
 * Interprets legacy open requests, drives the engine through the
 * descriptor/connect sequence and answers handle lookups. The permanently
 * inert part of the legacy surface lives in [`inert`].
 */

pub mod inert;
mod manager;
mod request;

pub use manager::ConnectionManager;
pub use request::{ConnectionBlock, OpenRequest, OpenShape};
