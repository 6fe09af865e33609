//! JSON-over-HTTP synchronisation with the camera server.

mod client;
pub mod protocol;
mod select;
pub mod transport;

pub use client::{SyncClient, SyncEvent, FOCUS_NOT_SET, STATION_NOT_SET};
pub use protocol::Endpoint;
pub use select::{SelectControl, SelectKind, SelectOption};
pub use transport::{Body, EhttpTransport, ResponseCallback, Transport};
