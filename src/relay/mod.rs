//! Relay Core
//!
//! The session registry and broadcast dispatcher, plus the wire protocol
//! they speak. Transport-agnostic: the WebSocket layer feeds frames in and
//! drains per-connection outbound queues.

pub mod dispatcher;
pub mod protocol;
pub mod registry;

pub use dispatcher::Dispatcher;
pub use protocol::{ClientEvent, ProtocolError, ServerEvent, UserEntry, ANONYMOUS};
pub use registry::{ConnectionId, Outbound, Registry};
