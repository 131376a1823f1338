//! WebSocket gateway for the realtime subsystem.
//!
//! This crate owns the connection lifecycle:
//!
//! - Accept a socket, require an `auth` frame within the deadline
//! - Resolve the token against the user directory
//! - Register presence and hand the connection an outbound channel
//! - Pump `register` / `join-room` frames while the client stays
//! - On disconnect, remove presence (guarded by connection id) and
//!   rebroadcast the snapshot
//!
//! Delivery goes through [`ConnectionTable`], the gateway's
//! [`fanout_engine::EventSink`]: bounded buffers, `try_send`, drops over
//! backpressure.

mod error;
mod server;
mod table;

pub use error::{GatewayError, GatewayResult};
pub use server::{GatewayContext, GatewayServer, AUTH_TIMEOUT_SECS};
pub use table::{ConnectionTable, OUTBOUND_BUFFER};
