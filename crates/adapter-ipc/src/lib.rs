//! IPC ingress for the daemon.
//!
//! Mutation adapters inside the application backend talk to the daemon
//! over this socket: report a committed mutation, sync a directory entry,
//! or inspect presence and the audit trail. NDJSON framing, one request
//! per line, one response per request.

mod error;
mod protocol;
mod server;

pub use error::{IpcError, IpcResult};
pub use protocol::{error_codes, ErrorInfo, Method, Request, Response};
pub use server::{HandlerFn, IpcClient, IpcServer};
