//! IPC surface of the daemon.
//!
//! Each handler module contains thin handlers that bridge socket requests
//! into the registry, directory, audit trail, and fanout engine.

pub mod handlers;
mod register;

pub use register::register_handlers;
