//! IPC error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("Connection closed")]
    ConnectionClosed,
}

pub type IpcResult<T> = Result<T, IpcError>;
