//! Error types for xedbg
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::protocol::ResultCode;

/// Result type alias using XeError
pub type Result<T> = std::result::Result<T, XeError>;

/// Unified error type for xedbg operations
#[derive(Debug, Error)]
pub enum XeError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(std::io::Error),

    #[error("Connection closed by remote host")]
    ConnectionClosed,

    #[error("Operation timed out")]
    Timeout,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Session is not connected")]
    NotConnected,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server returned {result}: {message}")]
    Status { result: ResultCode, message: String },

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl XeError {
    /// True for errors raised by the socket rather than by the server.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            XeError::Io(_)
                | XeError::ConnectionClosed
                | XeError::Timeout
                | XeError::Cancelled
                | XeError::NotConnected
        )
    }

    /// The server-side result code carried by a strict-mode status failure.
    pub fn result_code(&self) -> Option<ResultCode> {
        match self {
            XeError::Status { result, .. } => Some(*result),
            _ => None,
        }
    }
}

impl From<std::io::Error> for XeError {
    fn from(e: std::io::Error) -> Self {
        use std::io::ErrorKind;

        // Socket deadlines surface as WouldBlock on unix and TimedOut on Windows
        match e.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => XeError::Timeout,
            ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe => XeError::ConnectionClosed,
            _ => XeError::Io(e),
        }
    }
}

impl From<hex::FromHexError> for XeError {
    fn from(e: hex::FromHexError) -> Self {
        XeError::Protocol(format!("Invalid hex data: {}", e))
    }
}
