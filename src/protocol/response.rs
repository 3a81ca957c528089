//! Response definitions
//!
//! Represents the server's reply to one command.

use super::status::{ResultCode, StatusCode, SubCodeDecoding};

/// Message the server sends before closing a session
pub const DISCONNECT_KEYWORD: &str = "bye";

/// What follows the status line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseBody {
    /// Status line only
    #[default]
    None,

    /// Lines up to (excluding) the `.` terminator
    Lines(Vec<String>),

    /// A length-prefixed binary frame is waiting on the socket.
    /// It must be consumed before the next command is sent.
    BinaryPending,
}

/// A parsed response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Raw wire status
    pub status: StatusCode,

    /// Widened status, decoded with the session's sub-code mode
    pub result: ResultCode,

    /// Text after the status separator
    pub message: String,

    /// Continuation, if any
    pub body: ResponseBody,
}

impl Default for Response {
    /// The undefined-error response produced for an empty status line
    fn default() -> Self {
        let status = StatusCode::default();
        Self {
            status,
            result: status.decode(SubCodeDecoding::TwoDigit),
            message: String::new(),
            body: ResponseBody::None,
        }
    }
}

impl Response {
    /// Create a response from its parts
    pub fn new(
        status: StatusCode,
        mode: SubCodeDecoding,
        message: impl Into<String>,
        body: ResponseBody,
    ) -> Self {
        Self {
            status,
            result: status.decode(mode),
            message: message.into(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }

    /// The server announced it is closing the session
    pub fn is_disconnect(&self) -> bool {
        self.message.eq_ignore_ascii_case(DISCONNECT_KEYWORD)
    }

    /// A binary frame must be read before the next command
    pub fn is_binary_pending(&self) -> bool {
        matches!(self.body, ResponseBody::BinaryPending)
    }

    /// Body lines, empty unless the response was multi-line
    pub fn lines(&self) -> &[String] {
        match &self.body {
            ResponseBody::Lines(lines) => lines,
            _ => &[],
        }
    }
}
