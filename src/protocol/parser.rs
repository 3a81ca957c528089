//! Response parser
//!
//! Classifies the reply to one command into a single line, multi-line or
//! binary response.

use std::io::BufRead;

use crate::error::{Result, XeError};
use crate::transfer::CancelToken;
use super::codec::{is_body_terminator, is_status_line, read_line};
use super::response::{Response, ResponseBody};
use super::status::{ResultCode, StatusCode, SubCodeDecoding};

/// Separator between the status code and the message
pub const STATUS_SEPARATOR: char = '-';

/// Message suffix the freeboot dialect uses for unflagged multi-line replies
const FOLLOWS_MARKER: &str = "follows";

/// Knobs that change how a status line is interpreted
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Sub-code decoding mode
    pub decoding: SubCodeDecoding,

    /// Accept a non-numeric status as an implicit success
    pub assume_success_on_invalid_status: bool,

    /// The server speaks the freeboot dialect
    pub freeboot_dialect: bool,
}

impl ParseOptions {
    fn tolerates_missing_status(&self) -> bool {
        self.assume_success_on_invalid_status || self.freeboot_dialect
    }
}

/// Read and classify one response.
///
/// A binary continuation is reported as [`ResponseBody::BinaryPending`] and
/// left unread on the stream.
pub fn parse_response<R: BufRead>(
    reader: &mut R,
    options: &ParseOptions,
    cancel: &CancelToken,
) -> Result<Response> {
    let line = read_line(reader, cancel)?.ok_or(XeError::ConnectionClosed)?;
    tracing::trace!("<< {}", line);

    if line.is_empty() {
        return Ok(Response::default());
    }

    let (token, rest) = match line.split_once(STATUS_SEPARATOR) {
        Some((token, rest)) => (token, rest),
        None => (line.as_str(), ""),
    };

    let (status, message, has_status) = match token.trim().parse::<u32>() {
        Ok(code) => (StatusCode(code), rest.trim(), true),
        Err(_) if options.tolerates_missing_status() => {
            (ResultCode::NOERR.encode(), line.trim(), false)
        }
        Err(_) => {
            return Err(XeError::Protocol(format!(
                "Failed to parse status code from response: {}",
                token
            )))
        }
    };

    let result = status.decode(options.decoding);

    // Binary payloads are streamed by the caller, never buffered here
    if result == ResultCode::BINRESPONSE {
        return Ok(Response::new(
            status,
            options.decoding,
            message,
            ResponseBody::BinaryPending,
        ));
    }

    let mut is_multi_line = result == ResultCode::MULTIRESPONSE;
    if options.freeboot_dialect && !is_multi_line && ends_with_follows(message) {
        is_multi_line = true;
    }

    let body = if is_multi_line || !has_status {
        ResponseBody::Lines(read_body(reader, cancel)?)
    } else {
        ResponseBody::None
    };

    Ok(Response::new(status, options.decoding, message, body))
}

/// Collect lines up to the terminator.
///
/// Stops at a lone `.`, an empty line, a line that looks like a new status,
/// or end of stream. The stopping line is consumed and not returned.
pub fn read_body<R: BufRead>(reader: &mut R, cancel: &CancelToken) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    while let Some(line) = read_line(reader, cancel)? {
        if line.is_empty() || is_body_terminator(&line) || is_status_line(&line) {
            break;
        }
        tracing::trace!("<< {}", line);
        lines.push(line);
    }

    Ok(lines)
}

fn ends_with_follows(message: &str) -> bool {
    message.to_ascii_lowercase().ends_with(FOLLOWS_MARKER)
}
