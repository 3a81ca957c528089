//! Line codec
//!
//! Reading and writing CRLF terminated protocol lines.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::transfer::CancelToken;
use super::command::{encode_line, wire_len, MAX_COMMAND_LEN};

/// Multi-line body terminator
pub const BODY_TERMINATOR: &str = ".";

/// Read one line with its CR/LF stripped.
///
/// Returns `Ok(None)` at end of stream. Cancellation is observed before the
/// read starts.
pub fn read_line<R: BufRead>(reader: &mut R, cancel: &CancelToken) -> Result<Option<String>> {
    cancel.check()?;

    let mut raw = Vec::new();
    let n = reader.read_until(b'\n', &mut raw)?;
    if n == 0 {
        return Ok(None);
    }

    while matches!(raw.last(), Some(b'\n' | b'\r')) {
        raw.pop();
    }

    Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
}

/// Write one command line and flush
pub fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    let len = wire_len(line);
    if len > MAX_COMMAND_LEN {
        // Splitting is left to the caller; the server answers LINE_TOO_LONG
        tracing::warn!(
            "Command is {} bytes, over the {} byte protocol limit",
            len,
            MAX_COMMAND_LEN
        );
    }

    writer.write_all(&encode_line(line))?;
    writer.flush()?;
    Ok(())
}

/// True for a line that opens a new response: three digits, then either
/// nothing more or `- `.
pub fn is_status_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return false;
    }

    if bytes.len() >= 5 {
        return bytes[3] == b'-' && bytes[4] == b' ';
    }

    true
}

/// True for the lone `.` that ends a multi-line body
pub fn is_body_terminator(line: &str) -> bool {
    line == BODY_TERMINATOR
}
