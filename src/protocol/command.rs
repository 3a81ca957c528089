//! Command definitions
//!
//! Outbound commands are a verb followed by space separated arguments, either
//! bare flags (`full`) or `key=value` pairs (`addr=0x82000000`). String values
//! are quoted (`name="HDD:\file.xex"`).

use std::fmt;

/// Maximum command length including the trailing CR/LF
pub const MAX_COMMAND_LEN: usize = 512;

/// Line terminator for outbound commands
pub const LINE_TERMINATOR: &str = "\r\n";

/// A command line to send to the debug monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    line: String,
}

impl Command {
    /// Start a command with its verb
    pub fn new(verb: &str) -> Self {
        Self {
            line: verb.to_string(),
        }
    }

    /// Append a bare flag
    pub fn flag(mut self, flag: &str) -> Self {
        self.line.push(' ');
        self.line.push_str(flag);
        self
    }

    /// Append an unquoted `key=value` argument
    pub fn arg(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.line.push_str(&format!(" {}={}", key, value));
        self
    }

    /// Append a `key=0xXXXXXXXX` argument
    pub fn hex_arg(self, key: &str, value: u32) -> Self {
        self.arg(key, format!("0x{:08X}", value))
    }

    /// Append a quoted `key="value"` argument
    pub fn quoted(mut self, key: &str, value: &str) -> Self {
        self.line.push_str(&format!(" {}=\"{}\"", key, value));
        self
    }

    /// The command text without terminator
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// Length on the wire, terminator included
    pub fn wire_len(&self) -> usize {
        wire_len(&self.line)
    }

    /// True when the command fits the protocol's line bound
    pub fn fits(&self) -> bool {
        self.wire_len() <= MAX_COMMAND_LEN
    }

    /// The bytes written to the socket
    pub fn to_wire(&self) -> Vec<u8> {
        encode_line(&self.line)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

impl From<&str> for Command {
    fn from(line: &str) -> Self {
        Self {
            line: line.to_string(),
        }
    }
}

impl From<String> for Command {
    fn from(line: String) -> Self {
        Self { line }
    }
}

/// Wire length of a raw command line
pub fn wire_len(line: &str) -> usize {
    line.len() + LINE_TERMINATOR.len()
}

/// Encode a raw command line with its terminator
pub fn encode_line(line: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(wire_len(line));
    bytes.extend_from_slice(line.as_bytes());
    bytes.extend_from_slice(LINE_TERMINATOR.as_bytes());
    bytes
}
