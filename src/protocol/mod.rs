//! Protocol Module
//!
//! Defines the XBDM text protocol spoken over TCP port 730.
//!
//! ## Request Format
//! ```text
//! verb key=value flag key="quoted value"\r\n      (≤ 512 bytes with CR/LF)
//! ```
//!
//! ## Response Format
//! ```text
//! DDD- message\r\n                  single line
//! 202- multiline response follows\r\n
//! line\r\n ... .\r\n                multi-line, ended by a lone "."
//! 203- binary response follows\r\n
//! [len:4 LE][len bytes]             binary, read separately
//! ```
//!
//! ### Status Codes
//! - 2xx: success (200 OK, 201 connected, 202 multi-line, 203 binary, 204 ready for binary)
//! - 4xx: failure (402 no such file, 405 no such thread, 407 invalid command, ...)

mod status;
mod command;
mod response;
mod codec;
mod parser;

pub use status::{
    decode, encode, is_failure, is_success, ResultCode, StatusCode, SubCodeDecoding,
    FACILITY_XBDM, MAX_WIRE_SUBCODE,
};
pub use command::{encode_line, wire_len, Command, LINE_TERMINATOR, MAX_COMMAND_LEN};
pub use response::{Response, ResponseBody, DISCONNECT_KEYWORD};
pub use codec::{is_body_terminator, is_status_line, read_line, write_line, BODY_TERMINATOR};
pub use parser::{parse_response, read_body, ParseOptions, STATUS_SEPARATOR};
