//! Command Tests
//!
//! Tests verify:
//! - Argument formatting
//! - Wire encoding and the line length bound
//! - Line writing

use xedbg::protocol::{write_line, Command, MAX_COMMAND_LEN};

// =============================================================================
// Builder Tests
// =============================================================================

#[test]
fn test_verb_only() {
    let command = Command::new("dmversion");
    assert_eq!(command.as_str(), "dmversion");
}

#[test]
fn test_arguments() {
    let command = Command::new("getmem").arg("addr", 2181038080u32).arg("length", 4);
    assert_eq!(command.as_str(), "getmem addr=2181038080 length=4");
}

#[test]
fn test_hex_argument() {
    let command = Command::new("break").hex_arg("addr", 0x8200_0010);
    assert_eq!(command.as_str(), "break addr=0x82000010");
}

#[test]
fn test_quoted_and_flag() {
    let command = Command::new("dirlist").quoted("name", "HDD:\\Content").flag("full");
    assert_eq!(command.to_string(), "dirlist name=\"HDD:\\Content\" full");
}

#[test]
fn test_from_string() {
    let command: Command = "dbgname".into();
    assert_eq!(command, Command::new("dbgname"));
}

// =============================================================================
// Wire Tests
// =============================================================================

#[test]
fn test_to_wire_appends_crlf() {
    let command = Command::new("dbgname");
    assert_eq!(command.to_wire(), b"dbgname\r\n".to_vec());
    assert_eq!(command.wire_len(), 9);
}

#[test]
fn test_length_bound() {
    let fits = Command::from("a".repeat(MAX_COMMAND_LEN - 2));
    assert!(fits.fits());

    let too_long = Command::from("a".repeat(MAX_COMMAND_LEN - 1));
    assert!(!too_long.fits());
}

#[test]
fn test_write_line() {
    let mut out = Vec::new();
    write_line(&mut out, "setmem addr=0 data=00").unwrap();
    assert_eq!(out, b"setmem addr=0 data=00\r\n");
}

#[test]
fn test_write_line_sends_oversized_command_unchanged() {
    let line = "x".repeat(600);
    let mut out = Vec::new();
    write_line(&mut out, &line).unwrap();
    assert_eq!(out.len(), 602);
}
