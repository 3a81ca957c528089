//! Response Parser Tests
//!
//! Tests verify:
//! - Single-line, multi-line and binary classification
//! - Tolerance of unprefixed lines
//! - The freeboot "follows" heuristic
//! - Body termination rules
//! - Cancellation and end of stream

use std::io::Cursor;

use xedbg::protocol::{
    is_status_line, parse_response, read_body, ParseOptions, ResponseBody, ResultCode,
    StatusCode, SubCodeDecoding,
};
use xedbg::transfer::CancelToken;
use xedbg::XeError;

fn parse(input: &str, options: ParseOptions) -> xedbg::Result<xedbg::protocol::Response> {
    let mut reader = Cursor::new(input.as_bytes());
    parse_response(&mut reader, &options, &CancelToken::new())
}

fn freeboot() -> ParseOptions {
    ParseOptions {
        freeboot_dialect: true,
        ..ParseOptions::default()
    }
}

// =============================================================================
// Single Line Tests
// =============================================================================

#[test]
fn test_single_line_success() {
    let response = parse("200- OK\r\n", ParseOptions::default()).unwrap();

    assert_eq!(response.status, StatusCode(200));
    assert_eq!(response.result, ResultCode::NOERR);
    assert_eq!(response.message, "OK");
    assert_eq!(response.body, ResponseBody::None);
    assert!(response.is_success());
}

#[test]
fn test_single_line_failure() {
    let response = parse("402- file not found\r\n", ParseOptions::default()).unwrap();

    assert!(response.is_failure());
    assert_eq!(response.result, ResultCode::NOSUCHFILE);
    assert_eq!(response.message, "file not found");
}

#[test]
fn test_message_keeps_later_dashes() {
    let response = parse("200- name=xex-title\r\n", ParseOptions::default()).unwrap();
    assert_eq!(response.message, "name=xex-title");
}

#[test]
fn test_decoding_mode_applies() {
    let options = ParseOptions {
        decoding: SubCodeDecoding::LastDigit,
        ..ParseOptions::default()
    };
    let response = parse("410- exists\r\n", options).unwrap();

    assert_eq!(response.status, StatusCode(410));
    assert_eq!(response.result, ResultCode::UNDEFINED);
}

#[test]
fn test_empty_line_is_undefined_failure() {
    let response = parse("\r\n", ParseOptions::default()).unwrap();

    assert_eq!(response.status, StatusCode(400));
    assert_eq!(response.result, ResultCode::UNDEFINED);
    assert!(response.message.is_empty());
}

#[test]
fn test_disconnect_message() {
    let response = parse("200- BYE\r\n", ParseOptions::default()).unwrap();
    assert!(response.is_disconnect());
}

// =============================================================================
// Multi-line Tests
// =============================================================================

#[test]
fn test_multi_line_body() {
    let input = "202- multiline response follows\r\nline one\r\nline two\r\nline three\r\n.\r\n";
    let response = parse(input, ParseOptions::default()).unwrap();

    assert_eq!(response.result, ResultCode::MULTIRESPONSE);
    assert_eq!(response.lines(), ["line one", "line two", "line three"]);
}

#[test]
fn test_multi_line_empty_body() {
    let response = parse("202- none\r\n.\r\n", ParseOptions::default()).unwrap();
    assert_eq!(response.body, ResponseBody::Lines(Vec::new()));
}

#[test]
fn test_multi_line_leaves_next_response_unread() {
    let input = "202- follows\r\nA\r\n.\r\n200- OK\r\n";
    let mut reader = Cursor::new(input.as_bytes());
    let cancel = CancelToken::new();
    let options = ParseOptions::default();

    let first = parse_response(&mut reader, &options, &cancel).unwrap();
    assert_eq!(first.lines(), ["A"]);

    let second = parse_response(&mut reader, &options, &cancel).unwrap();
    assert_eq!(second.result, ResultCode::NOERR);
}

#[test]
fn test_body_stops_at_end_of_stream() {
    let response = parse("202- follows\r\nonly\r\n", ParseOptions::default()).unwrap();
    assert_eq!(response.lines(), ["only"]);
}

#[test]
fn test_body_stops_at_status_line() {
    let mut reader = Cursor::new(&b"a\r\n200- next\r\nb\r\n"[..]);
    let lines = read_body(&mut reader, &CancelToken::new()).unwrap();
    assert_eq!(lines, ["a"]);
}

#[test]
fn test_body_stops_at_empty_line() {
    let mut reader = Cursor::new(&b"a\r\n\r\nb\r\n"[..]);
    let lines = read_body(&mut reader, &CancelToken::new()).unwrap();
    assert_eq!(lines, ["a"]);
}

#[test]
fn test_status_line_detection() {
    assert!(is_status_line("200- OK"));
    assert!(is_status_line("402"));
    assert!(is_status_line("2000"));
    assert!(!is_status_line("20"));
    assert!(!is_status_line("12345678"));
    assert!(!is_status_line("name=\"x\""));
}

// =============================================================================
// Binary Tests
// =============================================================================

#[test]
fn test_binary_response_leaves_payload_unread() {
    let mut input = b"203- binary response follows\r\n".to_vec();
    input.extend_from_slice(&[4, 0, 0, 0, 1, 2, 3, 4]);
    let mut reader = Cursor::new(input);

    let response =
        parse_response(&mut reader, &ParseOptions::default(), &CancelToken::new()).unwrap();

    assert!(response.is_binary_pending());
    assert_eq!(reader.position(), 30);
}

// =============================================================================
// Tolerance Tests
// =============================================================================

#[test]
fn test_missing_status_is_error_by_default() {
    let result = parse("hello world\r\n", ParseOptions::default());
    assert!(matches!(result, Err(XeError::Protocol(_))));
}

#[test]
fn test_missing_status_tolerated_when_enabled() {
    let options = ParseOptions {
        assume_success_on_invalid_status: true,
        ..ParseOptions::default()
    };
    let response = parse("hello world\r\nextra\r\n.\r\n", options).unwrap();

    assert_eq!(response.result, ResultCode::NOERR);
    assert_eq!(response.status, StatusCode(200));
    assert_eq!(response.message, "hello world");
    assert_eq!(response.lines(), ["extra"]);
}

#[test]
fn test_freeboot_tolerates_missing_status() {
    let response = parse("Natelx\r\n.\r\n", freeboot()).unwrap();
    assert!(response.is_success());
    assert_eq!(response.message, "Natelx");
}

#[test]
fn test_freeboot_follows_heuristic() {
    let input = "200- 4 bytes Follows\r\nDEADBEEF\r\n.\r\n";
    let response = parse(input, freeboot()).unwrap();

    assert_eq!(response.result, ResultCode::NOERR);
    assert_eq!(response.lines(), ["DEADBEEF"]);
}

#[test]
fn test_follows_ignored_without_freeboot() {
    let input = "200- data follows\r\nDEADBEEF\r\n.\r\n";
    let response = parse(input, ParseOptions::default()).unwrap();
    assert_eq!(response.body, ResponseBody::None);
}

// =============================================================================
// Stream Tests
// =============================================================================

#[test]
fn test_end_of_stream_is_connection_closed() {
    let result = parse("", ParseOptions::default());
    assert!(matches!(result, Err(XeError::ConnectionClosed)));
}

#[test]
fn test_cancelled_before_read() {
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut reader = Cursor::new(&b"200- OK\r\n"[..]);
    let result = parse_response(&mut reader, &ParseOptions::default(), &cancel);

    assert!(matches!(result, Err(XeError::Cancelled)));
    assert_eq!(reader.position(), 0);
}
