//! RFC 4475-style torture tests: deliberately adversarial messages that
//! must either parse successfully despite being unusual, or fail with a
//! specific [`Error`] variant. Gated behind `lenient_parsing` because the
//! well-formed set includes a case that only succeeds in that mode.
//!
//! Unlike the teacher's `crates/sip-core/tests/rfc_compliance/torture_test.rs`,
//! which loads a directory of `.sip` fixture files via `CARGO_MANIFEST_DIR`,
//! every message here is a literal in this file — nothing to ship or keep in
//! sync with a fixture corpus.

use sip_msg_parser::{Error, MessageKind, MessageProcessor, Method, Mode};

/// Well-formed-but-torturous messages that must parse without error.
#[test]
fn wellformed_messages_parse_successfully() {
    // Leading CRLF keepalive pings before the start line (double-CRLF
    // "ping" framing some SIP stacks send to hold a connection open).
    let leading_crlf = b"\r\n\r\nOPTIONS sip:watson@bell-tel.com SIP/2.0\r\n\
Via: SIP/2.0/UDP host.example.com\r\n\
Content-Length: 0\r\n\r\n";
    assert_request_ok(leading_crlf, Method::Options);

    // An unusual-but-structurally-valid request-URI: L1 only looks for the
    // terminating SP, it doesn't validate URI internals (that's L3's job on
    // an already-isolated span).
    let escaped_chars_uri = b"INVITE sip:%75sername@host.example.com;unknownparam SIP/2.0\r\n\
Via: SIP/2.0/UDP host.example.com\r\n\
Content-Length: 0\r\n\r\n";
    assert_request_ok(escaped_chars_uri, Method::Invite);

    // Multiple Via headers with differing transports, ports, and a folded
    // value continuing onto a second physical line.
    let multi_via = b"INVITE sip:bob@biloxi.com SIP/2.0\r\n\
Via: SIP/2.0/TCP first.example.com:5061;branch=z9hG4bK1\r\n\
Via: SIP/2.0/UDP second.example.com;\r\n branch=z9hG4bK2\r\n\
Content-Length: 0\r\n\r\n";
    let parsed = parse_request(multi_via);
    let via_values: Vec<&[u8]> = parsed.header_values("Via").collect();
    assert_eq!(via_values.len(), 2);

    // Mixed-case header field names must still match case-insensitively.
    let mixed_case = b"OPTIONS sip:a@b SIP/2.0\r\ncOnTeNt-LeNgTh: 0\r\n\r\n";
    let parsed = parse_request(mixed_case);
    assert_eq!(parsed.header("Content-Length"), Some(&b"0"[..]));

    // The short-form "l" alias for Content-Length.
    let short_form = b"SIP/2.0 200 OK\r\nl: 2\r\n\r\nhi";
    let mut mp = MessageProcessor::new(Mode::Response);
    let parsed = mp.feed(short_form).unwrap();
    assert_eq!(parsed[0].body.get(&parsed[0].buf), b"hi");

    // Tab-character LWS inside a header value (obs-fold and ordinary
    // intra-value whitespace both accept HTAB).
    let tab_lws = b"OPTIONS sip:a@b SIP/2.0\r\nSubject:\ta\ttab\tseparated\tvalue\r\nContent-Length: 0\r\n\r\n";
    let parsed = parse_request(tab_lws);
    assert_eq!(parsed.header("Subject"), Some(&b"a\ttab\tseparated\tvalue"[..]));

    // An empty reason phrase is a valid status line.
    let empty_reason = b"SIP/2.0 200 \r\nContent-Length: 0\r\n\r\n";
    let mut mp = MessageProcessor::new(Mode::Response);
    let parsed = mp.feed(empty_reason).unwrap();
    assert_eq!(parsed[0].status_code, Some(200));
    assert_eq!(parsed[0].reason_phrase.unwrap().get(&parsed[0].buf), b"");

    // A stray control byte in a header value succeeds only under lenient
    // mode — this crate's `lenient_parsing` feature flips that default.
    let mut lenient = MessageProcessor::new(Mode::Request);
    lenient.set_lenient_headers(true);
    let stray_control = b"OPTIONS sip:a@b SIP/2.0\r\nSubject: odd\x01byte\r\nContent-Length: 0\r\n\r\n";
    let parsed = lenient.feed(stray_control).unwrap();
    assert_eq!(parsed[0].header("Subject"), Some(&b"odd\x01byte"[..]));
}

/// Malformed messages that must fail with a specific [`Error`] variant.
#[test]
fn malformed_messages_fail_with_expected_error() {
    // Duplicate Content-Length.
    let dup_cl = b"SIP/2.0 200 OK\r\nContent-Length: 0\r\nContent-Length: 1\r\n\r\n";
    assert_response_err(dup_cl, Error::UnexpectedContentLength);

    // Non-digit Content-Length value.
    let bad_cl = b"SIP/2.0 200 OK\r\nContent-Length: abc\r\n\r\n";
    assert_response_err(bad_cl, Error::InvalidContentLength);

    // Content-Length with interior whitespace.
    let split_cl = b"SIP/2.0 200 OK\r\nContent-Length: 12 3\r\n\r\n";
    assert_response_err(split_cl, Error::InvalidContentLength);

    // Header block overflow against a configured maximum.
    let mut mp = MessageProcessor::new(Mode::Request);
    mp.set_max_header_size(32);
    let overflow = b"OPTIONS sip:a@b SIP/2.0\r\nX-Pad: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n\r\n";
    assert_eq!(mp.feed(overflow).unwrap_err(), Error::HeaderOverflow);

    // Unrecognized method, matching no ladder candidate at all.
    let bad_method = b"ZORK sip:a@b SIP/2.0\r\nContent-Length: 0\r\n\r\n";
    assert_request_err(bad_method, Error::InvalidMethod);

    // Malformed SIP version literal (non-digit minor version).
    let bad_version = b"OPTIONS sip:a@b SIP/2.X\r\nContent-Length: 0\r\n\r\n";
    assert_request_err(bad_version, Error::InvalidVersion);

    // Malformed status code (only two digits).
    let bad_status = b"SIP/2.0 20 OK\r\nContent-Length: 0\r\n\r\n";
    assert_response_err(bad_status, Error::InvalidStatus);
}

fn parse_request(msg: &[u8]) -> sip_msg_parser::ParsedMessage {
    let mut mp = MessageProcessor::new(Mode::Request);
    let mut parsed = mp.feed(msg).unwrap();
    assert_eq!(parsed.len(), 1);
    parsed.remove(0)
}

fn assert_request_ok(msg: &[u8], expect: Method) {
    let mut mp = MessageProcessor::new(Mode::Request);
    let parsed = mp.feed(msg).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].kind, MessageKind::Request);
    assert_eq!(parsed[0].method, Some(expect));
}

fn assert_request_err(msg: &[u8], expect: Error) {
    let mut mp = MessageProcessor::new(Mode::Request);
    assert_eq!(mp.feed(msg).unwrap_err(), expect);
}

fn assert_response_err(msg: &[u8], expect: Error) {
    let mut mp = MessageProcessor::new(Mode::Response);
    assert_eq!(mp.feed(msg).unwrap_err(), expect);
}
