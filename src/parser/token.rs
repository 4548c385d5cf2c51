//! Character classes shared by the L2 micro-parsers and the L3 URI parser
//! (RFC 3261 §25.1 Basic Rules).
//!
//! Plain byte predicates, because the micro-parsers in [`super::headers`]
//! and [`super::uri`] scan spans by hand rather than building nom combinator
//! chains.

/// `token = 1*(alphanum / "-" / "." / "!" / "%" / "*" / "_" / "+" / "`" / "'" / "~")`
pub fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'-' | b'.' | b'!' | b'%' | b'*' | b'_' | b'+' | b'`' | b'\'' | b'~')
}

/// `word` (RFC 3261 §25.1): token plus the separator characters that are
/// still legal inside a Call-ID, minus SP/HTAB/CRLF. Used by [`super::headers::call_id`].
pub fn is_word_char(b: u8) -> bool {
    is_token_char(b)
        || matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b':' | b'\\' | b'"' | b'/' | b'[' | b']' | b'?' | b'{' | b'}' | b'@'
        )
}

/// Host-name / IPv4 literal character: alphanumeric, `-`, or `.`.
pub fn is_host_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.')
}

/// Characters legal inside a bracketed IPv6 literal (hex digits, `:`, and
/// the `.` used by an embedded IPv4 tail in a v4-mapped address).
pub fn is_ipv6_char(b: u8) -> bool {
    b.is_ascii_hexdigit() || matches!(b, b':' | b'.')
}

/// Skips leading linear whitespace (SP/HTAB); header values handed to L2
/// have already had folds collapsed into single spaces by the consumer
/// only if it chose to (spec keeps fold bytes in the stored span), so this
/// also tolerates an embedded CRLF-SP fold remnant defensively.
pub fn skip_lws(input: &[u8]) -> usize {
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b' ' | b'\t' => i += 1,
            b'\r' if input.get(i + 1) == Some(&b'\n') && matches!(input.get(i + 2), Some(b' ') | Some(b'\t')) => {
                i += 3;
            }
            _ => break,
        }
    }
    i
}
