//! `Call-ID` micro-parser (RFC 3261 §25.1): `word ["@" word]`.
//!
//! Grounded on `CallIdHeader.cpp`: a local id and an optional host part,
//! joined by a single `'@'`. `word` is the RFC 3261 word set (wider than
//! `token`), implemented in [`super::super::token::is_word_char`].

use crate::error::Error;
use crate::span::{span_of, Span};

use super::super::token::is_word_char;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallIdView {
    pub local_id: Span,
    pub host: Option<Span>,
}

pub fn parse_call_id(value: &[u8]) -> Result<CallIdView, Error> {
    // `trimmed` stays a genuine subslice of `value` (same backing memory),
    // so `span_of(value, ..)` below derives offsets relative to `value` by
    // pointer arithmetic, not relative to the trimmed slice.
    let trimmed = trim(value);
    if trimmed.is_empty() {
        return Err(Error::NoData);
    }
    match trimmed.iter().position(|&b| b == b'@') {
        Some(at) => {
            let local = &trimmed[..at];
            let host = &trimmed[at + 1..];
            if local.is_empty() || host.is_empty() || !local.iter().all(|&b| is_word_char(b)) || !host.iter().all(|&b| is_word_char(b))
            {
                return Err(Error::UnexpectedChar);
            }
            Ok(CallIdView { local_id: span_of(value, local), host: Some(span_of(value, host)) })
        }
        None => {
            if !trimmed.iter().all(|&b| is_word_char(b)) {
                return Err(Error::UnexpectedChar);
            }
            Ok(CallIdView { local_id: span_of(value, trimmed), host: None })
        }
    }
}

fn trim(b: &[u8]) -> &[u8] {
    let start = b.iter().position(|&c| c != b' ' && c != b'\t').unwrap_or(b.len());
    let end = b.iter().rposition(|&c| c != b' ' && c != b'\t').map_or(start, |p| p + 1);
    &b[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_host() {
        let buf = b"a84b4c76e66710@pc33.atlanta.com";
        let v = parse_call_id(buf).unwrap();
        assert_eq!(v.local_id.get(buf), b"a84b4c76e66710");
        assert_eq!(v.host.unwrap().get(buf), b"pc33.atlanta.com");
    }

    #[test]
    fn without_host() {
        let buf = b"1234567890";
        let v = parse_call_id(buf).unwrap();
        assert_eq!(v.local_id.get(buf), b"1234567890");
        assert!(v.host.is_none());
    }
}
