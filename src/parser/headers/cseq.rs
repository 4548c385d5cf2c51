//! `CSeq` micro-parser (RFC 3261 §25.1): `1*DIGIT LWS Method`.
//!
//! Grounded on `CSeqHeader.cpp` in the ported parser: the sequence number
//! is bounded to fit a signed 32-bit range (`MaxRange` on overflow) and the
//! method name reuses the same ladder-style matching L1 uses on the start
//! line, here applied to an already-isolated token via [`Method::from_token`].

use crate::error::Error;
use crate::method::Method;

use super::super::token::skip_lws;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CSeqView {
    pub sequence: u32,
    pub method: Method,
}

pub fn parse_cseq(value: &[u8]) -> Result<CSeqView, Error> {
    if value.is_empty() {
        return Err(Error::NoData);
    }
    let digit_end = value.iter().position(|b| !b.is_ascii_digit()).unwrap_or(value.len());
    if digit_end == 0 {
        return Err(Error::UnexpectedChar);
    }
    let digits = std::str::from_utf8(&value[..digit_end]).map_err(|_| Error::UnexpectedChar)?;
    let sequence: u64 = digits.parse().map_err(|_| Error::MaxRange)?;
    if sequence > i32::MAX as u64 {
        return Err(Error::MaxRange);
    }

    let rest = &value[digit_end..];
    let ws = skip_lws(rest);
    if ws == 0 {
        return Err(Error::UnexpectedChar);
    }
    let method_token = trim_end(&rest[ws..]);
    let method = Method::from_token(method_token).ok_or(Error::InvalidMethod)?;

    Ok(CSeqView { sequence: sequence as u32, method })
}

fn trim_end(b: &[u8]) -> &[u8] {
    let end = b.iter().rposition(|&c| c != b' ' && c != b'\t').map_or(0, |p| p + 1);
    &b[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_cseq() {
        let v = parse_cseq(b"314159 INVITE").unwrap();
        assert_eq!(v.sequence, 314159);
        assert_eq!(v.method, Method::Invite);
    }

    #[test]
    fn overflow_is_max_range() {
        assert_eq!(parse_cseq(b"99999999999 INVITE").unwrap_err(), Error::MaxRange);
    }

    #[test]
    fn unknown_method_is_invalid_method() {
        assert_eq!(parse_cseq(b"1 BOGUS").unwrap_err(), Error::InvalidMethod);
    }

    #[test]
    fn missing_method_is_unexpected_char() {
        assert_eq!(parse_cseq(b"1").unwrap_err(), Error::UnexpectedChar);
    }
}
