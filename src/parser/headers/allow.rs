//! `Allow` micro-parser (RFC 3261 §25.1): a comma-separated list of method
//! names, each matched against the fourteen recognized methods via
//! [`Method::from_token`] — the same ladder-equivalent matching L1 uses on
//! the start line, applied here to already-isolated tokens.
//!
//! Grounded on `AllowHeader.cpp`.

use crate::error::Error;
use crate::method::Method;

use super::super::token::skip_lws;

pub fn parse_allow(value: &[u8]) -> Result<Vec<Method>, Error> {
    let mut out = Vec::new();
    let mut i = skip_lws(value);
    if i >= value.len() {
        return Ok(out);
    }
    loop {
        let start = i;
        while i < value.len() && value[i].is_ascii_alphabetic() {
            i += 1;
        }
        if i == start {
            return Err(Error::UnexpectedChar);
        }
        let method = Method::from_token(&value[start..i]).ok_or(Error::InvalidMethod)?;
        out.push(method);
        i += skip_lws(&value[i..]);
        if value.get(i) == Some(&b',') {
            i += 1;
            i += skip_lws(&value[i..]);
            continue;
        }
        break;
    }
    if i != value.len() {
        return Err(Error::UnexpectedChar);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_of_methods() {
        let methods = parse_allow(b"INVITE, ACK, CANCEL, OPTIONS, BYE").unwrap();
        assert_eq!(
            methods,
            vec![Method::Invite, Method::Ack, Method::Cancel, Method::Options, Method::Bye]
        );
    }

    #[test]
    fn unknown_method_name_errors() {
        assert_eq!(parse_allow(b"FROBNICATE").unwrap_err(), Error::InvalidMethod);
    }
}
