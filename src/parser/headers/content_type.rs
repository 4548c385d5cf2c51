//! `Content-Type` micro-parser (RFC 3261 §25.1): `m-type "/" m-subtype *(;param)`.
//!
//! Grounded on `ContentTypeHeader.cpp`. The fold-surviving reconstruction
//! exercised by S1 (`application/sdp; micalg=sha1;boundary=boundary42`) is
//! handled upstream by L1 storing fold bytes in the value span and the
//! consumer replacing them with a single space before handing the value to
//! this parser (see [`crate::processor::MessageProcessor`]).

use crate::error::Error;
use crate::span::{span_of, Span};

use super::super::params::{parse_param_list, Param};
use super::super::token::{is_token_char, skip_lws};

#[derive(Debug, Clone)]
pub struct ContentTypeView {
    pub m_type: Span,
    pub m_subtype: Span,
    pub params: Vec<Param>,
}

pub fn parse_content_type(value: &[u8]) -> Result<ContentTypeView, Error> {
    let mut i = skip_lws(value);
    let type_start = i;
    while i < value.len() && is_token_char(value[i]) {
        i += 1;
    }
    if i == type_start {
        return Err(Error::UnexpectedChar);
    }
    let m_type = span_of(value, &value[type_start..i]);
    if value.get(i) != Some(&b'/') {
        return Err(Error::UnexpectedChar);
    }
    i += 1;
    let subtype_start = i;
    while i < value.len() && is_token_char(value[i]) {
        i += 1;
    }
    if i == subtype_start {
        return Err(Error::UnexpectedChar);
    }
    let m_subtype = span_of(value, &value[subtype_start..i]);

    let (params, consumed) = parse_param_list(&value[i..])?;
    if i + consumed != value.len() {
        return Err(Error::UnexpectedChar);
    }
    Ok(ContentTypeView { m_type, m_subtype, params })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_folded_content_type() {
        let buf = b"application/sdp; micalg=sha1;boundary=boundary42";
        let v = parse_content_type(buf).unwrap();
        assert_eq!(v.m_type.get(buf), b"application");
        assert_eq!(v.m_subtype.get(buf), b"sdp");
        assert_eq!(v.params.len(), 2);
        assert_eq!(v.params[1].value.unwrap().get(buf), b"boundary42");
    }
}
