//! `Accept`, `Accept-Encoding`, `Accept-Language` micro-parsers (spec
//! §4.2): all three are comma-separated lists of a primary token (or
//! `type/subtype` for `Accept`) plus optional `q`/vendor parameters.
//!
//! Grounded on `AcceptHeader.cpp` / `AcceptEncodingHeader.cpp` /
//! `AcceptLanguageHeader.cpp`, which share this same shape in the ported
//! parser.

use crate::error::Error;
use crate::span::{span_of, Span};

use super::super::params::{parse_param_list, Param};
use super::super::token::{is_token_char, skip_lws};

#[derive(Debug, Clone)]
pub struct AcceptValue {
    pub m_type: Span,
    pub m_subtype: Span,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone)]
pub struct SingleTokenValue {
    pub token: Span,
    pub params: Vec<Param>,
}

pub fn parse_accept(value: &[u8]) -> Result<Vec<AcceptValue>, Error> {
    parse_comma_list(value, |v, base| {
        let mut i = 0;
        let type_start = i;
        while i < v.len() && is_token_char(v[i]) {
            i += 1;
        }
        if i == type_start {
            return Err(Error::UnexpectedChar);
        }
        let m_type = span_of(v, &v[type_start..i]).offset_by(base);
        if v.get(i) != Some(&b'/') {
            return Err(Error::UnexpectedChar);
        }
        i += 1;
        let sub_start = i;
        while i < v.len() && is_token_char(v[i]) {
            i += 1;
        }
        if i == sub_start {
            return Err(Error::UnexpectedChar);
        }
        let m_subtype = span_of(v, &v[sub_start..i]).offset_by(base);
        let (params, consumed) = parse_param_list(&v[i..])?;
        let params = params
            .into_iter()
            .map(|p| Param { name: p.name.offset_by(base + i as u32), value: p.value.map(|s| s.offset_by(base + i as u32)), quoted: p.quoted })
            .collect();
        Ok((AcceptValue { m_type, m_subtype, params }, i + consumed))
    })
}

pub fn parse_accept_encoding(value: &[u8]) -> Result<Vec<SingleTokenValue>, Error> {
    parse_single_token_list(value)
}

pub fn parse_accept_language(value: &[u8]) -> Result<Vec<SingleTokenValue>, Error> {
    parse_single_token_list(value)
}

fn parse_single_token_list(value: &[u8]) -> Result<Vec<SingleTokenValue>, Error> {
    parse_comma_list(value, |v, base| {
        let mut i = 0;
        // language-range additionally allows '-' inside the token, already
        // covered by is_token_char.
        let tok_start = i;
        while i < v.len() && is_token_char(v[i]) {
            i += 1;
        }
        if i == tok_start {
            return Err(Error::UnexpectedChar);
        }
        let token = span_of(v, &v[tok_start..i]).offset_by(base);
        let (params, consumed) = parse_param_list(&v[i..])?;
        let params = params
            .into_iter()
            .map(|p| Param { name: p.name.offset_by(base + i as u32), value: p.value.map(|s| s.offset_by(base + i as u32)), quoted: p.quoted })
            .collect();
        Ok((SingleTokenValue { token, params }, i + consumed))
    })
}

fn parse_comma_list<T>(
    value: &[u8],
    mut parse_item: impl FnMut(&[u8], u32) -> Result<(T, usize), Error>,
) -> Result<Vec<T>, Error> {
    let mut out = Vec::new();
    let mut i = skip_lws(value);
    if i >= value.len() {
        return Ok(out);
    }
    loop {
        let (item, consumed) = parse_item(&value[i..], i as u32)?;
        out.push(item);
        i += consumed;
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
