//! `Via` micro-parser (RFC 3261 §20.42):
//!
//! ```text
//! via-parm = sent-protocol LWS sent-by *( SEMI via-params )
//! sent-protocol = protocol-name SLASH protocol-version SLASH transport
//! sent-by = host [ COLON port ]
//! ```
//!
//! Multiple `via-parm`s may appear comma-separated in one header value.
//! Grounded on `ViaHeader.cpp` for the sent-protocol/sent-by split and the
//! `branch` quick-access slot (every transaction-identifying proxy hop
//! needs fast access to it without re-walking the parameter list).

use crate::error::Error;
use crate::span::{span_of, Span};

use super::super::params::{parse_param_list, Param};
use super::super::token::{is_host_char, is_ipv6_char, is_token_char, skip_lws};

#[derive(Debug, Clone)]
pub struct ViaParm {
    pub protocol_name: Span,
    pub protocol_version: Span,
    pub transport: Span,
    pub host: Span,
    pub host_is_ipv6: bool,
    pub port: Option<Span>,
    pub params: Vec<Param>,
    pub branch: Option<Span>,
}

pub fn parse_via(value: &[u8]) -> Result<Vec<ViaParm>, Error> {
    let mut out = Vec::new();
    let mut i = skip_lws(value);
    loop {
        if i >= value.len() {
            return Err(Error::NoData);
        }
        let (parm, consumed) = parse_one(&value[i..])?;
        out.push(parm.offset(i as u32));
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

fn parse_one(v: &[u8]) -> Result<(ViaParm, usize), Error> {
    let mut i = 0;
    let name_end = take_token(v, i);
    if name_end == i {
        return Err(Error::UnexpectedChar);
    }
    let protocol_name = span_of(v, &v[i..name_end]);
    i = name_end;
    if v.get(i) != Some(&b'/') {
        return Err(Error::UnexpectedChar);
    }
    i += 1;
    let ver_end = take_token(v, i);
    if ver_end == i {
        return Err(Error::UnexpectedChar);
    }
    let protocol_version = span_of(v, &v[i..ver_end]);
    i = ver_end;
    if v.get(i) != Some(&b'/') {
        return Err(Error::UnexpectedChar);
    }
    i += 1;
    let transport_end = take_token(v, i);
    if transport_end == i {
        return Err(Error::UnexpectedChar);
    }
    let transport = span_of(v, &v[i..transport_end]);
    i = transport_end;

    let ws = skip_lws(&v[i..]);
    if ws == 0 {
        return Err(Error::UnexpectedChar);
    }
    i += ws;

    let (host, host_is_ipv6, after_host) = if v.get(i) == Some(&b'[') {
        let close = v[i..].iter().position(|&b| b == b']').ok_or(Error::InvalidHost)?;
        let body = &v[i + 1..i + close];
        if !body.iter().all(|&b| is_ipv6_char(b)) {
            return Err(Error::InvalidHost);
        }
        (span_of(v, body), true, i + close + 1)
    } else {
        let end = host_end(v, i);
        if end == i {
            return Err(Error::InvalidHost);
        }
        (span_of(v, &v[i..end]), false, end)
    };
    i = after_host;

    let port = if v.get(i) == Some(&b':') {
        let start = i + 1;
        let mut j = start;
        while j < v.len() && v[j].is_ascii_digit() {
            j += 1;
        }
        if j == start {
            return Err(Error::InvalidPort);
        }
        i = j;
        Some(span_of(v, &v[start..j]))
    } else {
        None
    };

    let (params, consumed_params) = parse_param_list(&v[i..])?;
    let value_end = i + consumed_params;

    let branch = params
        .iter()
        .find(|p| p.name.get(v).eq_ignore_ascii_case(b"branch"))
        .and_then(|p| p.value);

    Ok((
        ViaParm { protocol_name, protocol_version, transport, host, host_is_ipv6, port, params, branch },
        value_end,
    ))
}

fn take_token(v: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < v.len() && is_token_char(v[i]) {
        i += 1;
    }
    i
}

fn host_end(v: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < v.len() && is_host_char(v[i]) {
        i += 1;
    }
    i
}

impl ViaParm {
    /// Rebases every span in this via-parm by `base`, used when splicing the
    /// byte offset of the sub-slice `parse_one` was handed back into the
    /// caller's original value span.
    fn offset(self, base: u32) -> Self {
        ViaParm {
            protocol_name: self.protocol_name.offset_by(base),
            protocol_version: self.protocol_version.offset_by(base),
            transport: self.transport.offset_by(base),
            host: self.host.offset_by(base),
            host_is_ipv6: self.host_is_ipv6,
            port: self.port.map(|s| s.offset_by(base)),
            params: self
                .params
                .into_iter()
                .map(|p| Param {
                    name: p.name.offset_by(base),
                    value: p.value.map(|s| s.offset_by(base)),
                    quoted: p.quoted,
                })
                .collect(),
            branch: self.branch.map(|s| s.offset_by(base)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s6_folded_single_via_parm() {
        let buf = b"SIP/2.0/UDP first.example.com:4000;branch=z9hG4bKa7c6a8dlze.1";
        let parms = parse_via(buf).unwrap();
        assert_eq!(parms.len(), 1);
        let p = &parms[0];
        assert_eq!(p.protocol_name.get(buf), b"SIP");
        assert_eq!(p.protocol_version.get(buf), b"2.0");
        assert_eq!(p.transport.get(buf), b"UDP");
        assert_eq!(p.host.get(buf), b"first.example.com");
        assert_eq!(p.port.unwrap().get(buf), b"4000");
        assert_eq!(p.params.len(), 1);
        assert_eq!(p.branch.unwrap().get(buf), b"z9hG4bKa7c6a8dlze.1");
        assert_eq!(p.branch, p.params[0].value);
    }

    #[test]
    fn multiple_via_parms() {
        let buf = b"SIP/2.0/UDP a.example.com, SIP/2.0/UDP b.example.com:5060;ttl=1";
        let parms = parse_via(buf).unwrap();
        assert_eq!(parms.len(), 2);
        assert_eq!(parms[1].host.get(buf), b"b.example.com");
        assert_eq!(parms[1].port.unwrap().get(buf), b"5060");
    }

    #[test]
    fn ipv6_host() {
        let buf = b"SIP/2.0/UDP [2001:db8::9:1];branch=z9hG4bK1";
        let parms = parse_via(buf).unwrap();
        assert!(parms[0].host_is_ipv6);
        assert_eq!(parms[0].host.get(buf), b"2001:db8::9:1");
    }
}
