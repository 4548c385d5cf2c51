//! L3: the SIP-URI parser (RFC 3261 §19.1).
//!
//! Consumes an already-isolated URI span — the request-URI from L1, or the
//! `<...>`/bare-URI span a name-addr micro-parser (`From`/`To`/`Contact`)
//! peeled off — and decomposes it into scheme, userinfo, host, port,
//! parameters and headers. No percent-decoding and no allocation: every
//! component is a [`Span`] into the slice this parser was given.
//!
//! The userinfo/host disambiguation by scanning for `'@'` and the
//! IPv6-bracket handling follow `SipUri.cpp` in the ported parser; the
//! scheme/userinfo/host/port split into separate conceptual stages matches a
//! `parser/uri/` module layout seen elsewhere in the SIP-parser corpus,
//! reimplemented here as one hand-scanned pass rather than nom combinators.

use crate::error::Error;
use crate::span::{span_of, Span};

use super::token::{is_host_char, is_ipv6_char, is_token_char};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriView {
    pub scheme: Span,
    pub user: Option<Span>,
    pub password: Option<Span>,
    /// Host span. For an IPv6 literal, the `[` `]` brackets are *excluded*.
    pub host: Span,
    pub host_is_ipv6: bool,
    pub port: Option<Span>,
    pub params: Vec<(Span, Option<Span>)>,
    pub headers: Vec<(Span, Span)>,
}

/// Parses a SIP/SIPS URI span. Does not validate that `scheme` is literally
/// `sip`/`sips`; that check is a caller concern (the request-URI of an
/// arbitrary scheme is still framed correctly by L1, and name-addr parsing
/// only hands this parser a URI it already believes is SIP).
pub fn parse_uri(input: &[u8]) -> Result<UriView, Error> {
    let colon = input.iter().position(|&b| b == b':').ok_or(Error::InvalidUrl)?;
    if colon == 0 {
        return Err(Error::InvalidUrl);
    }
    let scheme = span_of(input, &input[..colon]);
    let rest = &input[colon + 1..];
    let rest_base = colon + 1;

    // userinfo vs. host-only: find an '@' that terminates the userinfo
    // section, bounded by the first ';' or '?' — a bounded one-step retry:
    // if scanning for '@' runs past where the host must start, there is no
    // userinfo at all.
    let boundary = rest
        .iter()
        .position(|&b| b == b';' || b == b'?')
        .unwrap_or(rest.len());
    let at = rest[..boundary].iter().position(|&b| b == b'@');

    let (userinfo, host_start) = match at {
        Some(pos) => (Some(&rest[..pos]), pos + 1),
        None => (None, 0),
    };

    let (user, password) = match userinfo {
        None => (None, None),
        Some(ui) => match ui.iter().position(|&b| b == b':') {
            Some(cpos) => (
                Some(span_of(rest, &ui[..cpos]).offset_by(rest_base as u32)),
                Some(span_of(rest, &ui[cpos + 1..]).offset_by(rest_base as u32)),
            ),
            None => (Some(span_of(rest, ui).offset_by(rest_base as u32)), None),
        },
    };

    let host_section = &rest[host_start..];
    let host_section_base = rest_base + host_start;

    let (host, host_is_ipv6, after_host) = if host_section.first() == Some(&b'[') {
        let close = host_section.iter().position(|&b| b == b']').ok_or(Error::InvalidHost)?;
        let body = &host_section[1..close];
        if !body.iter().all(|&b| is_ipv6_char(b)) {
            return Err(Error::InvalidHost);
        }
        (span_of(host_section, body).offset_by(host_section_base as u32), true, close + 1)
    } else {
        let end = host_section
            .iter()
            .position(|&b| !is_host_char(b))
            .unwrap_or(host_section.len());
        if end == 0 {
            return Err(Error::InvalidHost);
        }
        (
            span_of(host_section, &host_section[..end]).offset_by(host_section_base as u32),
            false,
            end,
        )
    };

    let mut i = host_start + after_host;

    let port = if rest.get(i) == Some(&b':') {
        let port_start = i + 1;
        let mut j = port_start;
        while j < rest.len() && rest[j].is_ascii_digit() {
            j += 1;
        }
        if j == port_start {
            return Err(Error::InvalidPort);
        }
        i = j;
        Some(span_of(rest, &rest[port_start..j]).offset_by(rest_base as u32))
    } else {
        None
    };

    let mut params = Vec::new();
    while rest.get(i) == Some(&b';') {
        i += 1;
        let name_start = i;
        while i < rest.len() && is_uri_param_char(rest[i]) {
            i += 1;
        }
        if i == name_start {
            return Err(Error::InvalidUrl);
        }
        let name = span_of(rest, &rest[name_start..i]).offset_by(rest_base as u32);
        let value = if rest.get(i) == Some(&b'=') {
            i += 1;
            let value_start = i;
            while i < rest.len() && is_uri_param_char(rest[i]) {
                i += 1;
            }
            Some(span_of(rest, &rest[value_start..i]).offset_by(rest_base as u32))
        } else {
            None
        };
        params.push((name, value));
    }

    let mut headers = Vec::new();
    if rest.get(i) == Some(&b'?') {
        i += 1;
        loop {
            let name_start = i;
            while i < rest.len() && rest[i] != b'=' && rest[i] != b'&' {
                i += 1;
            }
            if i == name_start || rest.get(i) != Some(&b'=') {
                return Err(Error::InvalidQueryString);
            }
            let name = span_of(rest, &rest[name_start..i]).offset_by(rest_base as u32);
            i += 1;
            let value_start = i;
            while i < rest.len() && rest[i] != b'&' {
                i += 1;
            }
            let value = span_of(rest, &rest[value_start..i]).offset_by(rest_base as u32);
            headers.push((name, value));
            if rest.get(i) == Some(&b'&') {
                i += 1;
                continue;
            }
            break;
        }
    }

    if i != rest.len() {
        return Err(Error::InvalidUrl);
    }

    Ok(UriView { scheme, user, password, host, host_is_ipv6, port, params, headers })
}

fn is_uri_param_char(b: u8) -> bool {
    is_token_char(b) || matches!(b, b'[' | b']' | b'/' | b':' | b'&' | b'+' | b'$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_sip_uri() {
        let buf = b"sip:watson@boston.bell-tel.com";
        let uri = parse_uri(buf).unwrap();
        assert_eq!(uri.scheme.get(buf), b"sip");
        assert_eq!(uri.user.unwrap().get(buf), b"watson");
        assert_eq!(uri.host.get(buf), b"boston.bell-tel.com");
        assert!(uri.port.is_none());
    }

    #[test]
    fn userinfo_password_and_port() {
        let buf = b"sip:alice:secret@192.168.1.1:5060";
        let uri = parse_uri(buf).unwrap();
        assert_eq!(uri.user.unwrap().get(buf), b"alice");
        assert_eq!(uri.password.unwrap().get(buf), b"secret");
        assert_eq!(uri.host.get(buf), b"192.168.1.1");
        assert_eq!(uri.port.unwrap().get(buf), b"5060");
    }

    #[test]
    fn ipv6_host_excludes_brackets() {
        let buf = b"sip:bob@[2001:db8::1]:5060";
        let uri = parse_uri(buf).unwrap();
        assert!(uri.host_is_ipv6);
        assert_eq!(uri.host.get(buf), b"2001:db8::1");
        assert_eq!(uri.port.unwrap().get(buf), b"5060");
    }

    #[test]
    fn no_userinfo_host_only() {
        let buf = b"sip:example.com;transport=tcp";
        let uri = parse_uri(buf).unwrap();
        assert!(uri.user.is_none());
        assert_eq!(uri.host.get(buf), b"example.com");
        assert_eq!(uri.params[0].0.get(buf), b"transport");
        assert_eq!(uri.params[0].1.unwrap().get(buf), b"tcp");
    }

    #[test]
    fn params_and_headers() {
        let buf = b"sip:carol@chicago.com;method=INVITE?Subject=project&priority=urgent";
        let uri = parse_uri(buf).unwrap();
        assert_eq!(uri.params.len(), 1);
        assert_eq!(uri.headers.len(), 2);
        assert_eq!(uri.headers[0].0.get(buf), b"Subject");
        assert_eq!(uri.headers[1].1.get(buf), b"urgent");
    }
}
