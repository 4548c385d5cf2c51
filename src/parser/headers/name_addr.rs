//! `From` / `To` / `Contact` micro-parser (RFC 3261 §20.20/§20.39/§20.10):
//!
//! ```text
//! name-addr = [ display-name ] LAQUOT addr-spec RAQUOT
//! addr-spec = SIP-URI / SIPS-URI / absoluteURI
//! ```
//!
//! `display-name` is either a quoted string or a run of bare tokens. The
//! hard part is the case with no angle brackets at all:
//! `From: sip:alice@atlanta.com;tag=1928301774`. A naive token-run scan
//! would consume `sip` as if it were a display name and then choke on the
//! `:`. On hitting `:` or `/` while scanning an unquoted "display name" we
//! restart from the position before that scan began and treat everything up
//! to the next `;`/`,`/end as a bare `addr-spec`, with no display name at
//! all — a jump back to a saved position, not byte-by-byte backtracking.
//!
//! Grounded on `FromHeader.cpp` / `ContactHeader.cpp`.

use crate::error::Error;
use crate::span::{span_of, Span};

use super::super::params::{parse_param_list, Param};
use super::super::params::parse_quoted_string;
use super::super::token::{is_token_char, skip_lws};

#[derive(Debug, Clone)]
pub struct NameAddr {
    pub display_name: Option<Span>,
    pub display_name_quoted: bool,
    pub uri: Span,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone)]
pub enum ContactEntry {
    /// The literal `Contact: *` (deregister-all-bindings) value.
    Star,
    Addr(NameAddr),
}

/// `From` / `To`: single name-addr value, no multi-value comma.
pub fn parse_from_to(value: &[u8]) -> Result<NameAddr, Error> {
    let (addr, consumed) = parse_one(value)?;
    let rest = trim(&value[consumed..]);
    if !rest.is_empty() {
        return Err(Error::UnexpectedChar);
    }
    Ok(addr)
}

/// `Contact`: `"*" / (1*(name-addr *(COMMA name-addr)))`.
pub fn parse_contact(value: &[u8]) -> Result<Vec<ContactEntry>, Error> {
    let trimmed = trim(value);
    if trimmed == b"*" {
        return Ok(vec![ContactEntry::Star]);
    }
    let mut out = Vec::new();
    let mut i = skip_lws(value);
    loop {
        if i >= value.len() {
            return Err(Error::NoData);
        }
        let (addr, consumed) = parse_one(&value[i..])?;
        out.push(ContactEntry::Addr(offset_addr(addr, i as u32)));
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

fn offset_addr(a: NameAddr, base: u32) -> NameAddr {
    NameAddr {
        display_name: a.display_name.map(|s| s.offset_by(base)),
        display_name_quoted: a.display_name_quoted,
        uri: a.uri.offset_by(base),
        params: a
            .params
            .into_iter()
            .map(|p| Param {
                name: p.name.offset_by(base),
                value: p.value.map(|s| s.offset_by(base)),
                quoted: p.quoted,
            })
            .collect(),
    }
}

fn parse_one(v: &[u8]) -> Result<(NameAddr, usize), Error> {
    let start = skip_lws(v);
    let (display_name, quoted, uri, after_uri) = if v.get(start) == Some(&b'"') {
        let (content, consumed) = parse_quoted_string(&v[start..])?;
        let mut i = start + consumed;
        i += skip_lws(&v[i..]);
        if v.get(i) != Some(&b'<') {
            return Err(Error::UnexpectedChar);
        }
        i += 1;
        let uri_start = i;
        let close = v[i..].iter().position(|&b| b == b'>').ok_or(Error::InvalidUrl)?;
        let uri = span_of(v, &v[uri_start..uri_start + close]);
        (Some(content.offset_by(start as u32)), true, uri, uri_start + close + 1)
    } else {
        let scan_start = start;
        let mut j = scan_start;
        let mut special: Option<u8> = None;
        loop {
            match v.get(j) {
                Some(b' ') | Some(b'\t') => j += 1,
                Some(&b) if is_token_char(b) => j += 1,
                Some(b'<') => {
                    special = Some(b'<');
                    break;
                }
                Some(b':') | Some(b'/') => {
                    special = Some(b':');
                    break;
                }
                _ => break,
            }
        }
        match special {
            Some(b'<') => {
                let display_end = trim_end_at(v, scan_start, j);
                let display = if display_end > scan_start { Some(span_of(v, &v[scan_start..display_end])) } else { None };
                let mut i = j + 1;
                let uri_start = i;
                let close = v[i..].iter().position(|&b| b == b'>').ok_or(Error::InvalidUrl)?;
                i = uri_start + close + 1;
                (display, false, span_of(v, &v[uri_start..uri_start + close]), i)
            }
            _ => {
                // Re-parse from scan_start as a bare addr-spec, no display name.
                let end = v[scan_start..]
                    .iter()
                    .position(|&b| b == b';' || b == b',')
                    .map_or(v.len(), |p| scan_start + p);
                (None, false, span_of(v, &v[scan_start..end]), end)
            }
        }
    };

    let (params, consumed_params) = parse_param_list(&v[after_uri..])?;
    Ok((NameAddr { display_name, display_name_quoted: quoted, uri, params }, after_uri + consumed_params))
}

fn trim_end_at(v: &[u8], start: usize, end: usize) -> usize {
    let mut e = end;
    while e > start && matches!(v[e - 1], b' ' | b'\t') {
        e -= 1;
    }
    e
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
    fn quoted_display_name_with_tag() {
        let buf = br#""A. G. Bell" <sip:agb@bell-telephone.com>;tag=a48s"#;
        let a = parse_from_to(buf).unwrap();
        assert!(a.display_name_quoted);
        assert_eq!(a.display_name.unwrap().get(buf), b"A. G. Bell");
        assert_eq!(a.uri.get(buf), b"sip:agb@bell-telephone.com");
        assert_eq!(a.params[0].value.unwrap().get(buf), b"a48s");
    }

    #[test]
    fn bare_token_display_name() {
        let buf = b"Bob <sip:bob@biloxi.com>";
        let a = parse_from_to(buf).unwrap();
        assert_eq!(a.display_name.unwrap().get(buf), b"Bob");
        assert_eq!(a.uri.get(buf), b"sip:bob@biloxi.com");
    }

    #[test]
    fn bare_uri_no_display_name_no_brackets() {
        let buf = b"sip:alice@atlanta.com;tag=1928301774";
        let a = parse_from_to(buf).unwrap();
        assert!(a.display_name.is_none());
        assert_eq!(a.uri.get(buf), b"sip:alice@atlanta.com");
        assert_eq!(a.params[0].value.unwrap().get(buf), b"1928301774");
    }

    #[test]
    fn contact_star() {
        let entries = parse_contact(b" * ").unwrap();
        assert!(matches!(entries[0], ContactEntry::Star));
    }

    #[test]
    fn contact_multi_value() {
        let buf = b"<sip:alice@pc1.atlanta.com>;q=1.0, <sip:alice@pc2.atlanta.com>;q=0.5";
        let entries = parse_contact(buf).unwrap();
        assert_eq!(entries.len(), 2);
        match &entries[0] {
            ContactEntry::Addr(a) => assert_eq!(a.uri.get(buf), b"sip:alice@pc1.atlanta.com"),
            _ => panic!("expected addr"),
        }
    }
}
