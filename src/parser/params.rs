//! The parameter-list grammar shared by every L2 micro-parser and by L3's
//! URI parameters:
//!
//! ```text
//! *( ";" name [ "=" value ] )
//! value = token / quoted-string
//! ```
//!
//! A comma at the top level of the stream (outside any quoted string) ends
//! the current item and is left unconsumed, so multi-value headers (Via,
//! Contact, Accept*) can resume the outer comma-split loop from there.

use ordered_float::OrderedFloat;

use crate::error::Error;
use crate::span::{span_of, Span};

use super::token::is_token_char;

/// One `name[=value]` parameter. `value` excludes the surrounding quotes;
/// `quoted` records whether the source wrote it as a quoted-string at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: Span,
    pub value: Option<Span>,
    pub quoted: bool,
}

impl Param {
    /// Looks up `name` (case-insensitively) in a parameter list and parses
    /// its value as a `qvalue` (RFC 3261 `"0" ["." 0*3DIGIT]` / `"1" ["." 0*3("0")]`),
    /// the form used by `Accept*`'s and `Contact`'s `q` parameter to rank
    /// alternatives. `OrderedFloat` gives callers a sortable, totally
    /// ordered key without pulling in a second float-comparison scheme.
    pub fn find_q(params: &[Param], buf: &[u8]) -> Option<OrderedFloat<f64>> {
        params
            .iter()
            .find(|p| p.name.get(buf).eq_ignore_ascii_case(b"q"))
            .and_then(|p| p.value)
            .and_then(|v| std::str::from_utf8(v.get(buf)).ok())
            .and_then(|s| s.parse::<f64>().ok())
            .map(OrderedFloat)
    }
}

/// Parses a `\"…\"` quoted-string starting at `input[0] == b'"'`. Returns the
/// content span (quotes excluded, escapes left unresolved — spans never
/// allocate) and the total byte count consumed including both quotes.
///
/// `\` is a single-character escape: `\"` does not close the string, `\\`
/// consumes one literal backslash. A raw CR or LF inside the string is
/// rejected.
pub fn parse_quoted_string(input: &[u8]) -> Result<(Span, usize), Error> {
    debug_assert_eq!(input.first(), Some(&b'"'));
    let mut i = 1;
    let content_start = 1;
    while i < input.len() {
        match input[i] {
            b'"' => return Ok((span_of(input, &input[content_start..i]), i + 1)),
            b'\\' => {
                if i + 1 >= input.len() || matches!(input[i + 1], b'\r' | b'\n') {
                    return Err(Error::UnexpectedChar);
                }
                i += 2;
            }
            b'\r' | b'\n' => return Err(Error::UnexpectedChar),
            _ => i += 1,
        }
    }
    Err(Error::UnexpectedChar)
}

/// Parses `*(";" name ["=" value])` from the start of `input`. Stops at a
/// top-level `,` (left unconsumed) or end of input. Returns the parameters
/// found and the number of bytes consumed from `input`.
pub fn parse_param_list(input: &[u8]) -> Result<(Vec<Param>, usize), Error> {
    let mut params = Vec::new();
    let mut i = super::token::skip_lws(input);

    loop {
        if i >= input.len() || input[i] == b',' {
            return Ok((params, i));
        }
        if input[i] != b';' {
            return Err(Error::UnexpectedChar);
        }
        i += 1;
        i += super::token::skip_lws(&input[i..]);

        let name_start = i;
        while i < input.len() && is_token_char(input[i]) {
            i += 1;
        }
        if i == name_start {
            return Err(Error::UnexpectedChar);
        }
        let name = span_of(input, &input[name_start..i]);
        i += super::token::skip_lws(&input[i..]);

        let mut value = None;
        let mut quoted = false;
        if i < input.len() && input[i] == b'=' {
            i += 1;
            i += super::token::skip_lws(&input[i..]);
            if i < input.len() && input[i] == b'"' {
                let (content, consumed) = parse_quoted_string(&input[i..])?;
                value = Some(content.offset_by(i as u32));
                quoted = true;
                i += consumed;
            } else {
                let value_start = i;
                while i < input.len() && is_token_char(input[i]) {
                    i += 1;
                }
                if i == value_start {
                    return Err(Error::UnexpectedChar);
                }
                value = Some(span_of(input, &input[value_start..i]));
            }
        }

        params.push(Param { name, value, quoted });
        i += super::token::skip_lws(&input[i..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_and_valued_params() {
        let input = b";lr;ttl=70;foo=\"ba\\\"r\"";
        let (params, consumed) = parse_param_list(input).unwrap();
        assert_eq!(consumed, input.len());
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].name.get(input), b"lr");
        assert_eq!(params[0].value, None);
        assert_eq!(params[1].value.unwrap().get(input), b"70");
        assert!(params[2].quoted);
        assert_eq!(params[2].value.unwrap().get(input), b"ba\\\"r");
    }

    #[test]
    fn stops_at_top_level_comma() {
        let input = b";branch=z9hG4bK776a, SIP/2.0/UDP next.host";
        let (params, consumed) = parse_param_list(input).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(&input[consumed..consumed + 1], b",");
    }

    #[test]
    fn no_params_is_empty() {
        let (params, consumed) = parse_param_list(b"").unwrap();
        assert!(params.is_empty());
        assert_eq!(consumed, 0);
    }

    #[test]
    fn find_q_parses_qvalue() {
        let input = b";q=0.7;expires=3600";
        let (params, _) = parse_param_list(input).unwrap();
        assert_eq!(Param::find_q(&params, input), Some(ordered_float::OrderedFloat(0.7)));
    }

    #[test]
    fn find_q_absent_is_none() {
        let input = b";expires=3600";
        let (params, _) = parse_param_list(input).unwrap();
        assert_eq!(Param::find_q(&params, input), None);
    }
}
