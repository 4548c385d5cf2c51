//! `Subject` micro-parser (RFC 3261 §20.36): free text that may
//! contain obsolete line folds. L1 keeps the fold bytes (CRLF SP/HTAB) in
//! the stored header-value span rather than stripping them, so this
//! micro-parser records the non-fold text segments and offers
//! [`SubjectView::reconstruct`] for callers that want the folds collapsed
//! to single spaces — mirroring `SubjectHeader.cpp`'s `getValue()`, which
//! does the same normalization.

use crate::span::{span_of, Span};

use super::super::utf8::text_utf8_char;
use super::super::whitespace::lws;
use nom::{branch::alt, multi::many0, IResult};

#[derive(Debug, Clone)]
pub struct SubjectView {
    pub raw: Span,
    pub segments: Vec<Span>,
}

/// `Subject = *(TEXT-UTF8char / LWS)`. Confirms the raw value is built only
/// from printable/UTF-8 text and linear whitespace, reusing the nom
/// combinators in [`super::super::utf8`] / [`super::super::whitespace`]
/// rather than re-deriving the UTF-8 continuation-byte rules by hand.
pub fn validate_subject_text(value: &[u8]) -> bool {
    fn grammar(input: &[u8]) -> IResult<&[u8], Vec<&[u8]>> {
        many0(alt((text_utf8_char, lws)))(input)
    }
    matches!(grammar(value), Ok((rest, _)) if rest.is_empty())
}

pub fn parse_subject(value: &[u8]) -> SubjectView {
    let raw = span_of(value, value);
    let mut segments = Vec::new();
    let mut seg_start = 0usize;
    let mut i = 0usize;
    while i < value.len() {
        let is_fold = (value[i] == b'\r' && value.get(i + 1) == Some(&b'\n') && matches!(value.get(i + 2), Some(b' ') | Some(b'\t')))
            || (value[i] == b'\n' && matches!(value.get(i + 1), Some(b' ') | Some(b'\t')));
        if is_fold {
            segments.push(span_of(value, &value[seg_start..i]));
            let skip = if value[i] == b'\r' { 2 } else { 1 };
            i += skip;
            while i < value.len() && matches!(value[i], b' ' | b'\t') {
                i += 1;
            }
            seg_start = i;
        } else {
            i += 1;
        }
    }
    segments.push(span_of(value, &value[seg_start..]));
    SubjectView { raw, segments }
}

impl SubjectView {
    /// Rebuilds the logical text with every fold replaced by a single space.
    pub fn reconstruct(&self, buf: &[u8]) -> String {
        self.segments
            .iter()
            .map(|s| String::from_utf8_lossy(s.get(buf)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
