//! Zero-copy offset/length references into a caller-owned byte buffer.
//!
//! Every parsed field the parser hands back — request-URI, header name, header
//! value, body, URI components, header parameters — is a [`Span`]. A `Span`
//! carries no lifetime and owns no bytes; it is only valid against the exact
//! buffer it was produced from.

use serde::{Deserialize, Serialize};

/// An offset/length pair into a buffer. Resolve with [`Span::get`].
///
/// A `Span` produced by a header-value micro-parser (L2) or the URI parser
/// (L3) is relative to the slice that parser was given — typically the
/// header's value span, not the whole message buffer. Callers composing
/// spans across layers add the parent span's `start` as a bias, the same way
/// a [`crate::processor::MessageProcessor`] biases L1 spans across chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: u32,
    pub len: u32,
}

impl Span {
    pub const EMPTY: Span = Span { start: 0, len: 0 };

    pub fn new(start: usize, len: usize) -> Self {
        Span { start: start as u32, len: len as u32 }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn end(&self) -> u32 {
        self.start + self.len
    }

    /// Resolve the span against the buffer it was parsed from.
    pub fn get<'b>(&self, buf: &'b [u8]) -> &'b [u8] {
        &buf[self.start as usize..self.start as usize + self.len as usize]
    }

    /// Shift this span so it is relative to `base` instead of relative to a
    /// slice that starts `base` bytes into the same buffer.
    pub fn offset_by(&self, base: u32) -> Span {
        Span { start: self.start + base, len: self.len }
    }
}

/// Computes the [`Span`] of a subslice within the slice it was parsed from.
///
/// `sub` must be a subslice of `base` (the usual case: `sub` is whatever a
/// `nom` combinator returned when called with `base`, or a later remainder of
/// it). The byte offset is derived from pointer arithmetic, not a value
/// search, so it is correct even when the matched bytes repeat elsewhere in
/// `base`.
pub fn span_of(base: &[u8], sub: &[u8]) -> Span {
    let base_ptr = base.as_ptr() as usize;
    let sub_ptr = sub.as_ptr() as usize;
    debug_assert!(sub_ptr >= base_ptr && sub_ptr + sub.len() <= base_ptr + base.len());
    Span::new(sub_ptr - base_ptr, sub.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_against_buffer() {
        let buf = b"hello world";
        let span = Span::new(6, 5);
        assert_eq!(span.get(buf), b"world");
    }

    #[test]
    fn span_of_subslice() {
        let buf = b"Via: SIP/2.0/UDP host";
        let sub = &buf[5..9];
        let span = span_of(buf, sub);
        assert_eq!(span.get(buf), b"SIP/");
    }

    #[test]
    fn offset_by_shifts_start_only() {
        let span = Span::new(3, 4);
        let shifted = span.offset_by(10);
        assert_eq!(shifted, Span::new(13, 4));
    }
}
