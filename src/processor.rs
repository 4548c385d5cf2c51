//! Consumer-level message aggregation on top of [`crate::message::Parser`].
//! Bias-adjustment of spans across chunks is a consumer responsibility, not
//! something L1 itself tracks.
//!
//! L1 hands back spans relative to whatever slice was passed to a single
//! `execute()` call. A connection fed in arbitrary TCP-sized chunks needs
//! those spans rebased against the bytes accumulated so far, and needs the
//! field/value fragments of a single header — split across a chunk boundary
//! mid-capture — stitched back into one span. `MessageProcessor` owns both
//! jobs and hands back whole [`ParsedMessage`]s.
//!
//! Grounded on `MessageProcessor.cpp`'s `MessageReceived`/`on_header_field`/
//! `on_header_value` (the `bias` field there is this module's `chunk_base`;
//! the `currpos->fieldpos.start == 0` / accumulate-length pattern there is
//! `Building::push_field`/`push_value` here). One deliberate departure: the
//! original's callbacks receive the `sip_parser*` and read `p->method`,
//! `p->status_code` etc. directly from it while parsing is still in
//! progress. This crate's [`crate::message::Callbacks`] methods take no such
//! back-reference (so a callback can never alias the `&mut Parser` that's
//! mid-`execute`), so `ParsedMessage` recovers the method token, status
//! code, and SIP version by re-scanning the bytes just outside the
//! already-captured URL/status spans instead of reading parser state — see
//! `recover_method`/`recover_version`/`recover_status_code` below. This keeps
//! `MessageProcessor` correct even when several messages complete inside one
//! `feed()` call (RFC 3261's pipelining case), where reading live parser
//! accessors after the fact would only ever reflect the last message.

use std::collections::VecDeque;

use crate::error::Error;
use crate::header_name;
use crate::message::{Callbacks, MessageKind, Mode, Parser};
use crate::method::Method;
use crate::span::Span;

/// One fully reassembled message, its spans rebased against `buf` (the
/// bytes of exactly this message — the request-line/status-line, headers,
/// and body, nothing from neighboring messages).
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    pub buf: Vec<u8>,
    pub kind: MessageKind,
    pub method: Option<Method>,
    pub status_code: Option<u16>,
    pub version: (u16, u16),
    pub request_url: Option<Span>,
    pub reason_phrase: Option<Span>,
    /// In source order, exactly as they appeared (including repeats).
    pub headers: Vec<(Span, Span)>,
    pub body: Span,
    pub should_keep_alive: bool,
}

impl ParsedMessage {
    /// Looks up a header by its canonical long-form name, accepting a
    /// source that wrote the single-letter compact form instead (`v` for
    /// `Via`, `l` for `Content-Length`, etc. — RFC 3261 §7.3.3).
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(f, _)| header_name::matches(f.get(&self.buf), name))
            .map(|(_, v)| v.get(&self.buf))
    }

    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a [u8]> {
        self.headers
            .iter()
            .filter(move |(f, _)| header_name::matches(f.get(&self.buf), name))
            .map(move |(_, v)| v.get(&self.buf))
    }
}

#[derive(Debug, Default)]
enum LastElement {
    #[default]
    None,
    Field,
    Value,
}

#[derive(Debug, Default)]
struct Building {
    message_start: u32,
    /// Running high-water mark of every absolute span end recorded for this
    /// message so far (URL/status/header/body). Used as `message_end` at
    /// completion instead of `buffer.len()` — see the note on `Collector`
    /// below for why `buffer.len()` can't be trusted for this.
    end_cursor: u32,
    request_url: Option<Span>,
    reason_phrase: Option<Span>,
    headers: Vec<(Span, Span)>,
    current_field: Option<Span>,
    current_value: Option<Span>,
    last_element: LastElement,
    body: Option<Span>,
}

impl Building {
    fn close_pending_header(&mut self) {
        if let (Some(f), Some(v)) = (self.current_field.take(), self.current_value.take()) {
            self.headers.push((f, v));
        }
        self.last_element = LastElement::None;
    }

    fn push_field(&mut self, span: Span) {
        if !matches!(self.last_element, LastElement::Field) {
            self.close_pending_header();
        }
        self.current_field = Some(match self.current_field {
            Some(existing) => Span { start: existing.start, len: existing.len + span.len },
            None => span,
        });
        self.last_element = LastElement::Field;
        self.end_cursor = self.end_cursor.max(span.end());
    }

    fn push_value(&mut self, span: Span) {
        self.current_value = Some(match self.current_value {
            Some(existing) => Span { start: existing.start, len: existing.len + span.len },
            None => span,
        });
        self.last_element = LastElement::Value;
        self.end_cursor = self.end_cursor.max(span.end());
    }
}

/// Driven as [`Callbacks`] by [`MessageProcessor::feed`]; owns everything
/// that has to survive a single `execute()` call (the accumulation buffer,
/// the message currently being built, and any messages that finished during
/// the call but haven't been handed to the caller yet).
///
/// `feed()` appends the *entire* incoming chunk to `buffer` before handing
/// it to `Parser::execute` (so spans reported mid-chunk can be resolved
/// immediately). That means `buffer.len()` reflects the end of the whole
/// chunk the moment `feed()` is called, not how far the parser has actually
/// progressed through it — it cannot be used to learn "where are we right
/// now" from inside a callback. Every absolute position this collector
/// needs (a message's start, its end, the next message's floor) is instead
/// derived from the spans the parser actually reports (`abs()`,
/// `end_cursor`) or, for the one position with no span at all
/// (`on_message_begin`), from `next_floor` plus a forward scan over the
/// leading CRLFs `Parser::execute`'s `Start` state itself skips — `buffer`
/// already holds those bytes by the time the callback fires.
struct Collector {
    buffer: Vec<u8>,
    chunk_base: u32,
    /// Absolute offset the next message cannot start before: the previous
    /// message's end, or 0 before the first message.
    next_floor: u32,
    building: Building,
    ready: VecDeque<ParsedMessage>,
}

impl Collector {
    fn new() -> Self {
        Collector { buffer: Vec::new(), chunk_base: 0, next_floor: 0, building: Building::default(), ready: VecDeque::new() }
    }

    fn begin_chunk(&mut self, data: &[u8]) {
        self.chunk_base = self.buffer.len() as u32;
        self.buffer.extend_from_slice(data);
    }

    fn abs(&self, span: Span) -> Span {
        span.offset_by(self.chunk_base)
    }
}

/// Scans forward from `from` over `CR`/`LF` bytes, mirroring the leading
/// whitespace skip in `Parser`'s `Start` state, to find the true first byte
/// of the next message.
fn skip_leading_crlf(buf: &[u8], from: u32) -> u32 {
    let mut i = from as usize;
    while i < buf.len() && (buf[i] == b'\r' || buf[i] == b'\n') {
        i += 1;
    }
    i as u32
}

impl Callbacks for Collector {
    fn on_message_begin(&mut self) -> i32 {
        let start = skip_leading_crlf(&self.buffer, self.next_floor);
        self.building = Building { message_start: start, end_cursor: start, ..Building::default() };
        0
    }

    fn on_url(&mut self, span: Span) -> i32 {
        let abs = self.abs(span);
        self.building.request_url = Some(match self.building.request_url {
            Some(existing) => Span { start: existing.start, len: existing.len + abs.len },
            None => abs,
        });
        self.building.end_cursor = self.building.end_cursor.max(abs.end());
        0
    }

    fn on_status(&mut self, span: Span) -> i32 {
        let abs = self.abs(span);
        self.building.reason_phrase = Some(match self.building.reason_phrase {
            Some(existing) => Span { start: existing.start, len: existing.len + abs.len },
            None => abs,
        });
        self.building.end_cursor = self.building.end_cursor.max(abs.end());
        0
    }

    fn on_header_field(&mut self, span: Span) -> i32 {
        self.building.push_field(self.abs(span));
        0
    }

    fn on_header_value(&mut self, span: Span) -> i32 {
        self.building.push_value(self.abs(span));
        0
    }

    fn on_headers_complete(&mut self) -> i32 {
        self.building.close_pending_header();
        0
    }

    fn on_body(&mut self, span: Span, _is_final: bool) -> i32 {
        let abs = self.abs(span);
        self.building.body = Some(match self.building.body {
            Some(existing) => Span { start: existing.start, len: existing.len + abs.len },
            None => abs,
        });
        self.building.end_cursor = self.building.end_cursor.max(abs.end());
        0
    }

    fn on_message_complete(&mut self) -> i32 {
        let b = std::mem::take(&mut self.building);
        let message_start = b.message_start;
        let message_end = b.end_cursor.max(message_start);
        self.next_floor = message_end;

        let local_start = message_start as usize;
        let local_end = message_end as usize;
        let buf = self.buffer[local_start..local_end].to_vec();
        let rebase = |s: Span| Span { start: s.start - message_start, len: s.len };

        let request_url = b.request_url.map(rebase);
        let reason_phrase = b.reason_phrase.map(rebase);
        let body = b.body.map(rebase).unwrap_or(Span::EMPTY);
        let headers = b.headers.into_iter().map(|(f, v)| (rebase(f), rebase(v))).collect();

        let kind = if request_url.is_some() { MessageKind::Request } else { MessageKind::Response };
        let method = request_url.and_then(|u| recover_method(&buf, u));
        let status_code = reason_phrase.and_then(|r| recover_status_code(&buf, r));
        let version = recover_version(&buf, request_url, reason_phrase);

        self.ready.push_back(ParsedMessage {
            buf,
            kind,
            method,
            status_code,
            version,
            request_url,
            reason_phrase,
            headers,
            body,
            should_keep_alive: true,
        });
        0
    }
}

/// `METHOD SP Request-URI` precedes the URI span; the method token is
/// whatever comes before the single separating space.
fn recover_method(buf: &[u8], request_url: Span) -> Option<Method> {
    let start = request_url.start as usize;
    if start == 0 || buf[start - 1] != b' ' {
        return None;
    }
    let token_end = start - 1;
    let token_start = buf[..token_end].iter().rposition(|&b| b == b' ').map_or(0, |p| p + 1);
    Method::from_token(&buf[token_start..token_end])
}

/// `SIP/2.0 SP Status-Code SP` precedes the reason-phrase span.
fn recover_status_code(buf: &[u8], reason_phrase: Span) -> Option<u16> {
    let start = reason_phrase.start as usize;
    if start < 1 || buf[start - 1] != b' ' {
        return None;
    }
    let digits_end = start - 1;
    let mut digits_start = digits_end;
    while digits_start > 0 && buf[digits_start - 1].is_ascii_digit() && digits_end - digits_start < 3 {
        digits_start -= 1;
    }
    if digits_start == digits_end {
        return None;
    }
    std::str::from_utf8(&buf[digits_start..digits_end]).ok()?.parse().ok()
}

/// Finds `SIP/<digit>.<digit>` in the start-line region and reads the two
/// digits. Requests carry it right after the Request-URI; responses carry
/// it right at the start of the message.
fn recover_version(buf: &[u8], request_url: Option<Span>, reason_phrase: Option<Span>) -> (u16, u16) {
    let window = match (request_url, reason_phrase) {
        (Some(u), _) => {
            let from = u.end() as usize;
            let to = (from + 24).min(buf.len());
            &buf[from..to]
        }
        (None, Some(r)) => {
            let to = r.start as usize;
            &buf[..to]
        }
        (None, None) => &buf[..],
    };
    if let Some(pos) = find(window, b"SIP/") {
        let after = &window[pos + 4..];
        if after.len() >= 3 && after[0].is_ascii_digit() && after[1] == b'.' && after[2].is_ascii_digit() {
            return ((after[0] - b'0') as u16, (after[2] - b'0') as u16);
        }
    }
    (2, 0)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Accumulates bytes across an arbitrary chunking of a connection's
/// incoming stream and hands back whole [`ParsedMessage`]s as they
/// complete. One instance per connection direction, mirroring
/// `MessageProcessor`'s one-instance-per-connection lifetime in the ported
/// parser.
pub struct MessageProcessor {
    parser: Parser,
    collector: Collector,
}

impl MessageProcessor {
    pub fn new(mode: Mode) -> Self {
        MessageProcessor { parser: Parser::new(mode), collector: Collector::new() }
    }

    /// Feeds the next chunk of bytes read off the wire. Returns the number
    /// of bytes L1 consumed (normally `data.len()`; short only on error or
    /// while paused) and drains any messages that completed into the
    /// returned `Vec` — there can be more than one for a pipelined chunk.
    pub fn feed(&mut self, data: &[u8]) -> Result<Vec<ParsedMessage>, Error> {
        self.collector.begin_chunk(data);
        self.parser.execute(&mut self.collector, data);
        if let Some(err) = self.parser.error() {
            tracing::warn!(error = err.name(), "message processor rejected chunk");
            return Err(err);
        }
        Ok(self.collector.ready.drain(..).collect())
    }

    pub fn set_max_header_size(&mut self, bytes: usize) {
        self.parser.set_max_header_size(bytes);
    }

    pub fn set_lenient_headers(&mut self, lenient: bool) {
        self.parser.set_lenient_headers(lenient);
    }

    pub fn pause(&mut self) {
        self.parser.pause();
    }

    pub fn unpause(&mut self) {
        self.parser.unpause();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chunk_request() {
        let mut mp = MessageProcessor::new(Mode::Request);
        let msg = b"INVITE sip:bob@biloxi.com SIP/2.0\r\nCSeq: 1 INVITE\r\nContent-Length: 4\r\n\r\nabcd";
        let parsed = mp.feed(msg).unwrap();
        assert_eq!(parsed.len(), 1);
        let m = &parsed[0];
        assert_eq!(m.kind, MessageKind::Request);
        assert_eq!(m.method, Some(Method::Invite));
        assert_eq!(m.version, (2, 0));
        assert_eq!(m.request_url.unwrap().get(&m.buf), b"sip:bob@biloxi.com");
        assert_eq!(m.body.get(&m.buf), b"abcd");
        assert_eq!(m.header("content-length"), Some(&b"4"[..]));
    }

    #[test]
    fn response_status_and_code_recovered() {
        let mut mp = MessageProcessor::new(Mode::Response);
        let msg = b"SIP/2.0 486 Busy Here\r\nContent-Length: 0\r\n\r\n";
        let parsed = mp.feed(msg).unwrap();
        let m = &parsed[0];
        assert_eq!(m.kind, MessageKind::Response);
        assert_eq!(m.status_code, Some(486));
        assert_eq!(m.reason_phrase.unwrap().get(&m.buf), b"Busy Here");
    }

    #[test]
    fn header_field_split_across_chunks_is_stitched() {
        let mut mp = MessageProcessor::new(Mode::Request);
        let first = b"OPTIONS sip:a@b SIP/2.0\r\nSub";
        let second = b"ject: hi\r\n\r\n";
        let mut all = mp.feed(first).unwrap();
        all.extend(mp.feed(second).unwrap());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].header("subject"), Some(&b"hi"[..]));
    }

    #[test]
    fn header_lookup_accepts_compact_form_alias() {
        let mut mp = MessageProcessor::new(Mode::Request);
        let msg = b"OPTIONS sip:a@b SIP/2.0\r\nv: SIP/2.0/UDP host;branch=z9\r\nl: 0\r\n\r\n";
        let parsed = mp.feed(msg).unwrap();
        let m = &parsed[0];
        assert_eq!(m.header("Via"), Some(&b"SIP/2.0/UDP host;branch=z9"[..]));
        assert_eq!(m.header("Content-Length"), Some(&b"0"[..]));
        assert!(m.header("To").is_none());
    }

    #[test]
    fn back_to_back_messages_in_one_feed_both_recovered() {
        let mut mp = MessageProcessor::new(Mode::Request);
        let msg = b"OPTIONS sip:a@b SIP/2.0\r\nContent-Length: 0\r\n\r\nBYE sip:a@b SIP/2.0\r\nContent-Length: 0\r\n\r\n";
        let parsed = mp.feed(msg).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].method, Some(Method::Options));
        assert_eq!(parsed[1].method, Some(Method::Bye));
    }

    #[test]
    fn body_split_across_chunks_is_stitched() {
        let mut mp = MessageProcessor::new(Mode::Response);
        let head = b"SIP/2.0 200 OK\r\nContent-Length: 6\r\n\r\nab";
        let tail = b"cdef";
        let mut all = mp.feed(head).unwrap();
        all.extend(mp.feed(tail).unwrap());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].body.get(&all[0].buf), b"abcdef");
    }
}
