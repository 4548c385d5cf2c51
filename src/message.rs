//! L1: the incremental, byte-at-a-time SIP message parser.
//!
//! A direct-but-idiomatic port of the state machine in the ported parser's
//! `sipparser.c` (itself "inspired from the HTTP parser given in
//! https://github.com/nodejs/http-parser", per that file's header comment),
//! trimmed to what SIP actually needs: no chunked transfer-encoding, no URL
//! internal structure validation (that's L3's job on an already-isolated
//! span), `Content-Length`-only body framing.
//!
//! The parser holds no buffer and no lifetime: [`Parser::execute`] borrows
//! its input for the duration of the call only. Every span handed to a
//! [`Callbacks`] method is relative to that call's `data` slice (see
//! [`crate::span`]); a caller accumulating chunks into its own buffer across
//! calls is responsible for biasing those spans, which is exactly what
//! [`crate::processor::MessageProcessor`] does.

use crate::error::{callback_error, Callback, Error};
use crate::method::{candidates_for_first_byte, ladder_step, LadderStep, Method};
use crate::span::{span_of, Span};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-wide default for `max_header_size`; advisory, and only takes
/// effect for parsers created or reset afterward.
static DEFAULT_MAX_HEADER_SIZE: AtomicUsize = AtomicUsize::new(80 * 1024);

pub fn set_default_max_header_size(bytes: usize) {
    DEFAULT_MAX_HEADER_SIZE.store(bytes, Ordering::Relaxed);
}

pub fn default_max_header_size() -> usize {
    DEFAULT_MAX_HEADER_SIZE.load(Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Request,
    Response,
    Either,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

/// The callback bundle. Any subset may be overridden; the rest default to a
/// no-op success return. A non-zero return from any method other than
/// `on_headers_complete` is a plain callback failure; `on_headers_complete`'s
/// return additionally selects body handling: 0 expects a body, 1 skips the
/// body, 2 skips the body and marks the connection for closing.
pub trait Callbacks {
    fn on_message_begin(&mut self) -> i32 {
        0
    }
    fn on_url(&mut self, _span: Span) -> i32 {
        0
    }
    fn on_status(&mut self, _span: Span) -> i32 {
        0
    }
    fn on_header_field(&mut self, _span: Span) -> i32 {
        0
    }
    fn on_header_value(&mut self, _span: Span) -> i32 {
        0
    }
    fn on_headers_complete(&mut self) -> i32 {
        0
    }
    fn on_body(&mut self, _span: Span, _is_final: bool) -> i32 {
        0
    }
    fn on_message_complete(&mut self) -> i32 {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartLine,
    /// Seen a leading `'S'`; one more byte disambiguates `"SIP/…"` (response)
    /// from `"SUBSCRIBE"` (request).
    StartS,
    ReqMethod { candidate: Method, index: usize },
    ReqSpacesBeforeUrl,
    ReqUrl,
    ReqHttpStart { index: usize }, // matching literal "SIP/"
    ReqVersionMajor,
    ReqVersionDot,
    ReqVersionMinor,
    ReqLineAlmostDone,

    ResHttpRest { index: usize }, // matching literal "P/" (after "SI")
    ResVersionMajor,
    ResVersionDot,
    ResVersionMinor,
    ResSpacesBeforeCode,
    ResStatusCode { digits: usize },
    ResSpaceAfterCode,
    ResReasonPhrase,
    ResLineAlmostDone,

    HeaderFieldStart,
    HeaderField,
    HeaderValueDiscardWs,
    HeaderValue,
    HeaderAlmostDone,
    HeadersAlmostDone,

    BodyIdentity,
    BodyUntilEof,
    MessageDone,
}

/// The resumable state of L1.
pub struct Parser {
    mode: Mode,
    state: State,

    max_header_size: usize,
    header_bytes: usize,
    lenient_headers: bool,

    message_kind: Option<MessageKind>,
    method: Option<Method>,
    sip_major: u16,
    sip_minor: u16,
    status_code: u16,

    is_content_length_field: bool,
    /// Running accumulation of the `Content-Length` digits seen so far for
    /// the header value currently being scanned; a `Parser`-level field
    /// (not tied to the current `execute` call's marks) so it survives a
    /// chunk boundary landing mid-digit-run.
    cl_accum: Option<u64>,
    /// Set once trailing whitespace follows a digit; a further digit after
    /// that is interior whitespace, which is rejected (spec §9 open question
    /// on `Content-Length` interior whitespace).
    cl_trailing_ws: bool,
    content_length: Option<u64>,
    content_length_seen: bool,
    body_remaining: u64,
    skip_body: bool,
    connection_should_close: bool,

    error: Option<Error>,
    paused: bool,
    is_body_final: bool,

    // Marks are offsets into the *current* `execute` call's `data` slice.
    // When a capture is still open at the start of a new call, it resumes
    // at mark = 0 of the new chunk (see `execute`'s preamble).
    capturing_url: bool,
    capturing_status: bool,
    capturing_header_field: bool,
    capturing_header_value: bool,
}

impl Parser {
    pub fn new(mode: Mode) -> Self {
        let max_header_size = default_max_header_size();
        let mut p = Parser {
            mode,
            state: State::StartLine,
            max_header_size,
            header_bytes: 0,
            lenient_headers: cfg!(feature = "lenient_parsing"),
            message_kind: None,
            method: None,
            sip_major: 0,
            sip_minor: 0,
            status_code: 0,
            is_content_length_field: false,
            cl_accum: None,
            cl_trailing_ws: false,
            content_length: None,
            content_length_seen: false,
            body_remaining: 0,
            skip_body: false,
            connection_should_close: false,
            error: None,
            paused: false,
            is_body_final: false,
            capturing_url: false,
            capturing_status: false,
            capturing_header_field: false,
            capturing_header_value: false,
        };
        p.init(mode);
        p
    }

    /// Resets all state, ready for a new message. Preserves `max_header_size`.
    pub fn init(&mut self, mode: Mode) {
        let max_header_size = self.max_header_size;
        let lenient_headers = self.lenient_headers;
        self.mode = mode;
        self.state = State::StartLine;
        self.header_bytes = 0;
        self.message_kind = None;
        self.method = None;
        self.sip_major = 0;
        self.sip_minor = 0;
        self.status_code = 0;
        self.is_content_length_field = false;
        self.cl_accum = None;
        self.cl_trailing_ws = false;
        self.content_length = None;
        self.content_length_seen = false;
        self.body_remaining = 0;
        self.skip_body = false;
        self.connection_should_close = false;
        self.error = None;
        self.paused = false;
        self.is_body_final = false;
        self.capturing_url = false;
        self.capturing_status = false;
        self.capturing_header_field = false;
        self.capturing_header_value = false;
        self.max_header_size = max_header_size;
        self.lenient_headers = lenient_headers;
    }

    pub fn set_max_header_size(&mut self, bytes: usize) {
        self.max_header_size = bytes;
    }

    /// Allows control characters other than CR/LF/HTAB inside header values
    /// instead of failing with `InvalidHeaderToken`. Off by default; the
    /// `lenient_parsing` feature flips the default for `Parser::new`, but
    /// this can also be toggled per-instance.
    pub fn set_lenient_headers(&mut self, lenient: bool) {
        self.lenient_headers = lenient;
    }

    pub fn pause(&mut self) {
        if self.error.is_none() {
            tracing::trace!("parser paused");
            self.paused = true;
        }
    }

    pub fn unpause(&mut self) {
        tracing::trace!("parser unpaused");
        self.paused = false;
    }

    pub fn error(&self) -> Option<Error> {
        self.error
    }

    pub fn is_body_final(&self) -> bool {
        self.is_body_final
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn version(&self) -> (u16, u16) {
        (self.sip_major, self.sip_minor)
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn message_kind(&self) -> Option<MessageKind> {
        self.message_kind
    }

    /// Always returns true: this is a pure SIP parser over framed
    /// `Content-Length`-delimited messages, not a connection-keepalive
    /// policy engine. Preserved for API parity with the ported parser's
    /// `sip_should_keep_alive`, which has no routing effect for SIP either.
    pub fn should_keep_alive(&self) -> bool {
        true
    }

    /// Advances as far as possible through `data`. Returns the number of
    /// bytes consumed: `data.len()` on clean exhaustion, or the offset of
    /// the offending byte on error (with the reason in [`Parser::error`]).
    /// Calling with an empty slice signals end-of-input, used to finalize
    /// a response body being read to EOF.
    pub fn execute(&mut self, cb: &mut impl Callbacks, data: &[u8]) -> usize {
        if self.error.is_some() || self.paused {
            return 0;
        }
        if data.is_empty() {
            return self.handle_eof(cb);
        }

        // Resume any capture that was left open at the end of the previous
        // chunk; this chunk's offset 0 becomes the new mark.
        let mut url_mark = if self.capturing_url { Some(0usize) } else { None };
        let mut status_mark = if self.capturing_status { Some(0usize) } else { None };
        let mut field_mark = if self.capturing_header_field { Some(0usize) } else { None };
        let mut value_mark = if self.capturing_header_value { Some(0usize) } else { None };

        let mut i = 0usize;
        while i < data.len() {
            let byte = data[i];

            if matches!(
                self.state,
                State::HeaderFieldStart
                    | State::HeaderField
                    | State::HeaderValueDiscardWs
                    | State::HeaderValue
                    | State::HeaderAlmostDone
                    | State::HeadersAlmostDone
            ) {
                self.header_bytes += 1;
                if self.header_bytes > self.max_header_size {
                    tracing::warn!(max = self.max_header_size, "header block exceeded configured maximum");
                    return self.fail(Error::HeaderOverflow, i);
                }
            }

            match self.state {
                State::StartLine => {
                    if byte == b'\r' || byte == b'\n' {
                        i += 1;
                        continue;
                    }
                    if matches!(self.mode, Mode::Response) {
                        if byte != b'S' {
                            return self.fail(Error::InvalidVersion, i);
                        }
                        self.state = State::StartS;
                        i += 1;
                        continue;
                    }
                    if byte == b'S' {
                        self.state = State::StartS;
                        i += 1;
                        continue;
                    }
                    let cands = candidates_for_first_byte(byte);
                    if cands.is_empty() || matches!(self.mode, Mode::Response) {
                        return self.fail(Error::InvalidMethod, i);
                    }
                    if cb.on_message_begin() != 0 {
                        return self.fail(callback_error(Callback::MessageBegin), i);
                    }
                    self.state = State::ReqMethod { candidate: cands[0], index: 1 };
                    i += 1;
                }

                State::StartS => {
                    match byte {
                        b'I' => {
                            if matches!(self.mode, Mode::Request) {
                                return self.fail(Error::InvalidMethod, i);
                            }
                            if cb.on_message_begin() != 0 {
                                return self.fail(callback_error(Callback::MessageBegin), i);
                            }
                            self.state = State::ResHttpRest { index: 0 };
                        }
                        b'U' => {
                            if matches!(self.mode, Mode::Response) {
                                return self.fail(Error::InvalidMethod, i);
                            }
                            if cb.on_message_begin() != 0 {
                                return self.fail(callback_error(Callback::MessageBegin), i);
                            }
                            self.state = State::ReqMethod { candidate: Method::Subscribe, index: 2 };
                        }
                        _ => return self.fail(Error::InvalidMethod, i),
                    }
                    i += 1;
                }

                State::ReqMethod { candidate, index } => match ladder_step(candidate, index, byte) {
                    LadderStep::Continue(next) => {
                        self.state = State::ReqMethod { candidate: next, index: index + 1 };
                        i += 1;
                    }
                    LadderStep::Complete(m) => {
                        self.method = Some(m);
                        self.state = State::ReqSpacesBeforeUrl;
                        i += 1;
                    }
                    LadderStep::Dead => return self.fail(Error::InvalidMethod, i),
                },

                State::ReqSpacesBeforeUrl => {
                    if byte == b' ' {
                        i += 1;
                        continue;
                    }
                    self.state = State::ReqUrl;
                    url_mark = Some(i);
                    self.capturing_url = true;
                    continue;
                }

                State::ReqUrl => {
                    if byte == b' ' {
                        let start = url_mark.take().unwrap_or(i);
                        self.capturing_url = false;
                        if cb.on_url(span_of(data, &data[start..i])) != 0 {
                            return self.fail(callback_error(Callback::Url), i);
                        }
                        self.state = State::ReqHttpStart { index: 0 };
                    }
                    i += 1;
                }

                State::ReqHttpStart { index } => {
                    const LIT: &[u8] = b"SIP/";
                    if byte != LIT[index] {
                        return self.fail(Error::InvalidVersion, i);
                    }
                    self.state = if index + 1 == LIT.len() {
                        State::ReqVersionMajor
                    } else {
                        State::ReqHttpStart { index: index + 1 }
                    };
                    i += 1;
                }

                State::ReqVersionMajor => {
                    if !byte.is_ascii_digit() {
                        return self.fail(Error::InvalidVersion, i);
                    }
                    self.sip_major = (byte - b'0') as u16;
                    self.state = State::ReqVersionDot;
                    i += 1;
                }
                State::ReqVersionDot => {
                    if byte != b'.' {
                        return self.fail(Error::InvalidVersion, i);
                    }
                    self.state = State::ReqVersionMinor;
                    i += 1;
                }
                State::ReqVersionMinor => {
                    if !byte.is_ascii_digit() {
                        return self.fail(Error::InvalidVersion, i);
                    }
                    self.sip_minor = (byte - b'0') as u16;
                    self.state = State::ReqLineAlmostDone;
                    i += 1;
                }
                State::ReqLineAlmostDone => {
                    if byte == b'\r' {
                        i += 1;
                        continue;
                    }
                    if byte != b'\n' {
                        return self.fail(Error::LfExpected, i);
                    }
                    self.message_kind = Some(MessageKind::Request);
                    self.state = State::HeaderFieldStart;
                    i += 1;
                }

                State::ResHttpRest { index } => {
                    const LIT: &[u8] = b"P/";
                    if byte != LIT[index] {
                        return self.fail(Error::InvalidVersion, i);
                    }
                    self.state = if index + 1 == LIT.len() {
                        State::ResVersionMajor
                    } else {
                        State::ResHttpRest { index: index + 1 }
                    };
                    i += 1;
                }
                State::ResVersionMajor => {
                    if !byte.is_ascii_digit() {
                        return self.fail(Error::InvalidVersion, i);
                    }
                    self.sip_major = (byte - b'0') as u16;
                    self.state = State::ResVersionDot;
                    i += 1;
                }
                State::ResVersionDot => {
                    if byte != b'.' {
                        return self.fail(Error::InvalidVersion, i);
                    }
                    self.state = State::ResVersionMinor;
                    i += 1;
                }
                State::ResVersionMinor => {
                    if !byte.is_ascii_digit() {
                        return self.fail(Error::InvalidVersion, i);
                    }
                    self.sip_minor = (byte - b'0') as u16;
                    self.state = State::ResSpacesBeforeCode;
                    i += 1;
                }
                State::ResSpacesBeforeCode => {
                    if byte == b' ' {
                        i += 1;
                        continue;
                    }
                    self.state = State::ResStatusCode { digits: 0 };
                    continue;
                }
                State::ResStatusCode { digits } => {
                    if byte.is_ascii_digit() {
                        if digits == 3 {
                            return self.fail(Error::InvalidStatus, i);
                        }
                        self.status_code = self.status_code * 10 + (byte - b'0') as u16;
                        self.state = State::ResStatusCode { digits: digits + 1 };
                        i += 1;
                        continue;
                    }
                    if digits != 3 {
                        return self.fail(Error::InvalidStatus, i);
                    }
                    self.state = State::ResSpaceAfterCode;
                    continue;
                }
                State::ResSpaceAfterCode => {
                    if byte != b' ' {
                        return self.fail(Error::InvalidStatus, i);
                    }
                    self.state = State::ResReasonPhrase;
                    status_mark = Some(i + 1);
                    self.capturing_status = true;
                    i += 1;
                }
                State::ResReasonPhrase => {
                    if byte == b'\r' || byte == b'\n' {
                        let start = status_mark.take().unwrap_or(i);
                        self.capturing_status = false;
                        if cb.on_status(span_of(data, &data[start..i])) != 0 {
                            return self.fail(callback_error(Callback::Status), i);
                        }
                        self.message_kind = Some(MessageKind::Response);
                        if byte == b'\n' {
                            self.state = State::HeaderFieldStart;
                        } else {
                            self.state = State::ResLineAlmostDone;
                        }
                    }
                    i += 1;
                }
                State::ResLineAlmostDone => {
                    if byte != b'\n' {
                        return self.fail(Error::LfExpected, i);
                    }
                    self.state = State::HeaderFieldStart;
                    i += 1;
                }

                State::HeaderFieldStart => {
                    if byte == b'\r' {
                        self.state = State::HeadersAlmostDone;
                        i += 1;
                        continue;
                    }
                    if byte == b'\n' {
                        self.state = State::HeadersAlmostDone;
                        continue;
                    }
                    if !is_token_char(byte) {
                        return self.fail(Error::InvalidHeaderToken, i);
                    }
                    field_mark = Some(i);
                    self.capturing_header_field = true;
                    self.state = State::HeaderField;
                    i += 1;
                }
                State::HeaderField => {
                    if byte == b':' || byte == b' ' || byte == b'\t' {
                        let start = field_mark.take().unwrap_or(i);
                        self.capturing_header_field = false;
                        let name = &data[start..i];
                        self.is_content_length_field =
                            name.eq_ignore_ascii_case(b"content-length") || name.eq_ignore_ascii_case(b"l");
                        self.cl_accum = None;
                        self.cl_trailing_ws = false;
                        if cb.on_header_field(span_of(data, name)) != 0 {
                            return self.fail(callback_error(Callback::HeaderField), i);
                        }
                        self.state = State::HeaderValueDiscardWs;
                        i += 1;
                        continue;
                    }
                    if !is_token_char(byte) {
                        return self.fail(Error::InvalidHeaderToken, i);
                    }
                    i += 1;
                }
                State::HeaderValueDiscardWs => {
                    if byte == b' ' || byte == b'\t' || byte == b':' {
                        i += 1;
                        continue;
                    }
                    value_mark = Some(i);
                    self.capturing_header_value = true;
                    self.state = State::HeaderValue;
                    continue;
                }
                State::HeaderValue => {
                    if byte.is_ascii_control() && byte != b'\r' && byte != b'\n' && byte != b'\t' && !self.lenient_headers {
                        return self.fail(Error::InvalidHeaderToken, i);
                    }
                    if byte == b'\r' || byte == b'\n' {
                        // Obsolete line folding: CRLF (or bare LF) followed by SP/HTAB
                        // continues the same value; fold bytes are included in the
                        // stored span's length.
                        let nl_len = if byte == b'\r' && data.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                        let next = i + nl_len;
                        if data.get(next).map_or(false, |&b| b == b' ' || b == b'\t') {
                            i = next;
                            continue;
                        }
                        let start = value_mark.take().unwrap_or(i);
                        self.capturing_header_value = false;

                        if self.is_content_length_field {
                            match self.cl_accum {
                                Some(v) => {
                                    if self.content_length_seen {
                                        return self.fail(Error::UnexpectedContentLength, i);
                                    }
                                    self.content_length_seen = true;
                                    self.content_length = Some(v);
                                }
                                None => return self.fail(Error::InvalidContentLength, i),
                            }
                        }

                        if cb.on_header_value(span_of(data, &data[start..i])) != 0 {
                            return self.fail(callback_error(Callback::HeaderValue), i);
                        }
                        self.state = State::HeaderFieldStart;
                        i += nl_len;
                        continue;
                    }
                    if self.is_content_length_field && self.accumulate_content_length(byte).is_err() {
                        return self.fail(Error::InvalidContentLength, i);
                    }
                    i += 1;
                }
                State::HeaderAlmostDone => {
                    // Unreachable in the current folding-aware HeaderValue handling,
                    // which consumes its own terminator; kept for state-table parity
                    // with the byte-at-a-time original.
                    if byte != b'\n' {
                        return self.fail(Error::LfExpected, i);
                    }
                    self.state = State::HeaderFieldStart;
                    i += 1;
                }

                State::HeadersAlmostDone => {
                    if byte != b'\n' {
                        return self.fail(Error::LfExpected, i);
                    }
                    i += 1;
                    self.header_bytes = 0;
                    match cb.on_headers_complete() {
                        0 => self.skip_body = false,
                        1 => self.skip_body = true,
                        2 => {
                            self.skip_body = true;
                            self.connection_should_close = true;
                        }
                        _ => return self.fail(callback_error(Callback::HeadersComplete), i),
                    }
                    self.enter_body_state();
                    if self.state == State::MessageDone {
                        if cb.on_message_complete() != 0 {
                            return self.fail(callback_error(Callback::MessageComplete), i);
                        }
                        tracing::trace!(kind = ?self.message_kind, "message complete (no body)");
                        let mode = self.mode;
                        self.init(mode);
                    }
                }

                State::BodyIdentity => {
                    let avail = (data.len() - i) as u64;
                    let take = avail.min(self.body_remaining);
                    let end = i + take as usize;
                    self.body_remaining -= take;
                    self.is_body_final = self.body_remaining == 0;
                    if cb.on_body(span_of(data, &data[i..end]), self.is_body_final) != 0 {
                        return self.fail(callback_error(Callback::Body), end);
                    }
                    i = end;
                    if self.body_remaining == 0 {
                        if cb.on_message_complete() != 0 {
                            return self.fail(callback_error(Callback::MessageComplete), i);
                        }
                        tracing::trace!(kind = ?self.message_kind, "message complete");
                        let mode = self.mode;
                        self.init(mode);
                    }
                }

                State::BodyUntilEof => {
                    // Consume the rest of this chunk as body; completion only
                    // happens on an empty `execute` call (EOF), see `handle_eof`.
                    self.is_body_final = false;
                    if cb.on_body(span_of(data, &data[i..]), false) != 0 {
                        return self.fail(callback_error(Callback::Body), data.len());
                    }
                    i = data.len();
                }

                State::MessageDone => {
                    self.state = State::StartLine;
                }
            }
        }

        if let Some(consumed) = self.flush_open_capture(cb, data, url_mark, status_mark, field_mark, value_mark) {
            return consumed;
        }
        data.len()
    }

    /// Re-emits any capture still open at the end of this chunk (a field,
    /// value, URL, or status span that will resume at the start of the next
    /// chunk) so the consumer sees every byte even when a capture never
    /// closes within one `execute` call. A non-zero return from any of these
    /// is a callback failure exactly like the in-loop span callbacks.
    fn flush_open_capture(
        &mut self,
        cb: &mut impl Callbacks,
        data: &[u8],
        url_mark: Option<usize>,
        status_mark: Option<usize>,
        field_mark: Option<usize>,
        value_mark: Option<usize>,
    ) -> Option<usize> {
        if let Some(start) = url_mark {
            if start < data.len() && cb.on_url(span_of(data, &data[start..])) != 0 {
                return Some(self.fail(callback_error(Callback::Url), data.len()));
            }
        }
        if let Some(start) = status_mark {
            if start < data.len() && cb.on_status(span_of(data, &data[start..])) != 0 {
                return Some(self.fail(callback_error(Callback::Status), data.len()));
            }
        }
        if let Some(start) = field_mark {
            if start < data.len() && cb.on_header_field(span_of(data, &data[start..])) != 0 {
                return Some(self.fail(callback_error(Callback::HeaderField), data.len()));
            }
        }
        if let Some(start) = value_mark {
            if start < data.len() && cb.on_header_value(span_of(data, &data[start..])) != 0 {
                return Some(self.fail(callback_error(Callback::HeaderValue), data.len()));
            }
        }
        None
    }

    /// Feeds one content byte of a `Content-Length` value into the running
    /// accumulator. Digits accumulate into a checked `u64`; whitespace is
    /// only allowed before the first digit or after the last one — a digit
    /// seen after trailing whitespace has already started is interior
    /// whitespace, rejected per spec §9.
    fn accumulate_content_length(&mut self, byte: u8) -> Result<(), ()> {
        if byte == b' ' || byte == b'\t' {
            if self.cl_accum.is_some() {
                self.cl_trailing_ws = true;
            }
            return Ok(());
        }
        if byte.is_ascii_digit() {
            if self.cl_trailing_ws {
                return Err(());
            }
            let digit = u64::from(byte - b'0');
            let acc = self.cl_accum.unwrap_or(0);
            self.cl_accum = Some(acc.checked_mul(10).and_then(|v| v.checked_add(digit)).ok_or(())?);
            return Ok(());
        }
        Err(())
    }

    fn enter_body_state(&mut self) {
        if self.skip_body {
            self.state = State::MessageDone;
            return;
        }
        match self.content_length {
            Some(0) => {
                self.is_body_final = true;
                self.state = State::MessageDone;
            }
            Some(n) => {
                self.body_remaining = n;
                self.is_body_final = false;
                self.state = State::BodyIdentity;
            }
            None => match self.message_kind {
                Some(MessageKind::Response) => {
                    self.state = State::BodyUntilEof;
                }
                _ => {
                    self.is_body_final = true;
                    self.state = State::MessageDone;
                }
            },
        }
    }

    fn handle_eof(&mut self, cb: &mut impl Callbacks) -> usize {
        if self.state == State::BodyUntilEof {
            self.is_body_final = true;
            if cb.on_message_complete() != 0 {
                self.error = Some(callback_error(Callback::MessageComplete));
                return 0;
            }
            let mode = self.mode;
            self.init(mode);
            return 0;
        }
        if self.state != State::StartLine {
            self.error = Some(Error::InvalidEofState);
        }
        0
    }

    fn fail(&mut self, err: Error, at: usize) -> usize {
        tracing::debug!(error = err.name(), offset = at, "sip parse failed");
        self.error = Some(err);
        at
    }
}

fn is_token_char(b: u8) -> bool {
    // RFC 3261 token = 1*(alphanum / "-" / "." / "!" / "%" / "*" / "_" / "+" / "`" / "'" / "~")
    b.is_ascii_alphanumeric()
        || matches!(b, b'-' | b'.' | b'!' | b'%' | b'*' | b'_' | b'+' | b'`' | b'\'' | b'~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Recorder {
        fn push(&mut self, s: impl Into<String>) {
            self.events.push(s.into());
        }
    }

    impl Callbacks for Recorder {
        fn on_message_begin(&mut self) -> i32 {
            self.push("begin");
            0
        }
        fn on_url(&mut self, span: Span) -> i32 {
            self.push(format!("url:{}:{}", span.start, span.len));
            0
        }
        fn on_status(&mut self, span: Span) -> i32 {
            self.push(format!("status:{}:{}", span.start, span.len));
            0
        }
        fn on_header_field(&mut self, span: Span) -> i32 {
            self.push(format!("field:{}:{}", span.start, span.len));
            0
        }
        fn on_header_value(&mut self, span: Span) -> i32 {
            self.push(format!("value:{}:{}", span.start, span.len));
            0
        }
        fn on_headers_complete(&mut self) -> i32 {
            self.push("headers_complete");
            0
        }
        fn on_body(&mut self, span: Span, is_final: bool) -> i32 {
            self.push(format!("body:{}:{}", span.len, is_final));
            0
        }
        fn on_message_complete(&mut self) -> i32 {
            self.push("complete");
            0
        }
    }

    #[test]
    fn simple_invite_with_body() {
        let msg = b"INVITE sip:watson@boston.bell-tel.com SIP/2.0\r\n\
Content-Length: 5\r\n\r\nhello";
        let mut p = Parser::new(Mode::Request);
        let mut cb = Recorder::default();
        let n = p.execute(&mut cb, msg);
        assert_eq!(n, msg.len());
        assert_eq!(p.error(), None);
        assert_eq!(p.method(), Some(Method::Invite));
        assert_eq!(p.content_length(), Some(5));
        assert!(cb.events.contains(&"complete".to_string()));
        assert!(cb.events.iter().any(|e| e == "body:5:true"));
    }

    #[test]
    fn response_zero_length_body() {
        let msg = b"SIP/2.0 200 OK\r\nContent-Length: 0\r\n\r\n";
        let mut p = Parser::new(Mode::Response);
        let mut cb = Recorder::default();
        let n = p.execute(&mut cb, msg);
        assert_eq!(n, msg.len());
        assert_eq!(p.status_code(), 200);
        assert!(!cb.events.iter().any(|e| e.starts_with("body")));
        assert!(cb.events.contains(&"complete".to_string()));
    }

    #[test]
    fn back_to_back_messages() {
        let msg = b"SIP/2.0 200 OK\r\nContent-Length: 0\r\n\r\n\
OPTIONS sip:a@b SIP/2.0\r\nContent-Length: 0\r\n\r\n";
        let mut p = Parser::new(Mode::Either);
        let mut cb = Recorder::default();
        let n = p.execute(&mut cb, msg);
        assert_eq!(n, msg.len());
        assert_eq!(cb.events.iter().filter(|e| *e == "complete").count(), 2);
        assert_eq!(p.method(), Some(Method::Options));
    }

    #[test]
    fn method_ladder_disambiguation() {
        for (input, expect) in [
            (&b"INFO sip:a@b SIP/2.0\r\nContent-Length: 0\r\n\r\n"[..], Method::Info),
            (&b"INVITE sip:a@b SIP/2.0\r\nContent-Length: 0\r\n\r\n"[..], Method::Invite),
        ] {
            let mut p = Parser::new(Mode::Request);
            let mut cb = Recorder::default();
            p.execute(&mut cb, input);
            assert_eq!(p.error(), None);
            assert_eq!(p.method(), Some(expect));
        }
    }

    #[test]
    fn chunked_delivery_matches_single_chunk() {
        let msg = &b"INVITE sip:watson@boston.bell-tel.com SIP/2.0\r\n\
Via: SIP/2.0/UDP first.example.com\r\n\
Content-Length: 5\r\n\r\nhello"[..];

        let mut whole = Parser::new(Mode::Request);
        let mut whole_cb = Recorder::default();
        whole.execute(&mut whole_cb, msg);

        let mut chunked = Parser::new(Mode::Request);
        let mut chunked_cb = Recorder::default();
        for chunk in msg.chunks(7) {
            chunked.execute(&mut chunked_cb, chunk);
        }

        assert_eq!(whole.method(), chunked.method());
        assert_eq!(whole.content_length(), chunked.content_length());
        assert_eq!(
            whole_cb.events.iter().any(|e| e.starts_with("body")),
            chunked_cb.events.iter().any(|e| e.starts_with("body"))
        );
    }

    #[test]
    fn content_length_digits_split_across_chunk_boundary() {
        let head = b"SIP/2.0 200 OK\r\nContent-Length: 2";
        let tail = b"3\r\n\r\n";
        let mut p = Parser::new(Mode::Response);
        let mut cb = Recorder::default();
        p.execute(&mut cb, head);
        p.execute(&mut cb, tail);
        assert_eq!(p.error(), None);
        assert_eq!(p.content_length(), Some(23));
    }

    #[test]
    fn content_length_value_split_exactly_at_terminating_crlf() {
        let head = b"SIP/2.0 200 OK\r\nContent-Length: 2";
        let tail = b"\r\n\r\n";
        let mut p = Parser::new(Mode::Response);
        let mut cb = Recorder::default();
        p.execute(&mut cb, head);
        p.execute(&mut cb, tail);
        assert_eq!(p.error(), None);
        assert_eq!(p.content_length(), Some(2));
    }

    #[test]
    fn unexpected_content_length_is_fatal() {
        let msg = b"SIP/2.0 200 OK\r\nContent-Length: 0\r\nContent-Length: 1\r\n\r\n";
        let mut p = Parser::new(Mode::Response);
        let mut cb = Recorder::default();
        p.execute(&mut cb, msg);
        assert_eq!(p.error(), Some(Error::UnexpectedContentLength));
    }

    #[test]
    fn interior_whitespace_in_content_length_is_rejected() {
        let msg = b"SIP/2.0 200 OK\r\nContent-Length: 12 3\r\n\r\n";
        let mut p = Parser::new(Mode::Response);
        let mut cb = Recorder::default();
        p.execute(&mut cb, msg);
        assert_eq!(p.error(), Some(Error::InvalidContentLength));
    }

    #[test]
    fn header_overflow_is_fatal() {
        let mut p = Parser::new(Mode::Request);
        p.set_max_header_size(32);
        let mut cb = Recorder::default();
        let msg = b"OPTIONS sip:a@b SIP/2.0\r\nX-Long-Header: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n\r\n";
        p.execute(&mut cb, msg);
        assert_eq!(p.error(), Some(Error::HeaderOverflow));
    }

    #[test]
    fn stray_control_byte_in_header_value_is_fatal() {
        let mut p = Parser::new(Mode::Request);
        let mut cb = Recorder::default();
        let msg = b"OPTIONS sip:a@b SIP/2.0\r\nSubject: bad\x01value\r\n\r\n";
        p.execute(&mut cb, msg);
        assert_eq!(p.error(), Some(Error::InvalidHeaderToken));
    }

    #[test]
    fn lenient_headers_allows_stray_control_byte() {
        let mut p = Parser::new(Mode::Request);
        p.set_lenient_headers(true);
        let mut cb = Recorder::default();
        let msg = b"OPTIONS sip:a@b SIP/2.0\r\nSubject: bad\x01value\r\n\r\n";
        p.execute(&mut cb, msg);
        assert_eq!(p.error(), None);
    }

    #[test]
    fn pause_halts_progress() {
        let mut p = Parser::new(Mode::Request);
        p.pause();
        let mut cb = Recorder::default();
        let n = p.execute(&mut cb, b"OPTIONS sip:a@b SIP/2.0\r\n\r\n");
        assert_eq!(n, 0);
        assert!(cb.events.is_empty());
    }

    #[test]
    fn short_form_content_length_recognized() {
        let msg = b"SIP/2.0 200 OK\r\nl: 2\r\n\r\nhi";
        let mut p = Parser::new(Mode::Response);
        let mut cb = Recorder::default();
        p.execute(&mut cb, msg);
        assert_eq!(p.error(), None);
        assert_eq!(p.content_length(), Some(2));
    }
}
