//! An incremental, zero-copy SIP (RFC 3261) message parser.
//!
//! [`message::Parser`] is the core: a byte-at-a-time state machine, modeled
//! on the joyent `http_parser` design, that drives a [`message::Callbacks`]
//! implementation with [`span::Span`]s into whatever buffer it was handed —
//! no allocation, no copying, safe to feed one byte or one megabyte at a
//! time. [`processor::MessageProcessor`] sits on top of it for the common
//! case of a connection that delivers arbitrarily chunked bytes and wants
//! whole messages back.
//!
//! Above the L1 state machine, [`parser::headers`] holds one micro-parser
//! per header type (`Via`, `CSeq`, `Call-ID`, `From`/`To`/`Contact`,
//! `Content-Type`, `Accept`/`Accept-Encoding`/`Accept-Language`, `Allow`,
//! `Subject`, `Max-Forwards`), and [`parser::uri`] decomposes a SIP-URI.
//! Both layers operate on already-isolated spans and never allocate either;
//! [`unfold_lws`] is the one deliberate exception, an owned-`Vec<u8>`
//! convenience for a caller that wants a fold-collapsed header value (for
//! logging, or display) rather than `Subject`'s span-segment view.

pub mod error;
pub mod header_name;
pub mod message;
pub mod method;
pub mod parser;
pub mod processor;
pub mod span;
pub mod status;

pub use error::{Error, Result};
pub use message::{
    default_max_header_size, set_default_max_header_size, Callbacks, MessageKind, Mode, Parser,
};
pub use method::Method;
pub use processor::{MessageProcessor, ParsedMessage};
pub use span::Span;
pub use status::StatusCode;

pub use parser::headers;
pub use parser::params::Param;
pub use parser::uri::{parse_uri, UriView};
pub use parser::utils::unfold_lws;
