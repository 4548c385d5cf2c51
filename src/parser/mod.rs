//! Everything downstream of L1's byte-at-a-time state machine in
//! `crate::message`: the nom-based RFC 2234/3261 whitespace/UTF-8-text
//! combinators used for exactly the grammar productions that need them
//! (folding, `Subject`'s free text), the hand-scanned token/parameter
//! primitives shared by every header micro-parser, the L3 SIP-URI parser,
//! and the L2 header micro-parsers themselves under [`headers`].

pub mod utf8;
pub mod utils;
pub mod whitespace;

pub mod token;
pub mod params;
pub mod uri;

pub mod headers;
