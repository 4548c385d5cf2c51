//! The closed error taxonomy shared by L1, L2, and L3.
//!
//! Every failure maps to exactly one variant. All errors are sticky at the
//! parser instance: once [`crate::message::Parser::execute`] returns an
//! error, the parser stays in that errored state until `init` is called
//! again (see [`crate::message::Parser`]).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// L1 structural errors, one callback-failure kind per callback, plus the
/// micro-parser error kinds from §4.2/§7 folded into the same enum so a
/// consumer has one type to match on end to end.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // --- Callback-failure kinds: the callback returned non-zero. ---
    #[error("on_message_begin callback failed")]
    CallbackMessageBegin,
    #[error("on_url callback failed")]
    CallbackUrl,
    #[error("on_status callback failed")]
    CallbackStatus,
    #[error("on_header_field callback failed")]
    CallbackHeaderField,
    #[error("on_header_value callback failed")]
    CallbackHeaderValue,
    #[error("on_headers_complete callback failed")]
    CallbackHeadersComplete,
    #[error("on_body callback failed")]
    CallbackBody,
    #[error("on_message_complete callback failed")]
    CallbackMessageComplete,

    // --- Structural (§7) ---
    #[error("invalid EOF state")]
    InvalidEofState,
    #[error("header block exceeded the configured maximum size")]
    HeaderOverflow,
    #[error("connection closed")]
    ClosedConnection,
    #[error("invalid SIP version")]
    InvalidVersion,
    #[error("invalid status code")]
    InvalidStatus,
    #[error("invalid method")]
    InvalidMethod,
    #[error("invalid request URL")]
    InvalidUrl,
    #[error("invalid host")]
    InvalidHost,
    #[error("invalid port")]
    InvalidPort,
    #[error("invalid path")]
    InvalidPath,
    #[error("invalid query string")]
    InvalidQueryString,
    #[error("invalid fragment")]
    InvalidFragment,
    #[error("expected LF")]
    LfExpected,
    #[error("invalid header token")]
    InvalidHeaderToken,
    #[error("invalid Content-Length value")]
    InvalidContentLength,
    #[error("a second Content-Length header was present")]
    UnexpectedContentLength,
    #[error("invalid constant")]
    InvalidConstant,
    #[error("invalid internal state")]
    InvalidInternalState,
    #[error("strict-mode violation")]
    Strict,
    #[error("parser is paused")]
    Paused,
    #[error("unknown error")]
    Unknown,

    // --- Micro-parser kinds (§4.2) ---
    #[error("header value not parsed yet")]
    NotParsedYet,
    #[error("no data to parse")]
    NoData,
    #[error("micro-parser reached a dead state")]
    DeadState,
    #[error("micro-parser reached an unhandled state")]
    UnhandledState,
    #[error("numeric value out of range")]
    MaxRange,
    #[error("unexpected character")]
    UnexpectedChar,
    #[error("parse failed for an unclear reason")]
    UnclearReason,
}

impl Error {
    /// Machine-readable name, independent of the human-readable [`Error::description`].
    pub const fn name(self) -> &'static str {
        match self {
            Error::CallbackMessageBegin => "CB_message_begin",
            Error::CallbackUrl => "CB_url",
            Error::CallbackStatus => "CB_status",
            Error::CallbackHeaderField => "CB_header_field",
            Error::CallbackHeaderValue => "CB_header_value",
            Error::CallbackHeadersComplete => "CB_headers_complete",
            Error::CallbackBody => "CB_body",
            Error::CallbackMessageComplete => "CB_message_complete",
            Error::InvalidEofState => "INVALID_EOF_STATE",
            Error::HeaderOverflow => "HEADER_OVERFLOW",
            Error::ClosedConnection => "CLOSED_CONNECTION",
            Error::InvalidVersion => "INVALID_VERSION",
            Error::InvalidStatus => "INVALID_STATUS",
            Error::InvalidMethod => "INVALID_METHOD",
            Error::InvalidUrl => "INVALID_URL",
            Error::InvalidHost => "INVALID_HOST",
            Error::InvalidPort => "INVALID_PORT",
            Error::InvalidPath => "INVALID_PATH",
            Error::InvalidQueryString => "INVALID_QUERY_STRING",
            Error::InvalidFragment => "INVALID_FRAGMENT",
            Error::LfExpected => "LF_EXPECTED",
            Error::InvalidHeaderToken => "INVALID_HEADER_TOKEN",
            Error::InvalidContentLength => "INVALID_CONTENT_LENGTH",
            Error::UnexpectedContentLength => "UNEXPECTED_CONTENT_LENGTH",
            Error::InvalidConstant => "INVALID_CONSTANT",
            Error::InvalidInternalState => "INVALID_INTERNAL_STATE",
            Error::Strict => "STRICT",
            Error::Paused => "PAUSED",
            Error::Unknown => "UNKNOWN",
            Error::NotParsedYet => "NOT_PARSED_YET",
            Error::NoData => "NO_DATA",
            Error::DeadState => "DEAD_STATE",
            Error::UnhandledState => "UNHANDLED_STATE",
            Error::MaxRange => "MAX_RANGE",
            Error::UnexpectedChar => "UNEXPECTED_CHAR",
            Error::UnclearReason => "UNCLEAR_REASON",
        }
    }
}

/// A non-zero callback return value, mapped to the matching sticky [`Error`].
pub(crate) fn callback_error(which: Callback) -> Error {
    match which {
        Callback::MessageBegin => Error::CallbackMessageBegin,
        Callback::Url => Error::CallbackUrl,
        Callback::Status => Error::CallbackStatus,
        Callback::HeaderField => Error::CallbackHeaderField,
        Callback::HeaderValue => Error::CallbackHeaderValue,
        Callback::HeadersComplete => Error::CallbackHeadersComplete,
        Callback::Body => Error::CallbackBody,
        Callback::MessageComplete => Error::CallbackMessageComplete,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Callback {
    MessageBegin,
    Url,
    Status,
    HeaderField,
    HeaderValue,
    HeadersComplete,
    Body,
    MessageComplete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_name() {
        assert_eq!(Error::HeaderOverflow.name(), "HEADER_OVERFLOW");
        assert_eq!(Error::UnexpectedContentLength.name(), "UNEXPECTED_CONTENT_LENGTH");
        assert_eq!(Error::MaxRange.name(), "MAX_RANGE");
    }

    #[test]
    fn descriptions_are_human_readable() {
        assert_eq!(Error::InvalidMethod.to_string(), "invalid method");
    }
}
