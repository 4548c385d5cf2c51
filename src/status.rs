//! SIP status codes (RFC 3261 §21 and the IANA SIP status-code registry).
//!
//! Grounded on `SIP_STATUS_MAP` in `sipparser.h`. Unlike the method ladder,
//! status codes are parsed as three plain digits (§4.1 state 5) — the enum
//! here is only for giving callers a typed, named view of the numeric code
//! that `on_status`/`status_code` produced; an unrecognized three-digit code
//! is still accepted and reported as [`StatusCode::Other`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    Trying,
    Ringing,
    CallIsBeingForwarded,
    Queued,
    SessionProgress,
    EarlyDialogTerminated,
    Ok,
    Accepted,
    NoNotification,
    MultipleChoices,
    MovedPermanently,
    MovedTemporarily,
    UseProxy,
    AlternativeService,
    BadRequest,
    Unauthorized,
    PaymentRequired,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    ProxyAuthenticationRequired,
    RequestTimeout,
    Gone,
    ConditionalRequestFailed,
    RequestEntityTooLarge,
    RequestUriTooLarge,
    UnsupportedMediaType,
    UnsupportedUriScheme,
    UnknownResourcePriority,
    BadExtension,
    ExtensionRequired,
    SessionIntervalTooSmall,
    IntervalTooBrief,
    BadLocationInformation,
    BadAlertMessage,
    UseIdentityHeader,
    ProvideReferrerIdentity,
    FlowFailed,
    AnonymityDisallowed,
    BadIdentityInfo,
    UnsupportedCredential,
    InvalidIdentityHeader,
    FirstHopLacksOutboundSupport,
    MaxBreadthExceeded,
    BadInfoPackage,
    ConsentNeeded,
    TemporarilyUnavailable,
    CallTransactionDoesNotExist,
    LoopDetected,
    TooManyHops,
    AddressIncomplete,
    Ambiguous,
    BusyHere,
    RequestTerminated,
    NotAcceptableHere,
    BadEvent,
    RequestPending,
    Undecipherable,
    SecurityAgreementRequired,
    InternalServerError,
    NotImplemented,
    BadGateway,
    ServiceUnavailable,
    ServerTimeout,
    VersionNotSupported,
    MessageTooLarge,
    PushNotificationServiceNotSupported,
    PreconditionFailure,
    BusyEverywhere,
    Decline,
    DoesNotExistAnywhere,
    NotAcceptable606,
    Unwanted,
    Rejected,
    /// Any syntactically valid three-digit code not in the IANA map above.
    Other(u16),
}

impl StatusCode {
    pub fn from_code(code: u16) -> StatusCode {
        match code {
            100 => StatusCode::Trying,
            180 => StatusCode::Ringing,
            181 => StatusCode::CallIsBeingForwarded,
            182 => StatusCode::Queued,
            183 => StatusCode::SessionProgress,
            199 => StatusCode::EarlyDialogTerminated,
            200 => StatusCode::Ok,
            202 => StatusCode::Accepted,
            204 => StatusCode::NoNotification,
            300 => StatusCode::MultipleChoices,
            301 => StatusCode::MovedPermanently,
            302 => StatusCode::MovedTemporarily,
            305 => StatusCode::UseProxy,
            380 => StatusCode::AlternativeService,
            400 => StatusCode::BadRequest,
            401 => StatusCode::Unauthorized,
            402 => StatusCode::PaymentRequired,
            403 => StatusCode::Forbidden,
            404 => StatusCode::NotFound,
            405 => StatusCode::MethodNotAllowed,
            406 => StatusCode::NotAcceptable,
            407 => StatusCode::ProxyAuthenticationRequired,
            408 => StatusCode::RequestTimeout,
            410 => StatusCode::Gone,
            412 => StatusCode::ConditionalRequestFailed,
            413 => StatusCode::RequestEntityTooLarge,
            414 => StatusCode::RequestUriTooLarge,
            415 => StatusCode::UnsupportedMediaType,
            416 => StatusCode::UnsupportedUriScheme,
            417 => StatusCode::UnknownResourcePriority,
            420 => StatusCode::BadExtension,
            421 => StatusCode::ExtensionRequired,
            422 => StatusCode::SessionIntervalTooSmall,
            423 => StatusCode::IntervalTooBrief,
            424 => StatusCode::BadLocationInformation,
            425 => StatusCode::BadAlertMessage,
            428 => StatusCode::UseIdentityHeader,
            429 => StatusCode::ProvideReferrerIdentity,
            430 => StatusCode::FlowFailed,
            433 => StatusCode::AnonymityDisallowed,
            436 => StatusCode::BadIdentityInfo,
            437 => StatusCode::UnsupportedCredential,
            438 => StatusCode::InvalidIdentityHeader,
            439 => StatusCode::FirstHopLacksOutboundSupport,
            440 => StatusCode::MaxBreadthExceeded,
            469 => StatusCode::BadInfoPackage,
            470 => StatusCode::ConsentNeeded,
            480 => StatusCode::TemporarilyUnavailable,
            481 => StatusCode::CallTransactionDoesNotExist,
            482 => StatusCode::LoopDetected,
            483 => StatusCode::TooManyHops,
            484 => StatusCode::AddressIncomplete,
            485 => StatusCode::Ambiguous,
            486 => StatusCode::BusyHere,
            487 => StatusCode::RequestTerminated,
            488 => StatusCode::NotAcceptableHere,
            489 => StatusCode::BadEvent,
            491 => StatusCode::RequestPending,
            493 => StatusCode::Undecipherable,
            494 => StatusCode::SecurityAgreementRequired,
            500 => StatusCode::InternalServerError,
            501 => StatusCode::NotImplemented,
            502 => StatusCode::BadGateway,
            503 => StatusCode::ServiceUnavailable,
            504 => StatusCode::ServerTimeout,
            505 => StatusCode::VersionNotSupported,
            513 => StatusCode::MessageTooLarge,
            555 => StatusCode::PushNotificationServiceNotSupported,
            580 => StatusCode::PreconditionFailure,
            600 => StatusCode::BusyEverywhere,
            603 => StatusCode::Decline,
            604 => StatusCode::DoesNotExistAnywhere,
            606 => StatusCode::NotAcceptable606,
            607 => StatusCode::Unwanted,
            608 => StatusCode::Rejected,
            other => StatusCode::Other(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            StatusCode::Trying => 100,
            StatusCode::Ringing => 180,
            StatusCode::CallIsBeingForwarded => 181,
            StatusCode::Queued => 182,
            StatusCode::SessionProgress => 183,
            StatusCode::EarlyDialogTerminated => 199,
            StatusCode::Ok => 200,
            StatusCode::Accepted => 202,
            StatusCode::NoNotification => 204,
            StatusCode::MultipleChoices => 300,
            StatusCode::MovedPermanently => 301,
            StatusCode::MovedTemporarily => 302,
            StatusCode::UseProxy => 305,
            StatusCode::AlternativeService => 380,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::PaymentRequired => 402,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::NotAcceptable => 406,
            StatusCode::ProxyAuthenticationRequired => 407,
            StatusCode::RequestTimeout => 408,
            StatusCode::Gone => 410,
            StatusCode::ConditionalRequestFailed => 412,
            StatusCode::RequestEntityTooLarge => 413,
            StatusCode::RequestUriTooLarge => 414,
            StatusCode::UnsupportedMediaType => 415,
            StatusCode::UnsupportedUriScheme => 416,
            StatusCode::UnknownResourcePriority => 417,
            StatusCode::BadExtension => 420,
            StatusCode::ExtensionRequired => 421,
            StatusCode::SessionIntervalTooSmall => 422,
            StatusCode::IntervalTooBrief => 423,
            StatusCode::BadLocationInformation => 424,
            StatusCode::BadAlertMessage => 425,
            StatusCode::UseIdentityHeader => 428,
            StatusCode::ProvideReferrerIdentity => 429,
            StatusCode::FlowFailed => 430,
            StatusCode::AnonymityDisallowed => 433,
            StatusCode::BadIdentityInfo => 436,
            StatusCode::UnsupportedCredential => 437,
            StatusCode::InvalidIdentityHeader => 438,
            StatusCode::FirstHopLacksOutboundSupport => 439,
            StatusCode::MaxBreadthExceeded => 440,
            StatusCode::BadInfoPackage => 469,
            StatusCode::ConsentNeeded => 470,
            StatusCode::TemporarilyUnavailable => 480,
            StatusCode::CallTransactionDoesNotExist => 481,
            StatusCode::LoopDetected => 482,
            StatusCode::TooManyHops => 483,
            StatusCode::AddressIncomplete => 484,
            StatusCode::Ambiguous => 485,
            StatusCode::BusyHere => 486,
            StatusCode::RequestTerminated => 487,
            StatusCode::NotAcceptableHere => 488,
            StatusCode::BadEvent => 489,
            StatusCode::RequestPending => 491,
            StatusCode::Undecipherable => 493,
            StatusCode::SecurityAgreementRequired => 494,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
            StatusCode::BadGateway => 502,
            StatusCode::ServiceUnavailable => 503,
            StatusCode::ServerTimeout => 504,
            StatusCode::VersionNotSupported => 505,
            StatusCode::MessageTooLarge => 513,
            StatusCode::PushNotificationServiceNotSupported => 555,
            StatusCode::PreconditionFailure => 580,
            StatusCode::BusyEverywhere => 600,
            StatusCode::Decline => 603,
            StatusCode::DoesNotExistAnywhere => 604,
            StatusCode::NotAcceptable606 => 606,
            StatusCode::Unwanted => 607,
            StatusCode::Rejected => 608,
            StatusCode::Other(code) => code,
        }
    }
}
