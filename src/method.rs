//! SIP request methods and the prefix-ladder matcher used both by L1 (the
//! start line) and by L2 micro-parsers that embed a method name (CSeq,
//! Allow).
//!
//! Grounded on `sip_method` / `SIP_METHOD_MAP` in the ported parser's
//! `sipparser.h`/`sipparser.c`, including the three branch points where one
//! method name is a strict prefix of another: `INFO`→`INVITE` at index 2 on
//! `'V'`, `PRACK`→`PUBLISH` at index 1 on `'U'`, `REFER`→`REGISTER` at index 2
//! on `'G'`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Ack,
    Bye,
    Cancel,
    Info,
    Invite,
    Message,
    Notify,
    Options,
    Prack,
    Publish,
    Refer,
    Register,
    Subscribe,
    Update,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Ack => "ACK",
            Method::Bye => "BYE",
            Method::Cancel => "CANCEL",
            Method::Info => "INFO",
            Method::Invite => "INVITE",
            Method::Message => "MESSAGE",
            Method::Notify => "NOTIFY",
            Method::Options => "OPTIONS",
            Method::Prack => "PRACK",
            Method::Publish => "PUBLISH",
            Method::Refer => "REFER",
            Method::Register => "REGISTER",
            Method::Subscribe => "SUBSCRIBE",
            Method::Update => "UPDATE",
        }
    }

    /// Exact, case-sensitive match of a complete token against the fourteen
    /// recognized method names. Used by L2 (CSeq, Allow) which already has
    /// the whole token isolated, unlike L1's byte-by-byte ladder.
    pub fn from_token(token: &[u8]) -> Option<Method> {
        Some(match token {
            b"ACK" => Method::Ack,
            b"BYE" => Method::Bye,
            b"CANCEL" => Method::Cancel,
            b"INFO" => Method::Info,
            b"INVITE" => Method::Invite,
            b"MESSAGE" => Method::Message,
            b"NOTIFY" => Method::Notify,
            b"OPTIONS" => Method::Options,
            b"PRACK" => Method::Prack,
            b"PUBLISH" => Method::Publish,
            b"REFER" => Method::Refer,
            b"REGISTER" => Method::Register,
            b"SUBSCRIBE" => Method::Subscribe,
            b"UPDATE" => Method::Update,
            _ => return None,
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the method-name prefix ladder used by L1's start-line state.
///
/// `index` is the number of bytes of the candidate already matched (0-based
/// position of the byte about to be checked). Returns the next ladder state,
/// or `None` on a byte that cannot continue any method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderStep {
    /// Still matching `candidate`, one byte further along.
    Continue(Method),
    /// The candidate matched in full; a following SP enters URL capture.
    Complete(Method),
    /// No candidate continues; the start line is malformed.
    Dead,
}

/// Advances the method ladder by one byte. `candidate` is the method guessed
/// so far, `index` is how many of its bytes have been consumed (including the
/// byte just supplied), and `byte` is the newly read byte at that index.
///
/// This mirrors `sipparser.c`'s `s_req_method_*` state chain: every method's
/// remaining bytes are checked literally against its name, except at the
/// three branch points where a second candidate can still apply.
pub fn ladder_step(candidate: Method, index: usize, byte: u8) -> LadderStep {
    let name = candidate.as_bytes();
    if index >= name.len() {
        return LadderStep::Dead;
    }

    // Branch points: one method name is a strict prefix of another up to
    // this index; a mismatching-but-plausible byte re-aims the ladder at the
    // second candidate instead of failing outright.
    match (candidate, index, byte) {
        (Method::Info, 2, b'V') => return LadderStep::Continue(Method::Invite),
        (Method::Prack, 1, b'U') => return LadderStep::Continue(Method::Publish),
        (Method::Refer, 2, b'G') => return LadderStep::Continue(Method::Register),
        _ => {}
    }

    if name[index] != byte {
        return LadderStep::Dead;
    }

    if index + 1 == name.len() {
        LadderStep::Complete(candidate)
    } else {
        LadderStep::Continue(candidate)
    }
}

/// The method(s) consistent with a given first byte, used to seed the ladder.
pub fn candidates_for_first_byte(byte: u8) -> &'static [Method] {
    match byte {
        b'A' => &[Method::Ack],
        b'B' => &[Method::Bye],
        b'C' => &[Method::Cancel],
        b'I' => &[Method::Info, Method::Invite],
        b'M' => &[Method::Message],
        b'N' => &[Method::Notify],
        b'O' => &[Method::Options],
        b'P' => &[Method::Prack, Method::Publish],
        b'R' => &[Method::Refer, Method::Register],
        b'S' => &[Method::Subscribe],
        b'U' => &[Method::Update],
        _ => &[],
    }
}

impl Method {
    const fn as_bytes(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_token_round_trip() {
        for m in [
            Method::Ack, Method::Bye, Method::Cancel, Method::Info, Method::Invite,
            Method::Message, Method::Notify, Method::Options, Method::Prack,
            Method::Publish, Method::Refer, Method::Register, Method::Subscribe,
            Method::Update,
        ] {
            assert_eq!(Method::from_token(m.as_str().as_bytes()), Some(m));
        }
        assert_eq!(Method::from_token(b"BOGUS"), None);
    }

    #[test]
    fn ladder_disambiguates_info_invite() {
        // "IN" matched so far as Info; index 2 sees 'F' -> stays Info.
        assert_eq!(ladder_step(Method::Info, 2, b'F'), LadderStep::Continue(Method::Info));
        // index 2 sees 'V' -> re-aims at Invite.
        assert_eq!(ladder_step(Method::Info, 2, b'V'), LadderStep::Continue(Method::Invite));
    }

    #[test]
    fn ladder_disambiguates_prack_publish() {
        assert_eq!(ladder_step(Method::Prack, 1, b'R'), LadderStep::Continue(Method::Prack));
        assert_eq!(ladder_step(Method::Prack, 1, b'U'), LadderStep::Continue(Method::Publish));
    }

    #[test]
    fn ladder_disambiguates_refer_register() {
        assert_eq!(ladder_step(Method::Refer, 2, b'E'), LadderStep::Continue(Method::Refer));
        assert_eq!(ladder_step(Method::Refer, 2, b'G'), LadderStep::Continue(Method::Register));
    }

    #[test]
    fn ladder_completes_and_dies() {
        assert_eq!(ladder_step(Method::Bye, 2, b'E'), LadderStep::Complete(Method::Bye));
        assert_eq!(ladder_step(Method::Bye, 0, b'X'), LadderStep::Dead);
    }
}
