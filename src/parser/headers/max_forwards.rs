//! `Max-Forwards` micro-parser (RFC 3261 §25.1): one decimal integer in
//! `[0, 255]`; out-of-range is `MaxRange`. Grounded on
//! `MaxForwardsHeader.cpp`.

use crate::error::Error;

pub fn parse_max_forwards(value: &[u8]) -> Result<u8, Error> {
    let trimmed = trim(value);
    if trimmed.is_empty() || !trimmed.iter().all(|b| b.is_ascii_digit()) {
        return Err(Error::UnexpectedChar);
    }
    let n: u32 = std::str::from_utf8(trimmed)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(Error::MaxRange)?;
    u8::try_from(n).map_err(|_| Error::MaxRange)
}

fn trim(b: &[u8]) -> &[u8] {
    let start = b.iter().position(|&c| c != b' ' && c != b'\t').unwrap_or(b.len());
    let end = b.iter().rposition(|&c| c != b' ' && c != b'\t').map_or(start, |p| p + 1);
    &b[start..end]
}
