//! Short-form header name aliases (RFC 3261 §7.3.3).
//!
//! L1 treats every header field-name as an opaque span — it only special-
//! cases `Content-Length`/`l` internally for body framing. Everything else
//! (matching `Via` against a `v` a caller wrote instead) is the consumer's
//! job when it looks a header up by name; [`canonical`] is that lookup's
//! case-insensitive, alias-aware compare.

/// Returns the canonical long-form name for a single-letter compact header,
/// or `None` if `name` isn't one of the recognized aliases.
pub fn expand_compact_form(name: &[u8]) -> Option<&'static str> {
    if name.len() != 1 {
        return None;
    }
    let canonical = match name[0].to_ascii_lowercase() {
        b'a' => "Accept-Contact",
        b'b' => "Referred-By",
        b'c' => "Content-Type",
        b'd' => "Request-Disposition",
        b'e' => "Content-Encoding",
        b'f' => "From",
        b'i' => "Call-ID",
        b'j' => "Reject-Contact",
        b'k' => "Supported",
        b'l' => "Content-Length",
        b'm' => "Contact",
        b'o' => "Event",
        b'r' => "Refer-To",
        b's' => "Subject",
        b't' => "To",
        b'u' => "Allow-Events",
        b'v' => "Via",
        b'x' => "Session-Expires",
        b'y' => "Identity",
        _ => return None,
    };
    Some(canonical)
}

/// Compares a header field-name span against a canonical long-form name,
/// accepting either the long form or its single-letter compact alias,
/// case-insensitively.
pub fn matches(field: &[u8], canonical: &str) -> bool {
    if field.eq_ignore_ascii_case(canonical.as_bytes()) {
        return true;
    }
    expand_compact_form(field).is_some_and(|c| c.eq_ignore_ascii_case(canonical.as_bytes()))
}
