//! `TEXT-UTF8char` (RFC 3261 §25.1), used by [`super::headers::subject`] to
//! validate that a `Subject` value is well-formed text.

use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_while_m_n},
    combinator::{recognize, map_res},
    sequence::tuple,
    IResult,
    error::{ErrorKind, Error as NomError},
};

// Type alias for parser result
pub type ParseResult<'a, O> = IResult<&'a [u8], O>;

// UTF8-CONT = %x80-BF
fn utf8_cont(input: &[u8]) -> ParseResult<&[u8]> {
    map_res(take(1usize), |byte: &[u8]| {
        if byte.is_empty() || !(byte[0] >= 0x80 && byte[0] <= 0xBF) {
            Err(nom::Err::Failure(NomError::new(input, ErrorKind::Verify)))
        } else {
            Ok(byte)
        }
    })(input)
}

// UTF8-NONASCII = %xC2-DF 1UTF8-CONT
//               / %xE0-EF 2UTF8-CONT
//               / %xF0-F7 3UTF8-CONT
// Adjusted ranges based on RFC 3629 (excluding overlong sequences C0, C1, etc.)
// Checks first byte to determine length, then takes required bytes and validates.
pub fn utf8_nonascii(input: &[u8]) -> ParseResult<&[u8]> {
    if input.is_empty() {
        return Err(nom::Err::Error(NomError::new(input, ErrorKind::Eof)));
    }

    let first_byte = input[0];
    let len = match first_byte {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Err(nom::Err::Error(NomError::new(input, ErrorKind::Tag)))
    };

    if input.len() < len {
        return Err(nom::Err::Incomplete(nom::Needed::new(len - input.len())));
    }

    // Validate the sequence according to RFC 3629 rules
    // (Prevents overlong sequences and surrogates)
    let valid = match (first_byte, len) {
        (0xE0, 3) => input[1] >= 0xA0 && input[1] <= 0xBF && input[2] >= 0x80 && input[2] <= 0xBF,
        (0xED, 3) => input[1] >= 0x80 && input[1] <= 0x9F && input[2] >= 0x80 && input[2] <= 0xBF,
        (0xF0, 4) => input[1] >= 0x90 && input[1] <= 0xBF && input[2] >= 0x80 && input[2] <= 0xBF && input[3] >= 0x80 && input[3] <= 0xBF,
        (0xF4, 4) => input[1] >= 0x80 && input[1] <= 0x8F && input[2] >= 0x80 && input[2] <= 0xBF && input[3] >= 0x80 && input[3] <= 0xBF,
        (_, 2)    => input[1] >= 0x80 && input[1] <= 0xBF,
        (_, 3)    => input[1] >= 0x80 && input[1] <= 0xBF && input[2] >= 0x80 && input[2] <= 0xBF,
        (_, 4)    => input[1] >= 0x80 && input[1] <= 0xBF && input[2] >= 0x80 && input[2] <= 0xBF && input[3] >= 0x80 && input[3] <= 0xBF,
        _         => false, // Should be unreachable due to first match
    };

    if valid {
        Ok((&input[len..], &input[..len]))
    } else {
        Err(nom::Err::Error(NomError::new(input, ErrorKind::Verify)))
    }
}

// TEXT-UTF8char = %x21-7E / UTF8-NONASCII
pub fn text_utf8_char(input: &[u8]) -> ParseResult<&[u8]> {
    alt((
        // %x21-7E (Printable US-ASCII chars excluding space)
        map_res(take(1usize), |byte: &[u8]| {
            if byte.is_empty() || !(byte[0] >= 0x21 && byte[0] <= 0x7E) {
               Err(nom::Err::Failure(NomError::new(input, ErrorKind::Verify)))
            } else {
                Ok(byte)
            }
        }),
        utf8_nonascii,
    ))(input)
}
