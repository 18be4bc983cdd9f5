//! String extraction: escaped strings and giant strings.
//!
//! Both encodings open at a quote character and the extractor reports
//! the index of the matching closing quote, so the caller can resume
//! scanning right after it.
//!
//! The giant form `'<len><delim><payload>'` is O(1) aside from the
//! payload copy: the declared byte length jumps straight to the closing
//! quote, with no per-byte escape scanning. The escaped form hops
//! between `"` and `\` occurrences with `memchr2` and copies the
//! stretches in between verbatim.

use memchr::memchr2;

use crate::error::{ErrorCode, ParseError};

/// A decoded string plus the index of its closing quote.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Extracted {
    pub value: String,
    /// Byte index of the closing `"` or `'` in the source.
    pub close: usize,
}

/// Decode the string literal opening at `start`.
///
/// `input[start]` must be `'` (giant string) or `"` (escaped string);
/// the caller has already dispatched on it.
pub(crate) fn extract_string(input: &str, start: usize) -> Result<Extracted, ParseError> {
    if input.as_bytes()[start] == b'\'' {
        extract_giant(input, start)
    } else {
        extract_escaped(input, start)
    }
}

/// Giant string: `'` digits `<one delimiter byte>` payload `'`.
///
/// The digits declare the payload length in bytes; the delimiter byte
/// is consumed but its value is not checked (the serializer writes a
/// space). The payload is copied verbatim - it may contain quotes,
/// backslashes, newlines, anything.
fn extract_giant(input: &str, start: usize) -> Result<Extracted, ParseError> {
    let bytes = input.as_bytes();
    let mut i = start + 1;

    let mut len: usize = 0;
    let digits_start = i;
    while let Some(b @ b'0'..=b'9') = bytes.get(i) {
        len = len
            .checked_mul(10)
            .and_then(|n| n.checked_add((b - b'0') as usize))
            .ok_or(ParseError::new(ErrorCode::MalformedGiantString, i))?;
        i += 1;
    }
    if i == digits_start {
        return Err(ParseError::new(ErrorCode::MalformedGiantString, digits_start));
    }

    // One delimiter byte of any value.
    if i >= bytes.len() {
        return Err(ParseError::new(ErrorCode::MalformedGiantString, i));
    }
    let payload_start = i + 1;

    let close = payload_start + len;
    if close >= bytes.len() {
        return Err(ParseError::new(ErrorCode::MalformedGiantString, bytes.len()));
    }
    if bytes[close] != b'\'' {
        return Err(ParseError::new(ErrorCode::MalformedGiantString, close));
    }

    // The declared length counts bytes, so the payload can split a
    // multi-byte sequence; that cannot become a String.
    let value = std::str::from_utf8(&bytes[payload_start..close])
        .map_err(|_| ParseError::new(ErrorCode::MalformedGiantString, payload_start))?
        .to_owned();

    Ok(Extracted { value, close })
}

/// Escaped string: `"` with the standard two-character escapes plus
/// `\uXXXX` UTF-16 code units (surrogate pairs combined).
fn extract_escaped(input: &str, start: usize) -> Result<Extracted, ParseError> {
    let bytes = input.as_bytes();
    let mut value = String::new();
    let mut seg = start + 1;

    loop {
        let rel = memchr2(b'"', b'\\', &bytes[seg..])
            .ok_or(ParseError::new(ErrorCode::UnterminatedString, bytes.len()))?;
        let i = seg + rel;
        // seg and i both sit on char boundaries: seg follows an ASCII
        // byte and bytes[i] is ASCII.
        value.push_str(&input[seg..i]);

        if bytes[i] == b'"' {
            return Ok(Extracted { value, close: i });
        }

        match bytes.get(i + 1) {
            Some(b'"') => value.push('"'),
            Some(b'\\') => value.push('\\'),
            Some(b'/') => value.push('/'),
            Some(b'b') => value.push('\u{0008}'),
            Some(b'f') => value.push('\u{000C}'),
            Some(b'n') => value.push('\n'),
            Some(b'r') => value.push('\r'),
            Some(b't') => value.push('\t'),
            Some(b'u') => {
                let unit = read_hex4(bytes, i + 2)?;
                if (0xD800..=0xDBFF).contains(&unit) {
                    // High surrogate: a low surrogate escape must
                    // follow immediately.
                    if bytes.get(i + 6) != Some(&b'\\') || bytes.get(i + 7) != Some(&b'u') {
                        return Err(ParseError::new(ErrorCode::InvalidEscape, i + 6));
                    }
                    let low = read_hex4(bytes, i + 8)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(ParseError::new(ErrorCode::InvalidEscape, i + 8));
                    }
                    let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    let c = char::from_u32(code)
                        .ok_or(ParseError::new(ErrorCode::InvalidEscape, i + 2))?;
                    value.push(c);
                    seg = i + 12;
                    continue;
                }
                if (0xDC00..=0xDFFF).contains(&unit) {
                    // Low surrogate with no preceding high surrogate.
                    return Err(ParseError::new(ErrorCode::InvalidEscape, i + 2));
                }
                let c = char::from_u32(unit)
                    .ok_or(ParseError::new(ErrorCode::InvalidEscape, i + 2))?;
                value.push(c);
                seg = i + 6;
                continue;
            }
            _ => return Err(ParseError::new(ErrorCode::InvalidEscape, i + 1)),
        }
        seg = i + 2;
    }
}

/// Read exactly 4 hex digits at `at`, as a UTF-16 code unit.
fn read_hex4(bytes: &[u8], at: usize) -> Result<u32, ParseError> {
    let mut unit: u32 = 0;
    for k in 0..4 {
        let digit = bytes
            .get(at + k)
            .and_then(|b| (*b as char).to_digit(16))
            .ok_or(ParseError::new(ErrorCode::InvalidEscape, at + k))?;
        unit = (unit << 4) | digit;
    }
    Ok(unit)
}
