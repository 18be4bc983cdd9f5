//! Character classes used by the parser and string extractor.
//!
//! These are deliberately narrower than unicode or even full ASCII
//! classes: the grammar only recognizes lowercase keywords, and its
//! whitespace set excludes carriage return.

/// Whitespace skipped between tokens: space, newline, tab.
#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    b == b' ' || b == b'\n' || b == b'\t'
}

/// Letters that may start or continue a constant token.
///
/// Lowercase only - `True` and `NULL` are rejected by construction.
#[inline]
pub(crate) fn is_letter(b: u8) -> bool {
    b.is_ascii_lowercase()
}

/// Bytes that may start a numeric token.
#[inline]
pub(crate) fn is_number_start(b: u8) -> bool {
    b.is_ascii_digit() || b == b'-' || b == b'.'
}

/// Bytes that may appear inside a numeric token.
///
/// This is the maximal-munch class; the scanned run is validated
/// against the number grammar afterwards.
#[inline]
pub(crate) fn is_number_body(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')
}
