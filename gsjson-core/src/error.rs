//! Parse error codes and the positioned error type.
//!
//! Every failure is fatal to the enclosing call: inner helpers bubble
//! their errors up unchanged and nothing attempts recovery or
//! best-effort output. Each error carries the byte index at which the
//! problem was detected.

use std::fmt;

/// Error codes for parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Input was empty or all whitespace - no value to parse.
    EmptyInput,
    /// A character that cannot start the expected token.
    UnexpectedCharacter(char),
    /// Malformed giant string: bad length prefix, payload running past
    /// end of input, missing closing quote, or non-UTF-8 payload.
    MalformedGiantString,
    /// End of input inside an escaped string.
    UnterminatedString,
    /// Unknown escape, bad `\u` hex digits, or an unpaired surrogate.
    InvalidEscape,
    /// Numeric token that does not match the number grammar.
    InvalidNumber,
    /// A constant token other than `true`, `false`, or `null`.
    InvalidConstant,
    /// Missing colon after an object key, or more than one colon.
    MalformedColon,
    /// Missing, doubled, or trailing comma between container members.
    MalformedComma,
    /// End of input while a container was still open.
    UnterminatedContainer,
    /// Root value was not of the kind a typed entry point required.
    UnexpectedRoot(&'static str),
}

impl ErrorCode {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::EmptyInput => "input did not contain a value",
            Self::UnexpectedCharacter(_) => "unexpected character",
            Self::MalformedGiantString => "malformed giant string",
            Self::UnterminatedString => "unterminated string",
            Self::InvalidEscape => "invalid escape sequence",
            Self::InvalidNumber => "invalid number",
            Self::InvalidConstant => "invalid constant",
            Self::MalformedColon => "malformed colon after object key",
            Self::MalformedComma => "malformed comma between members",
            Self::UnterminatedContainer => "unterminated container",
            Self::UnexpectedRoot(_) => "root value has unexpected type",
        }
    }
}

/// A fatal parse error with the byte index where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub index: usize,
}

impl ParseError {
    pub(crate) fn new(code: ErrorCode, index: usize) -> Self {
        Self { code, index }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            ErrorCode::UnexpectedCharacter(c) => {
                write!(f, "unexpected character {:?} at index {}", c, self.index)
            }
            ErrorCode::UnexpectedRoot(expected) => {
                write!(f, "root value is not {} (index {})", expected, self.index)
            }
            code => write!(f, "{} at index {}", code.message(), self.index),
        }
    }
}

impl std::error::Error for ParseError {}
