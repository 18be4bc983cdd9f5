//! Byte spans into the source text.
//!
//! Containers remember the half-open byte range of the literal that
//! produced them. Only the offsets are stored - no reference into the
//! input and no eager copy - so the tree stays `'static` and the caller
//! re-supplies the source text when extracting a literal.

use std::ops::Range;

/// A half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the opening delimiter.
    pub start: usize,
    /// One past the byte offset of the closing delimiter (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The span as a standard range, for direct slicing.
    #[inline]
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Slice the source text this span was produced from.
    ///
    /// Returns `None` if the span falls outside `source` or does not
    /// land on char boundaries (i.e. `source` is not the text the span
    /// came from).
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.as_range())
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.as_range()
    }
}
