//! # Text cursor
//!
//! Position-seekable access over the input text. Positions are byte offsets into the UTF-8 input,
//! and always sit on a character boundary.

use crate::tree::Range;
use std::fmt;

/// Read/unread access over an input string
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    /// Full input
    text: &'a str,

    /// Current offset in the input
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the beginning of the provided text
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Get the full input
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Get the current offset
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move to an absolute offset
    ///
    /// Offsets past the end of the input are clamped to it.
    pub fn seek(&mut self, pos: usize) {
        debug_assert!(
            pos >= self.text.len() || self.text.is_char_boundary(pos),
            "cursor must be moved to a character boundary"
        );

        self.pos = pos.min(self.text.len());
    }

    /// Get the input's length
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the input is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if the cursor reached the end of the input
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Get the remaining input
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Get the next code point without consuming it
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume and return the next code point
    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Step back over the previous code point and return it
    pub fn unread(&mut self) -> Option<char> {
        let c = self.text[..self.pos].chars().next_back()?;
        self.pos -= c.len_utf8();
        Some(c)
    }

    /// Skip a number of bytes, which must end on a character boundary
    pub fn advance(&mut self, len: usize) {
        self.seek(self.pos + len);
    }

    /// Compute the line and column of an offset in the input
    pub fn location(&self, offset: usize) -> Location {
        Location::of(self.text, offset)
    }
}

/// Line and column of an offset in a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Byte offset
    pub offset: usize,

    /// Line number (1-based)
    pub line: usize,

    /// Column number, counted in code points (1-based)
    pub column: usize,
}

impl Location {
    /// Compute the location of an offset by scanning the newlines before it
    pub fn of(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let head = &text[..offset];

        let line_start = head.rfind('\n').map(|i| i + 1).unwrap_or(0);

        Self {
            offset,
            line: head.matches('\n').count() + 1,
            column: head[line_start..].chars().count() + 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Source of the text a tree was built from
///
/// Nodes only store offsets, the text they cover is materialized through this trait when needed.
pub trait DataSource {
    /// Get the text covered by a range
    fn substring(&self, range: Range) -> &str;
}

impl DataSource for str {
    fn substring(&self, range: Range) -> &str {
        let end = range.end.min(self.len());
        &self[range.start.min(end)..end]
    }
}

impl DataSource for String {
    fn substring(&self, range: Range) -> &str {
        self.as_str().substring(range)
    }
}
