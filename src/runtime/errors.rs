use crate::cursor::Location;
use thiserror::Error;

/// Error returned when a [parse](super::Parser::parse) fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{content} at {location}")]
pub struct ParseError {
    location: Location,
    content: ParseErrorContent,
}

impl ParseError {
    /// Create a new parse error at an offset of the input
    pub(crate) fn new(input: &str, offset: usize, content: ParseErrorContent) -> Self {
        Self {
            location: Location::of(input, offset),
            content,
        }
    }

    /// Create an error describing the code point found at an offset
    pub(crate) fn unexpected(input: &str, offset: usize) -> Self {
        let content = match input.get(offset..).and_then(|rest| rest.chars().next()) {
            None => ParseErrorContent::UnexpectedEof,
            Some('\r' | '\n') => ParseErrorContent::UnexpectedNewLine,
            Some(c) => ParseErrorContent::UnexpectedChar(c),
        };

        Self::new(input, offset, content)
    }

    /// Get the error's location
    pub fn location(&self) -> Location {
        self.location
    }

    /// Get the byte offset of the error
    pub fn offset(&self) -> usize {
        self.location.offset
    }

    /// Get the line number of the error (1-based)
    pub fn line(&self) -> usize {
        self.location.line
    }

    /// Get the column number of the error (1-based)
    pub fn column(&self) -> usize {
        self.location.column
    }

    /// Get the error's content
    pub fn content(&self) -> &ParseErrorContent {
        &self.content
    }
}

/// Content of a [`ParseError`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorContent {
    #[error("Unexpected EOF")]
    UnexpectedEof,

    #[error("Unexpected new line")]
    UnexpectedNewLine,

    #[error("Unexpected {0}")]
    UnexpectedChar(char),

    #[error("Recursion limit of {0} nested rules reached")]
    RecursionLimit(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let input = "ab\ncd";

        assert_eq!(ParseError::unexpected(input, 1).to_string(), "Unexpected b at line 1, column 2");
        assert_eq!(ParseError::unexpected(input, 2).to_string(), "Unexpected new line at line 1, column 3");
        assert_eq!(ParseError::unexpected(input, 5).to_string(), "Unexpected EOF at line 2, column 3");
    }
}
