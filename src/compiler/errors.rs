use crate::cursor::Location;
use crate::grammar::ModelError;
use thiserror::Error;

/// Error raised while compiling a grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("malformed grammar tree: {0}")]
    Malformed(#[from] ModelError),

    #[error("grammar has no rule")]
    NoRules,

    #[error("unknown rule `{name}` at {location}")]
    UnknownRule { name: String, location: Location },

    #[error("compile options refer to unknown rule `{name}`")]
    UnknownTarget { name: String },

    #[error("inlined rules call each other endlessly: {}", .cycle.join(" -> "))]
    RecursiveInline { cycle: Vec<String> },

    #[error("invalid class range `{lo}-{hi}` at {location}: start is after end")]
    InvalidClassRange {
        lo: char,
        hi: char,
        location: Location,
    },

    #[error("invalid escape sequence in `{text}` at {location}")]
    InvalidEscape { text: String, location: Location },
}
