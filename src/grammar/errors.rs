use super::kind::Kind;
use crate::cursor::Location;
use crate::runtime::ParseError;
use crate::tree::Range;
use thiserror::Error;

/// A grammar model tree doesn't have the expected shape
///
/// Trees produced by the grammar recognizer never trigger this error; hand-built ones may.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("tree has no {} node", Kind::Grammar)]
    NoGrammar,

    #[error("unknown node kind `{name}` at {range}")]
    UnknownKind { name: String, range: Range },

    #[error("unexpected {found} node inside {parent} at {range}")]
    Unexpected {
        found: Kind,
        parent: Kind,
        range: Range,
    },

    #[error("{parent} node at {range} has no {expected} child")]
    Missing {
        expected: Kind,
        parent: Kind,
        range: Range,
    },

    #[error("malformed {kind} `{text}` at {range}")]
    BadToken {
        kind: Kind,
        text: String,
        range: Range,
    },
}

/// Error raised when reading a grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Malformed(#[from] ModelError),

    #[error("grammar has no rule")]
    NoRules,

    #[error("rule `{name}` at {location} was already declared at {first}")]
    DuplicateRule {
        name: String,
        location: Location,
        first: Location,
    },

    #[error("unknown rule `{name}` at {location}")]
    UnknownRule { name: String, location: Location },

    #[error("left recursion at {location}: {}", .cycle.join(" -> "))]
    LeftRecursion {
        cycle: Vec<String>,
        location: Location,
    },
}

impl GrammarError {
    /// Get the location the error applies to, if any
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::Syntax(err) => Some(err.location()),
            Self::Malformed(_) | Self::NoRules => None,
            Self::DuplicateRule { location, .. }
            | Self::UnknownRule { location, .. }
            | Self::LeftRecursion { location, .. } => Some(*location),
        }
    }
}
