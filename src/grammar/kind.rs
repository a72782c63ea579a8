use super::errors::ModelError;
use crate::tree::Node;
use std::fmt;
use std::str::FromStr;

/// Kind of a grammar model node, deduced from the node's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Grammar,
    Definition,
    Expression,
    Sequence,
    Prefix,
    Suffix,
    Primary,
    Identifier,
    Literal,
    Class,
    Range,
    Dot,
    And,
    Not,
    Question,
    Star,
    Plus,
}

impl Kind {
    /// Every kind, in meta-grammar order
    pub const ALL: [Kind; 17] = [
        Self::Grammar,
        Self::Definition,
        Self::Expression,
        Self::Sequence,
        Self::Prefix,
        Self::Suffix,
        Self::Primary,
        Self::Identifier,
        Self::Literal,
        Self::Class,
        Self::Range,
        Self::Dot,
        Self::And,
        Self::Not,
        Self::Question,
        Self::Star,
        Self::Plus,
    ];

    /// Get the kind of a node
    pub fn of(node: &Node) -> Result<Self, ModelError> {
        node.name()
            .parse()
            .map_err(|()| ModelError::UnknownKind {
                name: node.name().to_string(),
                range: node.range(),
            })
    }

    /// Get the node name used for this kind
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grammar => "Grammar",
            Self::Definition => "Definition",
            Self::Expression => "Expression",
            Self::Sequence => "Sequence",
            Self::Prefix => "Prefix",
            Self::Suffix => "Suffix",
            Self::Primary => "Primary",
            Self::Identifier => "Identifier",
            Self::Literal => "Literal",
            Self::Class => "Class",
            Self::Range => "Range",
            Self::Dot => "DOT",
            Self::And => "AND",
            Self::Not => "NOT",
            Self::Question => "QUESTION",
            Self::Star => "STAR",
            Self::Plus => "PLUS",
        }
    }

    /// Check if this kind is a prefix operator
    pub fn is_prefix_operator(self) -> bool {
        matches!(self, Self::And | Self::Not)
    }

    /// Check if this kind is a suffix operator
    pub fn is_suffix_operator(self) -> bool {
        matches!(self, Self::Question | Self::Star | Self::Plus)
    }
}

impl FromStr for Kind {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or(())
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
