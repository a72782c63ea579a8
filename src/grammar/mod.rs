//! # Grammar model
//!
//! A grammar is read by the [bootstrapped recognizer](peg) into a regular [`Node`] tree whose node names are
//! [`Kind`]s. Each kind has a fixed shape:
//!
//! | Kind         | Children                                          |
//! |--------------|---------------------------------------------------|
//! | `Grammar`    | `Definition`+                                     |
//! | `Definition` | `Identifier`, `Expression`                        |
//! | `Expression` | `Sequence`* (ordered choice)                      |
//! | `Sequence`   | `Prefix`*                                         |
//! | `Prefix`     | (`AND` / `NOT`)?, `Suffix`                        |
//! | `Suffix`     | `Primary`, (`QUESTION` / `STAR` / `PLUS`)?        |
//! | `Primary`    | `Identifier` / `Expression` / `Literal` / `Class` / `DOT` |
//! | `Class`      | `Range`*                                          |
//!
//! Zero-width nodes may be attached one level higher than this table shows, as tree reconciliation only looks at
//! ranges. Accessors in this module tolerate them.

mod errors;
mod kind;
pub mod peg;
mod validator;

pub use errors::*;
pub use kind::*;
pub use validator::*;

use crate::compiler::CompileOptions;
use crate::cursor::Location;
use crate::runtime::ParserOptions;
use crate::tree::Node;
use tracing::debug;

/// Source of the PEG meta-grammar
pub const META_GRAMMAR: &str = include_str!("peg.peg");

/// Rules of the meta-grammar compiled in place instead of being called
pub const META_INLINE_RULES: [&str; 11] = [
    "IdentStart",
    "IdentCont",
    "Char",
    "LEFTARROW",
    "SLASH",
    "OPEN",
    "CLOSE",
    "Comment",
    "Space",
    "EndOfLine",
    "EndOfFile",
];

/// Compilation options reproducing the [bootstrapped recognizer](peg) from [`META_GRAMMAR`]
pub fn meta_options() -> CompileOptions {
    META_INLINE_RULES.iter().fold(
        CompileOptions::new()
            .with_name(peg::GRAMMAR_NAME)
            .ignore("Spacing"),
        |options, rule| options.inline(*rule),
    )
}

/// A grammar source with its model tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar<'s> {
    source: &'s str,
    tree: Node<'s>,
}

impl<'s> Grammar<'s> {
    /// Read and validate a grammar
    pub fn parse(source: &'s str) -> Result<Self, GrammarError> {
        Self::parse_with(source, ParserOptions::default())
    }

    /// Read and validate a grammar with custom parser options (e.g. to allow deeper nesting)
    pub fn parse_with(source: &'s str, options: ParserOptions) -> Result<Self, GrammarError> {
        let grammar = Self::parse_nocheck_with(source, options)?;
        validate(&grammar)?;
        Ok(grammar)
    }

    /// Read a grammar without validating it
    ///
    /// Compiling an unchecked grammar may fail on unknown rules, and recognizers built from a left-recursive
    /// grammar will hit the recursion limit.
    pub fn parse_nocheck(source: &'s str) -> Result<Self, GrammarError> {
        Self::parse_nocheck_with(source, ParserOptions::default())
    }

    /// Read a grammar with custom parser options, without validating it
    pub fn parse_nocheck_with(source: &'s str, options: ParserOptions) -> Result<Self, GrammarError> {
        let tree = peg::parse_with(source, options)?;

        debug!(
            definitions = tree.descendants().filter(|n| n.name() == "Definition").count(),
            "grammar recognized"
        );

        Ok(Self { source, tree })
    }

    /// Use an already-built model tree
    ///
    /// The tree may be rooted either at a `Grammar` node or at a node containing one.
    pub fn from_tree(source: &'s str, tree: Node<'s>) -> Self {
        Self { source, tree }
    }

    /// Get the grammar's source
    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Get the full tree
    pub fn tree(&self) -> &Node<'s> {
        &self.tree
    }

    /// Get the `Grammar` node
    pub fn root(&self) -> Result<&Node<'s>, ModelError> {
        if self.tree.name() == Kind::Grammar.as_str() {
            return Ok(&self.tree);
        }

        self.tree
            .children()
            .iter()
            .find(|child| child.name() == Kind::Grammar.as_str())
            .ok_or(ModelError::NoGrammar)
    }

    /// Get the rule definitions, in declaration order
    pub fn definitions(&self) -> Result<Vec<Definition<'_, 's>>, ModelError> {
        let root = self.root()?;
        let mut definitions = vec![];

        for child in root.children() {
            match Kind::of(child)? {
                Kind::Definition => definitions.push(self.definition(child)?),
                _ if child.range().is_empty() => {}
                found => return Err(unexpected(child, found, Kind::Grammar)),
            }
        }

        Ok(definitions)
    }

    fn definition<'g>(&self, node: &'g Node<'s>) -> Result<Definition<'g, 's>, ModelError> {
        let identifier = find_first(node, Kind::Definition, Kind::Identifier)?;
        let expression = find_last(node, Kind::Definition, Kind::Expression)?;

        Ok(Definition {
            name: self.text(identifier),
            identifier,
            expression,
        })
    }

    /// Get the text covered by a node
    pub fn text(&self, node: &Node) -> &'s str {
        node.text(self.source)
    }

    /// Get the location of a node's start
    pub fn location(&self, node: &Node) -> Location {
        Location::of(self.source, node.range().start)
    }
}

/// A rule definition
#[derive(Debug, Clone, Copy)]
pub struct Definition<'g, 's> {
    /// Rule name
    pub name: &'s str,

    /// `Identifier` node holding the name
    pub identifier: &'g Node<'s>,

    /// `Expression` node holding the body
    pub expression: &'g Node<'s>,
}

/// Get the `Sequence` children of an `Expression` (its alternatives)
pub fn sequences<'g, 'n>(expression: &'g Node<'n>) -> Result<Vec<&'g Node<'n>>, ModelError> {
    children_of_kind(expression, Kind::Expression, Kind::Sequence)
}

/// Get the `Prefix` children of a `Sequence`
pub fn prefixes<'g, 'n>(sequence: &'g Node<'n>) -> Result<Vec<&'g Node<'n>>, ModelError> {
    children_of_kind(sequence, Kind::Sequence, Kind::Prefix)
}

/// Get the `Range` children of a `Class`
pub fn class_ranges<'g, 'n>(class: &'g Node<'n>) -> Result<Vec<&'g Node<'n>>, ModelError> {
    children_of_kind(class, Kind::Class, Kind::Range)
}

/// Split a `Prefix` into its optional operator and its `Suffix`
pub fn split_prefix<'g, 'n>(prefix: &'g Node<'n>) -> Result<(Option<Kind>, &'g Node<'n>), ModelError> {
    let operator = match prefix.children().first() {
        Some(first) => Some(Kind::of(first)?).filter(|kind| kind.is_prefix_operator()),
        None => None,
    };

    Ok((operator, find_last(prefix, Kind::Prefix, Kind::Suffix)?))
}

/// Split a `Suffix` into its `Primary` and its optional operator
pub fn split_suffix<'g, 'n>(suffix: &'g Node<'n>) -> Result<(&'g Node<'n>, Option<Kind>), ModelError> {
    let primary = find_first(suffix, Kind::Suffix, Kind::Primary)?;

    let operator = match suffix.children().last() {
        Some(last) => Some(Kind::of(last)?).filter(|kind| kind.is_suffix_operator()),
        None => None,
    };

    Ok((primary, operator))
}

/// Get the content of a `Primary`
pub fn primary_content<'g, 'n>(primary: &'g Node<'n>) -> Result<(Kind, &'g Node<'n>), ModelError> {
    for child in primary.children().iter().rev() {
        let kind = Kind::of(child)?;

        if matches!(
            kind,
            Kind::Identifier | Kind::Expression | Kind::Literal | Kind::Class | Kind::Dot
        ) {
            return Ok((kind, child));
        }
    }

    Err(ModelError::Missing {
        expected: Kind::Expression,
        parent: Kind::Primary,
        range: primary.range(),
    })
}

fn children_of_kind<'g, 'n>(
    node: &'g Node<'n>,
    parent: Kind,
    expected: Kind,
) -> Result<Vec<&'g Node<'n>>, ModelError> {
    let mut found = vec![];

    for child in node.children() {
        match Kind::of(child)? {
            kind if kind == expected => found.push(child),
            _ if child.range().is_empty() => {}
            kind => return Err(unexpected(child, kind, parent)),
        }
    }

    Ok(found)
}

fn find_first<'g, 'n>(node: &'g Node<'n>, parent: Kind, expected: Kind) -> Result<&'g Node<'n>, ModelError> {
    node.children()
        .iter()
        .find(|child| child.name() == expected.as_str())
        .ok_or(ModelError::Missing {
            expected,
            parent,
            range: node.range(),
        })
}

fn find_last<'g, 'n>(node: &'g Node<'n>, parent: Kind, expected: Kind) -> Result<&'g Node<'n>, ModelError> {
    node.children()
        .iter()
        .rev()
        .find(|child| child.name() == expected.as_str())
        .ok_or(ModelError::Missing {
            expected,
            parent,
            range: node.range(),
        })
}

fn unexpected(node: &Node, found: Kind, parent: Kind) -> ModelError {
    ModelError::Unexpected {
        found,
        parent,
        range: node.range(),
    }
}
