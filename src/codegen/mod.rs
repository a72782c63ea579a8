//! # Code generation
//!
//! The [compiler](crate::compiler) walks a grammar and describes it to a [`Backend`], one call per PEG construct.
//! Each backend turns these calls into its own kind of fragment, then assembles the fragments of every rule into
//! its output.
//!
//! Three backends are available:
//!
//! * [`RustBackend`] emits Rust code driving the [runtime](crate::runtime) (requires the `rustgen` feature)
//! * [`PegBackend`] emits PEG source text
//! * [`ProgramBackend`] builds a [`Program`] interpreted directly by the runtime

#[cfg(feature = "rustgen")]
pub mod rust;

pub mod peg;
pub mod program;

#[cfg(feature = "rustgen")]
pub use rust::RustBackend;

pub use peg::PegBackend;
pub use program::{Op, Program, ProgramBackend, ProgramRule};

use crate::compiler::{compile, CompileError, CompileOptions, CustomAction};
use crate::grammar::Grammar;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

mod sealed {
    pub trait Sealed {}
}

/// Set of operations a code generator implements
///
/// Every method mirrors one [runtime](crate::runtime::Parser) primitive: the fragment it returns must behave like
/// the primitive, with the same backtracking and tree bookkeeping.
///
/// This trait is sealed: the available backends are the ones of this module.
pub trait Backend: sealed::Sealed {
    /// Code for a single expression
    type Fragment;

    /// Group of fragments being built
    type Group: Group<Self::Fragment>;

    /// Final output
    type Output;

    /// Match any code point
    fn any_char(&mut self) -> Self::Fragment;

    /// Match a code point in an inclusive range
    fn in_range(&mut self, lo: char, hi: char) -> Self::Fragment;

    /// Match a code point among a set
    fn in_set(&mut self, set: &str) -> Self::Fragment;

    /// Match a literal
    fn next(&mut self, literal: &str) -> Self::Fragment;

    /// `e?`
    fn maybe(&mut self, body: Self::Fragment) -> Self::Fragment;

    /// `e*`
    fn zero_or_more(&mut self, body: Self::Fragment) -> Self::Fragment;

    /// `e+`
    fn one_or_more(&mut self, body: Self::Fragment) -> Self::Fragment;

    /// `&e`
    fn and(&mut self, body: Self::Fragment) -> Self::Fragment;

    /// `!e`
    fn not(&mut self, body: Self::Fragment) -> Self::Fragment;

    /// Call another rule's function
    fn make_rule_call(&mut self, rule: &str) -> Self::Fragment;

    /// Start a sequence (`require_all`) or an ordered choice
    fn begin_group(&mut self, require_all: bool) -> Self::Group;

    /// Finish a group
    ///
    /// An empty sequence always accepts, an empty choice always rejects, and a group with a single member behaves
    /// like this member.
    fn end_group(&mut self, group: Self::Group) -> Self::Fragment;

    /// Wrap a rule's body so it creates a node named after the rule
    fn add_node(&mut self, body: Self::Fragment, rule: &str) -> Self::Fragment;

    /// Wrap a rule's body so it extends the ignore range instead of creating a node
    fn ignore(&mut self, body: Self::Fragment) -> Self::Fragment;

    /// Get the name of the function generated for a rule
    fn function_name(&self, rule: &str) -> String;

    /// Assemble the generated rules
    fn finish(self, info: &GrammarInfo, rules: Vec<GeneratedRule<Self::Fragment>>) -> Self::Output;
}

/// A group of fragments being built
pub trait Group<F> {
    /// Add a member at the end of the group
    fn add(&mut self, fragment: F);
}

/// Simple list of fragments, usable as a [`Group`] by any backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentList<F> {
    /// Is this a sequence (or a choice)?
    pub require_all: bool,

    /// Members, in order
    pub members: Vec<F>,
}

impl<F> FragmentList<F> {
    pub fn new(require_all: bool) -> Self {
        Self {
            require_all,
            members: vec![],
        }
    }
}

impl<F> Group<F> for FragmentList<F> {
    fn add(&mut self, fragment: F) {
        self.members.push(fragment);
    }
}

/// Grammar-level information given to [`Backend::finish`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarInfo {
    /// Grammar name (name of the root node)
    pub name: String,

    /// Rule the parse starts with
    pub root: String,
}

/// A compiled rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRule<F> {
    /// Rule name
    pub name: String,

    /// Name of the rule's function (see [`Backend::function_name`])
    pub function: String,

    /// Wrapped body
    pub body: F,

    /// Custom action that replaced the default wrapper, if any
    pub action: Option<CustomAction>,
}

/// Text-based generation target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    #[cfg(feature = "rustgen")]
    Rust,
    Peg,
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            #[cfg(feature = "rustgen")]
            "rust" => Ok(Self::Rust),
            "peg" => Ok(Self::Peg),
            _ => Err(format!("unknown target `{}`", s)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            #[cfg(feature = "rustgen")]
            Self::Rust => write!(f, "rust"),
            Self::Peg => write!(f, "peg"),
        }
    }
}

/// Generate source code for a grammar
pub fn generate(grammar: &Grammar, options: &CompileOptions, target: Target) -> Result<String, CompileError> {
    let code = match target {
        #[cfg(feature = "rustgen")]
        Target::Rust => compile(grammar, options, RustBackend::new())?.to_string(),
        Target::Peg => compile(grammar, options, PegBackend::new())?,
    };

    debug!(%target, len = code.len(), "code generated");

    Ok(code)
}
