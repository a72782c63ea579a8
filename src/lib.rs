//! # pegc
//!
//! pegc reads grammars written in [PEG](https://bford.info/pub/lang/peg.pdf) syntax and turns them into
//! backtracking recursive-descent recognizers building a parse tree.
//!
//! A grammar can either be [interpreted](codegen::Program) directly, or compiled to Rust code (see the
//! `pegc_macro` crate, or the `pegc generate` command). Both drive the same [runtime](runtime::Parser), and build
//! the same [trees](tree::Node).
//!
//! Nodes only store offsets into the input. A rule marked as [ignorable](compiler::CustomAction::Ignore), such as
//! whitespace or comments, never creates a node, and the text it matched is clipped from the head or the tail of
//! the surrounding nodes.
//!
//! ## Usage
//!
//! ```rust
//! use pegc::codegen::{generate, Program, Target};
//! use pegc::compiler::CompileOptions;
//! use pegc::grammar::Grammar;
//!
//! // 1. Read the grammar
//! let grammar = Grammar::parse("List <- Num (',' Num)*\nNum <- [0-9]+").unwrap();
//!
//! // 2. Compile it
//! let program = Program::compile(&grammar, &CompileOptions::new()).unwrap();
//!
//! // 3. Parse an input
//! let tree = program.parse("1,23").unwrap();
//! let list = &tree.children()[0];
//!
//! let numbers: Vec<_> = list.children().iter().map(|n| n.text("1,23")).collect();
//! assert_eq!(numbers, ["1", "23"]);
//!
//! // 4. Or get the grammar back
//! let source = generate(&grammar, &CompileOptions::new(), Target::Peg).unwrap();
//! assert!(source.contains("Num <- [0-9]+"));
//! ```

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]

pub mod codegen;
pub mod compiler;
pub mod cursor;
mod error;
pub mod grammar;
pub mod runtime;
pub mod tree;

pub use error::Error;
