use crate::compiler::CompileError;
use crate::grammar::{GrammarError, ModelError};
use crate::runtime::ParseError;
use thiserror::Error;

/// Any error raised by this crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
