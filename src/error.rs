//! Error taxonomy for the translation pipeline
//!
//! Every error is fatal: the first one stops the pipeline and nothing is
//! retried. [`CompileError`] keeps the three classes apart so the driver can
//! tell user mistakes (lexical, syntax) from translator bugs (internal).

use crate::parser::ast::{InternalError, SourceLocation};
use crate::parser::lexer::LexError;
use crate::parser::parse::SyntaxError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lexical(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CompileError {
    /// Short class name for diagnostics.
    pub fn class(&self) -> &'static str {
        match self {
            CompileError::Lexical(_) => "lexical",
            CompileError::Syntax(_) => "syntax",
            CompileError::Internal(_) => "internal",
        }
    }

    /// Where the error was detected; internal errors carry no position.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            CompileError::Lexical(e) => Some(e.location),
            CompileError::Syntax(e) => Some(e.location),
            CompileError::Internal(_) => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, CompileError::Internal(_))
    }
}
