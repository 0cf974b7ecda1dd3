//! Template compile and render errors.

use std::fmt;
use thiserror::Error;

/// Location of a tag inside the template source (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Malformed placeholder syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Unclosed expression starting at {position}")]
    UnclosedExpression { position: Position },

    #[error("Empty expression at {position}")]
    EmptyExpression { position: Position },

    #[error("Unknown helper '{helper}' at {position}")]
    UnknownHelper { helper: String, position: Position },

    #[error("Block helper '{helper}' requires exactly one argument at {position}")]
    InvalidArguments { helper: String, position: Position },

    #[error("Invalid path '{path}' at {position}")]
    InvalidPath { path: String, position: Position },

    #[error("Block '{expected}' closed by '/{found}' at {position}")]
    MismatchedClose {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("Closing tag '/{found}' without an open block at {position}")]
    UnexpectedClose { found: String, position: Position },

    #[error("'else' outside of a block at {position}")]
    UnexpectedElse { position: Position },

    #[error("Block '{helper}' opened at {position} is never closed")]
    UnclosedBlock { helper: String, position: Position },
}

impl CompileError {
    /// Where the offending tag starts.
    pub fn position(&self) -> Position {
        match self {
            CompileError::UnclosedExpression { position }
            | CompileError::EmptyExpression { position }
            | CompileError::UnknownHelper { position, .. }
            | CompileError::InvalidArguments { position, .. }
            | CompileError::InvalidPath { position, .. }
            | CompileError::MismatchedClose { position, .. }
            | CompileError::UnexpectedClose { position, .. }
            | CompileError::UnexpectedElse { position }
            | CompileError::UnclosedBlock { position, .. } => *position,
        }
    }
}

/// Failures while applying a compiled template.
///
/// Unresolved placeholders are never an error; only partial lookups can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderFailure {
    #[error("Partial '{0}' is not available")]
    MissingPartial(String),

    #[error("Partials nested deeper than {0} levels")]
    PartialDepthExceeded(usize),
}
