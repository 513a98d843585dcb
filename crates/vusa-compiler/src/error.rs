//! Fatal compile errors.

use thiserror::Error;

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// An error that aborts compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The expression parser rejected an embedded expression.
    #[error("SyntaxError is found when parsing code \"{code}\", {source}")]
    Syntax {
        code: String,
        source: vusa_expression::ParseError,
    },

    /// An expression parsed but cannot be compiled.
    ///
    /// The message carries the location header and a code frame.
    #[error("{message}")]
    Expression { message: String },

    /// Conflicting or unsupported directive usage.
    #[error("{0}")]
    Directive(String),

    /// The source markup has no usable root element.
    #[error("{0}")]
    Template(String),

    /// The compiled markup was rejected by the San parser.
    #[error("failed to parse compiled template: {0}")]
    Target(#[from] san_template::ParseError),
}

impl CompileError {
    /// Create a directive error.
    pub fn directive(message: impl Into<String>) -> Self {
        Self::Directive(message.into())
    }
}
