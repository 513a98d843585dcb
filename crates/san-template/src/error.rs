//! Error types for San template parsing.

use source_map::Span;
use std::fmt;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that occurred while parsing San markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The span where the error occurred.
    pub span: Span,
    /// The error code.
    pub code: ErrorCode,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(message: impl Into<String>, span: Span, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for ParseError {}

/// Error codes for San template parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// An embedded expression failed to parse.
    InvalidExpression,
    /// An `s-for` value does not match `item[, index] in list`.
    InvalidFor,
    /// `s-elif`/`s-else` without a preceding `s-if`.
    ElseWithoutIf,
    /// Element without a matching end tag.
    UnclosedElement,
}

impl ErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidExpression => "invalid-expression",
            Self::InvalidFor => "invalid-for",
            Self::ElseWithoutIf => "else-without-if",
            Self::UnclosedElement => "unclosed-element",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
