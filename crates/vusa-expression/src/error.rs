//! Error types for expression parsing.

use source_map::Span;
use std::fmt;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that occurred during expression parsing.
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

    /// Create an unexpected token error.
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::new(
            format!("Expected {}, found {}", expected, found),
            span,
            ErrorCode::UnexpectedToken,
        )
    }

    /// Create an unexpected end of input error.
    pub fn unexpected_eof(expected: &str, span: Span) -> Self {
        Self::new(
            format!("Expected {}, found end of input", expected),
            span,
            ErrorCode::UnexpectedEof,
        )
    }

    /// Create an invalid token error.
    pub fn invalid_token(text: &str, span: Span) -> Self {
        Self::new(
            format!("Invalid or unexpected token \"{}\"", text),
            span,
            ErrorCode::InvalidToken,
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}:{})",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}

/// Error codes for categorizing parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unexpected token encountered.
    UnexpectedToken,
    /// Input ended in the middle of an expression.
    UnexpectedEof,
    /// The lexer could not recognize a token.
    InvalidToken,
    /// A template string or interpolation was not closed.
    Unterminated,
}

impl ErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedToken => "unexpected-token",
            ErrorCode::UnexpectedEof => "unexpected-eof",
            ErrorCode::InvalidToken => "invalid-token",
            ErrorCode::Unterminated => "unterminated",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
