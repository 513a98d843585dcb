//! Error types for template parsing.
//!
//! Template parse errors are never fatal: the parser recovers and returns
//! them alongside the tree so the caller can report them.

use source_map::Span;
use std::fmt;

/// An error found while parsing template markup.
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

    /// Create a duplicate attribute error.
    pub fn duplicate_attribute(name: &str, span: Span) -> Self {
        Self::new(
            format!("duplicate attribute: {}", name),
            span,
            ErrorCode::DuplicateAttribute,
        )
    }

    /// Create an unclosed element error.
    pub fn unclosed_element(tag: &str, span: Span) -> Self {
        Self::new(
            format!("tag <{}> has no matching end tag.", tag),
            span,
            ErrorCode::UnclosedElement,
        )
    }

    /// Create an invalid v-for error.
    pub fn invalid_v_for(exp: &str, span: Span) -> Self {
        Self::new(
            format!("Invalid v-for expression: {}", exp),
            span,
            ErrorCode::InvalidVFor,
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Error codes for template parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The same attribute appears twice on one element.
    DuplicateAttribute,
    /// Element without a matching end tag.
    UnclosedElement,
    /// End tag without a matching start tag.
    StrayEndTag,
    /// `v-else`/`v-else-if` without a preceding `v-if`.
    OrphanElse,
    /// Text between branches of a conditional chain.
    TextBetweenBranches,
    /// Invalid v-for syntax.
    InvalidVFor,
    /// More than one root element.
    MultipleRoots,
    /// Text outside the root element.
    TextOutsideRoot,
}

impl ErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateAttribute => "duplicate-attribute",
            Self::UnclosedElement => "unclosed-element",
            Self::StrayEndTag => "stray-end-tag",
            Self::OrphanElse => "orphan-else",
            Self::TextBetweenBranches => "text-between-branches",
            Self::InvalidVFor => "invalid-v-for",
            Self::MultipleRoots => "multiple-roots",
            Self::TextOutsideRoot => "text-outside-root",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
