//! Template expression parsing for vusa.
//!
//! This crate provides a lexer, AST and parser for the expressions found in
//! Vue template interpolations and directive values, including the Vue
//! `value | filter(args)` syntax.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use error::{ErrorCode, ParseError, ParseResult};
pub use parser::{parse_expression, parse_filter_expression};

/// Parse a template expression and its filter chain.
pub fn parse(source: &str) -> ParseResult<FilterExpression> {
    parse_filter_expression(source)
}
