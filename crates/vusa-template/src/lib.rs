//! Vue template parsing for vusa.
//!
//! This crate parses Vue template markup into an element tree whose
//! attribute maps the vusa compiler rewrites in place. Structural
//! directives (`v-if`, `v-for`, `:class`, ...) are extracted into typed
//! fields by [`process_element`], and conditional chains are attached with
//! [`chain_conditionals`].

pub mod ast;
pub mod error;
pub mod parser;
pub mod process;

pub use ast::*;
pub use error::{ErrorCode, ParseError};
pub use parser::{is_void_element, parse_template, ParsedTemplate, ParserOptions};
pub use process::{camelize, chain_conditionals, check_single_root, process_element};
