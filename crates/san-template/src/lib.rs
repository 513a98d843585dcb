//! San template tree for vusa.
//!
//! The compiler emits San markup and reloads it with [`parse_template`] to
//! build the [`ANode`] tree the San runtime consumes.

pub mod ast;
pub mod error;
pub mod parser;
pub mod text;

pub use ast::*;
pub use error::{ErrorCode, ParseError, ParseResult};
pub use parser::parse_template;
pub use text::{parse_expr, parse_san_expr, parse_text};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_compiled_markup() {
        let source = r#"<div class="{{ _mc('a', b) }}"><p s-if="ok">{{ msg }}</p><p s-else>none</p></div>"#;
        let root = parse_template(source).unwrap();
        assert_eq!(root.tag_name, None);
        let div = &root.children[0];
        assert_eq!(div.raw.as_deref(), Some(r#"<div class="{{ _mc('a', b) }}">"#));
        assert_eq!(div.children.len(), 1);
        assert_eq!(div.children[0].elses.len(), 1);
        assert!(div.children[0].children[0].is_text());
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let root = parse_template("<br>").unwrap();
        let mut br = root.children[0].clone();
        br.raw = None;
        let json = serde_json::to_value(&br).unwrap();
        assert_eq!(json, serde_json::json!({ "tagName": "br" }));
    }

    #[test]
    fn test_raw_present_serializes_as_number() {
        assert_eq!(serde_json::to_value(Raw::Present).unwrap(), serde_json::json!(1));
        assert_eq!(
            serde_json::to_value(Raw::Source("x".into())).unwrap(),
            serde_json::json!("x")
        );
    }

    #[test]
    fn test_bool_expression_shape() {
        let json = serde_json::to_value(SanExpr::bool_true()).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "bool", "value": true }));
    }
}
