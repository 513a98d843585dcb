use super::Module;
use crate::context::ModuleContext;
use crate::error::{CompileError, CompileResult};
use vusa_expression::{Expr, LiteralValue};
use vusa_template::{ConditionBlock, ElementNode, IfCondition};

/// Resolves `<component is="...">`.
///
/// A static `is` retags the element. A bound `is` must be a string literal
/// or a ternary between two string literals; the ternary expands into an
/// `s-if`/`s-else` pair of sibling elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct DynamicComponent;

fn literal_tag(node: &Expr) -> Option<&str> {
    match node {
        Expr::Literal(literal) => match &literal.value {
            LiteralValue::String(tag) => Some(tag.as_str()),
            _ => None,
        },
        _ => None,
    }
}

impl Module for DynamicComponent {
    fn name(&self) -> &'static str {
        "dynamic-component"
    }

    fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        if el.tag != "component" {
            return Ok(());
        }
        let Some(is) = el.remove_attr("is") else {
            return Ok(());
        };

        let Some(inner) = is.strip_prefix("{{").and_then(|v| v.strip_suffix("}}")) else {
            el.tag = is.as_str().into();
            return Ok(());
        };
        let code = inner.trim();
        let parsed = vusa_expression::parse(code).map_err(|source| CompileError::Syntax {
            code: code.to_string(),
            source,
        })?;

        if el.is_conditional() {
            return Err(CompileError::directive("dynamic component can not use with v-if."));
        }

        if let Some(tag) = literal_tag(&parsed.expression) {
            el.tag = tag.into();
            return Ok(());
        }

        let Expr::Conditional(ternary) = &parsed.expression else {
            return Err(CompileError::directive(format!(
                "dynamic component `is` must be a string or a ternary of strings, got \"{}\".",
                code
            )));
        };
        let (Some(consequent), Some(alternate)) =
            (literal_tag(&ternary.consequent), literal_tag(&ternary.alternate))
        else {
            return Err(CompileError::directive(format!(
                "dynamic component branches must be string literals, got \"{}\".",
                code
            )));
        };

        let test = ternary.test.location().span().slice(code).to_string();
        let mut else_attrs = el.attrs_map.clone();
        else_attrs.insert("s-else".into(), String::new());
        let alternate = el.derive(alternate, else_attrs);

        el.tag = consequent.into();
        el.set_attr("s-if", test.clone());
        el.if_conditions = vec![
            IfCondition {
                exp: Some(test),
                block: ConditionBlock::Owner,
            },
            IfCondition {
                exp: None,
                block: ConditionBlock::Element(Box::new(alternate)),
            },
        ];
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_utils::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_static_is() {
        let mut el = element(r#"<component is="my-list" id="l"></component>"#);
        run_after(&DynamicComponent, &mut el);
        assert_eq!(el.tag, "my-list");
        assert_eq!(attrs(&el), pairs(&[("id", "l")]));
    }

    #[test]
    fn test_literal_is() {
        let mut el = element(r#"<component is="{{ 'my-list' }}"></component>"#);
        run_after(&DynamicComponent, &mut el);
        assert_eq!(el.tag, "my-list");
    }

    #[test]
    fn test_ternary_expands_to_branches() {
        let mut el = element(r#"<component is="{{ big?'x-big':'x-small' }}" id="c"></component>"#);
        run_after(&DynamicComponent, &mut el);
        assert_eq!(el.tag, "x-big");
        assert_eq!(attrs(&el), pairs(&[("id", "c"), ("s-if", "big")]));
        let alternate = el.else_blocks().next().unwrap();
        assert_eq!(alternate.tag, "x-small");
        assert_eq!(attrs(alternate), pairs(&[("id", "c"), ("s-else", "")]));
    }

    #[test]
    fn test_conditional_is_rejected() {
        let mut el = element(r#"<component v-if="ok" is="{{ a?'b':'c' }}"></component>"#);
        let err = DynamicComponent
            .after_children(&mut el, &mut ModuleContext::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "dynamic component can not use with v-if.");
    }

    #[test]
    fn test_non_literal_is_rejected() {
        let mut el = element(r#"<component is="{{ name }}"></component>"#);
        let err = DynamicComponent
            .after_children(&mut el, &mut ModuleContext::new())
            .unwrap_err();
        assert!(matches!(err, CompileError::Directive(_)));
    }
}
