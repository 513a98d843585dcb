use super::{Module, FRAGMENT_TAG};
use crate::context::ModuleContext;
use crate::error::CompileResult;
use vusa_template::process::single_quote;
use vusa_template::{camelize, ElementNode, TemplateNode};

/// Turns `<transition>` into a fragment and hands its attributes to the
/// first child element as an `s-transition` binding.
#[derive(Debug, Default, Clone, Copy)]
pub struct Transition;

impl Module for Transition {
    fn name(&self) -> &'static str {
        "transition"
    }

    fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        if el.tag != "transition" {
            return Ok(());
        }
        el.tag = FRAGMENT_TAG.into();

        let fields: Vec<String> = el
            .attrs_map
            .drain(..)
            .map(|(name, value)| {
                let value = match value.strip_prefix("{{").and_then(|v| v.strip_suffix("}}")) {
                    Some(code) => code.trim().to_string(),
                    None => single_quote(&value),
                };
                format!("{}:{}", camelize(&name), value)
            })
            .collect();
        let binding = format!("_t({{{}}})", fields.join(","));

        let Some(child) = el.children.iter_mut().find_map(TemplateNode::as_element_mut) else {
            return Ok(());
        };
        child.set_attr("s-transition", binding.clone());
        for branch in child.else_blocks_mut() {
            branch.set_attr("s-transition", binding.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_utils::*;
    use pretty_assertions::assert_eq;
    use vusa_template::{ConditionBlock, IfCondition};

    #[test]
    fn test_binding_moves_to_child() {
        let mut el = element(r#"<transition name="fade" enter-active-class="{{ cls }}"><p>x</p></transition>"#);
        run_after(&Transition, &mut el);
        assert_eq!(el.tag, FRAGMENT_TAG);
        assert!(el.attrs_map.is_empty());
        let child = el.child_elements().next().unwrap();
        assert_eq!(
            attrs(child),
            pairs(&[("s-transition", "_t({name:'fade',enterActiveClass:cls})")])
        );
    }

    #[test]
    fn test_chained_branches_share_binding() {
        let mut el = element(r#"<transition name="f"><p>a</p></transition>"#);
        let branch = ElementNode::new("span");
        if let Some(child) = el.children.iter_mut().find_map(TemplateNode::as_element_mut) {
            child.if_conditions = vec![
                IfCondition {
                    exp: Some("ok".into()),
                    block: ConditionBlock::Owner,
                },
                IfCondition {
                    exp: None,
                    block: ConditionBlock::Element(Box::new(branch)),
                },
            ];
        }
        run_after(&Transition, &mut el);
        let child = el.child_elements().next().unwrap();
        let branch = child.else_blocks().next().unwrap();
        assert_eq!(branch.attr("s-transition"), Some("_t({name:'f'})"));
    }

    #[test]
    fn test_other_tags_untouched() {
        let mut el = element(r#"<div name="fade"></div>"#);
        run_after(&Transition, &mut el);
        assert_eq!(attrs(&el), pairs(&[("name", "fade")]));
    }
}
