use super::{interpolate, Module};
use crate::context::ModuleContext;
use crate::error::CompileResult;
use crate::expression::compile_code;
use vusa_template::ElementNode;

/// Rewrites `ref` into `s-ref`.
///
/// Static refs are registered with the context. Bound refs are compiled and
/// not registered.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ref;

impl Module for Ref {
    fn name(&self) -> &'static str {
        "ref"
    }

    fn after_children(&self, el: &mut ElementNode, ctx: &mut ModuleContext) -> CompileResult<()> {
        if let Some(name) = el.attr("ref").filter(|v| !v.is_empty()).map(String::from) {
            el.replace_attr("ref", "s-ref", name.clone());
            ctx.add_ref(name, el.is_root());
        }

        for key in [":ref", "v-bind:ref"] {
            if let Some(bound) = el.attr(key).map(String::from) {
                let code = compile_code(&bound)?;
                el.replace_attr(key, "s-ref", interpolate(&code));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RefInfo;
    use crate::modules::test_utils::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_static_ref_is_registered() {
        let mut el = element(r#"<div ref="box"></div>"#);
        let ctx = run_after(&Ref, &mut el);
        assert_eq!(attrs(&el), pairs(&[("s-ref", "box")]));
        assert_eq!(
            ctx.refs,
            vec![RefInfo {
                name: "box".into(),
                is_root: true
            }]
        );
    }

    #[test]
    fn test_nested_ref_is_not_root() {
        let mut el = element(r#"<div ref="box"></div>"#);
        el.parent_tag = Some("section".into());
        let ctx = run_after(&Ref, &mut el);
        assert!(!ctx.refs[0].is_root);
    }

    #[test]
    fn test_bound_ref() {
        let mut el = element(r#"<div :ref="'item' + i"></div>"#);
        let ctx = run_after(&Ref, &mut el);
        assert_eq!(attrs(&el), pairs(&[("s-ref", "{{ 'item'+i }}")]));
        assert!(ctx.refs.is_empty());
    }
}
