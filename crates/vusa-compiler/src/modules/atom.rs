use super::Module;
use crate::context::ModuleContext;
use crate::error::CompileResult;
use vusa_template::{AttrsMap, ElementNode};

/// Reads the Atom dialect by renaming `a-` directives to `v-`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Atom;

impl Module for Atom {
    fn name(&self) -> &'static str {
        "atom"
    }

    fn before_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        if !el.attrs_list.iter().any(|attr| attr.name.starts_with("a-")) {
            return Ok(());
        }
        for attr in el.attrs_list.iter_mut() {
            if let Some(rest) = attr.name.strip_prefix("a-") {
                attr.name = format!("v-{}", rest).into();
            }
        }
        el.attrs_map = el
            .attrs_list
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect::<AttrsMap>();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_utils::*;
    use pretty_assertions::assert_eq;
    use vusa_template::{parse_template, ParserOptions, TemplateNode};

    #[test]
    fn test_prefix_is_renamed_in_place() {
        let parsed = parse_template(r#"<div id="x" a-if="ok" a-for="i in list"></div>"#, &ParserOptions::default());
        let Some(TemplateNode::Element(mut el)) = parsed.nodes.into_iter().next() else {
            panic!("expected an element");
        };
        Atom.before_children(&mut el, &mut ModuleContext::new()).unwrap();
        assert_eq!(
            attrs(&el),
            pairs(&[("id", "x"), ("v-if", "ok"), ("v-for", "i in list")])
        );
        assert_eq!(el.attrs_list[1].name, "v-if");
    }
}
