use super::Module;
use crate::context::ModuleContext;
use crate::error::CompileResult;
use rustc_hash::FxHashMap;
use vusa_template::{camelize, ElementNode};

/// Maps static class names through a CSS-modules class map.
///
/// Tokens are looked up camelized; tokens missing from the map are kept.
#[derive(Debug, Clone, Copy)]
pub struct CssModules<'a> {
    class_map: &'a FxHashMap<String, String>,
}

impl<'a> CssModules<'a> {
    pub fn new(class_map: &'a FxHashMap<String, String>) -> Self {
        Self { class_map }
    }

    fn map_class(&self, value: &str) -> String {
        let value = value.strip_prefix('"').unwrap_or(value);
        let value = value.strip_suffix('"').unwrap_or(value);
        value
            .split(' ')
            .map(|token| {
                self.class_map
                    .get(&camelize(token))
                    .map(String::as_str)
                    .unwrap_or(token)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Module for CssModules<'_> {
    fn name(&self) -> &'static str {
        "cssmodules"
    }

    fn before_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        let Some(class) = el.attr("class").filter(|c| !c.is_empty()) else {
            return Ok(());
        };
        let mapped = self.map_class(class);
        for attr in el.attrs_list.iter_mut().filter(|attr| attr.name == "class") {
            attr.value = mapped.clone();
        }
        el.set_attr("class", mapped);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vusa_template::{parse_template, ParserOptions, TemplateNode};

    #[test]
    fn test_classes_are_mapped() {
        let mut map = FxHashMap::default();
        map.insert("titleBar".to_string(), "_title_bar_x1".to_string());
        let module = CssModules::new(&map);

        let parsed = parse_template(r#"<div class="title-bar plain"></div>"#, &ParserOptions::default());
        let Some(TemplateNode::Element(mut el)) = parsed.nodes.into_iter().next() else {
            panic!("expected an element");
        };
        module.before_children(&mut el, &mut ModuleContext::new()).unwrap();
        assert_eq!(el.attr("class"), Some("_title_bar_x1 plain"));
        assert_eq!(el.attrs_list[0].value, "_title_bar_x1 plain");
    }
}
