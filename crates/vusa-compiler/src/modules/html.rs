use super::{interpolate, Module};
use crate::context::ModuleContext;
use crate::error::CompileResult;
use crate::expression::compile_code;
use vusa_template::{ElementNode, TemplateNode};

/// Rewrites raw content directives.
///
/// `v-dangerous-html` and `v-safe-html` become `v-html`, the latter wrapped
/// in the `_sf` sanitizer. `v-html` then becomes `s-html` and `v-text`
/// becomes a single interpolated text child. Both replace the children.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html;

impl Html {
    /// Turn an html variant into `v-html`.
    fn rename(el: &mut ElementNode, variant: &str, wrap: impl Fn(&str) -> String) {
        let Some(value) = el.attr(&format!("v-{}", variant)).map(String::from) else {
            return;
        };
        let value = wrap(&value);
        if let Some(directive) = el.directive_mut(variant) {
            directive.name = "html".into();
            directive.value = value.clone();
        }
        el.replace_attr(&format!("v-{}", variant), "v-html", value);
    }

    fn directive_value(el: &ElementNode, name: &str) -> Option<String> {
        el.directive(name)
            .map(|d| d.value.clone())
            .filter(|v| !v.trim().is_empty())
    }
}

impl Module for Html {
    fn name(&self) -> &'static str {
        "html"
    }

    fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        Self::rename(el, "dangerous-html", |value| value.to_string());
        Self::rename(el, "safe-html", |value| format!("_sf({})", value));

        if el.has_attr("v-html") {
            if let Some(value) = Self::directive_value(el, "html") {
                let code = compile_code(&value)?;
                el.replace_attr("v-html", "s-html", interpolate(&code));
                el.children.clear();
            }
        }

        if el.has_attr("v-text") {
            if let Some(value) = Self::directive_value(el, "text") {
                let code = compile_code(&value)?;
                el.remove_attr("v-text");
                el.children = vec![TemplateNode::text(interpolate(&code))];
            }
        }
        Ok(())
    }
}
