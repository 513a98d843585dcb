use super::{interpolate, merge_attr, Module};
use crate::context::ModuleContext;
use crate::error::CompileResult;
use crate::expression::compile_code;
use vusa_template::process::single_quote;
use vusa_template::ElementNode;

const BOUND_KEYS: &[&str] = &[":class", "v-bind:class"];

/// Merges static and bound classes into one `_mc` call.
#[derive(Debug, Default, Clone, Copy)]
pub struct Class;

impl Module for Class {
    fn name(&self) -> &'static str {
        "class"
    }

    fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        let Some(binding) = el.class_binding.clone() else {
            return Ok(());
        };
        let static_class = el.attr("class").unwrap_or_default().to_string();
        let code = compile_code(&binding)?;
        let merged = interpolate(&format!("_mc({}, {})", single_quote(&static_class), code));
        merge_attr(el, "class", BOUND_KEYS, merged);
        Ok(())
    }
}
