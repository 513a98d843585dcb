use super::Module;
use crate::context::ModuleContext;
use crate::error::{CompileError, CompileResult};
use crate::expression::compile_expression;
use vusa_template::ElementNode;

/// Rewrites `v-model` into a two-way binding.
///
/// Checkbox and radio inputs bind `checked`, everything else binds `value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Model;

impl Module for Model {
    fn name(&self) -> &'static str {
        "model"
    }

    fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        let Some(directive) = el.directive("model").cloned() else {
            return Ok(());
        };

        let compiled = compile_expression(&directive.value)?;
        if !compiled.is_assignable() {
            return Err(CompileError::directive(format!(
                "v-model value must be a variable or a property access, got \"{}\"",
                directive.value
            )));
        }

        let is_checkable = el.tag == "input" && matches!(el.attr("type"), Some("checkbox" | "radio"));
        let target = if is_checkable { "checked" } else { "value" };
        el.replace_attr(&directive.raw_name, target, format!("{{= {} =}}", compiled.code));
        Ok(())
    }
}
