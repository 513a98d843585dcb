use super::{interpolate, Module};
use crate::context::ModuleContext;
use crate::error::{CompileError, CompileResult};
use crate::expression::compile_expression;
use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;
use vusa_template::{camelize, ElementNode};

static BIND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(v-bind)?:").expect("valid bind regex"));

/// Translates the remaining bound attributes.
///
/// `:name="exp"` and `v-bind:name="exp"` become `name="{{ exp }}"`; with
/// `.sync` the binding is two-way. A bare `v-bind="obj"` spreads into
/// `s-bind`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bind;

impl Module for Bind {
    fn name(&self) -> &'static str {
        "bind"
    }

    fn after_children(&self, el: &mut ElementNode, ctx: &mut ModuleContext) -> CompileResult<()> {
        if let Some(value) = el.attr("v-bind").map(String::from) {
            let compiled = compile_expression(&value)?;
            el.replace_attr("v-bind", "s-bind", interpolate(&compiled.code));
        }

        let keys: Vec<SmolStr> = el
            .attrs_map
            .keys()
            .filter(|key| BIND_RE.is_match(key))
            .cloned()
            .collect();

        for key in keys {
            let rest = BIND_RE.replace(&key, "");
            let mut parts = rest.split('.');
            let mut name = parts.next().unwrap_or_default().to_string();
            let modifiers: Vec<&str> = parts.collect();
            if name.is_empty() {
                el.remove_attr(&key);
                ctx.report(format!("invalid binding \"{}\" has no attribute name.", key));
                continue;
            }

            let value = el.attr(&key).unwrap_or_default().to_string();
            let compiled = compile_expression(&value)?;
            if modifiers.contains(&"camel") {
                name = camelize(&name);
            }

            let bound = if modifiers.contains(&"sync") {
                if !compiled.is_assignable() {
                    return Err(CompileError::directive(format!(
                        "\"{}\" is not a valid target for {}",
                        value.trim(),
                        key
                    )));
                }
                format!("{{= {} =}}", compiled.code)
            } else {
                interpolate(&compiled.code)
            };
            el.replace_attr(&key, name, bound);
        }
        Ok(())
    }
}
