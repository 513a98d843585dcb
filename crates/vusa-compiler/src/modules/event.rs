use super::Module;
use crate::context::ModuleContext;
use crate::error::CompileResult;
use crate::expression::compile_code;
use once_cell::sync::Lazy;
use regex::Regex;
use vusa_template::ElementNode;

static EVENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(@|v-on:)").expect("valid event regex"));

/// Rewrites `@name.mod` and `v-on:name.mod` into `on-name`.
///
/// Modifiers become `mod:` prefixes of the handler. A listener without a
/// handler gets `_noop`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Event;

impl Module for Event {
    fn name(&self) -> &'static str {
        "event"
    }

    fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        let listeners: Vec<_> = el
            .attrs_list
            .iter()
            .filter(|attr| EVENT_RE.is_match(&attr.name))
            .cloned()
            .collect();

        for attr in listeners {
            let stripped = EVENT_RE.replace(&attr.name, "");
            let mut parts = stripped.split('.');
            let event = parts.next().unwrap_or_default();
            let modifiers: String = parts.map(|m| format!("{}:", m)).collect();
            let handler = if attr.value.trim().is_empty() {
                "_noop".to_string()
            } else {
                compile_code(&attr.value)?
            };
            el.replace_attr(&attr.name, format!("on-{}", event), modifiers + &handler);
        }
        Ok(())
    }
}
