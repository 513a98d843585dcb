use super::Module;
use crate::context::ModuleContext;
use crate::error::CompileResult;
use crate::expression::{compile_code, compile_expression};
use vusa_template::ElementNode;

const KEY_ATTRS: &[&str] = &["key", ":key", "v-bind:key"];

/// Rewrites `v-for` into `s-for`.
///
/// San can only track items by a plain variable, so a key becomes a
/// `trackBy` clause only when it is an identifier. Other keys are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct Loop;

impl Module for Loop {
    fn name(&self) -> &'static str {
        "for"
    }

    fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        let Some(info) = el.for_info.clone() else {
            return Ok(());
        };

        let mut value = info.alias.clone();
        if let Some(index) = &info.iterator1 {
            value.push(',');
            value.push_str(index);
        }
        value.push_str(&format!(" in _l({})", compile_code(&info.source)?));

        if let Some(key) = &el.key {
            let key = compile_expression(key)?;
            if key.is_identifier() {
                value.push_str(" trackBy ");
                value.push_str(&key.code);
            }
        }

        el.replace_attr("v-for", "s-for", value);
        for key in KEY_ATTRS {
            el.remove_attr(key);
        }
        Ok(())
    }
}
