use super::Module;
use crate::constants::{is_boolean_pair, is_no_value_attr};
use crate::context::ModuleContext;
use crate::error::CompileResult;
use vusa_template::ElementNode;

/// Gives valueless attributes an explicit `true`.
///
/// Boolean HTML attributes on HTML tags keep their empty value and are
/// written without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct Boolean;

impl Module for Boolean {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        let tag = el.tag.clone();
        for (name, value) in el.attrs_map.iter_mut() {
            if value.is_empty() && !is_boolean_pair(&tag, name) && !is_no_value_attr(name) {
                *value = "{{ true }}".to_string();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_utils::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_values() {
        let mut el = element(r#"<input disabled checked="" readonly="readonly">"#);
        run_after(&Boolean, &mut el);
        assert_eq!(
            attrs(&el),
            pairs(&[("disabled", ""), ("checked", ""), ("readonly", "readonly")])
        );

        let mut el = element("<my-input disabled show-label></my-input>");
        run_after(&Boolean, &mut el);
        assert_eq!(
            attrs(&el),
            pairs(&[("disabled", "{{ true }}"), ("show-label", "{{ true }}")])
        );
    }
}
