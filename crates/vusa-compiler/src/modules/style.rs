use super::{interpolate, merge_attr, Module};
use crate::context::ModuleContext;
use crate::error::CompileResult;
use crate::expression::compile_code;
use vusa_template::ElementNode;

const BOUND_KEYS: &[&str] = &[":style", "v-bind:style", "v-show"];

/// Merges static style, bound style and `v-show` into one `_ms` call.
#[derive(Debug, Default, Clone, Copy)]
pub struct Style;

impl Module for Style {
    fn name(&self) -> &'static str {
        "style"
    }

    fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        let show = el
            .attr("v-show")
            .filter(|v| !v.trim().is_empty())
            .map(String::from);
        if el.style_binding.is_none() && show.is_none() {
            return Ok(());
        }

        let static_style = el.static_style.clone().unwrap_or_else(|| "''".to_string());
        let binding = match &el.style_binding {
            Some(binding) => compile_code(binding)?,
            None => "{}".to_string(),
        };
        let mut args = format!("{}, {}", static_style, binding);
        if let Some(show) = show {
            args.push_str(", ");
            args.push_str(&compile_code(&show)?);
        }

        merge_attr(el, "style", BOUND_KEYS, interpolate(&format!("_ms({})", args)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_utils::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_static_and_bound() {
        let mut el = element(r#"<div style="color: red; width: 1px" :style="{height: h}"></div>"#);
        run_after(&Style, &mut el);
        assert_eq!(
            attrs(&el),
            pairs(&[("style", "{{ _ms({'color':'red','width':'1px'}, {height:h}) }}")])
        );
    }

    #[test]
    fn test_show_only() {
        let mut el = element(r#"<div v-show="visible"></div>"#);
        run_after(&Style, &mut el);
        assert_eq!(attrs(&el), pairs(&[("style", "{{ _ms('', {}, visible) }}")]));
    }

    #[test]
    fn test_static_only_is_untouched() {
        let mut el = element(r#"<div style="color: red"></div>"#);
        run_after(&Style, &mut el);
        assert_eq!(attrs(&el), pairs(&[("style", "color: red")]));
    }
}
