use super::Module;
use crate::context::ModuleContext;
use crate::error::CompileResult;
use crate::expression::compile_code;
use vusa_template::ElementNode;

/// Rewrites `v-if`, `v-else-if` and `v-else`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Conditional;

impl Module for Conditional {
    fn name(&self) -> &'static str {
        "if"
    }

    fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        if let Some(exp) = el.if_exp.clone() {
            let code = compile_code(&exp)?;
            el.replace_attr("v-if", "s-if", code);
        }
        if let Some(exp) = el.else_if_exp.clone() {
            let code = compile_code(&exp)?;
            el.replace_attr("v-else-if", "s-else-if", code);
        }
        if el.has_else {
            el.replace_attr("v-else", "s-else", "");
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
    fn test_if_is_compiled() {
        let mut el = element(r#"<div v-if="a > 1 && `x` == b" id="d"></div>"#);
        run_after(&Conditional, &mut el);
        assert_eq!(attrs(&el), pairs(&[("s-if", "(a>1)&&('x')==b"), ("id", "d")]));
    }

    #[test]
    fn test_else_branches() {
        let mut el = element(r#"<p v-else-if="!ok"></p>"#);
        run_after(&Conditional, &mut el);
        assert_eq!(attrs(&el), pairs(&[("s-else-if", "!ok")]));

        let mut el = element("<p v-else></p>");
        run_after(&Conditional, &mut el);
        assert_eq!(attrs(&el), pairs(&[("s-else", "")]));
    }
}
