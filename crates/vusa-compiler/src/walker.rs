//! Depth-first dispatch of the module hooks.

use crate::context::ModuleContext;
use crate::error::CompileResult;
use crate::modules::Module;
use log::trace;
use vusa_template::{chain_conditionals, check_single_root, process_element, ElementNode, TemplateNode};

/// Walk the root nodes of a template.
///
/// Markup problems found along the way are reported to the context. The
/// first hook error aborts the walk.
pub fn walk(
    nodes: &mut Vec<TemplateNode>,
    modules: &[&dyn Module],
    ctx: &mut ModuleContext,
) -> CompileResult<()> {
    walk_children(nodes, modules, ctx)?;
    let mut errors = Vec::new();
    check_single_root(nodes, &mut errors);
    ctx.report_all(errors);
    Ok(())
}

fn walk_children(
    nodes: &mut Vec<TemplateNode>,
    modules: &[&dyn Module],
    ctx: &mut ModuleContext,
) -> CompileResult<()> {
    for node in nodes.iter_mut() {
        if let TemplateNode::Element(el) = node {
            walk_element(el, modules, ctx)?;
        }
    }
    let mut errors = Vec::new();
    chain_conditionals(nodes, &mut errors);
    ctx.report_all(errors);
    Ok(())
}

fn walk_element(el: &mut ElementNode, modules: &[&dyn Module], ctx: &mut ModuleContext) -> CompileResult<()> {
    for module in modules {
        trace!("{} before <{}>", module.name(), el.tag);
        module.before_children(el, ctx)?;
    }

    let mut errors = Vec::new();
    process_element(el, &mut errors);
    ctx.report_all(errors);

    walk_children(&mut el.children, modules, ctx)?;

    for module in modules {
        trace!("{} after <{}>", module.name(), el.tag);
        module.after_children(el, ctx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use std::sync::Mutex;
    use vusa_template::{parse_template, ParserOptions};

    #[derive(Debug, Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Module for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn before_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
            self.events.lock().unwrap().push(format!("enter {}", el.tag));
            Ok(())
        }

        fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
            let chained = el.child_elements().next().map_or(0, |c| c.if_conditions.len());
            self.events
                .lock()
                .unwrap()
                .push(format!("leave {} {}", el.tag, chained));
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl Module for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn after_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
            Err(CompileError::directive(format!("bad <{}>", el.tag)))
        }
    }

    fn roots(source: &str) -> Vec<TemplateNode> {
        parse_template(source, &ParserOptions::default()).nodes
    }

    #[test]
    fn test_children_are_chained_before_parent_hooks() {
        let recorder = Recorder::default();
        let mut nodes = roots(r#"<div><p v-if="a"></p><p v-else></p></div>"#);
        let mut ctx = ModuleContext::new();
        walk(&mut nodes, &[&recorder], &mut ctx).unwrap();

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["enter div", "enter p", "leave p 0", "enter p", "leave p 0", "leave div 2"]
        );
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn test_hook_error_aborts_at_first_element() {
        let mut nodes = roots("<div><span></span></div>");
        let mut ctx = ModuleContext::new();
        let err = walk(&mut nodes, &[&Failing], &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "bad <span>");
    }

    #[test]
    fn test_multiple_roots_are_reported() {
        let mut nodes = roots("<div></div><p></p>");
        let mut ctx = ModuleContext::new();
        walk(&mut nodes, &[], &mut ctx).unwrap();
        assert_eq!(ctx.errors.len(), 1);
        assert!(ctx.errors[0].starts_with("Component template should contain exactly one root element."));
    }
}
