//! Directive rewrite modules.
//!
//! Each module rewrites the attribute map of one element, before and/or
//! after its children are walked. [`BUILTIN_MODULES`] runs in list order and
//! the order is part of the contract: [`Bind`] translates every remaining
//! `:`-prefixed attribute, so every module that claims a bound attribute of
//! its own (`:class`, `:style`, `:key`, `:ref`) must come before it.

mod atom;
mod bind;
mod boolean;
mod class;
mod conditional;
mod cssmodules;
mod dynamic_component;
mod event;
mod html;
mod loops;
mod model;
mod refs;
mod style;
mod template;
mod transition;

pub use atom::Atom;
pub use bind::Bind;
pub use boolean::Boolean;
pub use class::Class;
pub use conditional::Conditional;
pub use cssmodules::CssModules;
pub use dynamic_component::DynamicComponent;
pub use event::Event;
pub use html::Html;
pub use loops::Loop;
pub use model::Model;
pub use refs::Ref;
pub use style::Style;
pub use template::Template;
pub use transition::Transition;

use crate::context::ModuleContext;
use crate::error::CompileResult;
use std::fmt;
use vusa_template::ElementNode;

/// The tag of a non-rendering wrapper.
pub const FRAGMENT_TAG: &str = "fragment";

/// A rewrite pass over template elements.
pub trait Module: fmt::Debug + Send + Sync {
    /// The module name, used in logs.
    fn name(&self) -> &'static str;

    /// Called before the element's children are walked.
    fn before_children(&self, _el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        Ok(())
    }

    /// Called after the element's children are walked and chained.
    fn after_children(&self, _el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        Ok(())
    }
}

/// The built-in modules, in the order they run.
pub static BUILTIN_MODULES: &[&dyn Module] = &[
    &Template,
    &Boolean,
    &Conditional,
    &Loop,
    &Event,
    &Model,
    &Html,
    &Ref,
    &Class,
    &Style,
    // Must follow every module that claims a bound attribute.
    &Bind,
    &Transition,
    &DynamicComponent,
];

/// Wrap compiled code in a San interpolation.
pub(crate) fn interpolate(code: &str) -> String {
    format!("{{{{ {} }}}}", code)
}

/// Set the merged value of `name`, consuming `bound_keys`.
///
/// The merged attribute keeps the position of the static attribute if there
/// is one, otherwise of the first bound key.
pub(crate) fn merge_attr(el: &mut ElementNode, name: &str, bound_keys: &[&str], value: String) {
    if el.has_attr(name) {
        el.set_attr(name, value);
    } else if let Some(anchor) = bound_keys.iter().find(|key| el.has_attr(key)) {
        el.replace_attr(anchor, name, value);
    } else {
        el.set_attr(name, value);
    }
    for key in bound_keys {
        el.remove_attr(key);
    }
}
