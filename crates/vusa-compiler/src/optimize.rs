//! Shrinking the San tree before it is persisted.
//!
//! The raw source strings are only used for diagnostics and are dropped.
//! A prop's `raw` is an exception: the runtime checks that it exists, so it
//! is kept as a presence flag.

use san_template::{ANode, Raw, SanExpr};

/// Strip diagnostic fields from a tree, in place.
pub fn optimize(node: &mut ANode) {
    node.raw = None;
    if let Some(expr) = node.text_expr.as_mut() {
        strip(expr);
    }

    for prop in node.props.iter_mut() {
        strip(&mut prop.expr);
        if prop.raw.is_some() {
            prop.raw = Some(Raw::Present);
        }
    }
    for event in node.events.iter_mut() {
        event.raw = None;
        strip(&mut event.expr);
    }
    for directive in node.directives.values_mut() {
        directive.raw = None;
        if let Some(value) = directive.value.as_mut() {
            strip(value);
        }
        if let Some(track_by) = directive.track_by.as_mut() {
            strip(track_by);
        }
    }

    node.children.iter_mut().for_each(optimize);
    node.elses.iter_mut().for_each(optimize);
}

fn strip(expr: &mut SanExpr) {
    expr.raw = None;
}
