//! Per-compile state shared with the modules.

use serde::Serialize;

/// A statically named element reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefInfo {
    /// The ref name.
    pub name: String,
    /// Whether the element is a root of the template.
    pub is_root: bool,
}

/// State collected while the modules rewrite one template.
#[derive(Debug, Clone, Default)]
pub struct ModuleContext {
    /// Refs registered by the ref module.
    pub refs: Vec<RefInfo>,
    /// Reported errors that did not stop compilation.
    pub errors: Vec<String>,
}

impl ModuleContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an error without aborting the compile.
    pub fn report(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("[vusa error] {}", message);
        self.errors.push(message);
    }

    /// Register a static ref.
    pub fn add_ref(&mut self, name: impl Into<String>, is_root: bool) {
        self.refs.push(RefInfo {
            name: name.into(),
            is_root,
        });
    }

    /// Report parser errors collected for an element.
    pub fn report_all<E: ToString>(&mut self, errors: impl IntoIterator<Item = E>) {
        for error in errors {
            self.report(error.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_collects_messages() {
        let mut ctx = ModuleContext::new();
        ctx.report("first");
        ctx.report_all(["second", "third"]);
        assert_eq!(ctx.errors, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_ref_serializes_camel_case() {
        let mut ctx = ModuleContext::new();
        ctx.add_ref("box", true);
        let json = serde_json::to_string(&ctx.refs).unwrap();
        assert_eq!(json, r#"[{"name":"box","isRoot":true}]"#);
    }
}
