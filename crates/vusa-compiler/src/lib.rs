//! Vue to San template compilation.
//!
//! [`compile`] parses a Vue template, rewrites its directives through an
//! ordered list of [`Module`]s, serializes the result as San markup and
//! re-parses that markup into the San runtime's [`ANode`] tree.
//!
//! ```ignore
//! let output = vusa_compiler::compile(r#"<div v-if="ok">{{ msg }}</div>"#, &Default::default())?;
//! assert_eq!(output.template, r#"<div s-if="ok">{{ msg }}</div>"#);
//! ```

pub mod constants;
pub mod context;
pub mod error;
pub mod expression;
pub mod modules;
pub mod optimize;
pub mod serializer;
pub mod value;
pub mod walker;

use log::debug;
use rustc_hash::FxHashMap;
use san_template::ANode;
use serde::{Deserialize, Serialize};
use vusa_template::{parse_template, ElementNode, ParserOptions, TemplateNode};

pub use context::{ModuleContext, RefInfo};
pub use error::{CompileError, CompileResult};
pub use expression::{compile_expression, CompiledExpression};
pub use modules::{Module, BUILTIN_MODULES};
pub use serializer::{serialize, serialize_element, SerializeOptions};

/// The source dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Vue,
    /// Vue with `a-` directive prefixes.
    Atom,
}

/// Options for [`compile`].
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Modules run after the built-in ones.
    #[serde(skip)]
    pub extra_modules: Vec<Box<dyn Module>>,
    /// CSS-modules class names (`$style`).
    pub css_class_map: Option<FxHashMap<String, String>>,
    /// Scoped style identifier.
    pub scope_id: Option<String>,
    /// Trim whitespace around text nodes.
    pub strip_whitespace: bool,
    pub dialect: Dialect,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            extra_modules: Vec::new(),
            css_class_map: None,
            scope_id: None,
            strip_whitespace: true,
            dialect: Dialect::Vue,
        }
    }
}

impl CompileOptions {
    /// Add a module to run after the built-in ones.
    pub fn with_module(mut self, module: impl Module + 'static) -> Self {
        self.extra_modules.push(Box::new(module));
        self
    }

    pub fn with_css_class_map(mut self, class_map: FxHashMap<String, String>) -> Self {
        self.css_class_map = Some(class_map);
        self
    }

    pub fn with_scope_id(mut self, scope_id: impl Into<String>) -> Self {
        self.scope_id = Some(scope_id.into());
        self
    }

    pub fn with_strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }
}

/// The result of [`compile`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOutput {
    /// The rewritten Vue root element.
    pub source_tree: ElementNode,
    /// The optimized San tree.
    pub target_tree: ANode,
    /// The serialized San markup.
    pub template: String,
    /// Statically named refs.
    pub refs: Vec<RefInfo>,
    /// Reported errors that did not stop compilation.
    pub errors: Vec<String>,
}

impl CompileOutput {
    /// Serialize the output as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Compile a Vue template into San.
pub fn compile(source: &str, options: &CompileOptions) -> CompileResult<CompileOutput> {
    let mut ctx = ModuleContext::new();
    let parsed = parse_template(source.trim(), &ParserOptions::default());
    ctx.report_all(parsed.errors);
    let mut nodes = parsed.nodes;

    let css_modules = options
        .css_class_map
        .as_ref()
        .filter(|class_map| !class_map.is_empty())
        .map(modules::CssModules::new);
    let mut pipeline: Vec<&dyn Module> = BUILTIN_MODULES.to_vec();
    if options.dialect == Dialect::Atom {
        pipeline.push(&modules::Atom);
    }
    if let Some(css_modules) = &css_modules {
        pipeline.push(css_modules);
    }
    pipeline.extend(options.extra_modules.iter().map(|m| m.as_ref()));

    walker::walk(&mut nodes, &pipeline, &mut ctx)?;

    let Some(source_tree) = nodes.into_iter().find_map(|node| match node {
        TemplateNode::Element(el) => Some(el),
        _ => None,
    }) else {
        return Err(CompileError::Template(
            "Component template requires a root element, rather than just text.".to_string(),
        ));
    };

    let template = serialize_element(
        &source_tree,
        SerializeOptions {
            scope_id: options.scope_id.as_deref(),
            strip_whitespace: options.strip_whitespace,
            dialect: options.dialect,
        },
    );
    debug!("serialized template: {} bytes", template.len());

    let mut root = san_template::parse_template(&template)?;
    if root.children.is_empty() {
        return Err(CompileError::Template(format!(
            "compiled template has no root element: {}",
            template
        )));
    }
    let mut target_tree = root.children.swap_remove(0);
    optimize::optimize(&mut target_tree);

    Ok(CompileOutput {
        source_tree,
        target_tree,
        template,
        refs: ctx.refs,
        errors: ctx.errors,
    })
}
