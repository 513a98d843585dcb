//! The San template tree.
//!
//! An [`ANode`] is either an element (`tag_name` set) or a text node
//! (`text_expr` set). The tree serializes to the JSON shape the San runtime
//! loads; empty collections and absent fields are omitted.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use smol_str::SmolStr;
use vusa_expression::FilterExpression;

/// A node of the San template tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ANode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<SmolStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_expr: Option<SanExpr>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<Prop>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub directives: IndexMap<SmolStr, DirectiveValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ANode>,
    /// `s-elif`/`s-else` branches of an `s-if` node.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elses: Vec<ANode>,
    /// The source markup this node was parsed from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ANode {
    /// Create an element node.
    pub fn element(tag_name: impl Into<SmolStr>) -> Self {
        Self {
            tag_name: Some(tag_name.into()),
            ..Default::default()
        }
    }

    /// Create a text node.
    pub fn text(text_expr: SanExpr) -> Self {
        Self {
            text_expr: Some(text_expr),
            ..Default::default()
        }
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        self.tag_name.is_none() && self.text_expr.is_some()
    }

    /// Get a prop by name.
    pub fn prop(&self, name: &str) -> Option<&Prop> {
        self.props.iter().find(|p| p.name == name)
    }

    /// Get an event listener by name.
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Get a directive by name.
    pub fn directive(&self, name: &str) -> Option<&DirectiveValue> {
        self.directives.get(name)
    }
}

/// An attribute binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prop {
    pub name: SmolStr,
    pub expr: SanExpr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Raw>,
    /// Two-way binding (`{= expr =}`).
    #[serde(skip_serializing_if = "is_false")]
    pub x: bool,
}

/// An `on-*` event listener.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub name: SmolStr,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<SmolStr>,
    pub expr: SanExpr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// The value of an `s-*` directive.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SanExpr>,
    /// Loop item name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<SmolStr>,
    /// Loop index name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<SmolStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_by: Option<SanExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// A prop's raw source, or only the fact that it had one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Raw {
    Source(String),
    /// Serialized as `1`.
    Present,
}

impl Serialize for Raw {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Raw::Source(s) => serializer.serialize_str(s),
            Raw::Present => serializer.serialize_u8(1),
        }
    }
}

/// An expression in the San tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanExpr {
    #[serde(flatten)]
    pub kind: SanExprKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl SanExpr {
    /// Create an expression with the raw text it was parsed from.
    pub fn new(kind: SanExprKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: Some(raw.into()),
        }
    }

    /// The boolean `true` used for valueless attributes.
    pub fn bool_true() -> Self {
        Self {
            kind: SanExprKind::Bool { value: true },
            raw: None,
        }
    }

    /// Get the parsed expression, if this is a single expression.
    pub fn as_expression(&self) -> Option<&FilterExpression> {
        match &self.kind {
            SanExprKind::Expr { expr } => Some(expr),
            _ => None,
        }
    }

    /// Get the text segments, if this is interpolated text.
    pub fn segments(&self) -> Option<&[TextSegment]> {
        match &self.kind {
            SanExprKind::Text { segs } => Some(segs),
            _ => None,
        }
    }
}

/// The shape of a [`SanExpr`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SanExprKind {
    /// Literal text mixed with interpolations.
    Text { segs: Vec<TextSegment> },
    /// A single expression.
    Expr { expr: Box<FilterExpression> },
    /// A literal boolean.
    Bool { value: bool },
}

/// A segment of interpolated text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TextSegment {
    Literal { value: String },
    Interp { expr: Box<FilterExpression> },
}

fn is_false(value: &bool) -> bool {
    !*value
}
