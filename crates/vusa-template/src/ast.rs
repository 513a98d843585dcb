//! Element tree for Vue templates.
//!
//! The tree is deliberately close to the markup: every element keeps its
//! attributes as an ordered name/value map, which is the channel the
//! rewrite modules communicate through. The directive fields
//! (`if_exp`, `for_info`, `class_binding`, ...) are filled in by
//! [`crate::process::process_element`] once pre-transforms have run.

use indexmap::IndexMap;
use smol_str::SmolStr;
use source_map::Span;

/// Ordered attribute map; valueless attributes map to `""`.
pub type AttrsMap = IndexMap<SmolStr, String>;

/// A node in the template tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum TemplateNode {
    /// An element (HTML tag or component).
    Element(ElementNode),
    /// A text node, interpolations included verbatim.
    Text(TextNode),
    /// A comment.
    Comment(CommentNode),
}

impl TemplateNode {
    /// Get the span of this node.
    pub fn span(&self) -> Span {
        match self {
            Self::Element(n) => n.span,
            Self::Text(n) => n.span,
            Self::Comment(n) => n.span,
        }
    }

    /// Get the element, if this is one.
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Get the element mutably, if this is one.
    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Create a synthetic text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(TextNode {
            content: content.into(),
            span: Span::default(),
        })
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ElementNode {
    /// The tag name.
    pub tag: SmolStr,
    /// Attribute values by name, in declaration order.
    pub attrs_map: AttrsMap,
    /// Attributes as declared, duplicates included.
    pub attrs_list: Vec<Attr>,
    /// Child nodes.
    pub children: Vec<TemplateNode>,
    /// Tag of the enclosing element; `None` for a root element.
    pub parent_tag: Option<SmolStr>,
    /// Written as `<tag />`.
    pub self_closing: bool,
    /// Source span.
    pub span: Span,

    /// `v-if` expression.
    pub if_exp: Option<String>,
    /// `v-else-if` expression.
    pub else_if_exp: Option<String>,
    /// `v-else` is present.
    pub has_else: bool,
    /// Parsed `v-for`.
    pub for_info: Option<ForInfo>,
    /// The loop key expression (bound `:key`, else static `key`).
    pub key: Option<String>,
    /// Static `class` value.
    pub static_class: Option<String>,
    /// Bound class expression.
    pub class_binding: Option<String>,
    /// Static `style` value rendered as an object literal.
    pub static_style: Option<String>,
    /// Bound style expression.
    pub style_binding: Option<String>,
    /// Generic `v-*` directives (`html`, `text`, `show`, `model`, custom).
    pub directives: Vec<Directive>,
    /// The conditional chain headed by this element.
    ///
    /// Empty unless a `v-else-if`/`v-else` sibling was attached, in which
    /// case entry 0 is this element's own `v-if` and the length is at
    /// least two.
    pub if_conditions: Vec<IfCondition>,
}

impl ElementNode {
    /// Create a new element with the given tag and no attributes.
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Whether this element is a root of the template.
    pub fn is_root(&self) -> bool {
        self.parent_tag.is_none()
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs_map.get(name).map(String::as_str)
    }

    /// Check if an attribute is present.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs_map.contains_key(name)
    }

    /// Remove an attribute, keeping the order of the rest.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs_map.shift_remove(name)
    }

    /// Set an attribute; new names go to the end.
    pub fn set_attr(&mut self, name: impl Into<SmolStr>, value: impl Into<String>) {
        self.attrs_map.insert(name.into(), value.into());
    }

    /// Replace the attribute `old` with `new`, taking over its position.
    ///
    /// When `old` is absent, or `new` already exists, `new` is set in place
    /// or appended.
    pub fn replace_attr(&mut self, old: &str, new: impl Into<SmolStr>, value: impl Into<String>) {
        let new = new.into();
        match self.attrs_map.shift_remove_full(old) {
            Some((index, _, _)) if !self.attrs_map.contains_key(&new) => {
                self.attrs_map.shift_insert(index, new, value.into());
            }
            _ => {
                self.attrs_map.insert(new, value.into());
            }
        }
    }

    /// Get a directive by name.
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// Get a directive by name, mutably.
    pub fn directive_mut(&mut self, name: &str) -> Option<&mut Directive> {
        self.directives.iter_mut().find(|d| d.name == name)
    }

    /// Iterate over child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(TemplateNode::as_element)
    }

    /// Whether any `v-if`/`v-else-if`/`v-else` is set.
    pub fn is_conditional(&self) -> bool {
        self.if_exp.is_some() || self.else_if_exp.is_some() || self.has_else
    }

    /// Derive a sibling variant of this element.
    ///
    /// The new element owns copies of everything except the conditional
    /// chain, and takes the given tag and attribute map.
    pub fn derive(&self, tag: impl Into<SmolStr>, attrs_map: AttrsMap) -> ElementNode {
        ElementNode {
            tag: tag.into(),
            attrs_map,
            if_conditions: Vec::new(),
            ..self.clone()
        }
    }

    /// The blocks of the conditional chain after this element's own.
    pub fn else_blocks(&self) -> impl Iterator<Item = &ElementNode> {
        self.if_conditions.iter().filter_map(|c| match &c.block {
            ConditionBlock::Element(el) => Some(el.as_ref()),
            ConditionBlock::Owner => None,
        })
    }

    /// Mutable access to the chained blocks after this element's own.
    pub fn else_blocks_mut(&mut self) -> impl Iterator<Item = &mut ElementNode> {
        self.if_conditions.iter_mut().filter_map(|c| match &mut c.block {
            ConditionBlock::Element(el) => Some(el.as_mut()),
            ConditionBlock::Owner => None,
        })
    }
}

/// An attribute as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attr {
    pub name: SmolStr,
    /// The value; `""` when the attribute has none.
    pub value: String,
    pub span: Span,
}

impl Attr {
    /// Create a new attribute.
    pub fn new(name: impl Into<SmolStr>, value: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            span,
        }
    }
}

/// A parsed `v-for="(alias, iterator1, iterator2) in source"`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ForInfo {
    /// The iterated expression.
    pub source: String,
    pub alias: String,
    pub iterator1: Option<String>,
    pub iterator2: Option<String>,
}

/// A `v-*` directive kept in the generic directive collection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Directive {
    /// Name without the `v-` prefix, argument and modifiers.
    pub name: SmolStr,
    /// The full attribute name.
    pub raw_name: SmolStr,
    pub value: String,
    pub arg: Option<SmolStr>,
    pub modifiers: Vec<SmolStr>,
}

/// One branch of a conditional chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IfCondition {
    /// The branch test; `None` for `v-else`.
    pub exp: Option<String>,
    pub block: ConditionBlock,
}

/// The element rendered by a branch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConditionBlock {
    /// The element that owns the chain.
    Owner,
    /// A chained sibling element.
    Element(Box<ElementNode>),
}

/// A text node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextNode {
    pub content: String,
    pub span: Span,
}

impl TextNode {
    /// Check if the text is whitespace only.
    pub fn is_whitespace(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A comment node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommentNode {
    pub content: String,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element() -> ElementNode {
        let mut el = ElementNode::new("div");
        el.set_attr("id", "a");
        el.set_attr(":title", "t");
        el.set_attr("class", "x");
        el
    }

    #[test]
    fn test_remove_attr_keeps_order() {
        let mut el = element();
        assert_eq!(el.remove_attr(":title").as_deref(), Some("t"));
        el.set_attr("title", "{{ t }}");
        let keys: Vec<&str> = el.attrs_map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "class", "title"]);
    }

    #[test]
    fn test_replace_attr_takes_position() {
        let mut el = element();
        el.replace_attr(":title", "title", "{{ t }}");
        let keys: Vec<&str> = el.attrs_map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "title", "class"]);

        el.replace_attr("class", "id", "b");
        let keys: Vec<&str> = el.attrs_map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "title"]);
        assert_eq!(el.attr("id"), Some("b"));
    }

    #[test]
    fn test_derive_copies_attrs() {
        let mut el = element();
        el.children.push(TemplateNode::text("hi"));
        let mut attrs = el.attrs_map.clone();
        attrs.insert("s-else".into(), String::new());
        let derived = el.derive("b", attrs);

        assert_eq!(derived.tag, "b");
        assert_eq!(derived.children.len(), 1);
        assert!(derived.has_attr("s-else"));
        assert!(!el.has_attr("s-else"));
    }

    #[test]
    fn test_root_detection() {
        let mut el = element();
        assert!(el.is_root());
        el.parent_tag = Some("div".into());
        assert!(!el.is_root());
    }
}
