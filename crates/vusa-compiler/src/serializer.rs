//! Rendering the rewritten element tree back into markup.

use crate::constants::{is_boolean_pair, is_no_value_attr, is_single_tag};
use crate::Dialect;
use once_cell::sync::Lazy;
use regex::Regex;
use vusa_template::{ElementNode, TemplateNode};

static SCOPE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^data-(a|v)-").expect("valid scope regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Options for [`serialize`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions<'a> {
    /// Scope identifier added to every element as a data attribute.
    pub scope_id: Option<&'a str>,
    /// Trim spaces, tabs and newlines around text nodes.
    pub strip_whitespace: bool,
    pub dialect: Dialect,
}

/// Render an attribute.
///
/// Plain values have their whitespace collapsed; interpolated values are
/// kept as written. Double quotes are escaped as `&quot;`.
pub fn stringify_attr(name: &str, value: &str, tag: &str) -> String {
    if is_no_value_attr(name) || (value.is_empty() && is_boolean_pair(tag, name)) {
        return name.to_string();
    }
    let value = if value.starts_with("{{") {
        value.to_string()
    } else {
        WHITESPACE_RE.replace_all(value, " ").into_owned()
    };
    format!("{}=\"{}\"", name, value.replace('"', "&quot;"))
}

struct Serializer<'a> {
    options: SerializeOptions<'a>,
    scope_attr: Option<String>,
    out: String,
}

impl<'a> Serializer<'a> {
    fn new(options: SerializeOptions<'a>) -> Self {
        let scope_attr = options
            .scope_id
            .map(|id| SCOPE_PREFIX_RE.replace(id, "").into_owned())
            .filter(|id| !id.is_empty())
            .map(|id| {
                let prefix = match options.dialect {
                    Dialect::Atom => 'a',
                    Dialect::Vue => 'v',
                };
                format!("data-{}-{}", prefix, id)
            });
        Self {
            options,
            scope_attr,
            out: String::new(),
        }
    }

    fn nodes(&mut self, nodes: &[TemplateNode]) {
        for node in nodes {
            match node {
                TemplateNode::Element(el) => self.element(el),
                TemplateNode::Text(text) => self.text(&text.content),
                TemplateNode::Comment(comment) => {
                    self.out.push_str("<!--");
                    self.out.push_str(&comment.content);
                    self.out.push_str("-->");
                }
            }
        }
    }

    fn text(&mut self, content: &str) {
        if self.options.strip_whitespace {
            self.out.push_str(content.trim_matches(|c| matches!(c, ' ' | '\n' | '\t')));
        } else {
            self.out.push_str(content);
        }
    }

    fn element(&mut self, el: &ElementNode) {
        self.out.push('<');
        self.out.push_str(&el.tag);
        for (name, value) in &el.attrs_map {
            self.out.push(' ');
            self.out.push_str(&stringify_attr(name, value, &el.tag));
        }
        if let Some(scope) = &self.scope_attr {
            self.out.push(' ');
            self.out.push_str(scope);
        }
        self.out.push('>');

        self.nodes(&el.children);
        if !el.children.is_empty() || !is_single_tag(&el.tag) {
            self.out.push_str("</");
            self.out.push_str(&el.tag);
            self.out.push('>');
        }

        for branch in el.else_blocks() {
            self.element(branch);
        }
    }
}

/// Render nodes as markup.
pub fn serialize(nodes: &[TemplateNode], options: SerializeOptions<'_>) -> String {
    let mut serializer = Serializer::new(options);
    serializer.nodes(nodes);
    serializer.out
}

/// Render one element, followed by its chained branches.
pub fn serialize_element(el: &ElementNode, options: SerializeOptions<'_>) -> String {
    let mut serializer = Serializer::new(options);
    serializer.element(el);
    serializer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vusa_template::{ConditionBlock, IfCondition};

    fn strip() -> SerializeOptions<'static> {
        SerializeOptions {
            strip_whitespace: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_stringify_attr() {
        assert_eq!(stringify_attr("s-else", "", "div"), "s-else");
        assert_eq!(stringify_attr("disabled", "", "button"), "disabled");
        assert_eq!(stringify_attr("disabled", "", "my-button"), "disabled=\"\"");
        assert_eq!(stringify_attr("title", "a \n  b", "div"), "title=\"a b\"");
        assert_eq!(stringify_attr("title", "{{ a  +\nb }}", "div"), "title=\"{{ a  +\nb }}\"");
        assert_eq!(stringify_attr("title", "say \"hi\"", "div"), "title=\"say &quot;hi&quot;\"");
    }

    #[test]
    fn test_single_tags_and_text() {
        let mut el = ElementNode::new("div");
        el.set_attr("id", "a");
        let mut br = ElementNode::new("br");
        br.parent_tag = Some("div".into());
        el.children = vec![
            TemplateNode::text("\n  hi "),
            TemplateNode::Element(br),
        ];
        assert_eq!(serialize_element(&el, strip()), r#"<div id="a">hi<br></div>"#);
    }

    #[test]
    fn test_scope_id_prefix() {
        let el = ElementNode::new("p");
        let options = SerializeOptions {
            scope_id: Some("data-v-123"),
            dialect: Dialect::Atom,
            ..strip()
        };
        assert_eq!(serialize_element(&el, options), "<p data-a-123></p>");

        let options = SerializeOptions {
            scope_id: Some(""),
            ..strip()
        };
        assert_eq!(serialize_element(&el, options), "<p></p>");
    }

    #[test]
    fn test_chained_branches_become_siblings() {
        let mut el = ElementNode::new("a");
        el.set_attr("s-if", "x");
        let mut b = ElementNode::new("b");
        b.set_attr("s-elif", "y");
        let mut c = ElementNode::new("c");
        c.set_attr("s-else", "");
        el.if_conditions = vec![
            IfCondition {
                exp: Some("x".into()),
                block: ConditionBlock::Owner,
            },
            IfCondition {
                exp: Some("y".into()),
                block: ConditionBlock::Element(Box::new(b)),
            },
            IfCondition {
                exp: None,
                block: ConditionBlock::Element(Box::new(c)),
            },
        ];
        assert_eq!(
            serialize(&[TemplateNode::Element(el)], strip()),
            r#"<a s-if="x"></a><b s-elif="y"></b><c s-else></c>"#
        );
    }
}
