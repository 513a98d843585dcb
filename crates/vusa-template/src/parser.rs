//! Parser for Vue template markup.
//!
//! Produces the raw element tree: tags, attribute maps and lists, text and
//! comments. Directive fields are not interpreted here. Problems in the
//! markup are recovered from and returned as [`ParseError`]s.

use crate::ast::*;
use crate::error::{ErrorCode, ParseError};
use smol_str::SmolStr;
use source_map::Span;

/// Options for the template parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Keep whitespace-only text nodes.
    pub preserve_whitespace: bool,
    /// Keep comment nodes.
    pub comments: bool,
}

/// The result of parsing a template.
#[derive(Debug, Clone, Default)]
pub struct ParsedTemplate {
    /// Top-level nodes.
    pub nodes: Vec<TemplateNode>,
    /// Recoverable errors, in source order.
    pub errors: Vec<ParseError>,
}

/// Parse Vue template markup into an element tree.
pub fn parse_template(source: &str, options: &ParserOptions) -> ParsedTemplate {
    let mut parser = TemplateParser::new(source, *options);
    let nodes = parser.parse_children(&mut Vec::new());
    ParsedTemplate {
        nodes,
        errors: parser.errors,
    }
}

/// Elements whose content is raw text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// Void elements never have children or end tags.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "command", "embed", "frame", "hr", "img", "input",
    "isindex", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Check if an element is a void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

/// Parser for Vue templates.
struct TemplateParser<'a> {
    source: &'a str,
    pos: usize,
    options: ParserOptions,
    errors: Vec<ParseError>,
}

impl<'a> TemplateParser<'a> {
    /// Create a new parser.
    fn new(source: &'a str, options: ParserOptions) -> Self {
        Self {
            source,
            pos: 0,
            options,
            errors: Vec::new(),
        }
    }

    /// Get remaining source.
    fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Check if at end.
    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Peek at next char.
    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consume next char.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Check if remaining starts with string.
    fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    /// Consume string if it matches.
    fn consume(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Skip whitespace.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read until predicate is false.
    fn read_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if pred(c) {
                self.advance();
            } else {
                break;
            }
        }
        &self.source[start..self.pos]
    }

    /// Read until string is found.
    fn read_until(&mut self, s: &str) -> &'a str {
        let start = self.pos;
        match self.remaining().find(s) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.source.len(),
        }
        &self.source[start..self.pos]
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    /// Whether the cursor is at the start of a tag, comment or end tag.
    fn at_markup(&self) -> bool {
        let mut chars = self.remaining().chars();
        if chars.next() != Some('<') {
            return false;
        }
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!')
    }

    /// The tag name of an end tag at the cursor.
    fn peek_end_tag(&self) -> Option<&'a str> {
        let rest = self.remaining().strip_prefix("</")?;
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '>')
            .unwrap_or(rest.len());
        Some(&rest[..len])
    }

    /// Parse children until an end tag of an open element, or EOF.
    fn parse_children(&mut self, open: &mut Vec<SmolStr>) -> Vec<TemplateNode> {
        let mut children = Vec::new();

        while !self.is_eof() {
            if let Some(tag) = self.peek_end_tag() {
                if open.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                    break;
                }
                let start = self.pos;
                let tag = tag.to_string();
                self.read_until(">");
                self.consume(">");
                self.errors.push(ParseError::new(
                    format!("tag </{}> has no matching start tag.", tag),
                    self.span_from(start),
                    ErrorCode::StrayEndTag,
                ));
                continue;
            }

            let parent = open.last().cloned();
            if let Some(node) = self.parse_node(parent, open) {
                children.push(node);
            }
        }

        children
    }

    /// Parse a single node.
    fn parse_node(&mut self, parent: Option<SmolStr>, open: &mut Vec<SmolStr>) -> Option<TemplateNode> {
        if self.starts_with("<!--") {
            let comment = self.parse_comment();
            return self.options.comments.then_some(TemplateNode::Comment(comment));
        }

        if self.at_markup() && !self.starts_with("<!") {
            return Some(TemplateNode::Element(self.parse_element(parent, open)));
        }

        if self.starts_with("<!") {
            // Doctype and other declarations carry nothing for the tree.
            self.read_until(">");
            self.consume(">");
            return None;
        }

        let text = self.parse_text();
        if parent.is_none() && !text.is_whitespace() {
            self.errors.push(ParseError::new(
                format!("text \"{}\" outside root element will be ignored.", text.content.trim()),
                text.span,
                ErrorCode::TextOutsideRoot,
            ));
            return None;
        }
        if text.is_whitespace() && !self.options.preserve_whitespace {
            return None;
        }
        Some(TemplateNode::Text(text))
    }

    /// Parse a comment.
    fn parse_comment(&mut self) -> CommentNode {
        let start = self.pos;
        self.consume("<!--");
        let content = self.read_until("-->");
        self.consume("-->");
        CommentNode {
            content: content.to_string(),
            span: self.span_from(start),
        }
    }

    /// Parse a text node, keeping `{{ }}` interpolations intact.
    fn parse_text(&mut self) -> TextNode {
        let start = self.pos;

        while !self.is_eof() {
            if self.starts_with("{{") {
                self.consume("{{");
                self.read_until("}}");
                self.consume("}}");
                continue;
            }
            if self.at_markup() {
                break;
            }
            self.advance();
        }

        TextNode {
            content: self.source[start..self.pos].to_string(),
            span: self.span_from(start),
        }
    }

    /// Parse an element.
    fn parse_element(&mut self, parent: Option<SmolStr>, open: &mut Vec<SmolStr>) -> ElementNode {
        let start = self.pos;
        self.consume("<");

        let tag =
            SmolStr::from(self.read_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':' || c == '.'));

        let (attrs_map, attrs_list) = self.parse_attributes();

        self.skip_whitespace();

        // Self-closing?
        let self_closing = self.consume("/>");
        if !self_closing && !self.consume(">") {
            self.errors.push(ParseError::unclosed_element(&tag, self.span_from(start)));
        }

        let mut el = ElementNode {
            tag: tag.clone(),
            attrs_map,
            attrs_list,
            parent_tag: parent,
            self_closing,
            ..Default::default()
        };

        if self_closing || is_void_element(&tag) {
            el.span = self.span_from(start);
            return el;
        }

        if RAW_TEXT_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str()) {
            let content_start = self.pos;
            let content = self.read_until(&format!("</{}", tag));
            if !content.is_empty() {
                el.children.push(TemplateNode::Text(TextNode {
                    content: content.to_string(),
                    span: self.span_from(content_start),
                }));
            }
        } else {
            open.push(tag.clone());
            el.children = self.parse_children(open);
            open.pop();
        }

        // Consume closing tag
        match self.peek_end_tag() {
            Some(end) if end.eq_ignore_ascii_case(&tag) => {
                self.read_until(">");
                self.consume(">");
            }
            _ => {
                self.errors.push(ParseError::unclosed_element(&tag, self.span_from(start)));
            }
        }

        el.span = self.span_from(start);
        el
    }

    /// Parse attributes into the ordered map and the declaration list.
    fn parse_attributes(&mut self) -> (AttrsMap, Vec<Attr>) {
        let mut map = AttrsMap::new();
        let mut list = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }

            let attr_start = self.pos;

            let name = self.read_while(|c| {
                !c.is_whitespace() && !matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
            });

            if name.is_empty() {
                self.advance();
                continue;
            }

            self.skip_whitespace();

            let value = if self.consume("=") {
                self.skip_whitespace();
                self.parse_attribute_value()
            } else {
                String::new()
            };

            let span = self.span_from(attr_start);
            if map.contains_key(name) {
                self.errors.push(ParseError::duplicate_attribute(name, span));
            }
            map.insert(SmolStr::from(name), value.clone());
            list.push(Attr::new(name, value, span));
        }

        (map, list)
    }

    /// Parse an attribute value.
    fn parse_attribute_value(&mut self) -> String {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let value = self.read_while(|c| c != quote).to_string();
                self.advance(); // consume closing quote
                value
            }
            _ => self
                .read_while(|c| !c.is_whitespace() && c != '>')
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> ParsedTemplate {
        parse_template(source, &ParserOptions::default())
    }

    fn root(source: &str) -> ElementNode {
        let parsed = parse(source);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        match parsed.nodes.into_iter().next() {
            Some(TemplateNode::Element(el)) => el,
            other => panic!("Expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_element() {
        let el = root("<div>Hello</div>");
        assert_eq!(el.tag, "div");
        assert!(el.is_root());
        assert_eq!(el.children.len(), 1);
        assert_eq!(el.span, Span::new(0, 16));
    }

    #[test]
    fn test_attributes_in_order() {
        let el = root(r#"<input :value="a" disabled @input.lazy='set($event)' id=foo>"#);
        let keys: Vec<&str> = el.attrs_map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec![":value", "disabled", "@input.lazy", "id"]);
        assert_eq!(el.attr("disabled"), Some(""));
        assert_eq!(el.attr("@input.lazy"), Some("set($event)"));
        assert_eq!(el.attr("id"), Some("foo"));
        assert!(el.children.is_empty());
    }

    #[test]
    fn test_legacy_void_elements() {
        let el = root("<form><keygen name=k><isindex><button>go</button></form>");
        let tags: Vec<&str> = el.child_elements().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["keygen", "isindex", "button"]);
        assert!(is_void_element("basefont"));
        assert!(is_void_element("command"));
    }

    #[test]
    fn test_interpolation_with_angle_bracket() {
        let el = root("<p>{{ a < b ? 'x' : 'y' }}</p>");
        match &el.children[0] {
            TemplateNode::Text(text) => assert_eq!(text.content, "{{ a < b ? 'x' : 'y' }}"),
            other => panic!("Expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_and_comments_dropped() {
        let el = root("<div>\n  <!-- note -->\n  <span>a</span>\n</div>");
        assert_eq!(el.children.len(), 1);
        let child = el.child_elements().next().unwrap();
        assert_eq!(child.parent_tag.as_deref(), Some("div"));
    }

    #[test]
    fn test_comments_kept_when_enabled() {
        let parsed = parse_template(
            "<div><!-- note --></div>",
            &ParserOptions {
                comments: true,
                ..Default::default()
            },
        );
        let el = parsed.nodes[0].as_element().unwrap();
        assert!(matches!(&el.children[0], TemplateNode::Comment(c) if c.content == " note "));
    }

    #[test]
    fn test_self_closing_and_void() {
        let el = root("<div><my-comp /><br><img src=\"a.png\"></div>");
        let tags: Vec<&str> = el.child_elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["my-comp", "br", "img"]);
        assert!(el.child_elements().next().unwrap().self_closing);
    }

    #[test]
    fn test_raw_text_element() {
        let el = root("<div><script>if (a < b) {}</script></div>");
        let script = el.child_elements().next().unwrap();
        assert!(matches!(&script.children[0], TemplateNode::Text(t) if t.content == "if (a < b) {}"));
    }

    #[test]
    fn test_duplicate_attribute() {
        let parsed = parse(r#"<div id="a" id="b"></div>"#);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].code, ErrorCode::DuplicateAttribute);
        let el = parsed.nodes[0].as_element().unwrap();
        assert_eq!(el.attr("id"), Some("b"));
        assert_eq!(el.attrs_list.len(), 2);
    }

    #[test]
    fn test_unclosed_element() {
        let parsed = parse("<div><span></div>");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].code, ErrorCode::UnclosedElement);
        assert_eq!(parsed.errors[0].message, "tag <span> has no matching end tag.");
        let el = parsed.nodes[0].as_element().unwrap();
        assert_eq!(el.child_elements().count(), 1);
    }

    #[test]
    fn test_stray_end_tag() {
        let parsed = parse("<div></span></div>");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].code, ErrorCode::StrayEndTag);
    }

    #[test]
    fn test_text_outside_root() {
        let parsed = parse("hello <div></div>");
        assert_eq!(parsed.errors[0].code, ErrorCode::TextOutsideRoot);
        assert_eq!(parsed.nodes.len(), 1);
    }
}
