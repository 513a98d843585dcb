//! Parser for San template markup.

use crate::ast::*;
use crate::error::{ErrorCode, ParseError, ParseResult};
use crate::text::{parse_san_expr, parse_text};
use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;
use source_map::Span;

static FOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\s*([$0-9a-z_]+)(\s*,\s*([$0-9a-z_]+))?\s+in\s+(.+?)(\s+trackBy\s+(.+))?$")
        .expect("valid s-for regex")
});

static EVENT_MODIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+):").expect("valid modifier regex"));

/// Tags that never have children or end tags.
const AUTO_CLOSE_TAGS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "command", "embed", "frame", "hr", "img", "input",
    "isindex", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Parse San markup into a root node whose children are the top-level nodes.
pub fn parse_template(source: &str) -> ParseResult<ANode> {
    let mut parser = SanParser { source, pos: 0 };
    let children = parser.parse_children()?;
    Ok(ANode {
        children,
        ..Default::default()
    })
}

struct SanParser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> SanParser<'a> {
    fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.remaining().chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn read_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.pos;
        let len = self
            .remaining()
            .find(|c: char| !pred(c))
            .unwrap_or(self.source.len() - self.pos);
        self.pos += len;
        &self.source[start..self.pos]
    }

    fn skip_past(&mut self, s: &str) {
        match self.remaining().find(s) {
            Some(offset) => self.pos += offset + s.len(),
            None => self.pos = self.source.len(),
        }
    }

    fn skip_whitespace(&mut self) {
        self.read_while(char::is_whitespace);
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    fn at_tag(&self) -> bool {
        let mut chars = self.remaining().chars();
        chars.next() == Some('<')
            && matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!')
    }

    /// Parse nodes until an end tag or EOF, folding `else` branches.
    fn parse_children(&mut self) -> ParseResult<Vec<ANode>> {
        let mut children: Vec<ANode> = Vec::new();

        while !self.is_eof() && !self.starts_with("</") {
            let start = self.pos;
            let node = if self.starts_with("<!") {
                self.skip_past(">");
                None
            } else if self.at_tag() {
                Some(self.parse_element()?)
            } else {
                self.parse_text()?
            };

            let Some(node) = node else { continue };
            if node.directives.contains_key("else") || node.directives.contains_key("elif") {
                let owner = children
                    .iter_mut()
                    .rev()
                    .find(|n| !n.is_text())
                    .filter(|n| n.directives.contains_key("if"));
                match owner {
                    Some(owner) => owner.elses.push(node),
                    None => {
                        return Err(ParseError::new(
                            "else not match if.",
                            self.span_from(start),
                            ErrorCode::ElseWithoutIf,
                        ))
                    }
                }
            } else {
                children.push(node);
            }
        }

        Ok(children)
    }

    fn parse_text(&mut self) -> ParseResult<Option<ANode>> {
        let start = self.pos;
        while !self.is_eof() {
            if self.starts_with("{{") {
                self.skip_past("}}");
                continue;
            }
            if self.at_tag() {
                break;
            }
            self.advance();
        }

        let text = &self.source[start..self.pos];
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(ANode::text(parse_text(text, self.span_from(start))?)))
    }

    fn parse_element(&mut self) -> ParseResult<ANode> {
        let start = self.pos;
        self.advance();
        let tag = SmolStr::from(self.read_while(|c| {
            c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':' || c == '.'
        }));
        let mut node = ANode::element(tag.clone());

        loop {
            self.skip_whitespace();
            if self.is_eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }
            let attr_start = self.pos;
            let name = self.read_while(|c| !c.is_whitespace() && !matches!(c, '"' | '\'' | '>' | '/' | '='));
            if name.is_empty() {
                self.advance();
                continue;
            }
            self.skip_whitespace();
            let value = if self.starts_with("=") {
                self.advance();
                self.skip_whitespace();
                Some(self.parse_attribute_value())
            } else {
                None
            };
            apply_attribute(&mut node, name, value, self.span_from(attr_start))?;
        }

        let self_closing = self.starts_with("/>");
        self.skip_past(">");
        node.raw = Some(self.source[start..self.pos].to_string());

        if self_closing || AUTO_CLOSE_TAGS.contains(&tag.to_ascii_lowercase().as_str()) {
            return Ok(node);
        }

        node.children = self.parse_children()?;

        let end_start = self.pos;
        if self.starts_with("</") {
            self.pos += 2;
            let end = self.read_while(|c| !c.is_whitespace() && c != '>');
            if !end.eq_ignore_ascii_case(&tag) {
                return Err(ParseError::new(
                    format!("tag <{}> has no matching end tag, found </{}>.", tag, end),
                    self.span_from(end_start),
                    ErrorCode::UnclosedElement,
                ));
            }
            self.skip_past(">");
        } else {
            return Err(ParseError::new(
                format!("tag <{}> has no matching end tag.", tag),
                self.span_from(start),
                ErrorCode::UnclosedElement,
            ));
        }

        Ok(node)
    }

    fn parse_attribute_value(&mut self) -> String {
        match self.remaining().chars().next() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let value = self.read_while(|c| c != quote);
                self.advance();
                value.replace("&quot;", "\"")
            }
            _ => self
                .read_while(|c| !c.is_whitespace() && c != '>')
                .to_string(),
        }
    }
}

/// Interpret one attribute as a prop, event or directive.
fn apply_attribute(node: &mut ANode, name: &str, value: Option<String>, span: Span) -> ParseResult<()> {
    if let Some(event) = name.strip_prefix("on-") {
        let raw = value.unwrap_or_default();
        let mut handler = raw.as_str();
        let mut modifiers = Vec::new();
        while let Some(caps) = EVENT_MODIFIER_RE.captures(handler) {
            modifiers.push(SmolStr::from(&caps[1]));
            handler = &handler[caps[0].len()..];
        }
        node.events.push(Event {
            name: event.into(),
            modifiers,
            expr: parse_san_expr(handler, span)?,
            raw: Some(raw.clone()),
        });
        return Ok(());
    }

    if let Some(directive) = name.strip_prefix("s-") {
        let raw = value.unwrap_or_default();
        let (key, dir) = match directive {
            "if" => ("if", expr_directive(&raw, span)?),
            "elif" | "else-if" => ("elif", expr_directive(&raw, span)?),
            "else" => ("else", DirectiveValue::default()),
            "for" => ("for", for_directive(&raw, span)?),
            "transition" => ("transition", expr_directive(&raw, span)?),
            other => (
                other,
                DirectiveValue {
                    value: Some(parse_text(&raw, span)?),
                    ..Default::default()
                },
            ),
        };
        node.directives
            .insert(SmolStr::from(key), DirectiveValue { raw: Some(raw), ..dir });
        return Ok(());
    }

    let prop = match value {
        None => Prop {
            name: name.into(),
            expr: SanExpr::bool_true(),
            raw: None,
            x: false,
        },
        Some(raw) => {
            let trimmed = raw.trim();
            let two_way = trimmed
                .strip_prefix("{=")
                .and_then(|s| s.strip_suffix("=}"));
            let (expr, x) = match two_way {
                Some(code) => (parse_san_expr(code, span)?, true),
                None => (parse_text(&raw, span)?, false),
            };
            Prop {
                name: name.into(),
                expr,
                raw: Some(Raw::Source(raw.clone())),
                x,
            }
        }
    };
    node.props.push(prop);
    Ok(())
}

fn expr_directive(raw: &str, span: Span) -> ParseResult<DirectiveValue> {
    Ok(DirectiveValue {
        value: Some(parse_san_expr(raw, span)?),
        ..Default::default()
    })
}

fn for_directive(raw: &str, span: Span) -> ParseResult<DirectiveValue> {
    let caps = FOR_RE.captures(raw).ok_or_else(|| {
        ParseError::new(
            format!("for syntax error: {}", raw),
            span,
            ErrorCode::InvalidFor,
        )
    })?;
    let list = caps.get(4).map(|m| m.as_str()).unwrap_or_default();
    let track_by = match caps.get(6) {
        Some(m) => Some(parse_san_expr(m.as_str(), span)?),
        None => None,
    };
    Ok(DirectiveValue {
        value: Some(parse_san_expr(list, span)?),
        item: caps.get(1).map(|m| SmolStr::from(m.as_str())),
        index: caps.get(3).map(|m| SmolStr::from(m.as_str())),
        track_by,
        raw: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn root(source: &str) -> ANode {
        parse_template(source).unwrap().children.remove(0)
    }

    #[test]
    fn test_element_with_props() {
        let node = root(r#"<div id="main" class="{{ _mc('a', b) }}" hidden></div>"#);
        assert_eq!(node.tag_name.as_deref(), Some("div"));
        assert_eq!(node.props.len(), 3);
        assert!(node.prop("class").unwrap().expr.as_expression().is_some());
        assert_eq!(node.prop("hidden").unwrap().expr, SanExpr::bool_true());
        assert_eq!(node.prop("id").unwrap().raw, Some(Raw::Source("main".into())));
    }

    #[test]
    fn test_two_way_prop() {
        let node = root(r#"<input value="{= name =}">"#);
        let prop = node.prop("value").unwrap();
        assert!(prop.x);
        assert!(prop.expr.as_expression().is_some());
    }

    #[test]
    fn test_event_modifiers() {
        let node = root(r#"<a on-click="stop:prevent:go($event)"></a>"#);
        let event = node.event("click").unwrap();
        assert_eq!(event.modifiers, vec![SmolStr::from("stop"), SmolStr::from("prevent")]);
        assert_eq!(event.expr.raw.as_deref(), Some("go($event)"));
        assert_eq!(event.raw.as_deref(), Some("stop:prevent:go($event)"));
    }

    #[test]
    fn test_for_directive() {
        let node = root(r#"<li s-for="item,i in _l(list) trackBy item"></li>"#);
        let dir = node.directive("for").unwrap();
        assert_eq!(dir.item.as_deref(), Some("item"));
        assert_eq!(dir.index.as_deref(), Some("i"));
        assert_eq!(dir.value.as_ref().unwrap().raw.as_deref(), Some("_l(list)"));
        assert!(dir.track_by.is_some());
    }

    #[test]
    fn test_else_branches_fold_into_if() {
        let parsed = parse_template(r#"<div><a s-if="x"></a><b s-else-if="y"></b><c s-else></c></div>"#).unwrap();
        let div = &parsed.children[0];
        assert_eq!(div.children.len(), 1);
        let tags: Vec<_> = div.children[0]
            .elses
            .iter()
            .map(|n| n.tag_name.clone().unwrap_or_default())
            .collect();
        assert_eq!(tags, vec![SmolStr::from("b"), SmolStr::from("c")]);
        assert!(div.children[0].elses[0].directive("elif").is_some());
    }

    #[test]
    fn test_else_without_if() {
        let err = parse_template("<div><c s-else></c></div>").unwrap_err();
        assert_eq!(err.code, ErrorCode::ElseWithoutIf);
    }

    #[test]
    fn test_text_and_void_elements() {
        let node = root("<p>Hi {{ name }}<br>there</p>");
        assert_eq!(node.children.len(), 3);
        assert!(node.children[0].is_text());
        assert_eq!(node.children[1].tag_name.as_deref(), Some("br"));
    }

    #[test]
    fn test_head_void_elements_close_themselves() {
        let node = root(r#"<div><link rel="a"><meta charset="u"><isindex><p>x</p></div>"#);
        let tags: Vec<_> = node
            .children
            .iter()
            .map(|n| n.tag_name.clone().unwrap_or_default())
            .collect();
        assert_eq!(
            tags,
            vec![
                SmolStr::from("link"),
                SmolStr::from("meta"),
                SmolStr::from("isindex"),
                SmolStr::from("p")
            ]
        );
    }

    #[test]
    fn test_quote_entities_are_decoded() {
        let node = root(r#"<div title="say &quot;hi&quot;"></div>"#);
        assert_eq!(
            node.prop("title").unwrap().raw,
            Some(Raw::Source("say \"hi\"".into()))
        );
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = parse_template("<div><span></div>").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnclosedElement);
    }

    #[test]
    fn test_serializes_raw_presence_as_one() {
        let mut node = root(r#"<div id="main"></div>"#);
        node.raw = None;
        node.props[0].raw = Some(Raw::Present);
        node.props[0].expr.raw = None;
        insta::assert_snapshot!(serde_json::to_string(&node).unwrap(), @r#"{"tagName":"div","props":[{"name":"id","expr":{"type":"text","segs":[{"type":"literal","value":"main"}]},"raw":1}]}"#);
    }
}
