//! Directive-field extraction and conditional-chain attachment.
//!
//! [`process_element`] reads the structural directives of one element out
//! of its attribute map into the typed fields of [`ElementNode`]. It is run
//! after pre-transforms, so a pre-transform that renames attributes (for
//! example `a-if` to `v-if`) is seen here. [`chain_conditionals`] then
//! folds `v-else-if`/`v-else` siblings into the preceding `v-if` element.

use crate::ast::*;
use crate::error::{ErrorCode, ParseError};
use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;

static FOR_ALIAS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(.*?)\s+(?:in|of)\s+(.*)$").expect("valid v-for regex")
});

static FOR_ITERATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r",([^,\}\]]*)(?:,([^,\}\]]*))?$").expect("valid iterator regex")
});

/// Directives with dedicated fields, kept out of [`ElementNode::directives`].
const STRUCTURAL_DIRECTIVES: &[&str] = &["if", "else-if", "else", "for", "bind", "on"];

/// Extract the directive fields of an element from its attribute map.
pub fn process_element(el: &mut ElementNode, errors: &mut Vec<ParseError>) {
    if let Some(exp) = non_empty(el.attr("v-for")) {
        match parse_for(&exp) {
            Some(info) => el.for_info = Some(info),
            None => errors.push(ParseError::invalid_v_for(&exp, el.span)),
        }
    }

    el.key = binding_attr(el, "key").or_else(|| non_empty(el.attr("key")));
    el.if_exp = non_empty(el.attr("v-if"));
    el.else_if_exp = non_empty(el.attr("v-else-if"));
    el.has_else = el.has_attr("v-else");

    el.static_class = el.attr("class").map(String::from);
    el.class_binding = binding_attr(el, "class");

    el.static_style = el
        .attr("style")
        .map(|text| render_style_object(&parse_style_text(text)));
    el.style_binding = binding_attr(el, "style");

    el.directives = el.attrs_list.iter().filter_map(parse_directive).collect();
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(String::from)
}

/// The value of `:name` or `v-bind:name`.
fn binding_attr(el: &ElementNode, name: &str) -> Option<String> {
    non_empty(el.attr(&format!(":{}", name))).or_else(|| non_empty(el.attr(&format!("v-bind:{}", name))))
}

/// Parse a `v-for` expression.
pub fn parse_for(exp: &str) -> Option<ForInfo> {
    let caps = FOR_ALIAS_RE.captures(exp)?;
    let source = caps.get(2)?.as_str().trim().to_string();
    let alias = strip_parens(caps.get(1)?.as_str().trim());

    let Some(iter) = FOR_ITERATOR_RE.captures(alias) else {
        return Some(ForInfo {
            source,
            alias: alias.to_string(),
            iterator1: None,
            iterator2: None,
        });
    };

    Some(ForInfo {
        source,
        alias: FOR_ITERATOR_RE.replace(alias, "").trim().to_string(),
        iterator1: iter.get(1).map(|m| m.as_str().trim().to_string()),
        iterator2: iter
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty()),
    })
}

fn strip_parens(alias: &str) -> &str {
    let alias = alias.strip_prefix('(').unwrap_or(alias);
    alias.strip_suffix(')').unwrap_or(alias)
}

/// Parse inline CSS into ordered `(property, value)` pairs.
///
/// Declarations are split on `;` outside parentheses, so `url(a;b)` stays
/// intact.
pub fn parse_style_text(text: &str) -> Vec<(String, String)> {
    let mut declarations = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                declarations.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    declarations.push(&text[start..]);

    let mut result: Vec<(String, String)> = Vec::new();
    for item in declarations {
        let Some((property, value)) = item.split_once(':') else {
            continue;
        };
        let (property, value) = (property.trim(), value.trim());
        if value.is_empty() {
            continue;
        }
        match result.iter_mut().find(|(p, _)| p == property) {
            Some(existing) => existing.1 = value.to_string(),
            None => result.push((property.to_string(), value.to_string())),
        }
    }
    result
}

/// Render style pairs as a single-quoted object literal.
pub fn render_style_object(pairs: &[(String, String)]) -> String {
    let body: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}:{}", single_quote(k), single_quote(v)))
        .collect();
    format!("{{{}}}", body.join(","))
}

/// Quote a string with single quotes, escaping as needed.
pub fn single_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn parse_directive(attr: &Attr) -> Option<Directive> {
    let rest = attr.name.strip_prefix("v-")?;
    let mut parts = rest.split('.');
    let head = parts.next()?;
    let modifiers: Vec<SmolStr> = parts.map(SmolStr::from).collect();
    let (name, arg) = match head.split_once(':') {
        Some((name, arg)) => (name, Some(SmolStr::from(arg))),
        None => (head, None),
    };
    if name.is_empty() || STRUCTURAL_DIRECTIVES.contains(&name) {
        return None;
    }
    Some(Directive {
        name: name.into(),
        raw_name: attr.name.clone(),
        value: attr.value.clone(),
        arg,
        modifiers,
    })
}

/// Fold `v-else-if`/`v-else` elements into the preceding `v-if` element.
///
/// Attached elements are removed from `children`; orphans are reported and
/// dropped.
pub fn chain_conditionals(children: &mut Vec<TemplateNode>, errors: &mut Vec<ParseError>) {
    let nodes = std::mem::take(children);
    for node in nodes {
        match node {
            TemplateNode::Element(el) if el.else_if_exp.is_some() || el.has_else => {
                attach_branch(children, el, errors);
            }
            other => children.push(other),
        }
    }
}

fn attach_branch(siblings: &mut Vec<TemplateNode>, el: ElementNode, errors: &mut Vec<ParseError>) {
    loop {
        let stray_text = match siblings.last() {
            Some(TemplateNode::Text(text)) if !text.is_whitespace() => Some(text.content.trim().to_string()),
            Some(TemplateNode::Text(_)) | Some(TemplateNode::Comment(_)) => None,
            Some(TemplateNode::Element(_)) | None => break,
        };
        if let Some(text) = stray_text {
            errors.push(ParseError::new(
                format!("text \"{}\" between v-if and v-else(-if) will be ignored.", text),
                el.span,
                ErrorCode::TextBetweenBranches,
            ));
        }
        siblings.pop();
    }

    match siblings.last_mut().and_then(TemplateNode::as_element_mut) {
        Some(prev) if prev.if_exp.is_some() => {
            if prev.if_conditions.is_empty() {
                prev.if_conditions.push(IfCondition {
                    exp: prev.if_exp.clone(),
                    block: ConditionBlock::Owner,
                });
            }
            prev.if_conditions.push(IfCondition {
                exp: el.else_if_exp.clone(),
                block: ConditionBlock::Element(Box::new(el)),
            });
        }
        _ => {
            let directive = match &el.else_if_exp {
                Some(exp) => format!("v-else-if=\"{}\"", exp),
                None => "v-else".to_string(),
            };
            errors.push(ParseError::new(
                format!(
                    "{} used on element <{}> without corresponding v-if.",
                    directive, el.tag
                ),
                el.span,
                ErrorCode::OrphanElse,
            ));
        }
    }
}

/// Report when more than one root element remains after chaining.
pub fn check_single_root(roots: &[TemplateNode], errors: &mut Vec<ParseError>) {
    let mut elements = roots.iter().filter_map(TemplateNode::as_element);
    if let (Some(_), Some(extra)) = (elements.next(), elements.next()) {
        errors.push(ParseError::new(
            "Component template should contain exactly one root element. \
             If you are using v-if on multiple elements, use v-else-if to chain them instead.",
            extra.span,
            ErrorCode::MultipleRoots,
        ));
    }
}

/// Camelize a string (kebab-case to camelCase).
pub fn camelize(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
