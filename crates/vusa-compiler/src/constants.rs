//! Tag and attribute tables used when emitting markup.

/// Tags written without an end tag when they have no children.
const SINGLE_TAGS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "command", "embed", "frame", "hr", "img", "input",
    "isindex", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Attributes that are meaningful by presence alone on HTML tags.
const BOOLEAN_ATTRS: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "compact", "controls",
    "declare", "default", "defaultchecked", "defaultmuted", "defaultselected", "defer",
    "disabled", "enabled", "formnovalidate", "hidden", "indeterminate", "inert", "ismap",
    "itemscope", "loop", "multiple", "muted", "nohref", "noresize", "noshade", "novalidate",
    "nowrap", "open", "pauseonexit", "readonly", "required", "reversed", "scoped", "seamless",
    "selected", "sortable", "translate", "truespeed", "typemustmatch", "visible",
];

/// Attributes that never carry a value.
const NO_VALUE_ATTRS: &[&str] = &["s-else"];

/// HTML tags.
const HTML_TAGS: &[&str] = &[
    "html", "body", "base", "head", "link", "meta", "style", "title", "address", "article",
    "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5", "h6", "hgroup", "nav", "section",
    "div", "dd", "dl", "dt", "figcaption", "figure", "hr", "img", "li", "main", "ol", "p", "pre",
    "ul", "a", "b", "abbr", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "kbd",
    "mark", "q", "rp", "rt", "rtc", "ruby", "s", "samp", "small", "span", "strong", "sub", "sup",
    "time", "u", "var", "wbr", "area", "audio", "map", "track", "video", "embed", "object",
    "param", "source", "canvas", "script", "noscript", "del", "ins", "caption", "col",
    "colgroup", "table", "thead", "tbody", "td", "th", "tr", "button", "datalist", "fieldset",
    "form", "input", "label", "legend", "meter", "optgroup", "option", "output", "progress",
    "select", "textarea", "details", "dialog", "menu", "menuitem", "summary", "content",
    "element", "shadow", "template",
];

/// Check if a tag is written without an end tag when empty.
pub fn is_single_tag(tag: &str) -> bool {
    SINGLE_TAGS.contains(&tag)
}

/// Check if an attribute is a boolean HTML attribute.
pub fn is_boolean_attr(name: &str) -> bool {
    BOOLEAN_ATTRS.contains(&name)
}

/// Check if an attribute is always written without a value.
pub fn is_no_value_attr(name: &str) -> bool {
    NO_VALUE_ATTRS.contains(&name)
}

/// Check if a tag is an HTML element.
pub fn is_html_tag(tag: &str) -> bool {
    HTML_TAGS.contains(&tag)
}

/// Whether an empty value on `name` means presence on `tag`.
pub fn is_boolean_pair(tag: &str, name: &str) -> bool {
    is_html_tag(tag) && is_boolean_attr(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_pairs() {
        assert!(is_boolean_pair("input", "disabled"));
        assert!(!is_boolean_pair("my-input", "disabled"));
        assert!(!is_boolean_pair("input", "title"));
    }

    #[test]
    fn test_single_tags() {
        assert!(is_single_tag("br"));
        assert!(is_single_tag("input"));
        assert!(!is_single_tag("div"));
        assert!(is_no_value_attr("s-else"));
    }
}
