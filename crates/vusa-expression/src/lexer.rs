//! Lexer for template expressions.

use crate::error::{ErrorCode, ParseError, ParseResult};
use logos::{Lexer, Logos};
use smol_str::SmolStr;
use source_map::Span;

/// A lexical token of the expression grammar.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("typeof")]
    Typeof,
    #[token("void")]
    Void,
    #[token("in")]
    In,
    #[token("instanceof")]
    Instanceof,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", |lex| SmolStr::new(lex.slice()))]
    Ident(SmolStr),

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| u64::from_str_radix(&lex.slice()[2..], 16).ok().map(|n| n as f64))]
    Number(f64),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r#"'([^'\\\n]|\\.)*'"#, |lex| unescape(lex.slice()))]
    String(String),

    /// The raw body of a template string, without the backticks.
    #[token("`", lex_template)]
    Template(String),

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    NotEqEq,
    #[token("&")]
    Amp,
    #[token("&&")]
    AmpAmp,
    #[token("|")]
    Pipe,
    #[token("||")]
    PipePipe,
    #[token("??")]
    QuestionQuestion,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token(">>>")]
    UShr,
    #[token("=")]
    Assign,
}

impl Token {
    /// The source text of keyword tokens, which are valid property names.
    pub fn keyword_text(&self) -> Option<&'static str> {
        match self {
            Token::True => Some("true"),
            Token::False => Some("false"),
            Token::Null => Some("null"),
            Token::Typeof => Some("typeof"),
            Token::Void => Some("void"),
            Token::In => Some("in"),
            Token::Instanceof => Some("instanceof"),
            _ => None,
        }
    }

    /// A short human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier \"{}\"", name),
            Token::Number(n) => format!("number {}", n),
            Token::String(_) => "string".to_string(),
            Token::Template(_) => "template string".to_string(),
            other => match other.keyword_text() {
                Some(kw) => format!("\"{}\"", kw),
                None => format!("{:?}", other),
            },
        }
    }
}

/// A token with its byte span in the expression source.
pub type SpannedToken = (Token, Span);

/// Tokenize `source`, shifting every span by `base`.
pub fn tokenize(source: &str, base: u32) -> ParseResult<Vec<SpannedToken>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span()).shift(base);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) if lexer.slice().starts_with('`') => {
                return Err(ParseError::new(
                    "Unterminated template string",
                    span,
                    ErrorCode::Unterminated,
                ));
            }
            Err(()) => return Err(ParseError::invalid_token(lexer.slice(), span)),
        }
    }

    Ok(tokens)
}

/// Consume a template string body up to the closing backtick.
fn lex_template(lex: &mut Lexer<Token>) -> Option<String> {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
            continue;
        }
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
        } else if depth == 0 {
            if b == b'`' {
                lex.bump(i + 1);
                return Some(rest[..i].to_string());
            }
            if b == b'$' && bytes.get(i + 1) == Some(&b'{') {
                depth = 1;
                i += 1;
            }
        } else {
            match b {
                b'{' => depth += 1,
                b'}' => depth -= 1,
                b'\'' | b'"' => quote = Some(b),
                _ => {}
            }
        }
        i += 1;
    }

    None
}

/// Strip the quotes from a string literal and resolve its escapes.
fn unescape(literal: &str) -> Option<String> {
    let inner = &literal[1..literal.len() - 1];
    Some(unescape_str(inner))
}

/// Resolve JavaScript string escapes.
pub fn unescape_str(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&hex),
                }
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&hex),
                }
            }
            // Line continuation
            Some('\n') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source, 0)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_operators_prefer_longest_match() {
        assert_eq!(
            kinds("a === b !== c || d | e"),
            vec![
                Token::Ident("a".into()),
                Token::EqEqEq,
                Token::Ident("b".into()),
                Token::NotEqEq,
                Token::Ident("c".into()),
                Token::PipePipe,
                Token::Ident("d".into()),
                Token::Pipe,
                Token::Ident("e".into()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 2.5 .5 1e3 0x1F"),
            vec![
                Token::Number(1.0),
                Token::Number(2.5),
                Token::Number(0.5),
                Token::Number(1000.0),
                Token::Number(31.0),
            ]
        );
    }

    #[test]
    fn test_strings_are_unescaped() {
        assert_eq!(
            kinds(r#"'it\'s' "a\"b" "A""#),
            vec![
                Token::String("it's".into()),
                Token::String("a\"b".into()),
                Token::String("A".into()),
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("in inx typeof $el"),
            vec![
                Token::In,
                Token::Ident("inx".into()),
                Token::Typeof,
                Token::Ident("$el".into()),
            ]
        );
    }

    #[test]
    fn test_template_string_with_nested_braces() {
        let tokens = tokenize("`a${ {b: 1}.b }c` + d", 0).unwrap();
        assert_eq!(tokens[0].0, Token::Template("a${ {b: 1}.b }c".into()));
        assert_eq!(tokens[0].1, Span::new(0, 17));
        assert_eq!(tokens[1].0, Token::Plus);
    }

    #[test]
    fn test_spans_are_shifted() {
        let tokens = tokenize("ab", 10).unwrap();
        assert_eq!(tokens[0].1, Span::new(10, 12));
    }

    #[test]
    fn test_invalid_token() {
        let err = tokenize("a # b", 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);
        assert_eq!(err.span, Span::new(2, 3));
    }

    #[test]
    fn test_unterminated_template() {
        let err = tokenize("`abc", 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unterminated);
    }
}
