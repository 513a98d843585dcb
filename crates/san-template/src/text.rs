//! Interpolated text and embedded expressions.

use crate::ast::{SanExpr, SanExprKind, TextSegment};
use crate::error::{ErrorCode, ParseError, ParseResult};
use source_map::Span;
use vusa_expression::FilterExpression;

/// Parse an embedded expression.
pub fn parse_expr(code: &str, span: Span) -> ParseResult<Box<FilterExpression>> {
    let code = code.trim();
    vusa_expression::parse(code).map(Box::new).map_err(|err| {
        ParseError::new(
            format!("{} in expression \"{}\"", err.message, code),
            span,
            ErrorCode::InvalidExpression,
        )
    })
}

/// Parse an expression into a [`SanExpr`] keeping its raw text.
pub fn parse_san_expr(code: &str, span: Span) -> ParseResult<SanExpr> {
    Ok(SanExpr::new(
        SanExprKind::Expr {
            expr: parse_expr(code, span)?,
        },
        code,
    ))
}

/// Parse text containing `{{ }}` interpolations.
///
/// Text that is exactly one interpolation yields a plain expression.
pub fn parse_text(text: &str, span: Span) -> ParseResult<SanExpr> {
    let mut segs = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let code_start = open + 2;
        let Some(len) = find_interpolation_end(&rest[code_start..]) else {
            break;
        };
        if open > 0 {
            segs.push(TextSegment::Literal {
                value: rest[..open].to_string(),
            });
        }
        let code = &rest[code_start..code_start + len];
        segs.push(TextSegment::Interp {
            expr: parse_expr(code, span)?,
        });
        rest = &rest[code_start + len + 2..];
    }
    if !rest.is_empty() {
        segs.push(TextSegment::Literal {
            value: rest.to_string(),
        });
    }

    let kind = match segs.as_slice() {
        [TextSegment::Interp { expr }] => SanExprKind::Expr { expr: expr.clone() },
        _ => SanExprKind::Text { segs },
    };
    Ok(SanExpr::new(kind, text))
}

/// Find the `}}` closing an interpolation, skipping braces and quotes
/// inside the expression.
fn find_interpolation_end(code: &str) -> Option<usize> {
    let bytes = code.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
        } else {
            match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' if depth == 0 && bytes.get(i + 1) == Some(&b'}') => return Some(i),
                b'}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        i += 1;
    }

    None
}
