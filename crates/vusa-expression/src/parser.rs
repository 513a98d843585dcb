//! Parser for template expressions.
//!
//! A Pratt parser over the token stream produced by [`crate::lexer`]. The
//! `|` token is a filter pipe at the top level and bitwise-or anywhere
//! inside parentheses, brackets, braces or template interpolations.

use crate::ast::*;
use crate::error::{ErrorCode, ParseError, ParseResult};
use crate::lexer::{tokenize, unescape_str, SpannedToken, Token};
use smol_str::SmolStr;
use source_map::{LineIndex, Location, Span};

/// Parse an expression with an optional filter chain.
pub fn parse_filter_expression(source: &str) -> ParseResult<FilterExpression> {
    let index = LineIndex::new(source);
    let mut parser = ExpressionParser::new(source, &index, 0, source.len() as u32, 0)?;
    let result = parser.parse_filter_expression()?;
    parser.expect_eof()?;
    Ok(result)
}

/// Parse a plain expression; a top-level `|` is bitwise-or.
pub fn parse_expression(source: &str) -> ParseResult<Expr> {
    let index = LineIndex::new(source);
    let mut parser = ExpressionParser::new(source, &index, 0, source.len() as u32, 1)?;
    let result = parser.parse_expr()?;
    parser.expect_eof()?;
    Ok(result)
}

/// Binary or logical operator found in infix position.
#[derive(Debug, Clone, Copy)]
enum InfixOp {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

struct ExpressionParser<'a> {
    source: &'a str,
    index: &'a LineIndex,
    tokens: Vec<SpannedToken>,
    pos: usize,
    /// Nesting depth of brackets; filters are only recognized at zero.
    depth: u32,
    end: u32,
}

impl<'a> ExpressionParser<'a> {
    /// Create a parser for `source[start..end]`.
    fn new(
        source: &'a str,
        index: &'a LineIndex,
        start: u32,
        end: u32,
        depth: u32,
    ) -> ParseResult<Self> {
        let text = Span::new(start, end).slice(source);
        Ok(Self {
            source,
            index,
            tokens: tokenize(text, start)?,
            pos: 0,
            depth,
            end,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| *s)
            .unwrap_or(Span::empty(self.end))
    }

    fn bump(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn location(&self, span: Span) -> Location {
        self.index.location(span)
    }

    fn error_here(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some((token, span)) => ParseError::unexpected_token(expected, &token.describe(), *span),
            None => ParseError::unexpected_eof(expected, Span::empty(self.end)),
        }
    }

    /// Consume `token` or fail, returning its span.
    fn expect(&mut self, token: &Token, expected: &str) -> ParseResult<Span> {
        if self.at(token) {
            let span = self.peek_span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.error_here(expected))
        }
    }

    fn expect_eof(&self) -> ParseResult<()> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some((token, span)) => Err(ParseError::new(
                format!("Unexpected {}", token.describe()),
                *span,
                ErrorCode::UnexpectedToken,
            )),
        }
    }

    fn parse_filter_expression(&mut self) -> ParseResult<FilterExpression> {
        let expression = self.parse_expr()?;
        let mut filters = Vec::new();

        while self.at(&Token::Pipe) {
            let pipe = self.peek_span();
            self.pos += 1;
            let (name, name_span) = match self.bump() {
                Some((Token::Ident(name), span)) => (name, span),
                Some((token, span)) => {
                    return Err(ParseError::unexpected_token(
                        "filter name",
                        &token.describe(),
                        span,
                    ))
                }
                None => return Err(ParseError::unexpected_eof("filter name", Span::empty(self.end))),
            };
            let mut end = name_span.end;
            let mut arguments = Vec::new();
            if self.at(&Token::LParen) {
                let (args, close) = self.parse_arguments()?;
                arguments = args;
                end = close.end;
            }
            filters.push(Filter {
                name,
                arguments,
                location: self.location(Span::new(pipe.start, end)),
            });
        }

        let start = expression.location().start.offset;
        let end = filters
            .last()
            .map(|f| f.location.end.offset)
            .unwrap_or(expression.location().end.offset);
        Ok(FilterExpression {
            expression,
            filters,
            location: self.location(Span::new(start, end)),
        })
    }

    /// Parse a full expression (conditional level).
    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let test = self.parse_binary(0)?;
        if !self.eat(&Token::Question) {
            return Ok(test);
        }

        let consequent = self.parse_expr()?;
        self.expect(&Token::Colon, "\":\"")?;
        let alternate = self.parse_expr()?;
        let span = test.location().span().merge(alternate.location().span());
        Ok(Expr::Conditional(ConditionalExpr {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            location: self.location(span),
        }))
    }

    /// The operator at the cursor with its left and right binding powers.
    fn peek_infix(&self) -> Option<(InfixOp, u8, u8)> {
        use BinaryOperator as B;
        use InfixOp::{Binary, Logical};

        let info = match self.peek()? {
            Token::PipePipe => (Logical(LogicalOperator::Or), 1, 2),
            Token::QuestionQuestion => (Logical(LogicalOperator::Nullish), 1, 2),
            Token::AmpAmp => (Logical(LogicalOperator::And), 3, 4),
            Token::Pipe if self.depth > 0 => (Binary(B::BitOr), 5, 6),
            Token::Caret => (Binary(B::BitXor), 7, 8),
            Token::Amp => (Binary(B::BitAnd), 9, 10),
            Token::EqEq => (Binary(B::Eq), 11, 12),
            Token::NotEq => (Binary(B::NotEq), 11, 12),
            Token::EqEqEq => (Binary(B::StrictEq), 11, 12),
            Token::NotEqEq => (Binary(B::StrictNotEq), 11, 12),
            Token::Lt => (Binary(B::Lt), 13, 14),
            Token::Gt => (Binary(B::Gt), 13, 14),
            Token::LtEq => (Binary(B::LtEq), 13, 14),
            Token::GtEq => (Binary(B::GtEq), 13, 14),
            Token::In => (Binary(B::In), 13, 14),
            Token::Instanceof => (Binary(B::Instanceof), 13, 14),
            Token::Shl => (Binary(B::Shl), 15, 16),
            Token::Shr => (Binary(B::Shr), 15, 16),
            Token::UShr => (Binary(B::UShr), 15, 16),
            Token::Plus => (Binary(B::Add), 17, 18),
            Token::Minus => (Binary(B::Sub), 17, 18),
            Token::Star => (Binary(B::Mul), 19, 20),
            Token::Slash => (Binary(B::Div), 19, 20),
            Token::Percent => (Binary(B::Rem), 19, 20),
            Token::StarStar => (Binary(B::Exp), 22, 21),
            _ => return None,
        };
        Some(info)
    }

    fn parse_binary(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        while let Some((op, lbp, rbp)) = self.peek_infix() {
            if lbp < min_bp {
                break;
            }
            self.pos += 1;
            let right = self.parse_binary(rbp)?;
            let location = self.location(left.location().span().merge(right.location().span()));
            let (left_box, right_box) = (Box::new(left), Box::new(right));
            left = match op {
                InfixOp::Binary(operator) => Expr::Binary(BinaryExpr {
                    operator,
                    left: left_box,
                    right: right_box,
                    location,
                }),
                InfixOp::Logical(operator) => Expr::Logical(LogicalExpr {
                    operator,
                    left: left_box,
                    right: right_box,
                    location,
                }),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let operator = match self.peek() {
            Some(Token::Plus) => UnaryOperator::Plus,
            Some(Token::Minus) => UnaryOperator::Minus,
            Some(Token::Bang) => UnaryOperator::Not,
            Some(Token::Tilde) => UnaryOperator::BitNot,
            Some(Token::Typeof) => UnaryOperator::Typeof,
            Some(Token::Void) => UnaryOperator::Void,
            _ => return self.parse_postfix(),
        };
        let start = self.peek_span();
        self.pos += 1;
        let argument = self.parse_unary()?;
        let span = start.merge(argument.location().span());
        Ok(Expr::Unary(UnaryExpr {
            operator,
            argument: Box::new(argument),
            location: self.location(span),
        }))
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            let start = expr.location().span();
            match self.peek() {
                Some(Token::Dot) => {
                    self.pos += 1;
                    let (name, span) = match self.bump() {
                        Some((Token::Ident(name), span)) => (name, span),
                        Some((token, span)) => match token.keyword_text() {
                            Some(kw) => (SmolStr::new(kw), span),
                            None => {
                                return Err(ParseError::unexpected_token(
                                    "property name",
                                    &token.describe(),
                                    span,
                                ))
                            }
                        },
                        None => {
                            return Err(ParseError::unexpected_eof(
                                "property name",
                                Span::empty(self.end),
                            ))
                        }
                    };
                    let property = Expr::Identifier(Identifier {
                        name,
                        location: self.location(span),
                    });
                    expr = Expr::Member(MemberExpr {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: false,
                        location: self.location(start.merge(span)),
                    });
                }
                Some(Token::LBracket) => {
                    self.pos += 1;
                    self.depth += 1;
                    let property = self.parse_expr()?;
                    let close = self.expect(&Token::RBracket, "\"]\"")?;
                    self.depth -= 1;
                    expr = Expr::Member(MemberExpr {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: true,
                        location: self.location(start.merge(close)),
                    });
                }
                Some(Token::LParen) => {
                    let (arguments, close) = self.parse_arguments()?;
                    expr = Expr::Call(CallExpr {
                        callee: Box::new(expr),
                        arguments,
                        location: self.location(start.merge(close)),
                    });
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Parse `( a, b, ... )`, returning the arguments and the closing span.
    fn parse_arguments(&mut self) -> ParseResult<(Vec<Expr>, Span)> {
        self.expect(&Token::LParen, "\"(\"")?;
        self.depth += 1;
        let mut arguments = Vec::new();
        while !self.at(&Token::RParen) {
            arguments.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        let close = self.expect(&Token::RParen, "\")\"")?;
        self.depth -= 1;
        Ok((arguments, close))
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some((token, span)) = self.bump() else {
            return Err(ParseError::unexpected_eof("expression", Span::empty(self.end)));
        };

        let location = self.location(span);
        let literal = |value| Literal { value, location };

        let expr = match token {
            Token::Ident(name) => Expr::Identifier(Identifier { name, location }),
            Token::Number(n) => Expr::Literal(literal(LiteralValue::Number(n))),
            Token::String(s) => Expr::Literal(literal(LiteralValue::String(s))),
            Token::True => Expr::Literal(literal(LiteralValue::Boolean(true))),
            Token::False => Expr::Literal(literal(LiteralValue::Boolean(false))),
            Token::Null => Expr::Literal(literal(LiteralValue::Null)),
            Token::LParen => {
                self.depth += 1;
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen, "\")\"")?;
                self.depth -= 1;
                inner
            }
            Token::LBracket => self.parse_array(span)?,
            Token::LBrace => self.parse_object(span)?,
            Token::Template(raw) => self.parse_template(&raw, span)?,
            other => {
                return Err(ParseError::unexpected_token(
                    "expression",
                    &other.describe(),
                    span,
                ))
            }
        };

        Ok(expr)
    }

    fn parse_array(&mut self, open: Span) -> ParseResult<Expr> {
        self.depth += 1;
        let mut elements = Vec::new();
        while !self.at(&Token::RBracket) {
            elements.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        let close = self.expect(&Token::RBracket, "\"]\"")?;
        self.depth -= 1;
        Ok(Expr::Array(ArrayExpr {
            elements,
            location: self.location(open.merge(close)),
        }))
    }

    fn parse_object(&mut self, open: Span) -> ParseResult<Expr> {
        self.depth += 1;
        let mut properties = Vec::new();
        while !self.at(&Token::RBrace) {
            properties.push(self.parse_property()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        let close = self.expect(&Token::RBrace, "\"}\"")?;
        self.depth -= 1;
        Ok(Expr::Object(ObjectExpr {
            properties,
            location: self.location(open.merge(close)),
        }))
    }

    fn parse_property(&mut self) -> ParseResult<Property> {
        let key_span = self.peek_span();

        if self.eat(&Token::LBracket) {
            let key = self.parse_expr()?;
            self.expect(&Token::RBracket, "\"]\"")?;
            self.expect(&Token::Colon, "\":\"")?;
            let value = self.parse_expr()?;
            let span = key_span.merge(value.location().span());
            return Ok(Property {
                key: Box::new(key),
                value,
                computed: true,
                shorthand: false,
                location: self.location(span),
            });
        }

        let key = match self.bump() {
            Some((Token::Ident(name), _)) => {
                let ident = Expr::Identifier(Identifier {
                    name,
                    location: self.location(key_span),
                });
                if matches!(self.peek(), Some(Token::Comma) | Some(Token::RBrace)) {
                    return Ok(Property {
                        key: Box::new(ident.clone()),
                        value: ident,
                        computed: false,
                        shorthand: true,
                        location: self.location(key_span),
                    });
                }
                ident
            }
            Some((Token::String(s), _)) => Expr::Literal(Literal {
                value: LiteralValue::String(s),
                location: self.location(key_span),
            }),
            Some((Token::Number(n), _)) => Expr::Literal(Literal {
                value: LiteralValue::Number(n),
                location: self.location(key_span),
            }),
            Some((token, span)) => match token.keyword_text() {
                Some(kw) => Expr::Identifier(Identifier {
                    name: SmolStr::new(kw),
                    location: self.location(span),
                }),
                None => {
                    return Err(ParseError::unexpected_token(
                        "property key",
                        &token.describe(),
                        span,
                    ))
                }
            },
            None => return Err(ParseError::unexpected_eof("property key", Span::empty(self.end))),
        };

        self.expect(&Token::Colon, "\":\"")?;
        let value = self.parse_expr()?;
        let span = key_span.merge(value.location().span());
        Ok(Property {
            key: Box::new(key),
            value,
            computed: false,
            shorthand: false,
            location: self.location(span),
        })
    }

    /// Parse a template string whose token covers `span` (backticks included).
    fn parse_template(&mut self, raw: &str, span: Span) -> ParseResult<Expr> {
        let body_start = span.start + 1;
        let mut expressions = Vec::new();

        for part in split_template(raw) {
            match part {
                TemplatePart::Text(start, end) => {
                    let text = &raw[start..end];
                    if text.is_empty() {
                        continue;
                    }
                    let text_span = Span::new(start as u32, end as u32).shift(body_start);
                    expressions.push(Expr::Literal(Literal {
                        value: LiteralValue::String(unescape_str(text)),
                        location: self.location(text_span),
                    }));
                }
                TemplatePart::Interpolation(start, end) => {
                    let mut inner = ExpressionParser::new(
                        self.source,
                        self.index,
                        body_start + start as u32,
                        body_start + end as u32,
                        1,
                    )?;
                    let expr = inner.parse_expr()?;
                    inner.expect_eof()?;
                    expressions.push(expr);
                }
            }
        }

        Ok(Expr::Template(TemplateExpr {
            expressions,
            location: self.location(span),
        }))
    }
}

/// A piece of a template string body, as byte ranges into the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplatePart {
    Text(usize, usize),
    /// The code between `${` and `}`.
    Interpolation(usize, usize),
}

fn split_template(raw: &str) -> Vec<TemplatePart> {
    let bytes = raw.as_bytes();
    let mut parts = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                parts.push(TemplatePart::Text(text_start, i));
                let code_start = i + 2;
                let mut depth = 1usize;
                let mut quote: Option<u8> = None;
                let mut j = code_start;
                while j < bytes.len() {
                    let b = bytes[j];
                    if b == b'\\' {
                        j += 2;
                        continue;
                    }
                    match quote {
                        Some(q) if b == q => quote = None,
                        Some(_) => {}
                        None => match b {
                            b'{' => depth += 1,
                            b'}' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            b'\'' | b'"' => quote = Some(b),
                            _ => {}
                        },
                    }
                    j += 1;
                }
                let code_end = j.min(bytes.len());
                parts.push(TemplatePart::Interpolation(code_start, code_end));
                i = code_end + 1;
                text_start = i.min(bytes.len());
            }
            _ => i += 1,
        }
    }
    parts.push(TemplatePart::Text(text_start.min(bytes.len()), bytes.len()));

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expr(source: &str) -> Expr {
        parse_filter_expression(source).unwrap().expression
    }

    fn ident_name(expr: &Expr) -> &str {
        match expr {
            Expr::Identifier(id) => id.name.as_str(),
            other => panic!("expected identifier, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_identifier() {
        let parsed = parse_filter_expression("message").unwrap();
        assert_eq!(ident_name(&parsed.expression), "message");
        assert!(parsed.filters.is_empty());
        assert_eq!(parsed.location.span(), Span::new(0, 7));
    }

    #[test]
    fn test_precedence() {
        let Expr::Binary(add) = expr("a + b * c") else {
            panic!("expected binary");
        };
        assert_eq!(add.operator, BinaryOperator::Add);
        let Expr::Binary(mul) = add.right.as_ref() else {
            panic!("expected binary");
        };
        assert_eq!(mul.operator, BinaryOperator::Mul);
    }

    #[test]
    fn test_left_associative_subtraction() {
        let Expr::Binary(outer) = expr("a - b - c") else {
            panic!("expected binary");
        };
        assert_eq!(ident_name(&outer.right), "c");
        assert!(matches!(outer.left.as_ref(), Expr::Binary(_)));
    }

    #[test]
    fn test_logical_and_conditional() {
        let Expr::Conditional(cond) = expr("a && b ? 'x' : 'y'") else {
            panic!("expected conditional");
        };
        assert!(matches!(cond.test.as_ref(), Expr::Logical(l) if l.operator == LogicalOperator::And));
        assert_eq!(cond.test.location().span(), Span::new(0, 6));
    }

    #[test]
    fn test_member_and_call() {
        let Expr::Call(call) = expr("user.name.toUpperCase(1, b[0])") else {
            panic!("expected call");
        };
        assert_eq!(call.arguments.len(), 2);
        let Expr::Member(member) = call.callee.as_ref() else {
            panic!("expected member");
        };
        assert_eq!(ident_name(&member.property), "toUpperCase");
        assert!(!member.computed);
        assert!(matches!(&call.arguments[1], Expr::Member(m) if m.computed));
    }

    #[test]
    fn test_keyword_property_names() {
        let Expr::Member(member) = expr("a.in") else {
            panic!("expected member");
        };
        assert_eq!(ident_name(&member.property), "in");
    }

    #[test]
    fn test_object_literal() {
        let Expr::Object(obj) = expr("{ a: 1, 'b-c': x, [d]: 2, e, }") else {
            panic!("expected object");
        };
        assert_eq!(obj.properties.len(), 4);
        assert!(obj.has_computed());
        assert!(obj.properties[2].computed);
        assert!(obj.properties[3].shorthand);
        assert!(matches!(
            obj.properties[1].key.as_ref(),
            Expr::Literal(Literal { value: LiteralValue::String(s), .. }) if s == "b-c"
        ));
    }

    #[test]
    fn test_filters() {
        let parsed = parse_filter_expression("price | currency('$', 2) | upper").unwrap();
        assert_eq!(ident_name(&parsed.expression), "price");
        assert_eq!(parsed.filters.len(), 2);
        assert_eq!(parsed.filters[0].name, "currency");
        assert_eq!(parsed.filters[0].arguments.len(), 2);
        assert_eq!(parsed.filters[1].name, "upper");
        assert!(parsed.filters[1].arguments.is_empty());
    }

    #[test]
    fn test_pipe_in_parens_is_bitwise_or() {
        let parsed = parse_filter_expression("(a | b)").unwrap();
        assert!(parsed.filters.is_empty());
        assert!(matches!(
            parsed.expression,
            Expr::Binary(BinaryExpr { operator: BinaryOperator::BitOr, .. })
        ));
    }

    #[test]
    fn test_template_literal() {
        let Expr::Template(tpl) = expr("`Hello ${ name }!`") else {
            panic!("expected template");
        };
        assert_eq!(tpl.expressions.len(), 3);
        assert!(matches!(
            &tpl.expressions[0],
            Expr::Literal(Literal { value: LiteralValue::String(s), .. }) if s == "Hello "
        ));
        assert_eq!(ident_name(&tpl.expressions[1]), "name");
        assert_eq!(tpl.expressions[1].location().span(), Span::new(10, 14));
    }

    #[test]
    fn test_template_skips_empty_chunks() {
        let Expr::Template(tpl) = expr("`${a}${b}`") else {
            panic!("expected template");
        };
        assert_eq!(tpl.expressions.len(), 2);
    }

    #[test]
    fn test_unary() {
        let Expr::Unary(unary) = expr("!visible") else {
            panic!("expected unary");
        };
        assert_eq!(unary.operator, UnaryOperator::Not);
        assert_eq!(unary.location.span(), Span::new(0, 8));
    }

    #[test]
    fn test_locations_are_one_based() {
        let parsed = parse_filter_expression("a +\n  b").unwrap();
        let Expr::Binary(bin) = parsed.expression else {
            panic!("expected binary");
        };
        let loc = bin.right.location();
        assert_eq!((loc.start.line, loc.start.column), (2, 3));
    }

    #[test]
    fn test_unexpected_token() {
        let err = parse_filter_expression("a +").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedEof);
        assert_eq!(err.span, Span::new(3, 3));

        let err = parse_filter_expression("a b").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedToken);
        assert_eq!(err.span, Span::new(2, 3));
    }

    #[test]
    fn test_unclosed_paren() {
        let err = parse_filter_expression("(a + b").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedEof);
    }

    #[test]
    fn test_plain_expression_has_no_filters() {
        assert!(matches!(
            parse_expression("a | b").unwrap(),
            Expr::Binary(BinaryExpr { operator: BinaryOperator::BitOr, .. })
        ));
    }
}
