//! Vue expression to San expression compilation.
//!
//! San expressions are a subset of the Vue expression grammar, so most
//! nodes are re-emitted as they are. Sub-expressions whose operands are all
//! literals are folded, template strings become concatenations and object
//! literals with computed keys become calls to the `_ex`/`_ocp` runtime
//! helpers.

use crate::error::{CompileError, CompileResult};
use crate::value::{format_number, Value, ValueType};
use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, MietteDiagnostic};
use source_map::Location;
use vusa_expression::{
    BinaryOperator, Expr, Filter, FilterExpression, LogicalOperator, Property, UnaryOperator,
};
use vusa_template::process::single_quote;

/// Placeholder for the piped value inside a compiled filter application.
pub const FILTER_MARK: &str = "__vusa__filter__mark__";

const UNARY_OPERATORS: &[UnaryOperator] =
    &[UnaryOperator::Plus, UnaryOperator::Minus, UnaryOperator::Not];

const BINARY_OPERATORS: &[BinaryOperator] = &[
    BinaryOperator::Add,
    BinaryOperator::Sub,
    BinaryOperator::Mul,
    BinaryOperator::Div,
    BinaryOperator::Rem,
    BinaryOperator::Gt,
    BinaryOperator::Lt,
    BinaryOperator::GtEq,
    BinaryOperator::LtEq,
    BinaryOperator::Eq,
    BinaryOperator::StrictEq,
    BinaryOperator::NotEq,
    BinaryOperator::StrictNotEq,
];

const LOGICAL_OPERATORS: &[LogicalOperator] = &[LogicalOperator::And, LogicalOperator::Or];

/// The code generated for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct CodegenResult {
    pub code: String,
    pub result_type: Option<ValueType>,
    /// Set when the value is known at compile time.
    pub literal: Option<Value>,
}

impl CodegenResult {
    fn code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            result_type: None,
            literal: None,
        }
    }

    fn typed(code: impl Into<String>, result_type: ValueType) -> Self {
        Self {
            code: code.into(),
            result_type: Some(result_type),
            literal: None,
        }
    }

    fn constant(value: Value) -> Self {
        Self {
            code: emit_value(&value),
            result_type: Some(value.value_type()),
            literal: Some(value),
        }
    }

    /// Whether the value is known at compile time.
    pub fn is_constant(&self) -> bool {
        self.literal.is_some()
    }
}

/// A compiled expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    /// The base expression, without filters. `None` for empty input.
    pub ast: Option<Expr>,
    pub code: String,
    pub result_type: Option<ValueType>,
    pub literal: Option<Value>,
}

impl CompiledExpression {
    /// Whether the value is known at compile time.
    pub fn is_constant(&self) -> bool {
        self.literal.is_some()
    }

    /// Whether the base expression is a plain identifier.
    pub fn is_identifier(&self) -> bool {
        self.ast.as_ref().is_some_and(Expr::is_identifier)
    }

    /// Whether the expression can be the target of a two-way binding.
    pub fn is_assignable(&self) -> bool {
        matches!(self.ast, Some(Expr::Identifier(_) | Expr::Member(_)))
    }
}

/// Compile a Vue expression into San expression source.
///
/// Empty input compiles to empty code.
pub fn compile_expression(source: &str) -> CompileResult<CompiledExpression> {
    if source.trim().is_empty() {
        return Ok(CompiledExpression {
            ast: None,
            code: String::new(),
            result_type: None,
            literal: None,
        });
    }

    let parsed = vusa_expression::parse(source).map_err(|source_err| CompileError::Syntax {
        code: source.to_string(),
        source: source_err,
    })?;
    let result = CodeGen { source }.filter_expression(&parsed)?;

    Ok(CompiledExpression {
        ast: Some(parsed.expression),
        code: result.code,
        result_type: result.result_type,
        literal: result.literal,
    })
}

/// Compile an expression, returning only its code.
pub fn compile_code(source: &str) -> CompileResult<String> {
    compile_expression(source).map(|compiled| compiled.code)
}

/// Parenthesize `code` unless `node` is self-delimiting or an equality test.
pub fn wrap(code: &str, node: &Expr) -> String {
    match node {
        Expr::Array(_)
        | Expr::Object(_)
        | Expr::Call(_)
        | Expr::Member(_)
        | Expr::Template(_)
        | Expr::Unary(_)
        | Expr::Identifier(_)
        | Expr::Literal(_) => code.to_string(),
        Expr::Binary(binary) if binary.operator.is_equality() => code.to_string(),
        _ => format!("({})", code),
    }
}

struct CodeGen<'a> {
    source: &'a str,
}

impl CodeGen<'_> {
    fn error(&self, message: &str, location: Location) -> CompileError {
        let mut text = format!(
            "[vusa expression parser] ({}:{}) : {}",
            location.start.line, location.start.column, message
        );
        let frame = code_frame(self.source, location, message);
        if !frame.is_empty() {
            text.push('\n');
            text.push_str(&frame);
        }
        CompileError::Expression { message: text }
    }

    fn filter_expression(&self, node: &FilterExpression) -> CompileResult<CodegenResult> {
        let base = self.generate(&node.expression)?;
        if node.filters.is_empty() {
            return Ok(base);
        }

        let mut code = base.code;
        for filter in &node.filters {
            code = self.filter(filter)?.replace(FILTER_MARK, &code);
        }
        Ok(CodegenResult::code(code))
    }

    fn filter(&self, filter: &Filter) -> CompileResult<String> {
        let mut code = format!("{} | {}", FILTER_MARK, filter.name);
        if !filter.arguments.is_empty() {
            code.push('(');
            code.push_str(&self.list(&filter.arguments)?.join(", "));
            code.push(')');
        }
        Ok(code)
    }

    fn list(&self, nodes: &[Expr]) -> CompileResult<Vec<String>> {
        nodes
            .iter()
            .map(|node| self.generate(node).map(|r| r.code))
            .collect()
    }

    fn generate(&self, node: &Expr) -> CompileResult<CodegenResult> {
        match node {
            Expr::Identifier(id) => Ok(CodegenResult::code(id.name.as_str())),

            Expr::Literal(literal) => Ok(CodegenResult::constant(Value::from(&literal.value))),

            Expr::Member(member) => {
                let object = self.generate(&member.object)?;
                let object_code = wrap(&object.code, &member.object);
                if member.computed {
                    let property = self.generate(&member.property)?;
                    return Ok(CodegenResult::code(format!(
                        "{}[{}]",
                        object_code, property.code
                    )));
                }

                let name = match member.property.as_ref() {
                    Expr::Identifier(id) => id.name.to_string(),
                    other => self.generate(other)?.code,
                };
                if name == "length" && object.result_type == Some(ValueType::String) {
                    if let Some(Value::String(s)) = &object.literal {
                        let len = s.encode_utf16().count() as f64;
                        return Ok(CodegenResult::constant(Value::Number(len)));
                    }
                    return Ok(CodegenResult::typed(
                        format!("{}.length", object_code),
                        ValueType::Number,
                    ));
                }
                Ok(CodegenResult::code(format!("{}.{}", object_code, name)))
            }

            Expr::Unary(unary) => {
                let argument = self.generate(&unary.argument)?;
                if !UNARY_OPERATORS.contains(&unary.operator) {
                    return Err(self.error(
                        &format!("unknown unary operator \"{}\"", unary.operator.as_str()),
                        unary.location,
                    ));
                }
                if let Some(value) = argument.literal.as_ref() {
                    if let Some(folded) = Value::unary(unary.operator, value) {
                        return Ok(CodegenResult::constant(folded));
                    }
                }
                Ok(CodegenResult::code(join_operator(
                    "",
                    unary.operator.as_str(),
                    &wrap(&argument.code, &unary.argument),
                )))
            }

            Expr::Binary(binary) => {
                let left = self.generate(&binary.left)?;
                let right = self.generate(&binary.right)?;
                if !BINARY_OPERATORS.contains(&binary.operator) {
                    return Err(self.error(
                        &format!("invalid binary operator \"{}\"", binary.operator.as_str()),
                        binary.location,
                    ));
                }
                if let (Some(l), Some(r)) = (&left.literal, &right.literal) {
                    if let Some(folded) = Value::binary(binary.operator, l, r) {
                        return Ok(CodegenResult::constant(folded));
                    }
                }
                Ok(CodegenResult::code(join_operator(
                    &wrap(&left.code, &binary.left),
                    binary.operator.as_str(),
                    &wrap(&right.code, &binary.right),
                )))
            }

            Expr::Logical(logical) => {
                let left = self.generate(&logical.left)?;
                let right = self.generate(&logical.right)?;
                if !LOGICAL_OPERATORS.contains(&logical.operator) {
                    return Err(self.error(
                        &format!("invalid logical operator \"{}\"", logical.operator.as_str()),
                        logical.location,
                    ));
                }
                if let (Some(l), Some(r)) = (&left.literal, &right.literal) {
                    if let Some(folded) = Value::logical(logical.operator, l, r) {
                        return Ok(CodegenResult::constant(folded));
                    }
                }
                Ok(CodegenResult::code(format!(
                    "{}{}{}",
                    wrap(&left.code, &logical.left),
                    logical.operator.as_str(),
                    wrap(&right.code, &logical.right)
                )))
            }

            Expr::Conditional(cond) => {
                let test = self.generate(&cond.test)?;
                let consequent = self.generate(&cond.consequent)?;
                let alternate = self.generate(&cond.alternate)?;
                if let Some(value) = &test.literal {
                    return Ok(if value.is_truthy() { consequent } else { alternate });
                }
                Ok(CodegenResult::code(format!(
                    "{}?{}:{}",
                    wrap(&test.code, &cond.test),
                    wrap(&consequent.code, &cond.consequent),
                    wrap(&alternate.code, &cond.alternate)
                )))
            }

            Expr::Call(call) => {
                let callee = self.generate(&call.callee)?;
                let args = self.list(&call.arguments)?;
                Ok(CodegenResult::code(format!(
                    "{}({})",
                    wrap(&callee.code, &call.callee),
                    args.join(", ")
                )))
            }

            Expr::Template(template) => {
                if template.expressions.is_empty() {
                    return Ok(CodegenResult::constant(Value::String(String::new())));
                }
                let mut parts = Vec::with_capacity(template.expressions.len());
                for part in &template.expressions {
                    parts.push(wrap(&self.generate(part)?.code, part));
                }
                Ok(CodegenResult::typed(
                    format!("({})", parts.join("+")),
                    ValueType::String,
                ))
            }

            Expr::Array(array) => Ok(CodegenResult::typed(
                format!("[{}]", self.list(&array.elements)?.join(", ")),
                ValueType::Array,
            )),

            Expr::Object(object) => {
                let parts = object
                    .properties
                    .iter()
                    .map(|p| self.property(p))
                    .collect::<CompileResult<Vec<_>>>()?;
                if !object.has_computed() {
                    return Ok(CodegenResult::typed(
                        format!("{{{}}}", parts.join(",")),
                        ValueType::Object,
                    ));
                }

                // Runs of static properties become object arguments, runs of
                // computed ones become `_ocp([...])` arguments.
                let mut code = String::from("_ex(");
                let mut prev: Option<bool> = None;
                for (property, part) in object.properties.iter().zip(&parts) {
                    let computed = property.computed;
                    match (prev, computed) {
                        (None, false) => code.push('{'),
                        (None, true) => code.push_str("_ocp(["),
                        (Some(false), true) => code.push_str("},_ocp(["),
                        (Some(true), false) => code.push_str("]),{"),
                        (Some(_), _) => code.push(','),
                    }
                    code.push_str(part);
                    prev = Some(computed);
                }
                code.push_str(if prev == Some(true) { "]))" } else { "})" });
                Ok(CodegenResult::code(code))
            }
        }
    }

    fn property(&self, property: &Property) -> CompileResult<String> {
        let value = self.generate(&property.value)?;
        if property.computed {
            let key = self.generate(&property.key)?;
            return Ok(format!("{{k:{},v:{}}}", key.code, value.code));
        }
        Ok(format!("{}:{}", self.property_key(&property.key)?, value.code))
    }

    fn property_key(&self, key: &Expr) -> CompileResult<String> {
        match key {
            Expr::Identifier(id) => Ok(id.name.to_string()),
            Expr::Literal(literal) => Ok(single_quote(&Value::from(&literal.value).to_js_string())),
            other => Err(self.error(
                &format!("invalid property key type \"{}\"", other.kind()),
                other.location(),
            )),
        }
    }
}

/// Emit a compile-time value as expression source.
fn emit_value(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        Value::String(s) => single_quote(s),
        other => other.to_js_string(),
    }
}

/// Join operands around an operator, keeping `a - -b` from becoming `a--b`.
fn join_operator(left: &str, op: &str, right: &str) -> String {
    let clash = matches!(op, "+" | "-") && right.starts_with(op);
    if clash {
        format!("{}{} {}", left, op, right)
    } else {
        format!("{}{}{}", left, op, right)
    }
}

fn code_frame(source: &str, location: Location, message: &str) -> String {
    let diagnostic = MietteDiagnostic::new(message.to_string())
        .with_label(LabeledSpan::at(location.span().to_range(), "here"));
    let report = miette::Report::new(diagnostic).with_source_code(source.to_string());

    let mut out = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    match handler.render_report(&mut out, &*report) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}
