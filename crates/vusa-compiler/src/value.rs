//! Compile-time values for constant folding.
//!
//! Operators follow the coercion rules of the template runtime (JavaScript)
//! for primitive operands: `+` concatenates when either side is a string,
//! relational operators compare strings by code unit and everything else
//! numerically, and `==` applies the loose equality algorithm.

use std::cmp::Ordering;
use std::fmt;
use vusa_expression::{BinaryOperator, LiteralValue, LogicalOperator, UnaryOperator};

/// A primitive value known at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
}

/// The runtime type of a compiled expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Array,
    Object,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&LiteralValue> for Value {
    fn from(value: &LiteralValue) -> Self {
        match value {
            LiteralValue::Number(n) => Value::Number(*n),
            LiteralValue::String(s) => Value::String(s.clone()),
            LiteralValue::Boolean(b) => Value::Boolean(*b),
            LiteralValue::Null => Value::Null,
        }
    }
}

impl Value {
    /// The type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Null => ValueType::Null,
            Value::Undefined => ValueType::Undefined,
        }
    }

    /// Truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Null | Value::Undefined => false,
        }
    }

    /// Numeric conversion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::Null => 0.0,
            Value::Undefined => f64::NAN,
        }
    }

    /// String conversion.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Undefined => "undefined".to_string(),
        }
    }

    /// Apply a unary operator.
    pub fn unary(op: UnaryOperator, value: &Value) -> Option<Value> {
        match op {
            UnaryOperator::Plus => Some(Value::Number(value.to_number())),
            UnaryOperator::Minus => Some(Value::Number(-value.to_number())),
            UnaryOperator::Not => Some(Value::Boolean(!value.is_truthy())),
            _ => None,
        }
    }

    /// Apply a binary operator.
    pub fn binary(op: BinaryOperator, left: &Value, right: &Value) -> Option<Value> {
        use BinaryOperator::*;

        let value = match op {
            Add => match (left, right) {
                (Value::String(_), _) | (_, Value::String(_)) => {
                    Value::String(left.to_js_string() + &right.to_js_string())
                }
                _ => Value::Number(left.to_number() + right.to_number()),
            },
            Sub => Value::Number(left.to_number() - right.to_number()),
            Mul => Value::Number(left.to_number() * right.to_number()),
            Div => Value::Number(left.to_number() / right.to_number()),
            Rem => Value::Number(left.to_number() % right.to_number()),
            Lt => Value::Boolean(compare(left, right) == Some(Ordering::Less)),
            Gt => Value::Boolean(compare(left, right) == Some(Ordering::Greater)),
            LtEq => Value::Boolean(matches!(
                compare(left, right),
                Some(Ordering::Less | Ordering::Equal)
            )),
            GtEq => Value::Boolean(matches!(
                compare(left, right),
                Some(Ordering::Greater | Ordering::Equal)
            )),
            Eq => Value::Boolean(loose_equals(left, right)),
            NotEq => Value::Boolean(!loose_equals(left, right)),
            StrictEq => Value::Boolean(strict_equals(left, right)),
            StrictNotEq => Value::Boolean(!strict_equals(left, right)),
            _ => return None,
        };
        Some(value)
    }

    /// Apply a short-circuiting operator; the result is one of the operands.
    pub fn logical(op: LogicalOperator, left: &Value, right: &Value) -> Option<Value> {
        match op {
            LogicalOperator::And => Some(if left.is_truthy() { right } else { left }.clone()),
            LogicalOperator::Or => Some(if left.is_truthy() { left } else { right }.clone()),
            LogicalOperator::Nullish => None,
        }
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
        _ => false,
    }
}

fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null | Value::Undefined, Value::Null | Value::Undefined) => true,
        (Value::Null | Value::Undefined, _) | (_, Value::Null | Value::Undefined) => false,
        (Value::Boolean(_), _) | (_, Value::Boolean(_)) | (Value::Number(_), Value::String(_))
        | (Value::String(_), Value::Number(_)) => left.to_number() == right.to_number(),
        _ => strict_equals(left, right),
    }
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    let (sign, digits) = match s.as_bytes()[0] {
        b'-' => (-1.0, &s[1..]),
        b'+' => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    if digits.starts_with(['+', '-']) {
        return f64::NAN;
    }
    let radix = match digits.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        // Prefixed literals do not take a sign.
        if sign < 0.0 || s.starts_with('+') {
            return f64::NAN;
        }
        return u64::from_str_radix(&digits[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }
    if digits == "Infinity" {
        return sign * f64::INFINITY;
    }
    let valid = digits
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !valid {
        return f64::NAN;
    }
    digits.parse::<f64>().map(|n| sign * n).unwrap_or(f64::NAN)
}

/// Format a number the way `Number.prototype.toString` does.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // Shortest round-trip digits, as `d.ddde±x`.
    let sci = format!("{:e}", n.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let k = digits.len() as i32;
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let sign = if point - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, (point - 1).abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, (point - 1).abs())
        }
    };

    if n < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn string(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-2.5e-8), "-2.5e-8");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_addition_coercion() {
        assert_eq!(Value::binary(BinaryOperator::Add, &num(1.0), &num(2.0)), Some(num(3.0)));
        assert_eq!(Value::binary(BinaryOperator::Add, &string("a"), &num(1.0)), Some(string("a1")));
        assert_eq!(
            Value::binary(BinaryOperator::Add, &Value::Boolean(true), &Value::Null),
            Some(num(1.0))
        );
        assert_eq!(Value::binary(BinaryOperator::Sub, &string("5"), &num(2.0)), Some(num(3.0)));
    }

    #[test]
    fn test_loose_and_strict_equality() {
        let eq = |l: Value, r: Value| Value::binary(BinaryOperator::Eq, &l, &r);
        assert_eq!(eq(num(1.0), string("1")), Some(Value::Boolean(true)));
        assert_eq!(eq(Value::Boolean(true), string("1")), Some(Value::Boolean(true)));
        assert_eq!(eq(Value::Null, Value::Undefined), Some(Value::Boolean(true)));
        assert_eq!(eq(Value::Null, num(0.0)), Some(Value::Boolean(false)));
        assert_eq!(eq(num(f64::NAN), num(f64::NAN)), Some(Value::Boolean(false)));
        assert_eq!(
            Value::binary(BinaryOperator::StrictEq, &num(1.0), &string("1")),
            Some(Value::Boolean(false))
        );
    }

    #[test]
    fn test_relational() {
        let lt = |l: Value, r: Value| Value::binary(BinaryOperator::Lt, &l, &r);
        assert_eq!(lt(string("10"), string("9")), Some(Value::Boolean(true)));
        assert_eq!(lt(string("10"), num(9.0)), Some(Value::Boolean(false)));
        assert_eq!(lt(string("x"), num(1.0)), Some(Value::Boolean(false)));
    }

    #[test]
    fn test_logical_returns_operand() {
        assert_eq!(
            Value::logical(LogicalOperator::And, &string("a"), &num(0.0)),
            Some(num(0.0))
        );
        assert_eq!(
            Value::logical(LogicalOperator::Or, &string(""), &string("b")),
            Some(string("b"))
        );
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(" 12 "), 12.0);
        assert_eq!(string_to_number("0x1f"), 31.0);
        assert_eq!(string_to_number(""), 0.0);
        assert!(string_to_number("1px").is_nan());
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(string_to_number("-1.5"), -1.5);
        assert!(string_to_number("--1").is_nan());
        assert!(string_to_number("+-1").is_nan());
        assert!(string_to_number("-+Infinity").is_nan());
    }

    #[test]
    fn test_unary() {
        assert_eq!(Value::unary(UnaryOperator::Not, &string("")), Some(Value::Boolean(true)));
        assert_eq!(Value::unary(UnaryOperator::Minus, &string("3")), Some(num(-3.0)));
        assert_eq!(Value::unary(UnaryOperator::Typeof, &num(1.0)), None);
    }
}
