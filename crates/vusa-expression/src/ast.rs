//! AST types for template expressions.
//!
//! The root of every parse is a [`FilterExpression`]: a base expression
//! followed by zero or more `| filter(args)` applications. Nodes carry the
//! source [`Location`] they were parsed from; locations are diagnostic-only
//! and are not serialized.

use smol_str::SmolStr;
use source_map::Location;
use std::fmt;

/// A template expression with its (possibly empty) filter chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterExpression {
    /// The base expression.
    pub expression: Expr,
    /// Filters applied left to right.
    pub filters: Vec<Filter>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// A single `| name(args)` application.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Filter {
    /// The filter name.
    pub name: SmolStr,
    /// Arguments passed after the piped value.
    pub arguments: Vec<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    Identifier(Identifier),
    Literal(Literal),
    Array(ArrayExpr),
    Object(ObjectExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Logical(LogicalExpr),
    Conditional(ConditionalExpr),
    Member(MemberExpr),
    Call(CallExpr),
    Template(TemplateExpr),
}

impl Expr {
    /// Get the location of this node.
    pub fn location(&self) -> Location {
        match self {
            Self::Identifier(n) => n.location,
            Self::Literal(n) => n.location,
            Self::Array(n) => n.location,
            Self::Object(n) => n.location,
            Self::Unary(n) => n.location,
            Self::Binary(n) => n.location,
            Self::Logical(n) => n.location,
            Self::Conditional(n) => n.location,
            Self::Member(n) => n.location,
            Self::Call(n) => n.location,
            Self::Template(n) => n.location,
        }
    }

    /// Get the kind tag of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Identifier(_) => NodeKind::Identifier,
            Self::Literal(_) => NodeKind::Literal,
            Self::Array(_) => NodeKind::ArrayExpression,
            Self::Object(_) => NodeKind::ObjectExpression,
            Self::Unary(_) => NodeKind::UnaryExpression,
            Self::Binary(_) => NodeKind::BinaryExpression,
            Self::Logical(_) => NodeKind::LogicalExpression,
            Self::Conditional(_) => NodeKind::ConditionalExpression,
            Self::Member(_) => NodeKind::MemberExpression,
            Self::Call(_) => NodeKind::CallExpression,
            Self::Template(_) => NodeKind::TemplateExpression,
        }
    }

    /// Check if this is an identifier.
    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }
}

/// Kind tags for every node shape, including the non-`Expr` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Identifier,
    Literal,
    ArrayExpression,
    ObjectExpression,
    Property,
    UnaryExpression,
    BinaryExpression,
    LogicalExpression,
    ConditionalExpression,
    MemberExpression,
    CallExpression,
    TemplateExpression,
    VueExpression,
    VueFilter,
}

impl NodeKind {
    /// Get the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "Identifier",
            Self::Literal => "Literal",
            Self::ArrayExpression => "ArrayExpression",
            Self::ObjectExpression => "ObjectExpression",
            Self::Property => "Property",
            Self::UnaryExpression => "UnaryExpression",
            Self::BinaryExpression => "BinaryExpression",
            Self::LogicalExpression => "LogicalExpression",
            Self::ConditionalExpression => "ConditionalExpression",
            Self::MemberExpression => "MemberExpression",
            Self::CallExpression => "CallExpression",
            Self::TemplateExpression => "TemplateExpression",
            Self::VueExpression => "VueExpression",
            Self::VueFilter => "VueFilter",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identifier reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier {
    pub name: SmolStr,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    pub value: LiteralValue,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// The value of a literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
}

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// `{ a: 1, [b]: 2 }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectExpr {
    pub properties: Vec<Property>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

impl ObjectExpr {
    /// Check if any property uses a computed key.
    pub fn has_computed(&self) -> bool {
        self.properties.iter().any(|p| p.computed)
    }
}

/// A key/value entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    pub key: Box<Expr>,
    pub value: Expr,
    /// `[key]: value`
    pub computed: bool,
    /// `{ key }`
    pub shorthand: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// A prefix operator application.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnaryExpr {
    pub operator: UnaryOperator,
    pub argument: Box<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// A binary (non-logical) operator application.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryExpr {
    pub operator: BinaryOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// A short-circuiting operator application.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalExpr {
    pub operator: LogicalOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// `test ? consequent : alternate`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalExpr {
    pub test: Box<Expr>,
    pub consequent: Box<Expr>,
    pub alternate: Box<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// `object.property` or `object[property]`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: Box<Expr>,
    pub computed: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// `callee(arguments)`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// A template string; static chunks appear as string literals.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateExpr {
    pub expressions: Vec<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub location: Location,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    BitNot,
    Typeof,
    Void,
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::Typeof => "typeof",
            Self::Void => "void",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    In,
    Instanceof,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Exp => "**",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::In => "in",
            Self::Instanceof => "instanceof",
        }
    }

    /// `==`, `===`, `!=` and `!==`.
    pub fn is_equality(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::StrictEq | Self::StrictNotEq
        )
    }
}

/// Short-circuiting operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicalOperator {
    And,
    Or,
    Nullish,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Nullish => "??",
        }
    }
}
