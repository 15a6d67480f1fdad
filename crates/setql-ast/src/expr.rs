//! Expression AST types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::op::{BinaryOp, UnaryOp};
use crate::path::PathExpr;
use crate::query::{ForQuery, SelectQuery};

/// An integer literal, as produced by a parser: an unsigned magnitude
/// plus an explicit sign flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegerLiteral {
    /// The literal magnitude.
    pub value: i64,
    /// Whether a leading `-` was attached to the literal.
    pub negative: bool,
}

impl IntegerLiteral {
    /// Returns the signed value the literal denotes.
    #[must_use]
    pub const fn signed(&self) -> i64 {
        if self.negative { -self.value } else { self.value }
    }
}

/// A float literal with an explicit sign flag.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloatLiteral {
    /// The literal magnitude.
    pub value: f64,
    /// Whether a leading `-` was attached to the literal.
    pub negative: bool,
}

impl FloatLiteral {
    /// Returns the signed value the literal denotes.
    #[must_use]
    pub fn signed(&self) -> f64 {
        if self.negative { -self.value } else { self.value }
    }
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionCall {
    /// The function name.
    pub name: String,
    /// The arguments.
    pub args: Vec<Expr>,
}

/// One `name := value` element of a named tuple constructor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedTupleElement {
    /// The element name.
    pub name: String,
    /// The element value.
    pub val: Expr,
}

/// A SetQL expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// An integer literal.
    Integer(IntegerLiteral),

    /// A float literal.
    Float(FloatLiteral),

    /// A string literal.
    String(String),

    /// A boolean literal.
    Boolean(bool),

    /// A set constructor `{e1, e2, ...}`.
    Set(Vec<Expr>),

    /// A tuple constructor `(e1, e2, ...)`.
    Tuple(Vec<Expr>),

    /// A named tuple constructor `(a := e1, b := e2)`.
    NamedTuple(Vec<NamedTupleElement>),

    /// A type cast `<ty>expr`.
    TypeCast {
        /// The target type name.
        ty: String,
        /// The expression to cast.
        expr: Box<Expr>,
    },

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A function call.
    Function(FunctionCall),

    /// A conditional `if_expr IF condition ELSE else_expr`.
    IfElse {
        /// The value when the condition holds.
        if_expr: Box<Expr>,
        /// The condition.
        condition: Box<Expr>,
        /// The value when the condition does not hold.
        else_expr: Box<Expr>,
    },

    /// A path expression.
    Path(PathExpr),

    /// A nested `SELECT` query.
    Select(Box<SelectQuery>),

    /// A nested `FOR` query.
    For(Box<ForQuery>),

    /// A query parameter placeholder (`$name`). Parsed but not
    /// evaluated.
    Parameter(String),
}

impl Expr {
    /// Creates an integer literal.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::Integer(IntegerLiteral {
            value,
            negative: false,
        })
    }

    /// Creates a float literal.
    #[must_use]
    pub const fn float(value: f64) -> Self {
        Self::Float(FloatLiteral {
            value,
            negative: false,
        })
    }

    /// Creates a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Creates a boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Boolean(value)
    }

    /// Creates a set constructor.
    #[must_use]
    pub fn set(elements: Vec<Self>) -> Self {
        Self::Set(elements)
    }

    /// Creates the empty set constructor `{}`.
    #[must_use]
    pub const fn empty_set() -> Self {
        Self::Set(Vec::new())
    }

    /// Creates a tuple constructor.
    #[must_use]
    pub fn tuple(elements: Vec<Self>) -> Self {
        Self::Tuple(elements)
    }

    /// Creates a named tuple constructor from `(name, value)` pairs.
    #[must_use]
    pub fn named_tuple<N: Into<String>>(elements: Vec<(N, Self)>) -> Self {
        Self::NamedTuple(
            elements
                .into_iter()
                .map(|(name, val)| NamedTupleElement {
                    name: name.into(),
                    val,
                })
                .collect(),
        )
    }

    /// Creates a function call.
    #[must_use]
    pub fn call(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Function(FunctionCall {
            name: name.into(),
            args,
        })
    }

    /// Creates a type cast.
    #[must_use]
    pub fn cast(ty: impl Into<String>, expr: Self) -> Self {
        Self::TypeCast {
            ty: ty.into(),
            expr: Box::new(expr),
        }
    }

    /// Creates a unary expression.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Creates an `EXISTS` expression.
    #[must_use]
    pub fn exists(operand: Self) -> Self {
        Self::unary(UnaryOp::Exists, operand)
    }

    /// Creates a `DISTINCT` expression.
    #[must_use]
    pub fn distinct(operand: Self) -> Self {
        Self::unary(UnaryOp::Distinct, operand)
    }

    /// Creates a `NOT` expression.
    #[must_use]
    pub fn not(operand: Self) -> Self {
        Self::unary(UnaryOp::Not, operand)
    }

    /// Creates an arithmetic negation.
    #[must_use]
    pub fn neg(operand: Self) -> Self {
        Self::unary(UnaryOp::Neg, operand)
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// Creates an addition expression.
    #[must_use]
    pub fn add(self, right: Self) -> Self {
        self.binary(BinaryOp::Add, right)
    }

    /// Creates a subtraction expression.
    #[must_use]
    pub fn sub(self, right: Self) -> Self {
        self.binary(BinaryOp::Sub, right)
    }

    /// Creates a multiplication expression.
    #[must_use]
    pub fn mul(self, right: Self) -> Self {
        self.binary(BinaryOp::Mul, right)
    }

    /// Creates a division expression.
    #[must_use]
    pub fn div(self, right: Self) -> Self {
        self.binary(BinaryOp::Div, right)
    }

    /// Creates a concatenation expression.
    #[must_use]
    pub fn concat(self, right: Self) -> Self {
        self.binary(BinaryOp::Concat, right)
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, right: Self) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn not_eq(self, right: Self) -> Self {
        self.binary(BinaryOp::NotEq, right)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt(self, right: Self) -> Self {
        self.binary(BinaryOp::Lt, right)
    }

    /// Creates a less-than-or-equal expression.
    #[must_use]
    pub fn lt_eq(self, right: Self) -> Self {
        self.binary(BinaryOp::LtEq, right)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt(self, right: Self) -> Self {
        self.binary(BinaryOp::Gt, right)
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gt_eq(self, right: Self) -> Self {
        self.binary(BinaryOp::GtEq, right)
    }

    /// Creates an optional equality expression (`?=`).
    #[must_use]
    pub fn opt_eq(self, right: Self) -> Self {
        self.binary(BinaryOp::OptEq, right)
    }

    /// Creates an optional inequality expression (`?!=`).
    #[must_use]
    pub fn opt_not_eq(self, right: Self) -> Self {
        self.binary(BinaryOp::OptNotEq, right)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    /// Creates a membership test (`IN`).
    #[must_use]
    pub fn is_in(self, right: Self) -> Self {
        self.binary(BinaryOp::In, right)
    }

    /// Creates a coalescing expression (`??`).
    #[must_use]
    pub fn coalesce(self, right: Self) -> Self {
        self.binary(BinaryOp::Coalesce, right)
    }

    /// Creates a `UNION` expression.
    #[must_use]
    pub fn union(self, right: Self) -> Self {
        self.binary(BinaryOp::Union, right)
    }

    /// Creates an `IF .. ELSE` conditional with `self` as the
    /// then-branch.
    #[must_use]
    pub fn if_else(self, condition: Self, else_expr: Self) -> Self {
        Self::IfElse {
            if_expr: Box::new(self),
            condition: Box::new(condition),
            else_expr: Box::new(else_expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_builders() {
        assert!(matches!(
            Expr::integer(42),
            Expr::Integer(IntegerLiteral {
                value: 42,
                negative: false
            })
        ));
        assert!(matches!(Expr::boolean(true), Expr::Boolean(true)));
    }

    #[test]
    fn negative_literal_sign() {
        let lit = IntegerLiteral {
            value: 7,
            negative: true,
        };
        assert_eq!(lit.signed(), -7);
        let f = FloatLiteral {
            value: 1.5,
            negative: true,
        };
        assert_eq!(f.signed(), -1.5);
    }

    #[test]
    fn expr_chaining() {
        let expr = Expr::integer(1)
            .add(Expr::integer(2))
            .eq(Expr::integer(3))
            .and(Expr::boolean(true));
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn call_and_cast() {
        let c = Expr::call("count", vec![Expr::set(vec![Expr::integer(1)])]);
        assert!(matches!(&c, Expr::Function(f) if f.name == "count" && f.args.len() == 1));

        let t = Expr::cast("int64", Expr::string("12"));
        assert!(matches!(&t, Expr::TypeCast { ty, .. } if ty == "int64"));
    }
}
