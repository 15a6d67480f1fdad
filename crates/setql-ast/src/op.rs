//! Operator enums.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Binary operators.
///
/// The ternary `IF .. ELSE` conditional is not listed here; it has its
/// own [`Expr::IfElse`](crate::Expr::IfElse) node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Optional comparison (defined on empty operands)
    OptEq,
    OptNotEq,

    // Logical
    And,
    Or,

    // Set and string
    Concat,
    In,
    Coalesce,
    Union,
}

impl BinaryOp {
    /// Returns the surface representation of the operator.
    ///
    /// This is also the operator's key in the evaluator's builtins table.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::OptEq => "?=",
            Self::OptNotEq => "?!=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "++",
            Self::In => "IN",
            Self::Coalesce => "??",
            Self::Union => "UNION",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Identity (+)
    Pos,
    /// Logical NOT
    Not,
    /// EXISTS — non-emptiness of the operand set
    Exists,
    /// DISTINCT — in-order deduplication of the operand set
    Distinct,
}

impl UnaryOp {
    /// Returns the surface representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
            Self::Not => "NOT",
            Self::Exists => "EXISTS",
            Self::Distinct => "DISTINCT",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
