//! Surface path expressions.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Expr;

/// Pointer traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Follow the pointer from source to target (`.ptr`).
    #[default]
    Forward,
    /// Follow incoming links from target to source (`.<ptr`).
    Backward,
}

impl Direction {
    /// Returns the surface representation of the direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => ">",
            Self::Backward => "<",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a surface path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathStep {
    /// A named object set (a type name, a `WITH` alias, or a `FOR`
    /// iterator variable). Only valid as the first step.
    ObjectRef(String),
    /// A parenthesized expression the path starts from. Only valid as
    /// the first step.
    Expr(Box<Expr>),
    /// A property or link traversal.
    Ptr {
        /// The property or link name.
        name: String,
        /// Traversal direction.
        direction: Direction,
    },
    /// A type intersection (`[IS Type]`).
    TypeIntersection(String),
}

/// A surface path: an optional leading `.` (partial path) followed by a
/// sequence of steps.
///
/// A partial path has no explicit starting set; it is resolved against
/// the implicit subject of the enclosing clause (e.g. the result of the
/// `SELECT` a `FILTER` belongs to).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathExpr {
    /// Whether the path is partial (starts with `.`).
    pub partial: bool,
    /// The path steps, in order.
    pub steps: Vec<PathStep>,
}

impl PathExpr {
    /// Creates a path rooted at a named object set.
    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self {
            partial: false,
            steps: vec![PathStep::ObjectRef(name.into())],
        }
    }

    /// Creates a path rooted at an arbitrary expression.
    #[must_use]
    pub fn from_expr(expr: Expr) -> Self {
        Self {
            partial: false,
            steps: vec![PathStep::Expr(Box::new(expr))],
        }
    }

    /// Creates a partial path (a bare `.` prefix, to be extended with
    /// pointer steps).
    #[must_use]
    pub fn partial() -> Self {
        Self {
            partial: true,
            steps: Vec::new(),
        }
    }

    /// Appends a forward pointer step.
    #[must_use]
    pub fn ptr(mut self, name: impl Into<String>) -> Self {
        self.steps.push(PathStep::Ptr {
            name: name.into(),
            direction: Direction::Forward,
        });
        self
    }

    /// Appends a backward pointer step (`.<name`).
    #[must_use]
    pub fn backlink(mut self, name: impl Into<String>) -> Self {
        self.steps.push(PathStep::Ptr {
            name: name.into(),
            direction: Direction::Backward,
        });
        self
    }

    /// Appends a type intersection step (`[IS name]`).
    #[must_use]
    pub fn intersect(mut self, name: impl Into<String>) -> Self {
        self.steps.push(PathStep::TypeIntersection(name.into()));
        self
    }

    /// Wraps the path into an expression node.
    #[must_use]
    pub fn into_expr(self) -> Expr {
        Expr::Path(self)
    }
}

impl From<PathExpr> for Expr {
    fn from(path: PathExpr) -> Self {
        Self::Path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_steps() {
        let p = PathExpr::object("Person").ptr("notes").ptr("name");
        assert!(!p.partial);
        assert_eq!(p.steps.len(), 3);
        assert!(matches!(&p.steps[0], PathStep::ObjectRef(n) if n == "Person"));
        assert!(matches!(
            &p.steps[2],
            PathStep::Ptr { name, direction: Direction::Forward } if name == "name"
        ));
    }

    #[test]
    fn partial_path() {
        let p = PathExpr::partial().ptr("name");
        assert!(p.partial);
        assert_eq!(p.steps.len(), 1);
    }

    #[test]
    fn backlink_and_intersection() {
        let p = PathExpr::object("Note").backlink("notes").intersect("Person");
        assert!(matches!(
            &p.steps[1],
            PathStep::Ptr { direction: Direction::Backward, .. }
        ));
        assert!(matches!(&p.steps[2], PathStep::TypeIntersection(t) if t == "Person"));
    }
}
