//! Query AST types: `SELECT` and `FOR`.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Expr;

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SortDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the surface representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement of empty sort keys in `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EmptyOrder {
    /// Rows with an empty key come first.
    First,
    /// Rows with an empty key come last.
    Last,
}

impl EmptyOrder {
    /// Returns the surface representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "EMPTY FIRST",
            Self::Last => "EMPTY LAST",
        }
    }
}

impl fmt::Display for EmptyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `ORDER BY` entry.
///
/// The sort key may be any expression, but must produce at most one
/// value per row when evaluated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SortExpr {
    /// The sort key expression.
    pub path: Expr,
    /// The direction (ASC or DESC).
    pub direction: SortDirection,
    /// Placement of empty keys, if specified.
    pub empties: Option<EmptyOrder>,
}

impl SortExpr {
    /// Creates an ascending sort entry.
    #[must_use]
    pub fn asc(path: impl Into<Expr>) -> Self {
        Self {
            path: path.into(),
            direction: SortDirection::Asc,
            empties: None,
        }
    }

    /// Creates a descending sort entry.
    #[must_use]
    pub fn desc(path: impl Into<Expr>) -> Self {
        Self {
            path: path.into(),
            direction: SortDirection::Desc,
            empties: None,
        }
    }

    /// Places rows with empty keys first.
    #[must_use]
    pub fn empties_first(mut self) -> Self {
        self.empties = Some(EmptyOrder::First);
        self
    }

    /// Places rows with empty keys last.
    #[must_use]
    pub fn empties_last(mut self) -> Self {
        self.empties = Some(EmptyOrder::Last);
        self
    }
}

/// A `WITH` alias binding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AliasedExpr {
    /// The alias name.
    pub alias: String,
    /// The bound expression.
    pub expr: Expr,
}

/// A `SELECT` query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectQuery {
    /// `WITH` alias bindings, in declaration order. Each alias is in
    /// scope for the aliases declared after it.
    pub aliases: Vec<AliasedExpr>,
    /// An alias for the result itself (`SELECT x := ...`), addressable
    /// from the clauses.
    pub result_alias: Option<String>,
    /// The result expression.
    pub result: Expr,
    /// The `FILTER` clause.
    pub filter: Option<Expr>,
    /// `ORDER BY` entries, outermost first.
    pub order_by: Vec<SortExpr>,
    /// The `OFFSET` clause (must evaluate to a single integer).
    pub offset: Option<Expr>,
    /// The `LIMIT` clause (must evaluate to a single integer).
    pub limit: Option<Expr>,
}

impl SelectQuery {
    /// Creates a `SELECT` over the given result expression, with no
    /// clauses.
    #[must_use]
    pub fn new(result: impl Into<Expr>) -> Self {
        Self {
            aliases: Vec::new(),
            result_alias: None,
            result: result.into(),
            filter: None,
            order_by: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    /// Adds a `WITH` alias binding.
    #[must_use]
    pub fn with(mut self, alias: impl Into<String>, expr: impl Into<Expr>) -> Self {
        self.aliases.push(AliasedExpr {
            alias: alias.into(),
            expr: expr.into(),
        });
        self
    }

    /// Names the result (`SELECT name := ...`).
    #[must_use]
    pub fn result_alias(mut self, name: impl Into<String>) -> Self {
        self.result_alias = Some(name.into());
        self
    }

    /// Sets the `FILTER` clause.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<Expr>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Appends an `ORDER BY` entry.
    #[must_use]
    pub fn order_by(mut self, sort: SortExpr) -> Self {
        self.order_by.push(sort);
        self
    }

    /// Sets the `OFFSET` clause.
    #[must_use]
    pub fn offset(mut self, offset: impl Into<Expr>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    /// Sets the `LIMIT` clause.
    #[must_use]
    pub fn limit(mut self, limit: impl Into<Expr>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Wraps the query into an expression node.
    #[must_use]
    pub fn into_expr(self) -> Expr {
        Expr::Select(Box::new(self))
    }
}

impl From<SelectQuery> for Expr {
    fn from(query: SelectQuery) -> Self {
        Self::Select(Box::new(query))
    }
}

/// A `FOR name IN iterator UNION result` query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForQuery {
    /// The iterator variable name.
    pub iterator_alias: String,
    /// The iterated expression.
    pub iterator: Expr,
    /// The per-element result expression.
    pub result: Expr,
}

impl ForQuery {
    /// Creates a `FOR` query.
    #[must_use]
    pub fn new(
        iterator_alias: impl Into<String>,
        iterator: impl Into<Expr>,
        result: impl Into<Expr>,
    ) -> Self {
        Self {
            iterator_alias: iterator_alias.into(),
            iterator: iterator.into(),
            result: result.into(),
        }
    }

    /// Wraps the query into an expression node.
    #[must_use]
    pub fn into_expr(self) -> Expr {
        Expr::For(Box::new(self))
    }
}

impl From<ForQuery> for Expr {
    fn from(query: ForQuery) -> Self {
        Self::For(Box::new(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathExpr;

    #[test]
    fn select_builder() {
        let q = SelectQuery::new(PathExpr::object("Person").ptr("name"))
            .filter(Expr::boolean(true))
            .order_by(SortExpr::asc(PathExpr::partial().ptr("name")).empties_last())
            .offset(Expr::integer(1))
            .limit(Expr::integer(10));
        assert!(q.filter.is_some());
        assert_eq!(q.order_by.len(), 1);
        assert_eq!(q.order_by[0].empties, Some(EmptyOrder::Last));
        assert!(q.offset.is_some() && q.limit.is_some());
    }

    #[test]
    fn with_aliases_preserve_order() {
        let q = SelectQuery::new(Expr::integer(1))
            .with("a", Expr::integer(1))
            .with("b", Expr::integer(2));
        assert_eq!(q.aliases[0].alias, "a");
        assert_eq!(q.aliases[1].alias, "b");
    }

    #[test]
    fn for_query_builder() {
        let q = ForQuery::new(
            "x",
            Expr::set(vec![Expr::integer(1), Expr::integer(2)]),
            PathExpr::object("x").into_expr(),
        );
        assert_eq!(q.iterator_alias, "x");
        assert!(matches!(q.into_expr(), Expr::For(_)));
    }
}
