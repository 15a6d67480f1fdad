//! Path analysis.
//!
//! Before an expression is evaluated, every path reference in it is
//! collected together with two position flags:
//!
//! - `in_subquery`: the reference sits inside a nested SELECT/FOR or a
//!   `SET OF` argument position, and is re-evaluated as an independent
//!   subquery rather than correlated with its surroundings;
//! - `in_optional`: the reference sits under an `OPTIONAL` argument
//!   position, so its input-tuple column may legitimately be missing.
//!
//! Both flags are saved and restored at every call-argument boundary.

use setql_ast::{Expr, ForQuery, PathStep, SelectQuery};

use crate::builtins::{signature, Cardinality};
use crate::error::Result;
use crate::path::{simplify_path, Path};

/// A collected path reference.
#[derive(Debug)]
struct PathRef {
    path: Path,
    in_optional: bool,
    in_subquery: bool,
}

#[derive(Default)]
struct PathFinder {
    in_optional: bool,
    in_subquery: bool,
    refs: Vec<PathRef>,
}

impl PathFinder {
    fn visit(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Path(path) => {
                self.refs.push(PathRef {
                    path: simplify_path(path)?,
                    in_optional: self.in_optional,
                    in_subquery: self.in_subquery,
                });
                // An expression root is itself a subtree to analyze.
                for step in &path.steps {
                    if let PathStep::Expr(e) = step {
                        self.visit(e)?;
                    }
                }
            }
            Expr::Select(query) => self.visit_select(query)?,
            Expr::For(query) => self.visit_for(query)?,
            Expr::Binary { left, op, right } => {
                self.visit_call(op.as_str(), &[left.as_ref(), right.as_ref()])?;
            }
            Expr::Unary { op, operand } => self.visit_call(op.as_str(), &[operand.as_ref()])?,
            Expr::Function(call) => {
                let args: Vec<&Expr> = call.args.iter().collect();
                self.visit_call(&call.name, &args)?;
            }
            Expr::IfElse {
                if_expr,
                condition,
                else_expr,
            } => self.visit_call(
                "IF",
                &[if_expr.as_ref(), condition.as_ref(), else_expr.as_ref()],
            )?,
            Expr::Set(elements) | Expr::Tuple(elements) => {
                for e in elements {
                    self.visit(e)?;
                }
            }
            Expr::NamedTuple(elements) => {
                for e in elements {
                    self.visit(&e.val)?;
                }
            }
            Expr::TypeCast { expr, .. } => self.visit(expr)?,
            Expr::Integer(_)
            | Expr::Float(_)
            | Expr::String(_)
            | Expr::Boolean(_)
            | Expr::Parameter(_) => {}
        }
        Ok(())
    }

    fn visit_call(&mut self, name: &str, args: &[&Expr]) -> Result<()> {
        let spec = signature(name);
        let saved = (self.in_optional, self.in_subquery);
        for (i, arg) in args.iter().enumerate() {
            match spec.and_then(|s| s.get(i)) {
                // SET OF arguments are subqueries.
                Some(Cardinality::SetOf) => self.in_subquery = true,
                Some(Cardinality::Optional) => self.in_optional = true,
                Some(Cardinality::Singleton) | None => {}
            }
            self.visit(arg)?;
            (self.in_optional, self.in_subquery) = saved;
        }
        Ok(())
    }

    fn visit_select(&mut self, query: &SelectQuery) -> Result<()> {
        let saved = self.in_subquery;
        self.in_subquery = true;
        for alias in &query.aliases {
            self.visit(&alias.expr)?;
        }
        self.visit(&query.result)?;
        if let Some(filter) = &query.filter {
            self.visit(filter)?;
        }
        for sort in &query.order_by {
            self.visit(&sort.path)?;
        }
        if let Some(offset) = &query.offset {
            self.visit(offset)?;
        }
        if let Some(limit) = &query.limit {
            self.visit(limit)?;
        }
        self.in_subquery = saved;
        Ok(())
    }

    fn visit_for(&mut self, query: &ForQuery) -> Result<()> {
        let saved = self.in_subquery;
        self.in_subquery = true;
        self.visit(&query.iterator)?;
        self.visit(&query.result)?;
        self.in_subquery = saved;
        Ok(())
    }
}

/// Which input-tuple columns may hold a missing slot.
///
/// Every prefix of every direct path starts out optional; a prefix
/// stops being optional once it occurs, as the prefix of a direct
/// reference, outside any `OPTIONAL` position.
#[derive(Debug, Default)]
pub(crate) struct OptionalityMap {
    not_optional: Vec<Path>,
}

impl OptionalityMap {
    fn mark_required(&mut self, path: &Path) {
        for prefix in path.prefixes() {
            if !self.not_optional.contains(&prefix) {
                self.not_optional.push(prefix);
            }
        }
    }

    /// Whether the column for `path` may be filled with a missing slot
    /// when the path evaluates to the empty set.
    pub(crate) fn always_optional(&self, path: &Path) -> bool {
        !self.not_optional.contains(path)
    }
}

/// The result of analyzing one expression (plus extra subquery roots).
#[derive(Debug, Default)]
pub(crate) struct Analysis {
    /// Paths referenced directly in the expression, in occurrence order.
    pub direct_paths: Vec<Path>,
    /// Paths referenced only through subquery positions.
    pub subquery_paths: Vec<Path>,
    /// Optionality of direct-path prefixes.
    pub always_optional: OptionalityMap,
}

/// Collects and classifies every path referenced by `expr`. The
/// `extra_subqs` expressions (clauses of an enclosing query) are walked
/// as subqueries of `expr`.
pub(crate) fn analyze_paths(expr: &Expr, extra_subqs: &[&Expr]) -> Result<Analysis> {
    let mut finder = PathFinder::default();
    finder.visit(expr)?;
    finder.in_subquery = true;
    for sub in extra_subqs {
        finder.visit(sub)?;
    }

    let mut analysis = Analysis::default();
    for path_ref in finder.refs {
        if path_ref.in_subquery {
            analysis.subquery_paths.push(path_ref.path);
        } else {
            if !path_ref.in_optional {
                analysis.always_optional.mark_required(&path_ref.path);
            }
            analysis.direct_paths.push(path_ref.path);
        }
    }
    Ok(analysis)
}
