//! The recursive evaluator.
//!
//! Evaluation of an expression proceeds in two phases. First the
//! expression (together with the clauses of its enclosing query, if
//! any) is analyzed and a query input list is built: the path prefixes
//! that must be materialized as input-tuple columns so that correlated
//! references bind consistently. Then the expression is evaluated once
//! per input tuple and the per-tuple results are concatenated.
//!
//! The context is immutable; recursion always produces a fresh context
//! with replaced fields.

use std::cmp::Ordering;

use indexmap::IndexMap;
use tracing::{debug, trace};

use setql_ast::{Direction, EmptyOrder, Expr, ForQuery, SelectQuery, SortDirection, SortExpr};

use crate::analyze::{analyze_paths, OptionalityMap};
use crate::builtins::{self, BuiltinKind, Cardinality};
use crate::db::Database;
use crate::error::{EvalError, Result};
use crate::path::{simplify_path, Path, PathElem};
use crate::qil::make_query_input_list;
use crate::value::{dedup, Obj, Value};

/// One input-tuple cell. A column whose path produced no values under
/// an optional position holds an explicit missing slot; path evaluation
/// against a missing slot yields the empty set.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Present(Value),
    Missing,
}

type Row = Vec<Slot>;

#[derive(Debug, Clone)]
struct EvalContext<'a> {
    /// The paths bound in the input tuple, in column order.
    query_input_list: Vec<Path>,
    /// The current input tuple, parallel to `query_input_list` (plus
    /// any trailing result columns of an enclosing query).
    input_tuple: Row,
    /// Pre-evaluated alias multisets. Aliases shadow type names.
    aliases: IndexMap<String, Vec<Value>>,
    /// The database.
    db: &'a Database,
}

impl EvalContext<'_> {
    fn with_bindings(&self, query_input_list: Vec<Path>, input_tuple: Row) -> Self {
        Self {
            query_input_list,
            input_tuple,
            aliases: self.aliases.clone(),
            db: self.db,
        }
    }
}

/// Evaluates a query against a database and returns the cleaned result
/// multiset.
pub fn evaluate(expr: &Expr, db: &Database) -> Result<Vec<Value>> {
    evaluate_with_aliases(expr, db, IndexMap::new())
}

/// Evaluates a query with a pre-populated alias environment. Aliases
/// shadow type-name lookup in object set references.
pub fn evaluate_with_aliases(
    expr: &Expr,
    db: &Database,
    aliases: IndexMap<String, Vec<Value>>,
) -> Result<Vec<Value>> {
    debug!(objects = db.len(), "evaluating query");
    let ctx = EvalContext {
        query_input_list: Vec::new(),
        input_tuple: Vec::new(),
        aliases,
        db,
    };
    let out = subquery(expr, &ctx)?;
    Ok(out.into_iter().map(Value::cleaned).collect())
}

// ===================================================================
// Subquery driving
// ===================================================================

/// Analyzes `expr`, builds its input tuples, and evaluates it once per
/// tuple. Returns the extended query input list and the rows, each row
/// being its input tuple with the produced value appended.
fn subquery_full(
    expr: &Expr,
    extra_subqs: &[&Expr],
    ctx: &EvalContext<'_>,
) -> Result<(Vec<Path>, Vec<Row>)> {
    let analysis = analyze_paths(expr, extra_subqs)?;
    let qil = make_query_input_list(
        &analysis.direct_paths,
        &analysis.subquery_paths,
        &ctx.query_input_list,
    );
    trace!(columns = qil.len(), "built query input list");
    let in_tuples = build_input_tuples(&qil, &analysis.always_optional, ctx)?;
    trace!(rows = in_tuples.len(), "built input tuples");

    let mut new_qil = ctx.query_input_list.clone();
    new_qil.extend(qil);

    let mut out = Vec::new();
    for row in in_tuples {
        let subctx = ctx.with_bindings(new_qil.clone(), row.clone());
        for value in eval(expr, &subctx)? {
            let mut extended = row.clone();
            extended.push(Slot::Present(value));
            out.push(extended);
        }
    }
    Ok((new_qil, out))
}

/// Evaluates `expr` as an independent subquery and returns its result
/// multiset (the last column of [`subquery_full`]'s rows).
fn subquery(expr: &Expr, ctx: &EvalContext<'_>) -> Result<Vec<Value>> {
    let (_, rows) = subquery_full(expr, &[], ctx)?;
    Ok(last_column(rows))
}

fn last_column(rows: Vec<Row>) -> Vec<Value> {
    rows.into_iter()
        .filter_map(|mut row| match row.pop() {
            Some(Slot::Present(value)) => Some(value),
            Some(Slot::Missing) | None => None,
        })
        .collect()
}

/// Builds the input tuples column by column: each partial tuple is
/// extended with every value of the next column's path, or with a
/// missing slot when the path is empty and the column is optional.
fn build_input_tuples(
    qil: &[Path],
    always_optional: &OptionalityMap,
    ctx: &EvalContext<'_>,
) -> Result<Vec<Row>> {
    let mut data: Vec<Row> = vec![ctx.input_tuple.clone()];
    for (i, in_path) in qil.iter().enumerate() {
        let mut new_qil = ctx.query_input_list.clone();
        new_qil.extend(qil[..i].iter().cloned());
        let mut new_data = Vec::new();
        for row in &data {
            let subctx = ctx.with_bindings(new_qil.clone(), row.clone());
            let out = eval_path(in_path, &subctx)?;
            if out.is_empty() {
                if always_optional.always_optional(in_path) {
                    let mut extended = row.clone();
                    extended.push(Slot::Missing);
                    new_data.push(extended);
                }
            } else {
                for value in out {
                    let mut extended = row.clone();
                    extended.push(Slot::Present(value));
                    new_data.push(extended);
                }
            }
        }
        data = new_data;
    }
    Ok(data)
}

// ===================================================================
// Expression dispatch
// ===================================================================

fn eval(expr: &Expr, ctx: &EvalContext<'_>) -> Result<Vec<Value>> {
    match expr {
        Expr::Integer(lit) => Ok(vec![Value::Int(lit.signed())]),
        Expr::Float(lit) => Ok(vec![Value::Float(lit.signed())]),
        Expr::String(s) => Ok(vec![Value::Str(s.clone())]),
        Expr::Boolean(b) => Ok(vec![Value::Bool(*b)]),
        Expr::Set(elements) => {
            let mut out = Vec::new();
            for element in elements {
                out.extend(eval(element, ctx)?);
            }
            Ok(out)
        }
        Expr::Tuple(elements) => {
            let args = elements
                .iter()
                .map(|e| eval(e, ctx))
                .collect::<Result<Vec<_>>>()?;
            Ok(builtins::cartesian_product(&args)
                .into_iter()
                .map(Value::Tuple)
                .collect())
        }
        Expr::NamedTuple(elements) => {
            let args = elements
                .iter()
                .map(|e| eval(&e.val, ctx))
                .collect::<Result<Vec<_>>>()?;
            Ok(builtins::cartesian_product(&args)
                .into_iter()
                .map(|combo| {
                    Value::NamedTuple(
                        elements
                            .iter()
                            .map(|e| e.name.clone())
                            .zip(combo)
                            .collect(),
                    )
                })
                .collect())
        }
        Expr::TypeCast { ty, expr } => {
            let arg = eval(expr, ctx)?;
            let imp = builtins::lookup(BuiltinKind::Cast, ty).ok_or_else(|| {
                EvalError::UnknownBuiltin {
                    kind: BuiltinKind::Cast.describe(),
                    name: ty.clone(),
                }
            })?;
            imp(&[arg])
        }
        Expr::Binary { left, op, right } => eval_func_or_op(
            BuiltinKind::Binary,
            op.as_str(),
            &[left.as_ref(), right.as_ref()],
            ctx,
        ),
        Expr::Unary { op, operand } => {
            eval_func_or_op(BuiltinKind::Unary, op.as_str(), &[operand.as_ref()], ctx)
        }
        Expr::Function(call) => {
            let args: Vec<&Expr> = call.args.iter().collect();
            eval_func_or_op(BuiltinKind::Function, &call.name, &args, ctx)
        }
        Expr::IfElse {
            if_expr,
            condition,
            else_expr,
        } => eval_func_or_op(
            BuiltinKind::Binary,
            "IF",
            &[if_expr.as_ref(), condition.as_ref(), else_expr.as_ref()],
            ctx,
        ),
        Expr::Path(path) => eval_path(&simplify_path(path)?, ctx),
        Expr::Select(query) => eval_select(query, ctx),
        Expr::For(query) => eval_for(query, ctx),
        Expr::Parameter(name) => Err(EvalError::UnknownNode(format!("parameter ${name}"))),
    }
}

/// Evaluates a builtin application. Arguments in `SET OF` positions are
/// evaluated as independent subqueries; everything else is evaluated in
/// the current (correlated) context. The lifted implementation then
/// receives one multiset per argument.
fn eval_func_or_op(
    kind: BuiltinKind,
    name: &str,
    args: &[&Expr],
    ctx: &EvalContext<'_>,
) -> Result<Vec<Value>> {
    let spec = builtins::signature(name);
    if let Some(spec) = spec {
        if spec.len() != args.len() {
            return Err(EvalError::ArityMismatch {
                name: name.to_owned(),
                expected: spec.len(),
                got: args.len(),
            });
        }
    }

    let mut results = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        let is_set_of = spec.is_some_and(|s| s.get(i) == Some(&Cardinality::SetOf));
        results.push(if is_set_of {
            subquery(arg, ctx)?
        } else {
            eval(arg, ctx)?
        });
    }

    let imp = builtins::lookup(kind, name).ok_or_else(|| EvalError::UnknownBuiltin {
        kind: kind.describe(),
        name: name.to_owned(),
    })?;
    imp(&results)
}

// ===================================================================
// Path evaluation
// ===================================================================

fn eval_path(path: &Path, ctx: &EvalContext<'_>) -> Result<Vec<Value>> {
    // Paths bound in the input tuple resolve to their slot.
    if let Some(i) = ctx.query_input_list.iter().position(|p| p == path) {
        return Ok(match ctx.input_tuple.get(i) {
            Some(Slot::Present(value)) => vec![value.clone()],
            Some(Slot::Missing) | None => Vec::new(),
        });
    }

    if path.len() == 1 {
        return match path.first() {
            Some(PathElem::ObjRef(name)) => Ok(eval_objref(name, ctx)),
            Some(PathElem::Expr(expr)) => eval(expr, ctx),
            _ => Err(EvalError::InvalidPath(format!(
                "unbound path base: {path:?}"
            ))),
        };
    }

    let base = eval_path(&path.parent(), ctx)?;
    let Some(last) = path.last() else {
        return Err(EvalError::InvalidPath("empty path".to_owned()));
    };
    let mut out = Vec::new();
    for value in &base {
        match last {
            PathElem::Ptr { name, direction } => match direction {
                Direction::Forward => out.extend(eval_fwd_ptr(value, name, ctx)?),
                Direction::Backward => out.extend(eval_bwd_ptr(value, name, ctx)),
            },
            PathElem::TypeIntersection(ty) => out.extend(eval_intersect(value, ty, ctx)?),
            other => {
                return Err(EvalError::InvalidPath(format!(
                    "{other:?} cannot extend a path"
                )))
            }
        }
    }
    // Object-to-object navigation deduplicates; first occurrence wins.
    if base.first().is_some_and(Value::is_object) && out.first().is_some_and(Value::is_object) {
        out = dedup(out);
    }
    Ok(out)
}

fn eval_fwd_ptr(base: &Value, name: &str, ctx: &EvalContext<'_>) -> Result<Vec<Value>> {
    match base {
        Value::Tuple(items) => {
            let index: usize = name.parse().map_err(|_| {
                EvalError::TypeError(format!("invalid tuple index '{name}'"))
            })?;
            items
                .get(index)
                .map(|v| vec![v.clone()])
                .ok_or_else(|| EvalError::TypeError(format!("tuple index {index} out of range")))
        }
        Value::NamedTuple(fields) => fields
            .get(name)
            .map(|v| vec![v.clone()])
            .ok_or_else(|| EvalError::TypeError(format!("no field '{name}' in named tuple"))),
        // Dangling targets are permitted and navigate to nothing.
        Value::Object(obj) => Ok(ctx
            .db
            .get(obj.id)
            .map(|record| record.get_links(name))
            .unwrap_or_default()),
        other => Err(EvalError::TypeError(format!(
            "cannot follow '.{name}' on {}",
            other.type_name()
        ))),
    }
}

fn eval_bwd_ptr(base: &Value, name: &str, ctx: &EvalContext<'_>) -> Vec<Value> {
    ctx.db
        .iter()
        .filter(|record| record.get_links(name).contains(base))
        .map(|record| Value::Object(Obj::new(record.id)))
        .collect()
}

fn eval_intersect(base: &Value, type_name: &str, ctx: &EvalContext<'_>) -> Result<Vec<Value>> {
    match base {
        Value::Object(obj) => Ok(match ctx.db.get(obj.id) {
            Some(record) if record.type_name == type_name => vec![base.clone()],
            _ => Vec::new(),
        }),
        other => Err(EvalError::TypeError(format!(
            "cannot intersect {} with type '{type_name}'",
            other.type_name()
        ))),
    }
}

fn eval_objref(name: &str, ctx: &EvalContext<'_>) -> Vec<Value> {
    if let Some(values) = ctx.aliases.get(name) {
        return values.clone();
    }
    ctx.db
        .iter()
        .filter(|record| record.type_name == name)
        .map(|record| Value::Object(Obj::new(record.id)))
        .collect()
}

// ===================================================================
// SELECT
// ===================================================================

fn eval_select(query: &SelectQuery, ctx: &EvalContext<'_>) -> Result<Vec<Value>> {
    let mut ctx = ctx.clone();
    // Each alias sees the aliases declared before it.
    for alias in &query.aliases {
        let values = subquery(&alias.expr, &ctx)?;
        ctx.aliases.insert(alias.alias.clone(), values);
    }

    // WHERE and each ORDER BY key are subqueries of the result query;
    // OFFSET and LIMIT are not.
    let mut extra_subqs: Vec<&Expr> = Vec::new();
    extra_subqs.extend(query.filter.as_ref());
    extra_subqs.extend(query.order_by.iter().map(|sort| &sort.path));

    let (mut qil, mut rows) = subquery_full(&query.result, &extra_subqs, &ctx)?;

    // The clauses address the result column through a trailing partial
    // path, and through the result alias when one is declared.
    qil.push(Path::new(vec![PathElem::Partial]));
    if let Some(alias) = &query.result_alias {
        for row in &mut rows {
            if let Some(last) = row.last().cloned() {
                row.push(last);
            }
        }
        qil.push(Path::new(vec![PathElem::ObjRef(alias.clone())]));
    }

    let rows = eval_filter(query.filter.as_ref(), &qil, rows, &ctx)?;
    let rows = eval_orderby(&query.order_by, &qil, rows, &ctx)?;
    let rows = eval_offset(query.offset.as_ref(), rows, &ctx)?;
    let rows = eval_limit(query.limit.as_ref(), rows, &ctx)?;

    Ok(last_column(rows))
}

fn eval_filter(
    filter: Option<&Expr>,
    qil: &[Path],
    rows: Vec<Row>,
    ctx: &EvalContext<'_>,
) -> Result<Vec<Row>> {
    let Some(filter) = filter else {
        return Ok(rows);
    };
    let mut kept = Vec::new();
    for row in rows {
        let subctx = ctx.with_bindings(qil.to_vec(), row.clone());
        if subquery(filter, &subctx)?.iter().any(Value::is_truthy) {
            kept.push(row);
        }
    }
    Ok(kept)
}

/// A decorated sort key: an emptiness tag chosen so that empty keys
/// sort to the requested end, then the key value itself.
type SortKey = (bool, Option<Value>);

fn sort_key_cmp(a: &SortKey, b: &SortKey) -> Result<Ordering> {
    match a.0.cmp(&b.0) {
        Ordering::Equal => match (&a.1, &b.1) {
            (None, None) => Ok(Ordering::Equal),
            (None, Some(_)) => Ok(Ordering::Less),
            (Some(_), None) => Ok(Ordering::Greater),
            (Some(x), Some(y)) => x.compare(y),
        },
        unequal => Ok(unequal),
    }
}

fn eval_orderby(
    order_by: &[SortExpr],
    qil: &[Path],
    mut rows: Vec<Row>,
    ctx: &EvalContext<'_>,
) -> Result<Vec<Row>> {
    // Specifiers are applied in reverse order; each pass is a stable
    // sort, so earlier specifiers dominate.
    for sort in order_by.iter().rev() {
        let empties_bigger = matches!(
            (sort.direction, sort.empties),
            (SortDirection::Asc, Some(EmptyOrder::Last))
                | (SortDirection::Desc, Some(EmptyOrder::First))
        );

        let mut decorated: Vec<(SortKey, Row)> = Vec::with_capacity(rows.len());
        for row in rows {
            let subctx = ctx.with_bindings(qil.to_vec(), row.clone());
            let mut values = subquery(&sort.path, &subctx)?;
            if values.len() > 1 {
                return Err(EvalError::CardinalityViolation {
                    clause: "ORDER BY",
                    got: values.len(),
                });
            }
            let key = match values.pop() {
                Some(value) => (!empties_bigger, Some(value)),
                None => (empties_bigger, None),
            };
            decorated.push((key, row));
        }

        let mut compare_error: Option<EvalError> = None;
        decorated.sort_by(|(a, _), (b, _)| match sort_key_cmp(a, b) {
            Ok(ordering) => {
                if sort.direction == SortDirection::Desc {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
            Err(e) => {
                compare_error.get_or_insert(e);
                Ordering::Equal
            }
        });
        if let Some(e) = compare_error {
            return Err(e);
        }

        rows = decorated.into_iter().map(|(_, row)| row).collect();
    }
    Ok(rows)
}

fn clause_int(expr: &Expr, clause: &'static str, ctx: &EvalContext<'_>) -> Result<i64> {
    let values = subquery(expr, ctx)?;
    if values.len() != 1 {
        return Err(EvalError::CardinalityViolation {
            clause,
            got: values.len(),
        });
    }
    values[0].as_int().ok_or_else(|| {
        EvalError::TypeError(format!(
            "{clause} must be an integer, got {}",
            values[0].type_name()
        ))
    })
}

fn eval_offset(offset: Option<&Expr>, rows: Vec<Row>, ctx: &EvalContext<'_>) -> Result<Vec<Row>> {
    let Some(offset) = offset else {
        return Ok(rows);
    };
    let n = usize::try_from(clause_int(offset, "OFFSET", ctx)?).unwrap_or(0);
    Ok(rows.into_iter().skip(n).collect())
}

fn eval_limit(limit: Option<&Expr>, rows: Vec<Row>, ctx: &EvalContext<'_>) -> Result<Vec<Row>> {
    let Some(limit) = limit else {
        return Ok(rows);
    };
    let n = usize::try_from(clause_int(limit, "LIMIT", ctx)?).unwrap_or(0);
    Ok(rows.into_iter().take(n).collect())
}

// ===================================================================
// FOR
// ===================================================================

fn eval_for(query: &ForQuery, ctx: &EvalContext<'_>) -> Result<Vec<Value>> {
    let iter_values = subquery(&query.iterator, ctx)?;
    let mut qil = ctx.query_input_list.clone();
    qil.push(Path::new(vec![PathElem::ObjRef(
        query.iterator_alias.clone(),
    )]));

    let mut out = Vec::new();
    for value in iter_values {
        let mut row = ctx.input_tuple.clone();
        row.push(Slot::Present(value));
        let subctx = ctx.with_bindings(qil.clone(), row);
        out.extend(subquery(&query.result, &subctx)?);
    }
    Ok(out)
}
