//! Error propagation: every failure unwinds to the entry point.

mod common;
use common::*;

use setql_ast::{Expr, PathExpr};
use setql_eval::EvalError;

#[test]
fn unknown_parameter_node() {
    assert!(matches!(
        run_err(Expr::Parameter("limit".to_owned())),
        EvalError::UnknownNode(_)
    ));
}

#[test]
fn unknown_function() {
    assert!(matches!(
        run_err(Expr::call("uppercase", vec![Expr::string("x")])),
        EvalError::UnknownBuiltin { kind: "function", .. }
    ));
}

#[test]
fn unknown_cast() {
    assert!(matches!(
        run_err(Expr::cast("json", Expr::integer(1))),
        EvalError::UnknownBuiltin { kind: "cast", .. }
    ));
}

#[test]
fn aggregate_arity_mismatch() {
    assert!(matches!(
        run_err(Expr::call("sum", vec![Expr::integer(1), Expr::integer(2)])),
        EvalError::ArityMismatch { expected: 1, got: 2, .. }
    ));
}

#[test]
fn arithmetic_on_strings_is_a_type_error() {
    assert!(matches!(
        run_err(Expr::integer(1).add(Expr::string("a"))),
        EvalError::TypeError(_)
    ));
}

#[test]
fn comparison_across_kinds_is_a_type_error() {
    assert!(matches!(
        run_err(Expr::integer(1).lt(Expr::string("a"))),
        EvalError::TypeError(_)
    ));
}

#[test]
fn division_by_zero() {
    assert!(matches!(
        run_err(Expr::integer(1).div(Expr::integer(0))),
        EvalError::TypeError(_)
    ));
}

#[test]
fn bad_string_cast() {
    assert!(matches!(
        run_err(Expr::cast("int64", Expr::string("four"))),
        EvalError::TypeError(_)
    ));
}

#[test]
fn min_of_empty_set() {
    assert!(matches!(
        run_err(Expr::call("min", vec![Expr::empty_set()])),
        EvalError::TypeError(_)
    ));
}

#[test]
fn pointer_on_a_scalar_is_a_type_error() {
    let q = PathExpr::from_expr(Expr::integer(1)).ptr("name");
    assert!(matches!(run_err(q), EvalError::TypeError(_)));
}

#[test]
fn errors_propagate_out_of_clauses() {
    let q = setql_ast::SelectQuery::new(person().ptr("name"))
        .filter(Expr::integer(1).add(Expr::string("a")));
    assert!(matches!(run_err(q), EvalError::TypeError(_)));
}
