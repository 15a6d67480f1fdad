//! SELECT clause behavior: FILTER, ORDER BY, OFFSET, LIMIT.

mod common;
use common::*;

use setql_ast::{Expr, PathExpr, SelectQuery, SortExpr};
use setql_eval::{EvalError, Value};

fn names_ordered(sort: SortExpr) -> Vec<Value> {
    run(SelectQuery::new(person().ptr("name")).order_by(sort))
}

// ===================================================================
// ORDER BY
// ===================================================================

#[test]
fn order_by_result_ascending_and_descending() {
    assert_eq!(
        names_ordered(SortExpr::asc(PathExpr::partial())),
        strs(&["Emmanuel Villip", "Madeline Hatch", "Phil Emarg"])
    );
    assert_eq!(
        names_ordered(SortExpr::desc(PathExpr::partial())),
        strs(&["Phil Emarg", "Madeline Hatch", "Emmanuel Villip"])
    );
}

#[test]
fn order_by_empty_keys_default_to_first_on_asc() {
    // boxing has no note; blarg < lolol.
    let q = SelectQuery::new(note())
        .order_by(SortExpr::asc(PathExpr::partial().ptr("note")));
    assert_eq!(
        run(q),
        vec![obj_ref(BOXING), obj_ref(DYNAMIC), obj_ref(UNBOXING)]
    );
}

#[test]
fn order_by_empty_keys_can_be_placed_last() {
    let q = SelectQuery::new(note())
        .order_by(SortExpr::asc(PathExpr::partial().ptr("note")).empties_last());
    assert_eq!(
        run(q),
        vec![obj_ref(DYNAMIC), obj_ref(UNBOXING), obj_ref(BOXING)]
    );
}

#[test]
fn order_by_is_stable_across_specifiers() {
    // Secondary key applied first, primary key (a constant) keeps the
    // secondary order intact.
    let q = SelectQuery::new(person().ptr("name"))
        .order_by(SortExpr::asc(Expr::integer(1)))
        .order_by(SortExpr::asc(PathExpr::partial()));
    assert_eq!(
        run(q),
        strs(&["Emmanuel Villip", "Madeline Hatch", "Phil Emarg"])
    );
}

#[test]
fn order_by_constant_key_preserves_input_order() {
    let q = SelectQuery::new(person().ptr("name")).order_by(SortExpr::asc(Expr::integer(1)));
    assert_eq!(
        run(q),
        strs(&["Phil Emarg", "Madeline Hatch", "Emmanuel Villip"])
    );
}

#[test]
fn order_by_key_must_be_a_singleton() {
    let q = SelectQuery::new(person())
        .order_by(SortExpr::asc(PathExpr::partial().ptr("notes").ptr("name")));
    assert!(matches!(
        run_err(q),
        EvalError::CardinalityViolation { clause: "ORDER BY", .. }
    ));
}

// ===================================================================
// OFFSET / LIMIT
// ===================================================================

#[test]
fn offset_and_limit_slice_rows() {
    let ordered = || {
        SelectQuery::new(person().ptr("name")).order_by(SortExpr::asc(PathExpr::partial()))
    };
    assert_eq!(
        run(ordered().offset(Expr::integer(1))),
        strs(&["Madeline Hatch", "Phil Emarg"])
    );
    assert_eq!(
        run(ordered().limit(Expr::integer(2))),
        strs(&["Emmanuel Villip", "Madeline Hatch"])
    );
    assert_eq!(
        run(ordered().offset(Expr::integer(1)).limit(Expr::integer(1))),
        strs(&["Madeline Hatch"])
    );
}

#[test]
fn offset_past_the_end_is_empty() {
    let q = SelectQuery::new(person().ptr("name")).offset(Expr::integer(10));
    assert_eq!(run(q), Vec::<Value>::new());
}

#[test]
fn limit_must_be_a_singleton() {
    let q = SelectQuery::new(person().ptr("name")).limit(int_set(&[1, 2]));
    assert!(matches!(
        run_err(q),
        EvalError::CardinalityViolation { clause: "LIMIT", .. }
    ));
}

#[test]
fn offset_must_be_an_integer() {
    let q = SelectQuery::new(person().ptr("name")).offset(Expr::string("one"));
    assert!(matches!(run_err(q), EvalError::TypeError(_)));
}

// ===================================================================
// FILTER
// ===================================================================

#[test]
fn filter_keeps_rows_with_any_truthy_result() {
    // .notes.name = 'boxing' yields one boolean per note; Phil matches
    // on his first note.
    let q = SelectQuery::new(person()).filter(
        PathExpr::partial()
            .ptr("notes")
            .ptr("name")
            .into_expr()
            .eq(Expr::string("boxing")),
    );
    assert_eq!(run(q), vec![obj_ref(PHIL)]);
}

#[test]
fn filter_on_missing_property_drops_all_rows() {
    let q = SelectQuery::new(person()).filter(
        PathExpr::partial()
            .ptr("tag")
            .into_expr()
            .eq(Expr::string("x")),
    );
    assert_eq!(run(q), Vec::<Value>::new());
}

#[test]
fn filter_with_exists_keeps_linked_objects() {
    let q = SelectQuery::new(person())
        .filter(Expr::exists(PathExpr::partial().ptr("notes").into_expr()));
    assert_eq!(run(q), vec![obj_ref(PHIL), obj_ref(MADELINE)]);
}
