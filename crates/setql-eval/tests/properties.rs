//! Property tests for the set-semantics laws.

mod common;
use common::*;

use proptest::prelude::*;
use setql_ast::Expr;
use setql_eval::Value;

fn small_ints() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50_i64..50, 0..6)
}

fn nonempty_small_ints() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50_i64..50, 1..6)
}

proptest! {
    // Element-wise lift: the result size is the product of the
    // argument sizes.
    #[test]
    fn elementwise_result_size_is_a_product(xs in small_ints(), ys in small_ints()) {
        let out = run(int_set(&xs).add(int_set(&ys)));
        prop_assert_eq!(out.len(), xs.len() * ys.len());
    }

    // Set-of lift: aggregates always yield exactly one element.
    #[test]
    fn aggregates_yield_exactly_one_element(xs in small_ints()) {
        for name in ["count", "sum", "all", "any"] {
            let out = run(Expr::call(name, vec![int_set(&xs)]));
            prop_assert_eq!(out.len(), 1, "{}", name);
        }
    }

    #[test]
    fn min_max_yield_exactly_one_element_on_nonempty_input(xs in nonempty_small_ints()) {
        for name in ["min", "max"] {
            let out = run(Expr::call(name, vec![int_set(&xs)]));
            prop_assert_eq!(out.len(), 1, "{}", name);
        }
    }

    #[test]
    fn count_matches_input_size(xs in small_ints()) {
        let out = run(Expr::call("count", vec![int_set(&xs)]));
        prop_assert_eq!(out, ints(&[xs.len() as i64]));
    }

    // DISTINCT is idempotent.
    #[test]
    fn distinct_is_idempotent(xs in small_ints()) {
        let once = run(Expr::distinct(int_set(&xs)));
        let twice = run(Expr::distinct(Expr::distinct(int_set(&xs))));
        prop_assert_eq!(once, twice);
    }

    // UNION concatenates: count(a UNION b) == count(a) + count(b).
    #[test]
    fn union_counts_add_up(xs in small_ints(), ys in small_ints()) {
        let out = run(Expr::call("count", vec![int_set(&xs).union(int_set(&ys))]));
        prop_assert_eq!(out, ints(&[(xs.len() + ys.len()) as i64]));
    }

    // x ?? y is x when x is non-empty, else y.
    #[test]
    fn coalesce_law(xs in small_ints(), ys in small_ints()) {
        let out = run(int_set(&xs).coalesce(int_set(&ys)));
        let expected = if xs.is_empty() { ints(&ys) } else { ints(&xs) };
        prop_assert_eq!(out, expected);
    }

    // EXISTS mirrors non-emptiness.
    #[test]
    fn exists_mirrors_nonemptiness(xs in small_ints()) {
        let out = run(Expr::exists(int_set(&xs)));
        prop_assert_eq!(out, bools(&[!xs.is_empty()]));
    }

    // Optional equality on zero-or-one operands compares emptiness
    // first.
    #[test]
    fn optional_equality_of_singletons(x in -50_i64..50, y in -50_i64..50) {
        let out = run(Expr::integer(x).opt_eq(Expr::integer(y)));
        prop_assert_eq!(out, bools(&[x == y]));
    }

    // ORDER BY is stable: rows with equal keys keep their input order.
    #[test]
    fn order_by_is_stable(pairs in prop::collection::vec((0_i64..3, 0_i64..100), 0..8)) {
        let tuples = Expr::set(
            pairs
                .iter()
                .map(|(key, payload)| {
                    Expr::tuple(vec![Expr::integer(*key), Expr::integer(*payload)])
                })
                .collect(),
        );
        let q = setql_ast::SelectQuery::new(tuples)
            .order_by(setql_ast::SortExpr::asc(setql_ast::PathExpr::partial().ptr("0")));
        let out = run(q);

        let mut expected = pairs.clone();
        expected.sort_by_key(|(key, _)| *key);
        let expected: Vec<Value> = expected
            .into_iter()
            .map(|(key, payload)| Value::Tuple(vec![Value::Int(key), Value::Int(payload)]))
            .collect();
        prop_assert_eq!(out, expected);
    }

    // Cleaned output never contains object references.
    #[test]
    fn cleaned_output_has_no_object_references(n in 0_u8..3) {
        fn check(value: &Value) -> bool {
            match value {
                Value::Object(_) => false,
                Value::Tuple(xs) | Value::List(xs) => xs.iter().all(check),
                Value::NamedTuple(fields) => fields.values().all(check),
                _ => true,
            }
        }

        // Wrap object sets in tuples of varying depth.
        let mut expr = person().into_expr();
        for _ in 0..n {
            expr = Expr::tuple(vec![expr, person().ptr("name").into_expr()]);
        }
        let out = run(expr);
        prop_assert!(out.iter().all(check));
    }
}
