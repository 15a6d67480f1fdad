#![allow(dead_code)]

use indexmap::IndexMap;
use setql_ast::{Expr, PathExpr};
use setql_eval::{evaluate, Database, EvalError, ObjectRecord, Value};
use uuid::Uuid;

pub const PHIL: u128 = 0x10;
pub const MADELINE: u128 = 0x11;
pub const EMMANUEL: u128 = 0x12;
pub const BOXING: u128 = 0x20;
pub const UNBOXING: u128 = 0x21;
pub const DYNAMIC: u128 = 0x22;

/// Fixture object ids: `ffffffff-ffff-ffff-ffff-{n:012x}`.
pub fn oid(n: u128) -> Uuid {
    Uuid::from_u128(0xffff_ffff_ffff_ffff_ffff_0000_0000_0000 | n)
}

/// Three persons and three notes. Phil links boxing and unboxing,
/// Madeline links unboxing, Emmanuel has no notes.
pub fn sample_db() -> Database {
    Database::from_records([
        ObjectRecord::new(oid(PHIL), "Person")
            .field("name", "Phil Emarg")
            .links("notes", [oid(BOXING), oid(UNBOXING)]),
        ObjectRecord::new(oid(MADELINE), "Person")
            .field("name", "Madeline Hatch")
            .links("notes", [oid(UNBOXING)]),
        ObjectRecord::new(oid(EMMANUEL), "Person").field("name", "Emmanuel Villip"),
        ObjectRecord::new(oid(BOXING), "Note").field("name", "boxing"),
        ObjectRecord::new(oid(UNBOXING), "Note")
            .field("name", "unboxing")
            .field("note", "lolol"),
        ObjectRecord::new(oid(DYNAMIC), "Note")
            .field("name", "dynamic")
            .field("note", "blarg"),
    ])
}

pub fn run(expr: impl Into<Expr>) -> Vec<Value> {
    let expr = expr.into();
    evaluate(&expr, &sample_db())
        .unwrap_or_else(|e| panic!("evaluation failed: {e}\nquery: {expr:?}"))
}

pub fn run_err(expr: impl Into<Expr>) -> EvalError {
    let expr = expr.into();
    evaluate(&expr, &sample_db())
        .expect_err(&format!("expected evaluation error for: {expr:?}"))
}

pub fn person() -> PathExpr {
    PathExpr::object("Person")
}

pub fn note() -> PathExpr {
    PathExpr::object("Note")
}

pub fn ints(vals: &[i64]) -> Vec<Value> {
    vals.iter().copied().map(Value::Int).collect()
}

pub fn strs(vals: &[&str]) -> Vec<Value> {
    vals.iter().map(|s| Value::from(*s)).collect()
}

pub fn bools(vals: &[bool]) -> Vec<Value> {
    vals.iter().copied().map(Value::Bool).collect()
}

pub fn int_set(vals: &[i64]) -> Expr {
    Expr::set(vals.iter().map(|v| Expr::integer(*v)).collect())
}

/// The cleaned form of a bare object reference: its default `{id}`
/// shape.
pub fn obj_ref(n: u128) -> Value {
    let mut fields = IndexMap::new();
    fields.insert("id".to_owned(), Value::Uuid(oid(n)));
    Value::NamedTuple(fields)
}
