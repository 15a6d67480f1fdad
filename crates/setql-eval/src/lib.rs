//! # setql-eval
//!
//! A reference evaluator for the SetQL object query language.
//!
//! SetQL has set-based semantics: every expression denotes a multiset
//! of values, and operators and functions are lifted over sets
//! according to per-argument cardinality modifiers (`SET OF`,
//! `OPTIONAL`, `SINGLETON`). This crate is a direct semantic model of
//! those rules:
//! - free path references appearing together in one expression are
//!   *correlated* — bound through shared input-tuple columns built from
//!   their longest common prefixes;
//! - references inside a `SET OF` argument or a nested query are
//!   re-evaluated as independent subqueries.
//!
//! The evaluator is a pure function of a parsed [`setql_ast`]
//! expression and an in-memory [`Database`]; results are returned as
//! *cleaned* values with object references replaced by their shapes.
//!
//! ```rust
//! use setql_ast::{Expr, PathExpr, SelectQuery};
//! use setql_eval::{evaluate, Database, ObjectRecord, Value};
//! use uuid::Uuid;
//!
//! let db = Database::from_records([
//!     ObjectRecord::new(Uuid::from_u128(1), "Person").field("name", "Ada"),
//! ]);
//!
//! // SELECT Person.name
//! let query = SelectQuery::new(PathExpr::object("Person").ptr("name")).into_expr();
//! let out = evaluate(&query, &db).unwrap();
//! assert_eq!(out, vec![Value::from("Ada")]);
//! ```
//!
//! There is no schema system, no type checker, and no persistence:
//! malformed queries surface as [`EvalError`]s and unwind to the
//! caller.

mod analyze;
mod builtins;
mod db;
mod error;
mod eval;
mod path;
mod qil;
mod value;

pub use builtins::{seed_random, BuiltinKind, Cardinality};
pub use db::{Database, ObjectRecord};
pub use error::{EvalError, Result};
pub use eval::{evaluate, evaluate_with_aliases};
pub use path::{Path, PathElem};
pub use value::{dedup, Obj, Value};
