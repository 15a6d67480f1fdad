//! # setql-ast
//!
//! AST types for the SetQL object query language.
//!
//! This crate defines the abstract node taxonomy consumed by the
//! `setql-eval` evaluator:
//! - Expression nodes: literals, set/tuple constructors, operators,
//!   function calls, casts, conditionals, and paths
//! - Query nodes: `SELECT` (with `WITH` aliases, `FILTER`, `ORDER BY`,
//!   `OFFSET`, `LIMIT`) and `FOR ... IN ... UNION`
//! - Path steps: object set references, forward/backward pointers, and
//!   type intersections
//!
//! SetQL queries are expressions all the way down: a query node is just
//! another [`Expr`] variant, so queries nest freely.
//!
//! There is no parser here. ASTs are produced by an external parser or
//! built programmatically through the builder API:
//!
//! ```rust
//! use setql_ast::{Expr, PathExpr, SelectQuery};
//!
//! // SELECT Person.name FILTER .name != 'x' LIMIT 2
//! let query = SelectQuery::new(PathExpr::object("Person").ptr("name"))
//!     .filter(PathExpr::partial().ptr("name").into_expr().not_eq(Expr::string("x")))
//!     .limit(Expr::integer(2))
//!     .into_expr();
//! ```
//!
//! Enable the `serde` feature to derive `Serialize`/`Deserialize` on all
//! node types.

mod expr;
mod op;
mod path;
mod query;

pub use expr::{Expr, FloatLiteral, FunctionCall, IntegerLiteral, NamedTupleElement};
pub use op::{BinaryOp, UnaryOp};
pub use path::{Direction, PathExpr, PathStep};
pub use query::{AliasedExpr, EmptyOrder, ForQuery, SelectQuery, SortDirection, SortExpr};
