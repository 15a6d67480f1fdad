//! Error types for the evaluator.

use thiserror::Error;

/// Errors raised during query evaluation.
///
/// All errors are fatal to the evaluation that raised them: nothing is
/// recovered locally, and the error unwinds to the caller of the entry
/// point. A REPL-style host is expected to display the error and carry
/// on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// An AST node the evaluator does not support.
    #[error("unsupported node: {0}")]
    UnknownNode(String),

    /// An operator, function, or cast that is not in the builtins table.
    #[error("unknown {kind}: {name}")]
    UnknownBuiltin {
        /// The builtin kind ("operator", "unary operator", "cast", or
        /// "function").
        kind: &'static str,
        /// The name that failed to resolve.
        name: String,
    },

    /// Argument count mismatch against a builtin's modifier list.
    #[error("{name} takes {expected} argument(s), got {got}")]
    ArityMismatch {
        /// The builtin name.
        name: String,
        /// The declared argument count.
        expected: usize,
        /// The actual argument count.
        got: usize,
    },

    /// A clause produced more than one value where a single value is
    /// required (OFFSET, LIMIT, or an ORDER BY key).
    #[error("{clause} must be a singleton, got {got} values")]
    CardinalityViolation {
        /// The offending clause.
        clause: &'static str,
        /// The number of values produced.
        got: usize,
    },

    /// An operation applied to values it is not defined on.
    #[error("type error: {0}")]
    TypeError(String),

    /// A structurally malformed internal path.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Result type alias for evaluator operations.
pub type Result<T> = std::result::Result<T, EvalError>;
