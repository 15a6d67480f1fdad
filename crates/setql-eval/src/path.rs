//! Internal paths.
//!
//! The analyzer and evaluator work on a simplified path form: a
//! non-empty sequence of elements with structural equality. Paths are
//! the keys of the query input list, so equality and the stable
//! ordering here are load-bearing.

use std::cmp::Ordering;

use setql_ast::{Direction, Expr, PathExpr, PathStep};

use crate::error::{EvalError, Result};

/// One element of an internal path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathElem {
    /// Placeholder for the implicit `.`-prefix of a partial path.
    Partial,
    /// The path starts at a sub-expression.
    Expr(Box<Expr>),
    /// The path starts at a named object set.
    ObjRef(String),
    /// A property or link traversal.
    Ptr {
        /// The property or link name.
        name: String,
        /// Traversal direction.
        direction: Direction,
    },
    /// A filter by exact type name.
    TypeIntersection(String),
}

impl PathElem {
    const fn rank(&self) -> u8 {
        match self {
            Self::Partial => 0,
            Self::Expr(_) => 1,
            Self::ObjRef(_) => 2,
            Self::Ptr { .. } => 3,
            Self::TypeIntersection(_) => 4,
        }
    }

    fn structural_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::ObjRef(a), Self::ObjRef(b)) => a.cmp(b),
            (
                Self::Ptr {
                    name: an,
                    direction: ad,
                },
                Self::Ptr {
                    name: bn,
                    direction: bd,
                },
            ) => an.cmp(bn).then(ad.cmp(bd)),
            (Self::TypeIntersection(a), Self::TypeIntersection(b)) => a.cmp(b),
            // Partial and Expr elements carry no orderable payload.
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// An internal path: a sequence of [`PathElem`]s.
///
/// Paths produced by [`simplify_path`] are never empty; the empty path
/// only appears as the "no common prefix" result of
/// [`longest_common_prefix`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path(Vec<PathElem>);

impl Path {
    /// Creates a path from elements.
    #[must_use]
    pub fn new(elems: Vec<PathElem>) -> Self {
        Self(elems)
    }

    /// The path's elements, in order.
    #[must_use]
    pub fn elems(&self) -> &[PathElem] {
        &self.0
    }

    /// The number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&PathElem> {
        self.0.first()
    }

    /// The last element, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PathElem> {
        self.0.last()
    }

    /// The path without its last element.
    #[must_use]
    pub fn parent(&self) -> Self {
        Self(self.0[..self.0.len().saturating_sub(1)].to_vec())
    }

    /// Whether the path starts at a named object set.
    #[must_use]
    pub fn starts_at_object_ref(&self) -> bool {
        matches!(self.0.first(), Some(PathElem::ObjRef(_)))
    }

    /// The non-empty initial subsequences, shortest first.
    pub fn prefixes(&self) -> impl Iterator<Item = Self> + '_ {
        (1..=self.0.len()).map(|n| Self(self.0[..n].to_vec()))
    }

    /// Orders paths structurally: element-wise, then shorter first.
    ///
    /// This is the stable order of the query input list. Same-variant
    /// elements compare by their name fields; different variants
    /// compare by rank.
    #[must_use]
    pub fn structural_cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(&other.0) {
            match a.structural_cmp(b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

/// Computes the maximal initial element-wise equal sequence of two
/// paths. The result is empty when the paths diverge at the first
/// element.
#[must_use]
pub fn longest_common_prefix(a: &Path, b: &Path) -> Path {
    let mut common = Vec::new();
    for (x, y) in a.elems().iter().zip(b.elems()) {
        if x == y {
            common.push(x.clone());
        } else {
            break;
        }
    }
    Path::new(common)
}

/// Lowers a surface path to its internal form.
///
/// A partial path contributes a leading [`PathElem::Partial`]; object
/// refs and expression roots are only valid as the first step.
pub fn simplify_path(path: &PathExpr) -> Result<Path> {
    let mut elems: Vec<PathElem> = Vec::with_capacity(path.steps.len() + 1);
    if path.partial {
        elems.push(PathElem::Partial);
    }
    for step in &path.steps {
        match step {
            PathStep::ObjectRef(name) => {
                if !elems.is_empty() {
                    return Err(EvalError::InvalidPath(format!(
                        "object set reference '{name}' after the first step"
                    )));
                }
                elems.push(PathElem::ObjRef(name.clone()));
            }
            PathStep::Expr(expr) => {
                if !elems.is_empty() {
                    return Err(EvalError::InvalidPath(
                        "expression root after the first step".to_owned(),
                    ));
                }
                elems.push(PathElem::Expr(expr.clone()));
            }
            PathStep::Ptr { name, direction } => {
                elems.push(PathElem::Ptr {
                    name: name.clone(),
                    direction: *direction,
                });
            }
            PathStep::TypeIntersection(ty) => {
                elems.push(PathElem::TypeIntersection(ty.clone()));
            }
        }
    }
    if elems.is_empty() {
        return Err(EvalError::InvalidPath("empty path".to_owned()));
    }
    Ok(Path::new(elems))
}
