//! The value model.
//!
//! Every SetQL expression denotes a multiset of values, represented as a
//! `Vec<Value>` whose order is preserved. The empty vector is the empty
//! set.

use std::cmp::Ordering;

use indexmap::IndexMap;
use uuid::Uuid;

use crate::error::{EvalError, Result};

/// A reference to a database object.
///
/// Two references are equal iff their ids are equal, regardless of
/// shape. The shape is the reference's presentation form: the mapping
/// substituted for the reference when results are cleaned.
#[derive(Debug, Clone)]
pub struct Obj {
    /// The object id.
    pub id: Uuid,
    /// The display shape.
    pub shape: IndexMap<String, Value>,
}

impl Obj {
    /// Creates a reference with the default shape `{id}`.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        let mut shape = IndexMap::new();
        shape.insert("id".to_owned(), Value::Uuid(id));
        Self { id, shape }
    }

    /// Creates a reference with an explicit shape.
    #[must_use]
    pub fn with_shape(id: Uuid, shape: IndexMap<String, Value>) -> Self {
        Self { id, shape }
    }
}

impl PartialEq for Obj {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// A SetQL value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string.
    Str(String),
    /// A boolean.
    Bool(bool),
    /// An object id.
    Uuid(Uuid),
    /// An ordered tuple.
    Tuple(Vec<Value>),
    /// A named tuple with declared field order.
    NamedTuple(IndexMap<String, Value>),
    /// A list. Used as the link-multiplicity container inside database
    /// records.
    List(Vec<Value>),
    /// An object reference.
    Object(Obj),
}

impl Value {
    /// Returns the name of the value's kind, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bool(_) => "bool",
            Self::Uuid(_) => "uuid",
            Self::Tuple(_) => "tuple",
            Self::NamedTuple(_) => "named tuple",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    /// Whether the value counts as true in a boolean context (FILTER,
    /// `all`, `any`).
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Tuple(xs) | Self::List(xs) => !xs.is_empty(),
            Self::NamedTuple(fields) => !fields.is_empty(),
            Self::Uuid(_) | Self::Object(_) => true,
        }
    }

    /// Whether the value is an object reference.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Orders two values.
    ///
    /// Integers and floats compare numerically across kinds; strings,
    /// booleans, and uuids compare within their kind; tuples compare
    /// element-wise. Anything else is a type error.
    pub fn compare(&self, other: &Self) -> Result<Ordering> {
        match (self, other) {
            (Self::Int(x), Self::Int(y)) => Ok(x.cmp(y)),
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                let (x, y) = (self.as_f64().unwrap_or(0.0), other.as_f64().unwrap_or(0.0));
                Ok(x.partial_cmp(&y).unwrap_or(Ordering::Equal))
            }
            (Self::Str(x), Self::Str(y)) => Ok(x.cmp(y)),
            (Self::Bool(x), Self::Bool(y)) => Ok(x.cmp(y)),
            (Self::Uuid(x), Self::Uuid(y)) => Ok(x.cmp(y)),
            (Self::Tuple(xs), Self::Tuple(ys)) => {
                for (x, y) in xs.iter().zip(ys) {
                    match x.compare(y)? {
                        Ordering::Equal => {}
                        other => return Ok(other),
                    }
                }
                Ok(xs.len().cmp(&ys.len()))
            }
            _ => Err(EvalError::TypeError(format!(
                "cannot compare {} and {}",
                self.type_name(),
                other.type_name()
            ))),
        }
    }

    /// Converts the value to its presentation form: object references
    /// are recursively replaced by their shape mappings, containers are
    /// cleaned element-wise, scalars pass through.
    #[must_use]
    pub fn cleaned(self) -> Self {
        match self {
            Self::Object(obj) => Self::NamedTuple(
                obj.shape
                    .into_iter()
                    .map(|(k, v)| (k, v.cleaned()))
                    .collect(),
            ),
            Self::Tuple(xs) => Self::Tuple(xs.into_iter().map(Self::cleaned).collect()),
            Self::List(xs) => Self::List(xs.into_iter().map(Self::cleaned).collect()),
            Self::NamedTuple(fields) => Self::NamedTuple(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, v.cleaned()))
                    .collect(),
            ),
            other => other,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

/// Deduplicates a multiset in place-order: the first occurrence of each
/// value wins, later duplicates are dropped.
#[must_use]
pub fn dedup(values: Vec<Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn object_equality_ignores_shape() {
        let a = Obj::new(uid(1));
        let mut shape = IndexMap::new();
        shape.insert("name".to_owned(), Value::from("x"));
        let b = Obj::with_shape(uid(1), shape);
        assert_eq!(Value::Object(a), Value::Object(b));
        assert_ne!(Value::Object(Obj::new(uid(1))), Value::Object(Obj::new(uid(2))));
    }

    #[test]
    fn cleaned_replaces_objects_recursively() {
        let obj = Value::Object(Obj::new(uid(7)));
        let v = Value::Tuple(vec![obj, Value::from(1)]).cleaned();
        match v {
            Value::Tuple(xs) => match &xs[0] {
                Value::NamedTuple(fields) => {
                    assert_eq!(fields.get("id"), Some(&Value::Uuid(uid(7))));
                }
                other => panic!("expected named tuple, got {other:?}"),
            },
            other => panic!("expected tuple, got {other:?}"),
        }
    }

    #[test]
    fn numeric_comparison_crosses_kinds() {
        assert_eq!(
            Value::Int(2).compare(&Value::Float(2.5)).unwrap(),
            Ordering::Less
        );
        assert!(Value::Int(1).compare(&Value::from("x")).is_err());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let vals = vec![
            Value::from(2),
            Value::from(1),
            Value::from(2),
            Value::from(3),
            Value::from(1),
        ];
        assert_eq!(
            dedup(vals),
            vec![Value::from(2), Value::from(1), Value::from(3)]
        );
    }

    #[test]
    fn truthiness() {
        assert!(Value::from(1).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::Object(Obj::new(uid(1))).is_truthy());
    }
}
