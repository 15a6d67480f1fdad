//! The in-memory object database.
//!
//! A database is an insertion-ordered mapping from object id to a
//! record. Iteration order is observable (it determines the order of
//! object-set scans), so the mapping must preserve insertion order.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::value::Value;

/// One object record: an id, a concrete type name, and named
/// attributes.
///
/// Attribute values are scalars, object references, or lists of object
/// references (link multiplicity).
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    /// The object id.
    pub id: Uuid,
    /// The concrete type name.
    pub type_name: String,
    /// Named attributes, in declaration order.
    pub fields: IndexMap<String, Value>,
}

impl ObjectRecord {
    /// Creates a record with no attributes.
    #[must_use]
    pub fn new(id: Uuid, type_name: impl Into<String>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Adds a scalar attribute.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Adds a single-object link.
    #[must_use]
    pub fn link(mut self, name: impl Into<String>, target: Uuid) -> Self {
        self.fields
            .insert(name.into(), Value::Object(crate::value::Obj::new(target)));
        self
    }

    /// Adds a multi-object link.
    #[must_use]
    pub fn links(mut self, name: impl Into<String>, targets: impl IntoIterator<Item = Uuid>) -> Self {
        self.fields.insert(
            name.into(),
            Value::List(
                targets
                    .into_iter()
                    .map(|id| Value::Object(crate::value::Obj::new(id)))
                    .collect(),
            ),
        );
        self
    }

    /// Reads an attribute as a multiset: a list yields its elements, a
    /// scalar yields itself, an absent attribute yields nothing.
    ///
    /// The id and type name are readable under their reserved names.
    #[must_use]
    pub fn get_links(&self, name: &str) -> Vec<Value> {
        if name == "id" {
            return vec![Value::Uuid(self.id)];
        }
        if name == "__type__" {
            return vec![Value::Str(self.type_name.clone())];
        }
        match self.fields.get(name) {
            Some(Value::List(items)) => items.clone(),
            Some(other) => vec![other.clone()],
            None => Vec::new(),
        }
    }
}

/// The object database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    records: IndexMap<Uuid, ObjectRecord>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a database from records, keyed by their ids. Insertion
    /// order is preserved.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ObjectRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    /// Inserts a record, replacing any record with the same id.
    pub fn insert(&mut self, record: ObjectRecord) {
        self.records.insert(record.id, record);
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&ObjectRecord> {
        self.records.get(&id)
    }

    /// Iterates the records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.records.values()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the database holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
