//! Read access to live records, as needed by relationship accessors.
//!
//! Relationships are never stored as object graphs. A record holds foreign
//! keys by value, and accessors resolve them against a [`RecordSource`] at
//! call time (a full scan for one-to-many, a point lookup per identity for
//! the rest).

use hbnb_types::{EntityId, RecordKey, TypeTag};
use tracing::debug;

use crate::entity::Record;
use crate::model::Model;

/// A queryable set of live records, typically a registry.
pub trait RecordSource {
    /// Look up one record by composite key.
    fn lookup(&self, key: &RecordKey) -> Option<Model>;

    /// Every record, optionally restricted to one type.
    fn all(&self, tag: Option<TypeTag>) -> Vec<Model>;

    /// Typed point lookup. Returns `None` for unknown or empty identities.
    fn lookup_as<R: Record>(&self, id: &str) -> Option<R>
    where
        Self: Sized,
    {
        let id = EntityId::parse(id).ok()?;
        let key = RecordKey::new(R::TAG, id);
        match self.lookup(&key).and_then(R::from_model) {
            Some(record) => Some(record),
            None => {
                debug!(%key, "dangling reference omitted");
                None
            }
        }
    }

    /// Typed scan over every record of type `R`.
    fn all_of<R: Record>(&self) -> Vec<R>
    where
        Self: Sized,
    {
        self.all(Some(R::TAG))
            .into_iter()
            .filter_map(R::from_model)
            .collect()
    }
}

/// Detached records (e.g. a decoded snapshot) can be queried directly.
impl RecordSource for Vec<Model> {
    fn lookup(&self, key: &RecordKey) -> Option<Model> {
        self.iter().find(|m| m.key() == *key).cloned()
    }

    fn all(&self, tag: Option<TypeTag>) -> Vec<Model> {
        self.iter()
            .filter(|m| tag.map_or(true, |t| m.tag() == t))
            .cloned()
            .collect()
    }
}
