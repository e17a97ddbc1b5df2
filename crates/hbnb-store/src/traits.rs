use hbnb_model::{Entity, Model, Record, RecordSource};
use hbnb_types::RecordKey;

use crate::error::StoreResult;

/// Live mapping from composite key to record.
///
/// All implementations must satisfy these invariants:
/// - A record is addressed only by `(type_tag, identity)`.
/// - `register` overwrites silently (last write wins), which keeps reloads
///   idempotent.
/// - `delete` never cascades. Deleting a state leaves its cities in place
///   with a dangling `state_id`.
/// - Enumeration order is insertion order, for display only.
pub trait Registry: RecordSource + Send + Sync {
    /// Insert or replace a record. Returns the record it replaced.
    fn register(&self, model: Model) -> Option<Model>;

    /// Remove a record and return it.
    ///
    /// Returns `Err(StoreError::NotFound)` if nothing is registered under
    /// `key`.
    fn delete(&self, key: &RecordKey) -> StoreResult<Model>;

    /// Replace a record that is already registered, keeping its position.
    ///
    /// The existence check and the write happen under one lock. Returns the
    /// record it replaced, or `Err(StoreError::NotFound)` if nothing is
    /// registered under the model's key.
    fn replace(&self, model: Model) -> StoreResult<Model>;

    /// Remove every record. Intended for tests and process reset.
    fn clear(&self);

    /// Number of registered records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register many records.
    ///
    /// Default implementation calls `register()` for each record. Backends
    /// may override to take their lock once.
    fn register_all(&self, models: Vec<Model>) {
        for model in models {
            self.register(model);
        }
    }

    /// Construct a new record with a fresh identity and register it.
    ///
    /// `init` fills in fields before the record becomes visible.
    fn create<R: Record>(&self, init: impl FnOnce(&mut R)) -> R
    where
        Self: Sized,
    {
        let mut record = R::from_entity(Entity::new());
        init(&mut record);
        self.register(record.clone().into_model());
        record
    }

    /// Store a changed record, refreshing its `updated_at`.
    ///
    /// The record must already be registered; it is left as is otherwise.
    fn update<R: Record>(&self, record: &mut R) -> StoreResult<()>
    where
        Self: Sized,
    {
        let mut touched = record.clone();
        touched.touch();
        self.replace(touched.clone().into_model())?;
        *record = touched;
        Ok(())
    }
}
