use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use hbnb_model::{Model, RecordSource};
use hbnb_types::{RecordKey, TypeTag};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::Registry;

struct Slot {
    /// Insertion sequence; kept when the record is overwritten.
    seq: u64,
    model: Model,
}

#[derive(Default)]
struct Inner {
    records: HashMap<RecordKey, Slot>,
    next_seq: u64,
}

impl Inner {
    fn insert(&mut self, model: Model) -> Option<Model> {
        match self.records.entry(model.key()) {
            Entry::Occupied(mut slot) => {
                debug!(key = %slot.key(), "registry overwrite");
                Some(std::mem::replace(&mut slot.get_mut().model, model))
            }
            Entry::Vacant(slot) => {
                debug!(key = %slot.key(), "registry insert");
                slot.insert(Slot {
                    seq: self.next_seq,
                    model,
                });
                self.next_seq += 1;
                None
            }
        }
    }
}

/// In-memory, HashMap-based registry.
///
/// All records are held behind a `RwLock`, so relationship scans never
/// observe a half-applied mutation. Records are cloned on read and write.
pub struct InMemoryRegistry {
    inner: RwLock<Inner>,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Count records, optionally of one type.
    pub fn count(&self, tag: Option<TypeTag>) -> usize {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .records
            .keys()
            .filter(|key| tag.map_or(true, |t| key.tag == t))
            .count()
    }

    /// Every registered key, in insertion order.
    pub fn keys(&self) -> Vec<RecordKey> {
        self.all(None).iter().map(Model::key).collect()
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSource for InMemoryRegistry {
    fn lookup(&self, key: &RecordKey) -> Option<Model> {
        let inner = self.inner.read().expect("lock poisoned");
        inner.records.get(key).map(|slot| slot.model.clone())
    }

    fn all(&self, tag: Option<TypeTag>) -> Vec<Model> {
        let inner = self.inner.read().expect("lock poisoned");
        let mut slots: Vec<&Slot> = inner
            .records
            .iter()
            .filter(|(key, _)| tag.map_or(true, |t| key.tag == t))
            .map(|(_, slot)| slot)
            .collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| slot.model.clone()).collect()
    }
}

impl Registry for InMemoryRegistry {
    fn register(&self, model: Model) -> Option<Model> {
        self.inner.write().expect("lock poisoned").insert(model)
    }

    fn delete(&self, key: &RecordKey) -> StoreResult<Model> {
        let mut inner = self.inner.write().expect("lock poisoned");
        match inner.records.remove(key) {
            Some(slot) => {
                debug!(%key, "registry delete");
                Ok(slot.model)
            }
            None => Err(StoreError::NotFound(key.clone())),
        }
    }

    fn replace(&self, model: Model) -> StoreResult<Model> {
        let key = model.key();
        let mut inner = self.inner.write().expect("lock poisoned");
        match inner.records.get_mut(&key) {
            Some(slot) => {
                debug!(%key, "registry replace");
                Ok(std::mem::replace(&mut slot.model, model))
            }
            None => Err(StoreError::NotFound(key)),
        }
    }

    fn clear(&self) {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.records.clear();
    }

    fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").records.len()
    }

    fn register_all(&self, models: Vec<Model>) {
        let mut inner = self.inner.write().expect("lock poisoned");
        for model in models {
            inner.insert(model);
        }
    }
}

impl std::fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryRegistry")
            .field("record_count", &count)
            .finish()
    }
}
