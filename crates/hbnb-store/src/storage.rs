use hbnb_model::{Entity, Model, RecordSource};
use hbnb_types::{EntityId, FieldValue, RecordKey, TypeTag};
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryRegistry;
use crate::snapshot::{FileSnapshot, ReloadReport};
use crate::traits::Registry;

/// String-addressed access to the object store.
///
/// Every mutating call writes the snapshot as it will look after the change,
/// and only then applies the change to the registry. A command that succeeds
/// is durable; one whose save fails leaves the registry as it was.
pub struct Storage {
    registry: InMemoryRegistry,
    snapshot: FileSnapshot,
}

impl Storage {
    /// Open the store and load any existing snapshot.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let storage = Self {
            registry: InMemoryRegistry::new(),
            snapshot: FileSnapshot::new(config),
        };
        let report = storage.reload()?;
        info!(
            path = %storage.snapshot.path().display(),
            found = report.file_found,
            records = report.loaded,
            "storage opened"
        );
        Ok(storage)
    }

    pub fn registry(&self) -> &InMemoryRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> &FileSnapshot {
        &self.snapshot
    }

    pub fn save(&self) -> StoreResult<usize> {
        self.snapshot.save(&self.registry)
    }

    pub fn reload(&self) -> StoreResult<ReloadReport> {
        self.snapshot.reload(&self.registry)
    }

    // ---- Record operations ----

    /// Create a record of type `tag` with the given field overrides.
    ///
    /// All overrides are checked before the record is registered; one bad
    /// field rejects the whole call.
    pub fn create_entity(
        &self,
        tag: &str,
        overrides: impl IntoIterator<Item = (String, FieldValue)>,
    ) -> StoreResult<EntityId> {
        let tag: TypeTag = tag.parse()?;
        let mut model = Model::with_entity(tag, Entity::new());
        for (field, value) in overrides {
            model.set_field(&field, value)?;
        }
        let id = model.id().clone();
        self.save_with(&model.key(), Some(&model))?;
        self.registry.register(model);
        Ok(id)
    }

    pub fn get_entity(&self, tag: &str, id: &str) -> StoreResult<Model> {
        let key = parse_key(tag, id)?;
        self.registry
            .lookup(&key)
            .ok_or(StoreError::NotFound(key))
    }

    pub fn delete_entity(&self, tag: &str, id: &str) -> StoreResult<()> {
        let key = parse_key(tag, id)?;
        if self.registry.lookup(&key).is_none() {
            return Err(StoreError::NotFound(key));
        }
        self.save_with(&key, None)?;
        self.registry.delete(&key)?;
        Ok(())
    }

    /// Textual forms of every record, optionally of one type.
    pub fn list_entities(&self, tag: Option<&str>) -> StoreResult<Vec<String>> {
        let tag = tag.map(str::parse::<TypeTag>).transpose()?;
        Ok(self
            .registry
            .all(tag)
            .iter()
            .map(Model::textual_form)
            .collect())
    }

    pub fn count(&self, tag: Option<&str>) -> StoreResult<usize> {
        let tag = tag.map(str::parse::<TypeTag>).transpose()?;
        Ok(self.registry.count(tag))
    }

    /// Set one declared field and refresh `updated_at`.
    pub fn update_field(
        &self,
        tag: &str,
        id: &str,
        field: &str,
        value: FieldValue,
    ) -> StoreResult<()> {
        let mut model = self.get_entity(tag, id)?;
        model.set_field(field, value)?;
        model.touch();
        self.save_with(&model.key(), Some(&model))?;
        self.registry.replace(model)?;
        Ok(())
    }

    /// Save the registry with the record under `key` set to `change`, or
    /// removed if `change` is `None`.
    fn save_with(&self, key: &RecordKey, change: Option<&Model>) -> StoreResult<()> {
        let pending = Pending {
            registry: &self.registry,
            key,
            change,
        };
        if let Err(e) = self.snapshot.save(&pending) {
            warn!(%key, error = %e, "save failed; registry left unchanged");
            return Err(e);
        }
        Ok(())
    }
}

/// The registry as it will look once one record is set or removed.
struct Pending<'a> {
    registry: &'a InMemoryRegistry,
    key: &'a RecordKey,
    change: Option<&'a Model>,
}

impl RecordSource for Pending<'_> {
    fn lookup(&self, key: &RecordKey) -> Option<Model> {
        if key == self.key {
            return self.change.cloned();
        }
        self.registry.lookup(key)
    }

    fn all(&self, tag: Option<TypeTag>) -> Vec<Model> {
        let mut seen = false;
        let mut models: Vec<Model> = self
            .registry
            .all(tag)
            .into_iter()
            .filter_map(|model| {
                if model.key() != *self.key {
                    return Some(model);
                }
                seen = true;
                self.change.cloned()
            })
            .collect();
        if !seen && tag.map_or(true, |t| t == self.key.tag) {
            models.extend(self.change.cloned());
        }
        models
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("registry", &self.registry)
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

fn parse_key(tag: &str, id: &str) -> StoreResult<RecordKey> {
    let tag: TypeTag = tag.parse()?;
    let id = EntityId::parse(id)?;
    Ok(RecordKey::new(tag, id))
}
