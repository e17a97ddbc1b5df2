//! Whole-file JSON snapshot of a registry.
//!
//! On-disk format (a single JSON object, two levels deep):
//!
//! ```text
//! {
//!   "<TypeTag>.<id>": {
//!     "__class__": "<TypeTag>",
//!     "id": "<id>",
//!     "created_at": "YYYY-MM-DDTHH:MM:SS.ffffff",
//!     "updated_at": "YYYY-MM-DDTHH:MM:SS.ffffff",
//!     "<field>": <string | integer | float | [identity, ...]>,
//!     ...
//!   },
//!   ...
//! }
//! ```
//!
//! Saves go to a temporary file in the same directory which is then renamed
//! over the snapshot, so readers see either the old file or the new one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use hbnb_model::{Model, RecordSource, CLASS_KEY};
use hbnb_types::TypeTag;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::Registry;

/// A stored record that was not loaded because its type is unknown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Composite key as written in the file.
    pub key: String,
    /// The unrecognized `__class__` value.
    pub class: String,
}

/// Outcome of a [`FileSnapshot::reload`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// `false` when there was no snapshot file (first run).
    pub file_found: bool,
    /// Records reconstructed and registered.
    pub loaded: usize,
    /// Records skipped for naming an unknown type.
    pub skipped: Vec<SkippedRecord>,
}

/// Snapshot persistence for a registry.
///
/// `save` and `reload` are serialized through an internal lock, so within
/// one process no reload observes a half-written file and no two saves
/// interleave. There is no cross-process coordination; the last writer wins.
pub struct FileSnapshot {
    config: StoreConfig,
    io_lock: Mutex<()>,
}

impl FileSnapshot {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            io_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.snapshot_path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Serialize every record into the two-level snapshot document.
    pub fn encode(source: &impl RecordSource) -> StoreResult<Map<String, Value>> {
        let mut document = Map::new();
        for model in source.all(None) {
            let fields = model
                .to_fields()
                .map_err(|e| StoreError::Serialization(format!("{}: {e}", model.key())))?;
            document.insert(model.key().to_string(), Value::Object(fields));
        }
        Ok(document)
    }

    /// Decode a snapshot document into records without registering them.
    ///
    /// Records naming an unknown type are skipped and reported. Anything
    /// else that does not fit the expected structure fails the whole decode.
    pub fn decode(&self, document: Value) -> StoreResult<(Vec<Model>, Vec<SkippedRecord>)> {
        let Value::Object(document) = document else {
            return Err(self.malformed("top level is not an object"));
        };

        let mut models = Vec::with_capacity(document.len());
        let mut skipped = Vec::new();

        for (key, record) in document {
            let Value::Object(fields) = record else {
                return Err(self.malformed(format!("{key}: record is not an object")));
            };
            if let Some((field, _)) = fields.iter().find(|(_, v)| v.is_object()) {
                return Err(self.malformed(format!("{key}: field {field:?} is nested")));
            }
            let class = match fields.get(CLASS_KEY) {
                Some(Value::String(class)) => class.clone(),
                _ => return Err(self.malformed(format!("{key}: missing {CLASS_KEY}"))),
            };
            let tag: TypeTag = match class.parse() {
                Ok(tag) => tag,
                Err(_) => {
                    warn!(%key, %class, "skipping record of unknown type");
                    skipped.push(SkippedRecord { key, class });
                    continue;
                }
            };

            let model = Model::from_fields(tag, &fields)
                .map_err(|e| self.malformed(format!("{key}: {e}")))?;
            if model.key().to_string() != key {
                return Err(self.malformed(format!(
                    "{key}: key does not match record {}",
                    model.key()
                )));
            }
            models.push(model);
        }

        Ok((models, skipped))
    }

    /// Write every record in `source` to the snapshot file, replacing it.
    ///
    /// On failure the previous snapshot file is left intact.
    pub fn save(&self, source: &impl RecordSource) -> StoreResult<usize> {
        let _guard = self.io_lock.lock().expect("snapshot lock poisoned");

        let document = Self::encode(source)?;
        let count = document.len();
        let document = Value::Object(document);
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(&document)
        } else {
            serde_json::to_vec(&document)
        }
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let path = self.path();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        if self.config.sync_on_save {
            tmp.as_file().sync_all()?;
        }
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

        info!(path = %path.display(), records = count, bytes = bytes.len(), "snapshot saved");
        Ok(count)
    }

    /// Load the snapshot file into `registry`.
    ///
    /// A missing file leaves the registry untouched. All records are decoded
    /// before any is registered, so an error leaves the registry untouched
    /// too. Loaded records overwrite registered ones with the same key.
    pub fn reload(&self, registry: &impl Registry) -> StoreResult<ReloadReport> {
        let _guard = self.io_lock.lock().expect("snapshot lock poisoned");

        let path = self.path();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot file; nothing to reload");
                return Ok(ReloadReport::default());
            }
            Err(e) => return Err(e.into()),
        };

        let document: Value =
            serde_json::from_slice(&bytes).map_err(|e| self.malformed(e.to_string()))?;
        let (models, skipped) = self.decode(document)?;
        let loaded = models.len();
        registry.register_all(models);

        info!(
            path = %path.display(),
            loaded,
            skipped = skipped.len(),
            "snapshot reloaded"
        );
        Ok(ReloadReport {
            file_found: true,
            loaded,
            skipped,
        })
    }

    fn malformed(&self, reason: impl Into<String>) -> StoreError {
        StoreError::MalformedSnapshot {
            path: self.path().to_path_buf(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Debug for FileSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSnapshot")
            .field("path", &self.config.snapshot_path)
            .finish()
    }
}
