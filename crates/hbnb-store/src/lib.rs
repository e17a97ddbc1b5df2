//! Registry and snapshot persistence for the HBNB object store.
//!
//! [`InMemoryRegistry`] holds the live records, keyed by `<TypeTag>.<id>`.
//! [`FileSnapshot`] writes the whole registry to a single JSON file and
//! loads it back. [`Storage`] ties the two together behind a
//! string-addressed API and saves after every mutation.

pub mod config;
pub mod error;
pub mod memory;
pub mod snapshot;
pub mod storage;
pub mod traits;

pub use config::{StoreConfig, DEFAULT_SNAPSHOT_PATH};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRegistry;
pub use snapshot::{FileSnapshot, ReloadReport, SkippedRecord};
pub use storage::Storage;
pub use traits::Registry;
