//! Domain records for the HBNB object store.
//!
//! Every record embeds an [`Entity`] (identity plus timestamps) and
//! implements [`Record`], which supplies the flat serialized form, the
//! reconstruction path, and field-table based updates. [`Model`] is the
//! closed sum of all record types and is what registries hold.
//!
//! # Record Types
//!
//! - [`BaseModel`] -- entity fields only
//! - [`User`] -- an account; owns places and reviews
//! - [`State`] -- owns cities through `City::state_id`
//! - [`City`] -- owns places through `Place::city_id`
//! - [`Amenity`] -- linked to places through `Place::amenity_ids`
//! - [`Place`] -- a listing; owns reviews through `Review::place_id`
//! - [`Review`] -- a review of a place
//!
//! # Relationships
//!
//! Relationship accessors take a [`RecordSource`] and resolve foreign keys
//! at call time. Foreign keys are never checked on write; a key with no
//! matching record is omitted from results rather than reported as an error.

pub mod entity;
pub mod error;
pub mod model;
pub mod models;
pub mod source;

pub use entity::{Entity, Record, CLASS_KEY, PROTECTED_FIELDS};
pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use models::{Amenity, BaseModel, City, Place, Review, State, User};
pub use source::RecordSource;

pub use hbnb_types::{EntityId, FieldKind, FieldValue, RecordKey, Timestamp, TypeTag};
