//! Foundation types for the HBNB object store.
//!
//! This crate provides the identity, temporal, and addressing types used by
//! every other HBNB crate. It has no knowledge of the domain records
//! themselves; those live in `hbnb-model`.
//!
//! # Key Types
//!
//! - [`EntityId`] -- Opaque 128-bit identity token, string-encoded
//! - [`Timestamp`] -- Microsecond-resolution UTC timestamp with a fixed ISO-8601 form
//! - [`TypeTag`] -- Discriminator naming a domain type
//! - [`RecordKey`] -- Composite `<TypeTag>.<identity>` address
//! - [`FieldValue`] / [`FieldKind`] -- Primitive values a record field may hold

pub mod error;
pub mod identity;
pub mod key;
pub mod temporal;
pub mod value;

pub use error::TypeError;
pub use identity::EntityId;
pub use key::{RecordKey, TypeTag};
pub use temporal::Timestamp;
pub use value::{FieldKind, FieldValue};
