use serde::{Deserialize, Serialize};

use hbnb_types::{FieldKind, TypeTag};

use super::{Place, Review};
use crate::entity::{Entity, Record};
use crate::source::RecordSource;

/// A user account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    /// Places owned by this user.
    pub fn places(&self, source: &impl RecordSource) -> Vec<Place> {
        source
            .all_of::<Place>()
            .into_iter()
            .filter(|place| place.user_id == self.entity.id.as_str())
            .collect()
    }

    /// Reviews written by this user.
    pub fn reviews(&self, source: &impl RecordSource) -> Vec<Review> {
        source
            .all_of::<Review>()
            .into_iter()
            .filter(|review| review.user_id == self.entity.id.as_str())
            .collect()
    }
}

impl Record for User {
    const TAG: TypeTag = TypeTag::User;
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("email", FieldKind::Str),
        ("password", FieldKind::Str),
        ("first_name", FieldKind::Str),
        ("last_name", FieldKind::Str),
    ];

    fn from_entity(entity: Entity) -> Self {
        Self {
            entity,
            email: String::new(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    record_plumbing!(User);
}
