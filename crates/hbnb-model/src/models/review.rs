use serde::{Deserialize, Serialize};

use hbnb_types::{FieldKind, TypeTag};

use super::{Place, User};
use crate::entity::{Entity, Record};
use crate::source::RecordSource;

/// A review of a place, written by a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub entity: Entity,
    /// Foreign key to [`Place`].
    #[serde(default)]
    pub place_id: String,
    /// Foreign key to [`User`].
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

impl Review {
    pub fn place(&self, source: &impl RecordSource) -> Option<Place> {
        source.lookup_as(&self.place_id)
    }

    pub fn user(&self, source: &impl RecordSource) -> Option<User> {
        source.lookup_as(&self.user_id)
    }
}

impl Record for Review {
    const TAG: TypeTag = TypeTag::Review;
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("place_id", FieldKind::Str),
        ("user_id", FieldKind::Str),
        ("text", FieldKind::Str),
    ];

    fn from_entity(entity: Entity) -> Self {
        Self {
            entity,
            place_id: String::new(),
            user_id: String::new(),
            text: String::new(),
        }
    }

    record_plumbing!(Review);
}
