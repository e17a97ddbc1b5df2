use serde::{Deserialize, Serialize};

use hbnb_types::{FieldKind, TypeTag};

use super::Place;
use crate::entity::{Entity, Record};
use crate::source::RecordSource;

/// An amenity. Linked to places through `Place::amenity_ids`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(default)]
    pub name: String,
}

impl Amenity {
    /// Every place listing this amenity.
    pub fn places(&self, source: &impl RecordSource) -> Vec<Place> {
        source
            .all_of::<Place>()
            .into_iter()
            .filter(|place| place.amenity_ids.contains(&self.entity.id))
            .collect()
    }
}

impl Record for Amenity {
    const TAG: TypeTag = TypeTag::Amenity;
    const FIELDS: &'static [(&'static str, FieldKind)] = &[("name", FieldKind::Str)];

    fn from_entity(entity: Entity) -> Self {
        Self {
            entity,
            name: String::new(),
        }
    }

    record_plumbing!(Amenity);
}
