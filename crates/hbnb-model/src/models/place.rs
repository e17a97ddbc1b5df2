use serde::{Deserialize, Serialize};

use hbnb_types::{EntityId, FieldKind, TypeTag};

use super::{Amenity, City, Review, User};
use crate::entity::{Entity, Record};
use crate::source::RecordSource;

/// A listing inside a city, owned by a user.
///
/// The place/amenity link is many-to-many and lives entirely in
/// `amenity_ids`; there is no separate join record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub entity: Entity,
    /// Foreign key to [`City`].
    #[serde(default)]
    pub city_id: String,
    /// Foreign key to [`User`].
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub number_rooms: i64,
    #[serde(default)]
    pub number_bathrooms: i64,
    #[serde(default)]
    pub max_guest: i64,
    #[serde(default)]
    pub price_by_night: i64,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Identities of linked [`Amenity`] records, without duplicates.
    #[serde(default)]
    pub amenity_ids: Vec<EntityId>,
}

impl Place {
    /// Reviews whose `place_id` is this place's identity.
    pub fn reviews(&self, source: &impl RecordSource) -> Vec<Review> {
        source
            .all_of::<Review>()
            .into_iter()
            .filter(|review| review.place_id == self.entity.id.as_str())
            .collect()
    }

    /// Linked amenities, in link order. Identities that no longer resolve
    /// are skipped.
    pub fn amenities(&self, source: &impl RecordSource) -> Vec<Amenity> {
        self.amenity_ids
            .iter()
            .filter_map(|id| source.lookup_as::<Amenity>(id.as_str()))
            .collect()
    }

    /// Link an amenity. Returns `false` if it was already linked.
    pub fn add_amenity(&mut self, amenity: &Amenity) -> bool {
        if self.amenity_ids.contains(&amenity.entity.id) {
            return false;
        }
        self.amenity_ids.push(amenity.entity.id.clone());
        true
    }

    /// Unlink an amenity. Returns `false` if it was not linked.
    pub fn remove_amenity(&mut self, id: &EntityId) -> bool {
        let before = self.amenity_ids.len();
        self.amenity_ids.retain(|linked| linked != id);
        self.amenity_ids.len() != before
    }

    pub fn city(&self, source: &impl RecordSource) -> Option<City> {
        source.lookup_as(&self.city_id)
    }

    pub fn user(&self, source: &impl RecordSource) -> Option<User> {
        source.lookup_as(&self.user_id)
    }
}

impl Record for Place {
    const TAG: TypeTag = TypeTag::Place;
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("city_id", FieldKind::Str),
        ("user_id", FieldKind::Str),
        ("name", FieldKind::Str),
        ("description", FieldKind::Str),
        ("number_rooms", FieldKind::Int),
        ("number_bathrooms", FieldKind::Int),
        ("max_guest", FieldKind::Int),
        ("price_by_night", FieldKind::Int),
        ("latitude", FieldKind::Float),
        ("longitude", FieldKind::Float),
        ("amenity_ids", FieldKind::Ids),
    ];

    fn from_entity(entity: Entity) -> Self {
        Self {
            entity,
            city_id: String::new(),
            user_id: String::new(),
            name: String::new(),
            description: String::new(),
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: 0.0,
            longitude: 0.0,
            amenity_ids: Vec::new(),
        }
    }

    record_plumbing!(Place);
}
