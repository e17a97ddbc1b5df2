use serde::{Deserialize, Serialize};

use hbnb_types::{FieldKind, TypeTag};

use super::{Place, State};
use crate::entity::{Entity, Record};
use crate::source::RecordSource;

/// A city inside a state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(flatten)]
    pub entity: Entity,
    /// Foreign key to [`State`].
    #[serde(default)]
    pub state_id: String,
    #[serde(default)]
    pub name: String,
}

impl City {
    /// Every place whose `city_id` is this city's identity.
    pub fn places(&self, source: &impl RecordSource) -> Vec<Place> {
        source
            .all_of::<Place>()
            .into_iter()
            .filter(|place| place.city_id == self.entity.id.as_str())
            .collect()
    }

    /// The owning state, if it still exists.
    pub fn state(&self, source: &impl RecordSource) -> Option<State> {
        source.lookup_as(&self.state_id)
    }
}

impl Record for City {
    const TAG: TypeTag = TypeTag::City;
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("state_id", FieldKind::Str),
        ("name", FieldKind::Str),
    ];

    fn from_entity(entity: Entity) -> Self {
        Self {
            entity,
            state_id: String::new(),
            name: String::new(),
        }
    }

    record_plumbing!(City);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    #[test]
    fn state_resolves_back_reference() {
        let state = State::from_entity(Entity::new());
        let mut city = City::from_entity(Entity::new());
        city.state_id = state.entity.id.to_string();
        let source: Vec<Model> = vec![state.clone().into_model(), city.clone().into_model()];
        assert_eq!(city.state(&source), Some(state));
    }

    #[test]
    fn dangling_state_is_none() {
        let mut city = City::from_entity(Entity::new());
        city.state_id = "gone".into();
        let source: Vec<Model> = vec![city.clone().into_model()];
        assert_eq!(city.state(&source), None);
    }

    #[test]
    fn unset_state_is_none() {
        let city = City::from_entity(Entity::new());
        let source: Vec<Model> = Vec::new();
        assert!(city.state(&source).is_none());
    }

    #[test]
    fn places_filters_by_city_id() {
        let city = City::from_entity(Entity::new());
        let mut inside = Place::from_entity(Entity::new());
        inside.city_id = city.entity.id.to_string();
        let elsewhere = Place::from_entity(Entity::new());
        let source: Vec<Model> = vec![
            city.clone().into_model(),
            inside.clone().into_model(),
            elsewhere.into_model(),
        ];
        assert_eq!(city.places(&source), vec![inside]);
    }
}
