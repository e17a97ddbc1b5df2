use serde::{Deserialize, Serialize};

use hbnb_types::{FieldKind, TypeTag};

use super::City;
use crate::entity::{Entity, Record};
use crate::source::RecordSource;

/// A state. Cities point at it through `City::state_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(default)]
    pub name: String,
}

impl State {
    /// Every city whose `state_id` is this state's identity.
    ///
    /// Full scan of the source; O(n) in the number of cities.
    pub fn cities(&self, source: &impl RecordSource) -> Vec<City> {
        source
            .all_of::<City>()
            .into_iter()
            .filter(|city| city.state_id == self.entity.id.as_str())
            .collect()
    }
}

impl Record for State {
    const TAG: TypeTag = TypeTag::State;
    const FIELDS: &'static [(&'static str, FieldKind)] = &[("name", FieldKind::Str)];

    fn from_entity(entity: Entity) -> Self {
        Self {
            entity,
            name: String::new(),
        }
    }

    record_plumbing!(State);
}
