use serde::{Deserialize, Serialize};

use hbnb_types::{FieldKind, TypeTag};

use crate::entity::{Entity, Record};

/// A record with nothing but identity and timestamps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseModel {
    #[serde(flatten)]
    pub entity: Entity,
}

impl Record for BaseModel {
    const TAG: TypeTag = TypeTag::BaseModel;
    const FIELDS: &'static [(&'static str, FieldKind)] = &[];

    fn from_entity(entity: Entity) -> Self {
        Self { entity }
    }

    record_plumbing!(BaseModel);
}
