use serde_json::{Map, Value};

use hbnb_types::{EntityId, FieldKind, FieldValue, RecordKey, TypeTag};

use crate::entity::{Entity, Record};
use crate::error::ModelResult;
use crate::models::{Amenity, BaseModel, City, Place, Review, State, User};

/// Any stored record, dispatched by [`TypeTag`].
///
/// The set of record types is closed; reconstruction from storage matches
/// on the tag instead of looking types up by name at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum Model {
    BaseModel(BaseModel),
    User(User),
    State(State),
    City(City),
    Amenity(Amenity),
    Place(Place),
    Review(Review),
}

macro_rules! dispatch {
    ($model:expr, $record:ident => $body:expr) => {
        match $model {
            Model::BaseModel($record) => $body,
            Model::User($record) => $body,
            Model::State($record) => $body,
            Model::City($record) => $body,
            Model::Amenity($record) => $body,
            Model::Place($record) => $body,
            Model::Review($record) => $body,
        }
    };
}

macro_rules! by_tag {
    ($tag:expr, $ty:ident => $body:expr) => {
        match $tag {
            TypeTag::BaseModel => {
                type $ty = BaseModel;
                $body
            }
            TypeTag::User => {
                type $ty = User;
                $body
            }
            TypeTag::State => {
                type $ty = State;
                $body
            }
            TypeTag::City => {
                type $ty = City;
                $body
            }
            TypeTag::Amenity => {
                type $ty = Amenity;
                $body
            }
            TypeTag::Place => {
                type $ty = Place;
                $body
            }
            TypeTag::Review => {
                type $ty = Review;
                $body
            }
        }
    };
}

impl Model {
    /// A record of the given type around `entity`, with default fields.
    pub fn with_entity(tag: TypeTag, entity: Entity) -> Self {
        by_tag!(tag, R => R::from_entity(entity).into_model())
    }

    /// Dispatch a stored mapping to the reconstruction path of `tag`.
    pub fn from_fields(tag: TypeTag, map: &Map<String, Value>) -> ModelResult<Self> {
        by_tag!(tag, R => Ok(R::from_fields(map)?.into_model()))
    }

    /// Field table of the given type.
    pub fn fields_of(tag: TypeTag) -> &'static [(&'static str, FieldKind)] {
        by_tag!(tag, R => R::FIELDS)
    }

    pub fn tag(&self) -> TypeTag {
        dispatch!(self, r => record_tag(r))
    }

    pub fn entity(&self) -> &Entity {
        dispatch!(self, r => r.entity())
    }

    pub fn id(&self) -> &EntityId {
        &self.entity().id
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.tag(), self.id().clone())
    }

    pub fn touch(&mut self) {
        dispatch!(self, r => r.touch())
    }

    pub fn to_fields(&self) -> ModelResult<Map<String, Value>> {
        dispatch!(self, r => r.to_fields())
    }

    pub fn set_field(&mut self, name: &str, value: FieldValue) -> ModelResult<()> {
        dispatch!(self, r => r.set_field(name, value))
    }

    pub fn get_field(&self, name: &str) -> ModelResult<FieldValue> {
        dispatch!(self, r => r.get_field(name))
    }

    pub fn textual_form(&self) -> String {
        dispatch!(self, r => r.textual_form())
    }

    /// Downcast to a concrete record type.
    pub fn into_record<R: Record>(self) -> Option<R> {
        R::from_model(self)
    }
}

fn record_tag<R: Record>(_: &R) -> TypeTag {
    R::TAG
}
