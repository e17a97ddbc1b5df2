//! Concrete record types.

/// The `Record` methods that only move the embedded entity or the `Model`
/// variant around.
macro_rules! record_plumbing {
    ($variant:ident) => {
        fn entity(&self) -> &$crate::entity::Entity {
            &self.entity
        }

        fn entity_mut(&mut self) -> &mut $crate::entity::Entity {
            &mut self.entity
        }

        fn into_model(self) -> $crate::model::Model {
            $crate::model::Model::$variant(self)
        }

        fn from_model(model: $crate::model::Model) -> Option<Self> {
            match model {
                $crate::model::Model::$variant(record) => Some(record),
                _ => None,
            }
        }
    };
}

mod amenity;
mod base;
mod city;
mod place;
mod review;
mod state;
mod user;

pub use amenity::Amenity;
pub use base::BaseModel;
pub use city::City;
pub use place::Place;
pub use review::Review;
pub use state::State;
pub use user::User;
