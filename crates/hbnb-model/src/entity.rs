use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use hbnb_types::{EntityId, FieldKind, FieldValue, RecordKey, Timestamp, TypeTag};

use tracing::warn;

use crate::error::{ModelError, ModelResult};
use crate::model::Model;

/// Key carrying the type discriminator in a serialized record.
pub const CLASS_KEY: &str = "__class__";

/// Fields owned by [`Entity`]; never assignable through the field table.
pub const PROTECTED_FIELDS: [&str; 4] = ["id", "created_at", "updated_at", CLASS_KEY];

/// Identity and timestamps shared by every record.
///
/// Domain types embed an `Entity` and delegate to it. A fresh entity is only
/// meant to be created through a registry so that construction and
/// registration happen together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity {
    /// Fresh identity with `created_at == updated_at == now`.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            id: EntityId::generate(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`. Never moves it backwards.
    pub fn touch(&mut self) {
        let now = Timestamp::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

/// A typed domain record backed by an [`Entity`].
///
/// The serialized form is a flat JSON object holding `id`, `created_at`,
/// `updated_at`, `__class__`, and every field in [`Record::FIELDS`].
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Discriminator for this type.
    const TAG: TypeTag;

    /// Assignable fields and their kinds.
    const FIELDS: &'static [(&'static str, FieldKind)];

    /// Build a record around `entity` with every field at its default.
    fn from_entity(entity: Entity) -> Self;

    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    fn into_model(self) -> Model;

    fn from_model(model: Model) -> Option<Self>;

    fn id(&self) -> &EntityId {
        &self.entity().id
    }

    fn key(&self) -> RecordKey {
        RecordKey::new(Self::TAG, self.id().clone())
    }

    fn touch(&mut self) {
        self.entity_mut().touch();
    }

    fn field_kind(name: &str) -> Option<FieldKind> {
        Self::FIELDS
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, kind)| *kind)
    }

    /// Flat field mapping including the `__class__` discriminator.
    ///
    /// Fails if a float field is NaN or infinite.
    fn to_fields(&self) -> ModelResult<Map<String, Value>> {
        let value =
            serde_json::to_value(self).map_err(|e| ModelError::Serialization(e.to_string()))?;
        let Value::Object(mut map) = value else {
            return Err(ModelError::Serialization(format!(
                "{} did not serialize to an object",
                Self::TAG
            )));
        };
        // serde_json writes non-finite floats as null.
        let non_finite = Self::FIELDS.iter().find(|(name, kind)| {
            *kind == FieldKind::Float && map.get(*name).map_or(true, Value::is_null)
        });
        if let Some((name, _)) = non_finite {
            return Err(ModelError::NonFiniteFloat {
                tag: Self::TAG,
                field: name.to_string(),
            });
        }
        map.insert(CLASS_KEY.to_string(), Value::String(Self::TAG.to_string()));
        Ok(map)
    }

    /// Reconstruct from a stored mapping, taking identity and timestamps
    /// verbatim.
    fn from_fields(map: &Map<String, Value>) -> ModelResult<Self> {
        match map.get(CLASS_KEY) {
            Some(Value::String(class)) if class == Self::TAG.as_str() => {}
            Some(other) => {
                return Err(ModelError::ClassMismatch {
                    expected: Self::TAG,
                    found: other.as_str().unwrap_or_default().to_string(),
                })
            }
            None => return Err(ModelError::MissingClass),
        }
        serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| ModelError::Serialization(format!("{}: {e}", Self::TAG)))
    }

    /// Assign one declared field. Does not touch `updated_at`.
    fn set_field(&mut self, name: &str, value: FieldValue) -> ModelResult<()> {
        if PROTECTED_FIELDS.contains(&name) {
            return Err(ModelError::ProtectedField(name.to_string()));
        }
        let kind = Self::field_kind(name).ok_or_else(|| ModelError::UnknownField {
            tag: Self::TAG,
            field: name.to_string(),
        })?;
        let value = value.conform(kind).map_err(|source| ModelError::InvalidValue {
            tag: Self::TAG,
            field: name.to_string(),
            source,
        })?;

        let mut map = self.to_fields()?;
        map.insert(name.to_string(), value.to_json());
        *self = Self::from_fields(&map)?;
        Ok(())
    }

    /// Current value of a declared field.
    fn get_field(&self, name: &str) -> ModelResult<FieldValue> {
        if Self::field_kind(name).is_none() {
            return Err(ModelError::UnknownField {
                tag: Self::TAG,
                field: name.to_string(),
            });
        }
        let map = self.to_fields()?;
        map.get(name)
            .and_then(FieldValue::from_json)
            .ok_or_else(|| ModelError::Serialization(format!("{}.{name} unreadable", Self::TAG)))
    }

    /// Display form `[<Tag>] (<id>) {<fields>}`. Not used for persistence.
    fn textual_form(&self) -> String {
        let fields = match self.to_fields() {
            Ok(mut map) => {
                map.remove(CLASS_KEY);
                Value::Object(map).to_string()
            }
            Err(e) => {
                warn!(key = %self.key(), error = %e, "record has no serialized form");
                format!("<{e}>")
            }
        };
        format!("[{}] ({}) {}", Self::TAG, self.id(), fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Place, State};
    use hbnb_types::TypeError;

    #[test]
    fn new_entity_has_equal_timestamps() {
        let e = Entity::new();
        assert_eq!(e.created_at, e.updated_at);
    }

    #[test]
    fn touch_advances_updated_at_only() {
        let mut e = Entity::new();
        let created = e.created_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        e.touch();
        assert_eq!(e.created_at, created);
        assert!(e.updated_at > created);
    }

    #[test]
    fn to_fields_is_flat_and_tagged() {
        let state = State::from_entity(Entity::new());
        let map = state.to_fields().unwrap();
        assert_eq!(map[CLASS_KEY], "State");
        for key in ["id", "created_at", "updated_at", "name"] {
            assert!(map.contains_key(key), "missing {key}");
        }
        assert!(map
            .values()
            .all(|v| !v.is_object()));
    }

    #[test]
    fn from_fields_keeps_identity_and_timestamps() {
        let state = State::from_entity(Entity::new());
        let map = state.to_fields().unwrap();
        let back = State::from_fields(&map).unwrap();
        assert_eq!(back.id(), state.id());
        assert_eq!(back.entity(), state.entity());
    }

    #[test]
    fn from_fields_checks_discriminator() {
        let state = State::from_entity(Entity::new());
        let mut map = state.to_fields().unwrap();
        map.insert(CLASS_KEY.into(), Value::String("City".into()));
        assert!(matches!(
            State::from_fields(&map),
            Err(ModelError::ClassMismatch { .. })
        ));
        map.remove(CLASS_KEY);
        assert!(matches!(State::from_fields(&map), Err(ModelError::MissingClass)));
    }

    #[test]
    fn from_fields_requires_identity() {
        let state = State::from_entity(Entity::new());
        let mut map = state.to_fields().unwrap();
        map.remove("id");
        assert!(matches!(
            State::from_fields(&map),
            Err(ModelError::Serialization(_))
        ));
    }

    #[test]
    fn set_field_rejects_unknown_and_protected() {
        let mut state = State::from_entity(Entity::new());
        assert!(matches!(
            state.set_field("color", FieldValue::from("red")),
            Err(ModelError::UnknownField { .. })
        ));
        assert!(matches!(
            state.set_field("id", FieldValue::from("x")),
            Err(ModelError::ProtectedField(_))
        ));
    }

    #[test]
    fn set_field_checks_kind() {
        let mut place = Place::from_entity(Entity::new());
        let err = place
            .set_field("price_by_night", FieldValue::from("cheap"))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { .. }));

        place.set_field("price_by_night", FieldValue::Int(300)).unwrap();
        assert_eq!(place.price_by_night, 300);
        place.set_field("latitude", FieldValue::Int(37)).unwrap();
        assert_eq!(place.latitude, 37.0);
    }

    #[test]
    fn get_field_reads_current_value() {
        let mut state = State::from_entity(Entity::new());
        state.name = "California".into();
        assert_eq!(state.get_field("name").unwrap(), FieldValue::from("California"));
        assert!(state.get_field("nope").is_err());
    }

    #[test]
    fn to_fields_rejects_non_finite_floats() {
        let mut place = Place::from_entity(Entity::new());
        place.latitude = f64::NAN;
        assert!(matches!(
            place.to_fields(),
            Err(ModelError::NonFiniteFloat { ref field, .. }) if field == "latitude"
        ));
        place.latitude = 1.0;
        place.longitude = f64::INFINITY;
        assert!(place.to_fields().is_err());
    }

    #[test]
    fn set_field_rejects_nan() {
        let mut place = Place::from_entity(Entity::new());
        let err = place.set_field("latitude", FieldValue::Float(f64::NAN)).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidValue {
                source: TypeError::NonFiniteFloat(_),
                ..
            }
        ));
        assert_eq!(place.latitude, 0.0);
    }

    #[test]
    fn textual_form_reports_unserializable_record() {
        let mut place = Place::from_entity(Entity::new());
        place.latitude = f64::NAN;
        let text = place.textual_form();
        assert!(text.starts_with(&format!("[Place] ({}) <", place.id())));
        assert!(text.contains("latitude"));
    }

    #[test]
    fn textual_form_shape() {
        let mut state = State::from_entity(Entity::new());
        state.name = "Nevada".into();
        let text = state.textual_form();
        assert!(text.starts_with(&format!("[State] ({}) {{", state.id())));
        assert!(text.contains("\"name\":\"Nevada\""));
        assert!(!text.contains(CLASS_KEY));
    }
}
