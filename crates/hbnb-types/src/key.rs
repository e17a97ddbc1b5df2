use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::EntityId;

/// The kind of record stored.
///
/// Doubles as the registry namespace and as the `__class__` discriminator
/// in the snapshot file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeTag {
    /// Bare entity with identity and timestamps only.
    BaseModel,
    /// A user account.
    User,
    /// A state (top-level location).
    State,
    /// A city inside a state.
    City,
    /// A bookable amenity.
    Amenity,
    /// A listing inside a city, owned by a user.
    Place,
    /// A review of a place written by a user.
    Review,
}

impl TypeTag {
    /// Every known tag, in declaration order.
    pub const ALL: [TypeTag; 7] = [
        Self::BaseModel,
        Self::User,
        Self::State,
        Self::City,
        Self::Amenity,
        Self::Place,
        Self::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseModel => "BaseModel",
            Self::User => "User",
            Self::State => "State",
            Self::City => "City",
            Self::Amenity => "Amenity",
            Self::Place => "Place",
            Self::Review => "Review",
        }
    }
}

impl FromStr for TypeTag {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| TypeError::UnknownType(s.to_string()))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite address of a record: `<TypeTag>.<identity>`.
///
/// This is the only way records are addressed, in the registry, in the
/// snapshot file, and in foreign keys (which carry the identity half).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub tag: TypeTag,
    pub id: EntityId,
}

impl RecordKey {
    pub fn new(tag: TypeTag, id: EntityId) -> Self {
        Self { tag, id }
    }
}

impl FromStr for RecordKey {
    type Err = TypeError;

    /// Split on the first `.`; type tags never contain one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, id) = s
            .split_once('.')
            .ok_or_else(|| TypeError::InvalidKey(s.to_string()))?;
        let tag: TypeTag = tag.parse()?;
        let id = EntityId::parse(id).map_err(|_| TypeError::InvalidKey(s.to_string()))?;
        Ok(Self { tag, id })
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tag, self.id)
    }
}
