use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Stable identity of a stored entity.
///
/// Freshly generated identities are random (UUID v4, 122 bits of entropy)
/// and hyphen-encoded. Identities read back from a snapshot are taken
/// verbatim, so any non-empty string is a valid `EntityId`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh random identity.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an existing identity string.
    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        if s.is_empty() {
            return Err(TypeError::EmptyIdentity);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short identifier (first 8 characters).
    pub fn short_id(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl TryFrom<String> for EntityId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.short_id())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = EntityId::generate();
        let b = EntityId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_id_is_hyphenated_uuid() {
        let id = EntityId::generate();
        assert_eq!(id.as_str().len(), 36);
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn parse_accepts_arbitrary_strings() {
        let id = EntityId::parse("3f2a91").unwrap();
        assert_eq!(id, "3f2a91");
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(EntityId::parse(""), Err(TypeError::EmptyIdentity));
    }

    #[test]
    fn short_id_truncates() {
        let id = EntityId::parse("0123456789abcdef").unwrap();
        assert_eq!(id.short_id(), "01234567");
        let tiny = EntityId::parse("abc").unwrap();
        assert_eq!(tiny.short_id(), "abc");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EntityId::parse("abc-123").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
        let back: EntityId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_rejects_empty() {
        assert!(serde_json::from_str::<EntityId>("\"\"").is_err());
    }
}
