use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Canonical stored form: ISO-8601, no zone, microsecond fraction.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Accepted on parse; the fraction is optional.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// UTC wall-clock timestamp with microsecond resolution.
///
/// Values are truncated to whole microseconds on construction so that the
/// in-memory value always equals the value recovered from its stored string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// The current UTC time.
    pub fn now() -> Self {
        Self::from_naive(Utc::now().naive_utc())
    }

    /// Wrap a naive UTC datetime, truncating to microseconds.
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        Self(dt.trunc_subsecs(6))
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Render the canonical ISO-8601 string.
    pub fn to_iso(&self) -> String {
        self.0.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s, PARSE_FORMAT)
            .map(Self::from_naive)
            .map_err(|e| TypeError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.to_iso())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}
