use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// The primitive kind a record field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Str,
    Int,
    Float,
    /// List of entity identities (the only non-scalar field shape).
    Ids,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => write!(f, "string"),
            Self::Int => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Ids => write!(f, "identity list"),
        }
    }
}

/// A primitive field value.
///
/// Serializes to the bare JSON primitive, so a record's field mapping stays
/// flat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Str(String),
    Ids(Vec<String>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Str(_) => FieldKind::Str,
            Self::Int(_) => FieldKind::Int,
            Self::Float(_) => FieldKind::Float,
            Self::Ids(_) => FieldKind::Ids,
        }
    }

    /// Convert into the requested kind.
    ///
    /// Only the lossless widening `Int -> Float` is performed; every other
    /// mismatch is an error. NaN and infinities have no JSON form and are
    /// rejected.
    pub fn conform(self, expected: FieldKind) -> Result<Self, TypeError> {
        if let Self::Float(f) = self {
            if !f.is_finite() {
                return Err(TypeError::NonFiniteFloat(f.to_string()));
            }
        }
        match (self, expected) {
            (v, k) if v.kind() == k => Ok(v),
            (Self::Int(i), FieldKind::Float) => Ok(Self::Float(i as f64)),
            (v, k) => Err(TypeError::KindMismatch {
                expected: k,
                actual: v.kind(),
            }),
        }
    }

    /// Read a JSON primitive back into a field value.
    pub fn from_json(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Ids(ids) => Value::from(ids.clone()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(ids: Vec<String>) -> Self {
        Self::Ids(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_json_shapes() {
        assert_eq!(serde_json::to_string(&FieldValue::Int(300)).unwrap(), "300");
        assert_eq!(
            serde_json::to_string(&FieldValue::Float(37.773972)).unwrap(),
            "37.773972"
        );
        assert_eq!(serde_json::to_string(&FieldValue::from("x")).unwrap(), "\"x\"");
        assert_eq!(
            serde_json::to_string(&FieldValue::Ids(vec!["a".into()])).unwrap(),
            "[\"a\"]"
        );
    }

    #[test]
    fn integers_decode_as_int_floats_as_float() {
        let int: FieldValue = serde_json::from_str("3").unwrap();
        let float: FieldValue = serde_json::from_str("3.5").unwrap();
        assert_eq!(int, FieldValue::Int(3));
        assert_eq!(float, FieldValue::Float(3.5));
    }

    #[test]
    fn conform_widens_int_to_float() {
        let v = FieldValue::Int(37).conform(FieldKind::Float).unwrap();
        assert_eq!(v, FieldValue::Float(37.0));
    }

    #[test]
    fn conform_rejects_other_mismatches() {
        let err = FieldValue::from("300").conform(FieldKind::Int).unwrap_err();
        assert_eq!(
            err,
            TypeError::KindMismatch {
                expected: FieldKind::Int,
                actual: FieldKind::Str,
            }
        );
        assert!(FieldValue::Float(1.5).conform(FieldKind::Int).is_err());
    }

    #[test]
    fn conform_rejects_non_finite_floats() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                FieldValue::Float(f).conform(FieldKind::Float),
                Err(TypeError::NonFiniteFloat(_))
            ));
        }
        assert!(FieldValue::Float(-0.5).conform(FieldKind::Float).is_ok());
    }

    #[test]
    fn from_json_rejects_objects() {
        let obj = serde_json::json!({"nested": true});
        assert!(FieldValue::from_json(&obj).is_none());
        assert_eq!(
            FieldValue::from_json(&serde_json::json!("abc")),
            Some(FieldValue::from("abc"))
        );
    }
}
