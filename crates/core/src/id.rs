//! Task identifiers.

use serde::{Deserialize, Deserializer, Serialize};
use ulid::Ulid;

/// Identifier of a task within one request.
///
/// Ids are opaque strings. Clients that stored tasks under integer keys may
/// send numbers; those are normalized to their decimal form on the way in,
/// and ids are always serialized back as strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier for a task submitted without one.
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ids_normalize_to_strings() {
        let ids: Vec<TaskId> = serde_json::from_str(r#"["a", 7, 18446744073709551615]"#).unwrap();
        assert_eq!(ids[0].as_str(), "a");
        assert_eq!(ids[1].as_str(), "7");
        assert_eq!(ids[2].as_str(), "18446744073709551615");
        assert_eq!(serde_json::to_string(&ids[1]).unwrap(), r#""7""#);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(TaskId::generate(), TaskId::generate());
    }

    #[test]
    fn test_float_id_rejected() {
        assert!(serde_json::from_str::<TaskId>("1.5").is_err());
    }
}
