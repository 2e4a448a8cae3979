// ── Entity identity ──
//
// Subnets and color groups created by this engine get UUIDs. Records
// loaded from older data files may carry arbitrary string ids; both
// forms live behind one type so lookups never care which it is.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier for a subnet or color group. Never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Uuid(Uuid),
    Legacy(String),
}

impl EntityId {
    /// Fresh random identifier for a newly created entity.
    pub fn generate() -> Self {
        Self::Uuid(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            Self::Legacy(_) => None,
        }
    }

    pub fn as_legacy(&self) -> Option<&str> {
        match self {
            Self::Legacy(s) => Some(s),
            Self::Uuid(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Legacy(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match Uuid::parse_str(&s) {
            Ok(u) => Self::Uuid(u),
            Err(_) => Self::Legacy(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_uuids() {
        let a = EntityId::generate();
        let b = EntityId::generate();
        assert!(a.as_uuid().is_some());
        assert_ne!(a, b);
    }

    #[test]
    fn legacy_timestamp_ids_survive() {
        let id = EntityId::from("1712345678901");
        assert_eq!(id.as_legacy(), Some("1712345678901"));
        assert_eq!(id.to_string(), "1712345678901");
    }

    #[test]
    fn uuid_strings_parse_as_uuid() {
        let id: EntityId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert!(id.as_uuid().is_some());
    }

    #[test]
    fn serde_round_trip_is_a_bare_string() {
        let id = EntityId::from("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
