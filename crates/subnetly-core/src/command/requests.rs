// ── Typed request structs for Command payloads ──

use serde::{Deserialize, Serialize};

use crate::model::EntityId;

// ── Subnet ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubnetRequest {
    pub name: String,
    pub cidr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

/// Metadata changes. The CIDR of a subnet can never be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubnetRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A blank value removes the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

// ── DHCP ───────────────────────────────────────────────────────────

/// Unvalidated start/end pair as typed by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DhcpRangeRequest {
    pub start: String,
    pub end: String,
}

// ── Color groups ───────────────────────────────────────────────────

/// One entry of a color-group replacement set. Entries without an id are
/// new groups and get one assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorGroupInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    pub color: String,
}

impl ColorGroupInput {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: color.into(),
        }
    }
}
