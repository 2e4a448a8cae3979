// ── Address domain types ──

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;

/// Device label carried by the lowest address of a block.
pub const NETWORK_ADDRESS_LABEL: &str = "network address";
/// Device label carried by the highest address of a block.
pub const BROADCAST_ADDRESS_LABEL: &str = "broadcast address";

pub const GATEWAY_HOSTNAME: &str = "Gateway";
pub const GATEWAY_DEVICE: &str = "Router/Gateway";

/// Allocation state of a single address.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AddressStatus {
    #[default]
    Free,
    Used,
}

/// Which boundary of the block a reserved address marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedKind {
    Network,
    Broadcast,
}

impl ReservedKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => NETWORK_ADDRESS_LABEL,
            Self::Broadcast => BROADCAST_ADDRESS_LABEL,
        }
    }

    fn note(self) -> &'static str {
        match self {
            Self::Network => "Network address of this block (host bits zero)",
            Self::Broadcast => "Broadcast address of this block (host bits one)",
        }
    }
}

/// One IPv4 address tracked inside a subnet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address: Ipv4Addr,
    pub status: AddressStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Free-text device label. Also carries the reserved network/broadcast tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Reference to a color group on the same subnet. May dangle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_group_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Address {
    pub fn free(address: Ipv4Addr) -> Self {
        Self {
            address,
            status: AddressStatus::Free,
            hostname: None,
            device: None,
            notes: None,
            color_group_id: None,
            last_modified: None,
        }
    }

    pub(crate) fn reserved(address: Ipv4Addr, kind: ReservedKind) -> Self {
        Self {
            device: Some(kind.label().to_owned()),
            notes: Some(kind.note().to_owned()),
            ..Self::free(address)
        }
    }

    pub fn is_used(&self) -> bool {
        self.status == AddressStatus::Used
    }

    pub fn reserved_kind(&self) -> Option<ReservedKind> {
        match self.device.as_deref() {
            Some(NETWORK_ADDRESS_LABEL) => Some(ReservedKind::Network),
            Some(BROADCAST_ADDRESS_LABEL) => Some(ReservedKind::Broadcast),
            _ => None,
        }
    }

    /// Network and broadcast addresses never accept caller mutations.
    pub fn is_reserved(&self) -> bool {
        self.reserved_kind().is_some()
    }

    /// Merge a partial update over this address.
    ///
    /// Supplied fields overwrite, omitted fields keep their prior value.
    /// Blank text clears the field. `last_modified` always comes from `now`.
    pub fn merged(&self, update: &AddressUpdate, now: DateTime<Utc>) -> Self {
        Self {
            address: self.address,
            status: update.status.unwrap_or(self.status),
            hostname: merge_text(self.hostname.as_ref(), update.hostname.as_ref()),
            device: merge_text(self.device.as_ref(), update.device.as_ref()),
            notes: merge_text(self.notes.as_ref(), update.notes.as_ref()),
            color_group_id: match &update.color_group_id {
                Some(next) => next.clone(),
                None => self.color_group_id.clone(),
            },
            last_modified: Some(now),
        }
    }

    /// A bare free record for the same address.
    pub fn released(&self, now: DateTime<Utc>) -> Self {
        Self {
            last_modified: Some(now),
            ..Self::free(self.address)
        }
    }

    /// Case-insensitive match on hostname or device, substring match on the address.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() || self.address.to_string().contains(query) {
            return true;
        }
        let needle = query.to_lowercase();
        [self.hostname.as_deref(), self.device.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

fn merge_text(prior: Option<&String>, update: Option<&Option<String>>) -> Option<String> {
    match update {
        None => prior.cloned(),
        Some(next) => next
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned),
    }
}

// ── Partial update ──────────────────────────────────────────────────

/// Caller-supplied changes to one address.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AddressStatus>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub hostname: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub device: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_group_id: Option<Option<EntityId>>,
}

impl AddressUpdate {
    /// Mark used and set the hostname in one step.
    pub fn allocate(hostname: impl Into<String>) -> Self {
        Self {
            status: Some(AddressStatus::Used),
            hostname: Some(Some(hostname.into())),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: AddressStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_hostname(mut self, hostname: Option<String>) -> Self {
        self.hostname = Some(hostname);
        self
    }

    pub fn with_device(mut self, device: Option<String>) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn with_color_group(mut self, group: Option<EntityId>) -> Self {
        self.color_group_id = Some(group);
        self
    }
}

/// A key that is present (even as `null`) becomes `Some(..)`.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ip(last: u8) -> Ipv4Addr {
        Ipv4Addr::new(192, 168, 1, last)
    }

    #[test]
    fn merge_overwrites_supplied_and_keeps_omitted() {
        let now = Utc::now();
        let mut prior = Address::free(ip(10));
        prior.hostname = Some("nas".into());
        prior.notes = Some("rack 2".into());

        let update = AddressUpdate::default()
            .with_status(AddressStatus::Used)
            .with_device(Some("Synology".into()));
        let merged = prior.merged(&update, now);

        assert_eq!(merged.status, AddressStatus::Used);
        assert_eq!(merged.hostname.as_deref(), Some("nas"));
        assert_eq!(merged.device.as_deref(), Some("Synology"));
        assert_eq!(merged.notes.as_deref(), Some("rack 2"));
        assert_eq!(merged.last_modified, Some(now));
    }

    #[test]
    fn merge_clears_explicit_nulls_and_blanks() {
        let mut prior = Address::free(ip(11));
        prior.hostname = Some("old".into());
        prior.notes = Some("keep?".into());
        prior.color_group_id = Some(EntityId::from("g1"));

        let update = AddressUpdate::default()
            .with_hostname(None)
            .with_notes(Some("   ".into()))
            .with_color_group(None);
        let merged = prior.merged(&update, Utc::now());

        assert_eq!(merged.hostname, None);
        assert_eq!(merged.notes, None);
        assert_eq!(merged.color_group_id, None);
    }

    #[test]
    fn reserved_tags_are_detected() {
        let net = Address::reserved(ip(0), ReservedKind::Network);
        let bcast = Address::reserved(ip(255), ReservedKind::Broadcast);
        assert_eq!(net.reserved_kind(), Some(ReservedKind::Network));
        assert_eq!(bcast.device.as_deref(), Some(BROADCAST_ADDRESS_LABEL));
        assert!(!Address::free(ip(1)).is_reserved());
    }

    #[test]
    fn release_drops_all_metadata() {
        let mut used = Address::free(ip(20));
        used.status = AddressStatus::Used;
        used.hostname = Some("printer".into());
        used.color_group_id = Some(EntityId::from("g"));
        let released = used.released(Utc::now());
        assert_eq!(released.status, AddressStatus::Free);
        assert_eq!(released.hostname, None);
        assert_eq!(released.color_group_id, None);
        assert!(released.last_modified.is_some());
    }

    #[test]
    fn query_matching() {
        let mut addr = Address::free(ip(42));
        addr.hostname = Some("Web-01".into());
        assert!(addr.matches(""));
        assert!(addr.matches("1.42"));
        assert!(addr.matches("web"));
        assert!(!addr.matches("db"));
    }

    #[test]
    fn update_deserializes_null_as_clear() {
        let update: AddressUpdate =
            serde_json::from_str(r#"{"status":"used","hostname":null}"#).unwrap();
        assert_eq!(update.status, Some(AddressStatus::Used));
        assert_eq!(update.hostname, Some(None));
        assert_eq!(update.device, None);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("USED".parse::<AddressStatus>().unwrap(), AddressStatus::Used);
        assert_eq!(AddressStatus::Free.to_string(), "free");
    }

    #[test]
    fn address_serializes_with_camel_case_keys() {
        let mut addr = Address::free(ip(7));
        addr.color_group_id = Some(EntityId::from("grp"));
        let json = serde_json::to_value(&addr).unwrap();
        assert_eq!(json["address"], "192.168.1.7");
        assert_eq!(json["status"], "free");
        assert_eq!(json["colorGroupId"], "grp");
        assert!(json.get("hostname").is_none());
    }
}
