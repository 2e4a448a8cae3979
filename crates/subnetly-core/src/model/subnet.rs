// ── Subnet domain types ──

use std::net::Ipv4Addr;

use serde::{Deserialize, Deserializer, Serialize};

use super::address::Address;
use super::entity_id::EntityId;
use crate::cidr::{Cidr, CidrError};
use crate::range::DhcpRange;
use crate::stats::percent;

/// A user-defined tag with a display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorGroup {
    pub id: EntityId,
    /// Unique within its subnet (case-sensitive).
    pub name: String,
    pub color: String,
}

/// One allocation domain: a CIDR block and its tracked addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub id: EntityId,
    pub name: String,
    /// Immutable once created.
    pub cidr: String,
    pub mask: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub gateway: Option<Ipv4Addr>,
    #[serde(rename = "totalIPs")]
    pub total_ips: u64,
    /// Always equal to the number of `Used` entries in `addresses`.
    #[serde(rename = "usedIPs")]
    pub used_ips: u64,
    #[serde(rename = "ips", alias = "addresses")]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub dhcp_range: Option<DhcpRange>,
    #[serde(default)]
    pub color_groups: Vec<ColorGroup>,
    /// The block is larger than the enumerated slice in `addresses`.
    #[serde(default)]
    pub truncated: bool,
}

/// Older data files store an unset gateway as `""`.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Ipv4Addr>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.parse().map_err(serde::de::Error::custom))
        .transpose()
}

impl Subnet {
    /// Re-parse the stored CIDR string.
    pub fn block(&self) -> Result<Cidr, CidrError> {
        Cidr::parse(&self.cidr)
    }

    pub fn address(&self, ip: Ipv4Addr) -> Option<&Address> {
        self.addresses.iter().find(|a| a.address == ip)
    }

    /// Full recount of used addresses. Only for load-time verification;
    /// mutations adjust `used_ips` by delta.
    pub fn count_used(&self) -> u64 {
        self.addresses.iter().filter(|a| a.is_used()).map(|_| 1u64).sum()
    }

    pub fn group(&self, id: &EntityId) -> Option<&ColorGroup> {
        self.color_groups.iter().find(|g| &g.id == id)
    }

    /// Resolve an address's color group. A dangling reference is "no group".
    pub fn group_for(&self, address: &Address) -> Option<&ColorGroup> {
        address
            .color_group_id
            .as_ref()
            .and_then(|id| self.group(id))
    }

    pub fn filter_addresses<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Address> {
        self.addresses.iter().filter(move |a| a.matches(query))
    }

    pub fn in_dhcp_range(&self, ip: Ipv4Addr) -> bool {
        self.dhcp_range.is_some_and(|range| range.contains(ip))
    }

    /// Percentage of the block in use, rounded.
    pub fn utilization(&self) -> u64 {
        percent(self.used_ips, self.total_ips)
    }

    pub fn summary(&self) -> SubnetSummary {
        SubnetSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            cidr: self.cidr.clone(),
            total_ips: self.total_ips,
            used_ips: self.used_ips,
        }
    }
}

/// Lightweight listing view of a subnet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetSummary {
    pub id: EntityId,
    pub name: String,
    pub cidr: String,
    #[serde(rename = "totalIPs")]
    pub total_ips: u64,
    #[serde(rename = "usedIPs")]
    pub used_ips: u64,
}
