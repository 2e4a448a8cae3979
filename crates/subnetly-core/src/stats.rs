// ── Network-wide statistics ──
//
// A pure read-side fold over the current subnets.

use serde::{Deserialize, Serialize};

use crate::model::Subnet;

/// System-wide totals across every subnet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    #[serde(rename = "totalIPs")]
    pub total_ips: u64,
    #[serde(rename = "allocatedIPs")]
    pub allocated_ips: u64,
    /// Rounded percentage of `total_ips` that is allocated.
    pub utilization: u64,
    #[serde(rename = "dhcpRanges")]
    pub dhcp_range_count: usize,
}

/// `round(100 * part / whole)`, rounding halves up. Zero when `whole` is zero.
pub fn percent(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (u128::from(part), u128::from(whole));
    let rounded = (200 * part + whole) / (2 * whole);
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

/// Fold subnets into [`NetworkStats`].
pub fn aggregate<'a>(subnets: impl IntoIterator<Item = &'a Subnet>) -> NetworkStats {
    let mut stats = subnets
        .into_iter()
        .fold(NetworkStats::default(), |mut acc, subnet| {
            acc.total_ips += subnet.total_ips;
            acc.allocated_ips += subnet.used_ips;
            if subnet.dhcp_range.is_some() {
                acc.dhcp_range_count += 1;
            }
            acc
        });
    stats.utilization = percent(stats.allocated_ips, stats.total_ips);
    stats
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::EntityId;
    use crate::range::DhcpRange;

    fn subnet(total: u64, used: u64, dhcp: bool) -> Subnet {
        Subnet {
            id: EntityId::generate(),
            name: "s".into(),
            cidr: "10.0.0.0/24".into(),
            mask: "255.255.255.0".into(),
            gateway: None,
            total_ips: total,
            used_ips: used,
            addresses: Vec::new(),
            dhcp_range: dhcp
                .then(|| DhcpRange::parse("10.0.0.100", "10.0.0.200").unwrap()),
            color_groups: Vec::new(),
            truncated: false,
        }
    }

    #[test]
    fn empty_fold_is_all_zero() {
        let stats = aggregate(std::iter::empty());
        assert_eq!(stats, NetworkStats::default());
        assert_eq!(stats.utilization, 0);
    }

    #[test]
    fn sums_and_counts() {
        let subnets = [subnet(256, 10, true), subnet(16, 6, false), subnet(4, 0, true)];
        let stats = aggregate(&subnets);
        assert_eq!(stats.total_ips, 276);
        assert_eq!(stats.allocated_ips, 16);
        assert_eq!(stats.utilization, 6);
        assert_eq!(stats.dhcp_range_count, 2);
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(percent(1, 256), 0);
        assert_eq!(percent(2, 256), 1);
        assert_eq!(percent(128, 256), 50);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn huge_totals_do_not_overflow() {
        let stats = aggregate(&[subnet(1u64 << 32, 1u64 << 31, false)]);
        assert_eq!(stats.utilization, 50);
    }

    #[test]
    fn serializes_with_external_keys() {
        let json = serde_json::to_value(aggregate(&[subnet(4, 1, true)])).unwrap();
        assert_eq!(json["totalIPs"], 4);
        assert_eq!(json["allocatedIPs"], 1);
        assert_eq!(json["utilization"], 25);
        assert_eq!(json["dhcpRanges"], 1);
    }
}
