// ── DHCP range bookkeeping ──
//
// A start/end pair compared as 32-bit values. No lease handling, only
// membership and validation.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::cidr::{Cidr, parse_addr, parse_ipv4};
use crate::error::CoreError;

/// Inclusive address pool reserved for dynamic assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpRange {
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
}

impl DhcpRange {
    /// Validate a pair of dotted quads.
    ///
    /// Both endpoints must be well-formed and `start <= end` numerically,
    /// so `192.168.1.9` correctly sorts before `192.168.1.10`.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        let start_addr = parse_endpoint("start", start)?;
        let end_addr = parse_endpoint("end", end)?;
        Self::new(start_addr, end_addr)
    }

    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Result<Self, CoreError> {
        if u32::from(start) > u32::from(end) {
            return Err(CoreError::InvalidRangeOrder {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Default pool offered for a block: `.100` through `.200` on the
    /// network's first three octets, clamped to the host addresses. Blocks
    /// that miss that window get their whole host range.
    pub fn suggested_for(cidr: &Cidr) -> Self {
        let [a, b, c, _] = cidr.network().octets();
        let preferred_start = u32::from(Ipv4Addr::new(a, b, c, 100));
        let preferred_end = u32::from(Ipv4Addr::new(a, b, c, 200));

        let (first, last) = host_bounds(cidr);
        let start = preferred_start.max(first);
        let end = preferred_end.min(last);
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (first, last)
        };
        Self {
            start: Ipv4Addr::from(start),
            end: Ipv4Addr::from(end),
        }
    }

    pub fn contains(&self, candidate: Ipv4Addr) -> bool {
        let value = u32::from(candidate);
        value >= u32::from(self.start) && value <= u32::from(self.end)
    }

    /// Malformed text is never in range.
    pub fn contains_str(&self, candidate: &str) -> bool {
        parse_addr(candidate).is_ok_and(|addr| self.contains(addr))
    }

    /// Number of addresses in the pool.
    pub fn len(&self) -> u64 {
        u64::from(u32::from(self.end) - u32::from(self.start)) + 1
    }

    /// Ranges always hold at least one address.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Both endpoints fall inside `cidr`.
    pub(crate) fn check_within(&self, cidr: &Cidr) -> Result<(), CoreError> {
        for (endpoint, addr) in [("start", self.start), ("end", self.end)] {
            if !cidr.contains(addr) {
                return Err(CoreError::InvalidRangeEndpoint {
                    endpoint: endpoint.into(),
                    value: addr.to_string(),
                    reason: format!("outside subnet {cidr}"),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for DhcpRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// String-level membership test: `start <= candidate <= end`.
///
/// Any malformed input answers `false`.
pub fn in_range(start: &str, end: &str, candidate: &str) -> bool {
    match (parse_ipv4(start), parse_ipv4(end), parse_ipv4(candidate)) {
        (Ok(s), Ok(e), Ok(c)) => s <= c && c <= e,
        _ => false,
    }
}

fn parse_endpoint(endpoint: &str, value: &str) -> Result<Ipv4Addr, CoreError> {
    parse_addr(value).map_err(|_| CoreError::InvalidRangeEndpoint {
        endpoint: endpoint.into(),
        value: value.into(),
        reason: "not a valid IPv4 address".into(),
    })
}

/// First and last assignable host. /31 and /32 have no interior hosts, so
/// the whole block is used.
fn host_bounds(cidr: &Cidr) -> (u32, u32) {
    let network = u32::from(cidr.network());
    let broadcast = u32::from(cidr.broadcast());
    if broadcast - network >= 2 {
        (network + 1, broadcast - 1)
    } else {
        (network, broadcast)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn membership_includes_both_bounds() {
        let range = DhcpRange::parse("192.168.1.100", "192.168.1.200").unwrap();
        assert!(range.contains_str("192.168.1.150"));
        assert!(range.contains_str("192.168.1.100"));
        assert!(range.contains_str("192.168.1.200"));
        assert!(!range.contains_str("192.168.1.201"));
        assert!(!range.contains_str("192.168.1.99"));
        assert_eq!(range.len(), 101);
    }

    #[test]
    fn string_helper_matches_struct() {
        assert!(in_range("10.0.0.1", "10.0.0.9", "10.0.0.9"));
        assert!(!in_range("10.0.0.1", "10.0.0.9", "10.0.0.10"));
        assert!(!in_range("10.0.0.1", "bogus", "10.0.0.5"));
    }

    #[test]
    fn order_is_numeric() {
        assert!(DhcpRange::parse("192.168.1.9", "192.168.1.10").is_ok());
        let err = DhcpRange::parse("192.168.1.10", "192.168.1.9").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRangeOrder);
    }

    #[test]
    fn earlier_octets_take_precedence() {
        assert!(DhcpRange::parse("10.0.1.0", "10.0.2.5").is_ok());
        let err = DhcpRange::parse("10.0.2.0", "10.0.1.255").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRangeOrder);
    }

    #[test]
    fn single_address_range_is_valid() {
        let range = DhcpRange::parse("10.0.0.5", "10.0.0.5").unwrap();
        assert_eq!(range.len(), 1);
        assert!(range.contains_str("10.0.0.5"));
    }

    #[test]
    fn malformed_endpoint_is_reported() {
        let err = DhcpRange::parse("10.0.0.300", "10.0.0.5").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRangeEndpoint);
        assert!(err.to_string().contains("start"));
    }

    #[test]
    fn containment_is_a_separate_check() {
        let cidr = Cidr::parse("192.168.1.0/24").unwrap();
        let inside = DhcpRange::parse("192.168.1.10", "192.168.1.20").unwrap();
        let outside = DhcpRange::parse("192.168.1.10", "192.168.2.20").unwrap();
        assert!(inside.check_within(&cidr).is_ok());
        let err = outside.check_within(&cidr).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRangeEndpoint);
    }

    #[test]
    fn suggestion_uses_network_octets() {
        let cidr = Cidr::parse("172.20.3.77/24").unwrap();
        let range = DhcpRange::suggested_for(&cidr);
        assert_eq!(range.to_string(), "172.20.3.100 - 172.20.3.200");
    }

    #[test]
    fn suggestion_on_small_block_falls_back_to_hosts() {
        let cidr = Cidr::parse("192.168.1.0/28").unwrap();
        let range = DhcpRange::suggested_for(&cidr);
        assert_eq!(range.to_string(), "192.168.1.1 - 192.168.1.14");
        assert!(range.check_within(&cidr).is_ok());
    }

    #[test]
    fn suggestion_is_clamped_to_upper_half() {
        let cidr = Cidr::parse("192.168.1.128/25").unwrap();
        let range = DhcpRange::suggested_for(&cidr);
        assert_eq!(range.to_string(), "192.168.1.129 - 192.168.1.200");

        let top = Cidr::parse("192.168.1.240/28").unwrap();
        assert_eq!(
            DhcpRange::suggested_for(&top).to_string(),
            "192.168.1.241 - 192.168.1.254"
        );
    }

    #[test]
    fn suggestion_on_tiny_blocks_stays_inside() {
        for text in ["10.0.0.4/31", "10.0.0.9/32", "10.0.0.0/16"] {
            let cidr = Cidr::parse(text).unwrap();
            let range = DhcpRange::suggested_for(&cidr);
            assert!(range.check_within(&cidr).is_ok(), "{text}");
        }
    }
}
