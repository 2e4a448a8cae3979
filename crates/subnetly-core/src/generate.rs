// ── Address space enumeration ──
//
// Blocks of up to 256 addresses are listed in full. Larger blocks are
// represented by their first /24-equivalent slice only: the 256
// addresses sharing the network's first three octets. The slice is
// flagged as truncated so callers can say so.

use std::net::Ipv4Addr;

use tracing::debug;

use crate::cidr::Cidr;
use crate::model::{Address, ReservedKind};

/// Upper bound on the number of addresses materialized for one subnet.
pub const MAX_ENUMERATED: u64 = 256;

/// The concrete address list generated for a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSpace {
    pub addresses: Vec<Address>,
    /// `true` when the block is larger than [`MAX_ENUMERATED`] and only the
    /// leading slice was listed.
    pub truncated: bool,
}

/// Whether `cidr` is too large to enumerate in full.
pub fn is_truncated(cidr: &Cidr) -> bool {
    cidr.total_ips() > MAX_ENUMERATED
}

/// Inclusive numeric bounds of the enumerated slice, plus the value tagged
/// as broadcast within it.
fn bounds(cidr: &Cidr) -> (u32, u32, u32) {
    if is_truncated(cidr) {
        let first = cidr.network_u32() & 0xFFFF_FF00;
        let last = first | 0xFF;
        (first, last, last)
    } else {
        (cidr.network_u32(), cidr.broadcast_u32(), cidr.broadcast_u32())
    }
}

/// Lazily yield the addresses of `cidr` in ascending order.
///
/// The sequence is a pure function of the block, finite, and restarts
/// from the beginning on every call.
pub fn address_iter(cidr: &Cidr) -> impl Iterator<Item = Address> + use<> {
    let network = cidr.network_u32();
    let (first, last, broadcast) = bounds(cidr);

    (first..=last).map(move |value| {
        let addr = Ipv4Addr::from(value);
        if value == network {
            Address::reserved(addr, ReservedKind::Network)
        } else if value == broadcast {
            Address::reserved(addr, ReservedKind::Broadcast)
        } else {
            Address::free(addr)
        }
    })
}

/// Materialize the address list for a block.
pub fn generate_addresses(cidr: &Cidr) -> AddressSpace {
    let truncated = is_truncated(cidr);
    let addresses: Vec<Address> = address_iter(cidr).collect();
    debug!(
        cidr = %cidr,
        count = addresses.len(),
        truncated,
        "generated address space"
    );
    AddressSpace {
        addresses,
        truncated,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AddressStatus, BROADCAST_ADDRESS_LABEL, NETWORK_ADDRESS_LABEL};
    use pretty_assertions::assert_eq;

    fn space(text: &str) -> AddressSpace {
        generate_addresses(&Cidr::parse(text).unwrap())
    }

    #[test]
    fn slash_30_lists_four_with_reserved_ends() {
        let space = space("10.0.0.0/30");
        let listed: Vec<String> = space
            .addresses
            .iter()
            .map(|a| a.address.to_string())
            .collect();
        assert_eq!(listed, ["10.0.0.0", "10.0.0.1", "10.0.0.2", "10.0.0.3"]);
        assert!(!space.truncated);
        assert_eq!(
            space.addresses[0].device.as_deref(),
            Some(NETWORK_ADDRESS_LABEL)
        );
        assert_eq!(
            space.addresses[3].device.as_deref(),
            Some(BROADCAST_ADDRESS_LABEL)
        );
        assert!(!space.addresses[1].is_reserved());
        assert!(
            space
                .addresses
                .iter()
                .all(|a| a.status == AddressStatus::Free)
        );
    }

    #[test]
    fn slash_8_is_truncated_to_first_slice() {
        let space = space("10.0.0.0/8");
        assert_eq!(space.addresses.len(), 256);
        assert!(space.truncated);
        assert_eq!(space.addresses[0].address, Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(space.addresses[255].address, Ipv4Addr::new(10, 0, 0, 255));
        assert!(space.addresses[0].is_reserved());
        assert!(space.addresses[255].is_reserved());
    }

    #[test]
    fn slash_24_is_complete() {
        let space = space("192.168.7.0/24");
        assert_eq!(space.addresses.len(), 256);
        assert!(!space.truncated);
    }

    #[test]
    fn unaligned_input_starts_at_network() {
        let space = space("192.168.1.77/28");
        assert_eq!(space.addresses.len(), 16);
        assert_eq!(space.addresses[0].address, Ipv4Addr::new(192, 168, 1, 64));
        assert_eq!(space.addresses[15].address, Ipv4Addr::new(192, 168, 1, 79));
    }

    #[test]
    fn single_host_is_tagged_as_network() {
        let space = space("8.8.8.8/32");
        assert_eq!(space.addresses.len(), 1);
        assert_eq!(
            space.addresses[0].device.as_deref(),
            Some(NETWORK_ADDRESS_LABEL)
        );
    }

    #[test]
    fn top_of_address_space_does_not_overflow() {
        let space = space("255.255.255.252/30");
        assert_eq!(space.addresses.len(), 4);
        assert_eq!(
            space.addresses[3].address,
            Ipv4Addr::new(255, 255, 255, 255)
        );
        let whole = space_len("0.0.0.0/0");
        assert_eq!(whole, 256);
    }

    fn space_len(text: &str) -> usize {
        space(text).addresses.len()
    }

    #[test]
    fn generation_is_repeatable() {
        let cidr = Cidr::parse("172.16.0.0/12").unwrap();
        assert_eq!(generate_addresses(&cidr), generate_addresses(&cidr));
        assert_eq!(address_iter(&cidr).count(), 256);
    }
}
