// ── CIDR parsing and IPv4 arithmetic ──
//
// All address math runs on a single `u32` assembled octet by octet.
// Dotted-quad strings are the only external representation; the
// integer form never leaves the engine.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Largest prefix length accepted for an IPv4 block.
pub const MAX_PREFIX: u8 = 32;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrError {
    #[error("invalid CIDR notation '{input}' (expected A.B.C.D/prefix)")]
    InvalidFormat { input: String },

    #[error("invalid IPv4 address '{input}'")]
    InvalidAddress { input: String },

    #[error("invalid prefix '{input}' (must be an integer between 0 and 32)")]
    InvalidPrefix { input: String },
}

// ── Address helpers ─────────────────────────────────────────────────

/// Parse a dotted quad into its 32-bit value.
///
/// Each octet is one to three decimal digits with a value of at most 255.
/// Octets are assembled as `(o0 << 24) | (o1 << 16) | (o2 << 8) | o3`.
pub fn parse_ipv4(text: &str) -> Result<u32, CidrError> {
    let invalid = || CidrError::InvalidAddress {
        input: text.to_owned(),
    };

    let mut value: u32 = 0;
    let mut octets = 0usize;
    for part in text.split('.') {
        if octets == 4
            || part.is_empty()
            || part.len() > 3
            || !part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let octet: u8 = part.parse().map_err(|_| invalid())?;
        value = (value << 8) | u32::from(octet);
        octets += 1;
    }

    if octets == 4 { Ok(value) } else { Err(invalid()) }
}

/// Parse a dotted quad into an [`Ipv4Addr`] using the same rules as [`parse_ipv4`].
pub fn parse_addr(text: &str) -> Result<Ipv4Addr, CidrError> {
    parse_ipv4(text).map(Ipv4Addr::from)
}

/// Render a 32-bit value as a dotted quad.
pub fn format_ipv4(value: u32) -> String {
    Ipv4Addr::from(value).to_string()
}

pub fn is_valid_ipv4(text: &str) -> bool {
    parse_ipv4(text).is_ok()
}

/// Network mask for a prefix length. Prefix 0 yields an all-zero mask.
pub fn mask_for(prefix: u8) -> u32 {
    u32::MAX
        .checked_shl(u32::from(MAX_PREFIX.saturating_sub(prefix)))
        .unwrap_or(0)
}

// ── Cidr ────────────────────────────────────────────────────────────

/// A validated IPv4 block in `address/prefix` form.
///
/// Keeps the address exactly as supplied; [`network`](Self::network) and
/// [`broadcast`](Self::broadcast) are derived from it through the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cidr {
    address: u32,
    prefix: u8,
    mask: u32,
}

impl Cidr {
    /// Parse `A.B.C.D/prefix`.
    pub fn parse(text: &str) -> Result<Self, CidrError> {
        let parts: Vec<&str> = text.split('/').collect();
        let [address, prefix] = parts.as_slice() else {
            return Err(CidrError::InvalidFormat {
                input: text.to_owned(),
            });
        };

        let address = parse_ipv4(address)?;
        let prefix = prefix
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= MAX_PREFIX)
            .ok_or_else(|| CidrError::InvalidPrefix {
                input: (*prefix).to_owned(),
            })?;

        Ok(Self::from_parts(address, prefix))
    }

    /// Build a block from an address and prefix length.
    pub fn new(address: Ipv4Addr, prefix: u8) -> Result<Self, CidrError> {
        if prefix > MAX_PREFIX {
            return Err(CidrError::InvalidPrefix {
                input: prefix.to_string(),
            });
        }
        Ok(Self::from_parts(u32::from(address), prefix))
    }

    fn from_parts(address: u32, prefix: u8) -> Self {
        Self {
            address,
            prefix,
            mask: mask_for(prefix),
        }
    }

    pub fn address(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.address)
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn mask(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.mask)
    }

    /// Dotted-quad subnet mask, e.g. `255.255.255.0`.
    pub fn mask_string(&self) -> String {
        format_ipv4(self.mask)
    }

    pub(crate) fn network_u32(&self) -> u32 {
        self.address & self.mask
    }

    pub(crate) fn broadcast_u32(&self) -> u32 {
        self.network_u32() | !self.mask
    }

    /// Lowest address of the block (host bits zero).
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network_u32())
    }

    /// Highest address of the block (host bits one).
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.broadcast_u32())
    }

    /// `2^(32 - prefix)`, never less than one. A `/0` holds `2^32` addresses.
    pub fn total_ips(&self) -> u64 {
        (1u64 << (MAX_PREFIX - self.prefix)).max(1)
    }

    /// Numeric `network <= candidate <= broadcast`.
    pub fn contains(&self, candidate: Ipv4Addr) -> bool {
        let value = u32::from(candidate);
        value >= self.network_u32() && value <= self.broadcast_u32()
    }

    /// Like [`contains`](Self::contains) for a dotted quad; malformed text is never inside.
    pub fn contains_str(&self, candidate: &str) -> bool {
        parse_addr(candidate).is_ok_and(|addr| self.contains(addr))
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix)
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Classful taxonomy ───────────────────────────────────────────────

/// Historic address class, derived from the first octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum IpClass {
    #[strum(to_string = "A")]
    A,
    #[strum(to_string = "Loopback")]
    Loopback,
    #[strum(to_string = "B")]
    B,
    #[strum(to_string = "C")]
    C,
    #[strum(to_string = "D (multicast)")]
    D,
    #[strum(to_string = "E (reserved)")]
    E,
    #[strum(to_string = "Unknown")]
    Unknown,
}

impl IpClass {
    pub fn of(addr: Ipv4Addr) -> Self {
        match addr.octets()[0] {
            1..=126 => Self::A,
            127 => Self::Loopback,
            128..=191 => Self::B,
            192..=223 => Self::C,
            224..=239 => Self::D,
            240..=255 => Self::E,
            0 => Self::Unknown,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_slash_24() {
        let cidr = Cidr::parse("192.168.1.0/24").unwrap();
        assert_eq!(cidr.network().to_string(), "192.168.1.0");
        assert_eq!(cidr.broadcast().to_string(), "192.168.1.255");
        assert_eq!(cidr.mask_string(), "255.255.255.0");
        assert_eq!(cidr.total_ips(), 256);
    }

    #[test]
    fn host_bits_are_masked_off() {
        let cidr = Cidr::parse("10.1.2.77/16").unwrap();
        assert_eq!(cidr.address(), Ipv4Addr::new(10, 1, 2, 77));
        assert_eq!(cidr.network(), Ipv4Addr::new(10, 1, 0, 0));
        assert_eq!(cidr.broadcast(), Ipv4Addr::new(10, 1, 255, 255));
        assert_eq!(cidr.to_string(), "10.1.0.0/16");
    }

    #[test]
    fn prefix_zero_covers_everything() {
        let cidr = Cidr::parse("0.0.0.0/0").unwrap();
        assert_eq!(cidr.mask_string(), "0.0.0.0");
        assert_eq!(cidr.network(), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(cidr.broadcast(), Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(cidr.total_ips(), 1u64 << 32);
    }

    #[test]
    fn prefix_32_is_a_single_host() {
        let cidr = Cidr::parse("8.8.8.8/32").unwrap();
        assert_eq!(cidr.network(), cidr.broadcast());
        assert_eq!(cidr.total_ips(), 1);
        assert_eq!(cidr.mask_string(), "255.255.255.255");
    }

    #[test]
    fn total_matches_span_for_every_prefix() {
        for prefix in 0..=MAX_PREFIX {
            let cidr = Cidr::new(Ipv4Addr::new(172, 16, 5, 9), prefix).unwrap();
            let span = u64::from(u32::from(cidr.broadcast()) - u32::from(cidr.network())) + 1;
            assert!(cidr.network() <= cidr.broadcast());
            assert_eq!(cidr.total_ips(), span, "prefix /{prefix}");
        }
    }

    #[test]
    fn rejects_wrong_slash_count() {
        for input in ["192.168.1.0", "192.168.1.0/24/1", ""] {
            assert!(
                matches!(Cidr::parse(input), Err(CidrError::InvalidFormat { .. })),
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_bad_addresses() {
        for input in [
            "256.1.1.1/24",
            "1.2.3/24",
            "1.2.3.4.5/24",
            "a.b.c.d/24",
            "1..2.3/24",
            "1.2.3.-4/24",
            "1.2.3.0004/24",
        ] {
            assert!(
                matches!(Cidr::parse(input), Err(CidrError::InvalidAddress { .. })),
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_bad_prefixes() {
        for input in ["10.0.0.0/33", "10.0.0.0/-1", "10.0.0.0/", "10.0.0.0/x"] {
            assert!(
                matches!(Cidr::parse(input), Err(CidrError::InvalidPrefix { .. })),
                "{input}"
            );
        }
    }

    #[test]
    fn membership_is_numeric_not_lexicographic() {
        let cidr = Cidr::parse("192.168.1.0/28").unwrap();
        assert!(cidr.contains_str("192.168.1.9"));
        assert!(cidr.contains_str("192.168.1.15"));
        assert!(!cidr.contains_str("192.168.1.16"));
        assert!(!cidr.contains_str("192.168.1.100"));
        assert!(!cidr.contains_str("not-an-ip"));
    }

    #[test]
    fn parse_ipv4_assembles_big_endian() {
        assert_eq!(parse_ipv4("1.2.3.4").unwrap(), 0x0102_0304);
        assert_eq!(parse_ipv4("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(format_ipv4(0xC0A8_0101), "192.168.1.1");
        assert!(is_valid_ipv4("010.0.0.1"));
        assert!(!is_valid_ipv4("300.0.0.1"));
    }

    #[test]
    fn classifies_first_octet() {
        assert_eq!(IpClass::of(Ipv4Addr::new(10, 0, 0, 1)), IpClass::A);
        assert_eq!(IpClass::of(Ipv4Addr::new(127, 0, 0, 1)), IpClass::Loopback);
        assert_eq!(IpClass::of(Ipv4Addr::new(172, 16, 0, 1)), IpClass::B);
        assert_eq!(IpClass::of(Ipv4Addr::new(192, 168, 0, 1)), IpClass::C);
        assert_eq!(IpClass::of(Ipv4Addr::new(239, 1, 1, 1)).to_string(), "D (multicast)");
        assert_eq!(IpClass::of(Ipv4Addr::new(250, 1, 1, 1)), IpClass::E);
        assert_eq!(IpClass::of(Ipv4Addr::new(0, 1, 1, 1)), IpClass::Unknown);
    }
}
