// ── Domain model ──
//
// Plain data records exchanged with the persistence collaborator.
// Dotted-quad strings on the wire, `Ipv4Addr` in memory.

pub mod address;
pub mod entity_id;
pub mod subnet;

pub use address::{
    Address, AddressStatus, AddressUpdate, BROADCAST_ADDRESS_LABEL, GATEWAY_DEVICE,
    GATEWAY_HOSTNAME, NETWORK_ADDRESS_LABEL, ReservedKind,
};
pub use entity_id::EntityId;
pub use subnet::{ColorGroup, Subnet, SubnetSummary};
