//! IPv4 subnet and address allocation engine.
//!
//! This crate owns the address arithmetic, domain model, and storage
//! layer for the subnetly workspace:
//!
//! - **[`cidr`]**: dotted-quad and CIDR parsing, masks, network and
//!   broadcast derivation, containment.
//!
//! - **[`generate`]**: enumeration of a block's addresses with network and
//!   broadcast reserved. Blocks above 256 addresses are truncated to one
//!   `/24`-sized slice and flagged.
//!
//! - **[`SubnetStore`]**: the single owner of subnet state. Every mutation
//!   is validated, written through a [`SubnetRepository`], and only then
//!   published to readers. [`SubnetStore::execute`] runs a typed
//!   [`Command`] and reports a one-line summary.
//!
//! - **[`stats`]**: network-wide totals and utilization.

pub mod cidr;
pub mod command;
pub mod error;
pub mod generate;
pub mod model;
pub mod range;
pub mod stats;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cidr::{Cidr, CidrError, IpClass};
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use error::{CoreError, ErrorKind};
pub use generate::{AddressSpace, MAX_ENUMERATED, generate_addresses};
pub use range::DhcpRange;
pub use stats::NetworkStats;
pub use store::{
    JsonFileRepository, MemoryRepository, RepositoryError, Snapshot, StoreOptions, SubnetRepository,
    SubnetStore,
};

pub use model::{
    Address, AddressStatus, AddressUpdate, BROADCAST_ADDRESS_LABEL, ColorGroup, EntityId,
    NETWORK_ADDRESS_LABEL, ReservedKind, Subnet, SubnetSummary,
};
