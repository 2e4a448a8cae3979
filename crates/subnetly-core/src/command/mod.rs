// ── Command API ──
//
// Every store mutation can be expressed as a `Command`. Executing one
// yields the updated subnet plus a one-line summary that a presentation
// layer can show as a notification.

pub mod requests;

use std::net::Ipv4Addr;

use crate::model::{AddressUpdate, EntityId, Subnet};

pub use requests::{ColorGroupInput, CreateSubnetRequest, DhcpRangeRequest, UpdateSubnetRequest};

/// All write operations against the subnet store.
#[derive(Debug, Clone)]
pub enum Command {
    CreateSubnet(CreateSubnetRequest),
    UpdateSubnet {
        id: EntityId,
        update: UpdateSubnetRequest,
    },
    DeleteSubnet {
        id: EntityId,
    },
    SetAddress {
        subnet_id: EntityId,
        address: Ipv4Addr,
        update: AddressUpdate,
    },
    ReleaseAddress {
        subnet_id: EntityId,
        address: Ipv4Addr,
    },
    SetDhcpRange {
        subnet_id: EntityId,
        range: Option<DhcpRangeRequest>,
    },
    SetColorGroups {
        subnet_id: EntityId,
        groups: Vec<ColorGroupInput>,
    },
}

/// Outcome of a successful [`Command`].
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// The subnet as it now stands; `None` after a delete.
    pub subnet: Option<Subnet>,
    /// Human-readable description of what happened.
    pub summary: String,
}

impl CommandResult {
    pub(crate) fn with_subnet(subnet: Subnet, summary: String) -> Self {
        Self {
            subnet: Some(subnet),
            summary,
        }
    }
}
