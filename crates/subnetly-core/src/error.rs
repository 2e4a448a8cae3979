// ── Core error types ──
//
// Every failure the engine reports is local and recoverable. Validation
// errors never touch state; store errors leave the prior state intact.
// Repository failures are wrapped so callers can tell them apart from
// rejected input.

use strum::Display;
use thiserror::Error;

use crate::cidr::CidrError;
use crate::store::RepositoryError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Parsing ──────────────────────────────────────────────────────
    #[error(transparent)]
    Cidr(#[from] CidrError),

    // ── Store ────────────────────────────────────────────────────────
    #[error("A subnet with CIDR {cidr} already exists")]
    DuplicateCidr { cidr: String },

    #[error("Color group name '{name}' is used more than once")]
    DuplicateGroupName { name: String },

    #[error("Color group names must not be empty")]
    InvalidGroupName,

    #[error("Subnet names must not be empty")]
    InvalidSubnetName,

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("{address} is the {label} and cannot be modified")]
    ReservedAddress { address: String, label: String },

    // ── DHCP range ───────────────────────────────────────────────────
    #[error("DHCP range start {start} is after end {end}")]
    InvalidRangeOrder { start: String, end: String },

    #[error("Invalid DHCP range {endpoint} '{value}': {reason}")]
    InvalidRangeEndpoint {
        endpoint: String,
        value: String,
        reason: String,
    },

    // ── Persistence ──────────────────────────────────────────────────
    #[error("Failed to {operation}: {source}")]
    PersistenceFailed {
        operation: String,
        #[source]
        source: RepositoryError,
    },
}

/// Coarse classification of a [`CoreError`], stable for callers that map
/// errors onto exit codes or notification styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    InvalidFormat,
    InvalidAddress,
    InvalidPrefix,
    #[strum(to_string = "DuplicateCIDR")]
    DuplicateCidr,
    DuplicateGroupName,
    InvalidGroupName,
    InvalidSubnetName,
    NotFound,
    ReservedAddress,
    InvalidRangeOrder,
    InvalidRangeEndpoint,
    PersistenceFailed,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cidr(CidrError::InvalidFormat { .. }) => ErrorKind::InvalidFormat,
            Self::Cidr(CidrError::InvalidAddress { .. }) => ErrorKind::InvalidAddress,
            Self::Cidr(CidrError::InvalidPrefix { .. }) => ErrorKind::InvalidPrefix,
            Self::DuplicateCidr { .. } => ErrorKind::DuplicateCidr,
            Self::DuplicateGroupName { .. } => ErrorKind::DuplicateGroupName,
            Self::InvalidGroupName => ErrorKind::InvalidGroupName,
            Self::InvalidSubnetName => ErrorKind::InvalidSubnetName,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ReservedAddress { .. } => ErrorKind::ReservedAddress,
            Self::InvalidRangeOrder { .. } => ErrorKind::InvalidRangeOrder,
            Self::InvalidRangeEndpoint { .. } => ErrorKind::InvalidRangeEndpoint,
            Self::PersistenceFailed { .. } => ErrorKind::PersistenceFailed,
        }
    }

    pub(crate) fn subnet_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "subnet".into(),
            identifier: id.to_string(),
        }
    }

    pub(crate) fn address_not_found(address: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "address".into(),
            identifier: address.to_string(),
        }
    }

    pub(crate) fn persistence(operation: impl Into<String>, source: RepositoryError) -> Self {
        Self::PersistenceFailed {
            operation: operation.into(),
            source,
        }
    }
}
