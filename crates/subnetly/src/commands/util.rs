//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;

use subnetly_core::cidr::parse_addr;
use subnetly_core::{CoreError, EntityId, Subnet};

use super::Store;
use crate::error::CliError;

/// Resolve a subnet by ID, exact CIDR, or case-insensitive name.
pub fn resolve_subnet(store: &Store, identifier: &str) -> Result<Arc<Subnet>, CliError> {
    let snap = store.list();
    snap.iter()
        .find(|s| s.id.to_string() == identifier || s.cidr == identifier)
        .or_else(|| snap.iter().find(|s| s.name.eq_ignore_ascii_case(identifier)))
        .cloned()
        .ok_or_else(|| CliError::subnet_not_found(identifier))
}

pub fn resolve_subnet_id(store: &Store, identifier: &str) -> Result<EntityId, CliError> {
    Ok(resolve_subnet(store, identifier)?.id.clone())
}

/// Parse a dotted-quad argument.
pub fn parse_ip(text: &str) -> Result<Ipv4Addr, CliError> {
    parse_addr(text).map_err(|e| CliError::from(CoreError::from(e)))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal on stdin there is nobody to ask, so the operation is
/// refused instead.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}
