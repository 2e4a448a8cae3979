//! Address command handlers.

use chrono::Local;
use tabled::Tabled;

use subnetly_core::{
    Address, AddressStatus, AddressUpdate, Command as CoreCommand, EntityId, Subnet,
};

use crate::cli::{AddressesArgs, AddressesCommand, StatusArg};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::{Store, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AddressRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "DHCP")]
    dhcp: String,
    #[tabled(rename = "Notes")]
    notes: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

fn row(subnet: &Subnet, a: &Address, color: bool) -> AddressRow {
    AddressRow {
        address: a.address.to_string(),
        status: output::status_cell(a, color),
        hostname: a.hostname.clone().unwrap_or_default(),
        device: a.device.clone().unwrap_or_default(),
        group: subnet
            .group_for(a)
            .map(|g| g.name.clone())
            .unwrap_or_default(),
        dhcp: if subnet.in_dhcp_range(a.address) {
            "yes".into()
        } else {
            String::new()
        },
        notes: a.notes.clone().unwrap_or_default(),
        modified: a
            .last_modified
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
    }
}

impl From<StatusArg> for AddressStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Used => Self::Used,
            StatusArg::Free => Self::Free,
        }
    }
}

/// Map a group name to its id; an empty name clears the assignment.
fn resolve_group(subnet: &Subnet, name: &str) -> Result<Option<EntityId>, CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    subnet
        .color_groups
        .iter()
        .find(|g| g.name.eq_ignore_ascii_case(name))
        .map(|g| Some(g.id.clone()))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "color group".into(),
            identifier: name.into(),
            list_command: format!("groups list {}", subnet.cidr),
        })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    store: &Store,
    args: AddressesArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    match args.command {
        AddressesCommand::List {
            subnet,
            status,
            filter,
            group,
        } => {
            let subnet = util::resolve_subnet(store, &subnet)?;
            let group_id = match group.as_deref() {
                Some(name) => resolve_group(&subnet, name)?,
                None => None,
            };
            let wanted = status.map(AddressStatus::from);

            let matches: Vec<&Address> = subnet
                .filter_addresses(filter.as_deref().unwrap_or_default())
                .filter(|a| wanted.is_none_or(|s| a.status == s))
                .filter(|a| {
                    group_id
                        .as_ref()
                        .is_none_or(|id| a.color_group_id.as_ref() == Some(id))
                })
                .collect();

            let out = output::render_list(
                settings.output,
                &matches,
                |a| row(&subnet, a, settings.color),
                |a| a.address.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            if subnet.truncated && !settings.quiet {
                eprintln!(
                    "Showing {} of {} addresses in {}",
                    subnet.addresses.len(),
                    subnet.total_ips,
                    subnet.cidr
                );
            }
            Ok(())
        }

        AddressesCommand::Set {
            subnet,
            address,
            status,
            hostname,
            device,
            notes,
            group,
        } => {
            let subnet = util::resolve_subnet(store, &subnet)?;
            let address = util::parse_ip(&address)?;

            let mut update = AddressUpdate {
                status: status.map(AddressStatus::from),
                hostname: hostname.map(Some),
                device: device.map(Some),
                notes: notes.map(Some),
                color_group_id: None,
            };
            if let Some(name) = group {
                update.color_group_id = Some(resolve_group(&subnet, &name)?);
            }
            if update == AddressUpdate::default() {
                return Err(CliError::Validation {
                    field: "set".into(),
                    reason: "nothing to change; pass at least one field flag".into(),
                });
            }

            let result = store
                .execute(CoreCommand::SetAddress {
                    subnet_id: subnet.id.clone(),
                    address,
                    update,
                })
                .await?;
            output::print_summary(&result.summary, settings.quiet);
            Ok(())
        }

        AddressesCommand::Release { subnet, address } => {
            let subnet_id = util::resolve_subnet_id(store, &subnet)?;
            let address = util::parse_ip(&address)?;
            let result = store
                .execute(CoreCommand::ReleaseAddress { subnet_id, address })
                .await?;
            output::print_summary(&result.summary, settings.quiet);
            Ok(())
        }
    }
}
