//! Subnet command handlers.

use std::sync::Arc;

use tabled::Tabled;

use subnetly_core::{Command as CoreCommand, CreateSubnetRequest, Subnet, UpdateSubnetRequest};

use crate::cli::{SubnetsArgs, SubnetsCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::{Store, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SubnetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CIDR")]
    cidr: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Util")]
    utilization: String,
    #[tabled(rename = "DHCP")]
    dhcp: String,
    #[tabled(rename = "ID")]
    id: String,
}

fn row(s: &Arc<Subnet>, color: bool) -> SubnetRow {
    SubnetRow {
        name: s.name.clone(),
        cidr: s.cidr.clone(),
        gateway: s.gateway.map(|g| g.to_string()).unwrap_or_default(),
        used: format!("{}/{}", s.used_ips, s.total_ips),
        utilization: output::utilization_cell(s.utilization(), color),
        dhcp: s.dhcp_range.map(|r| r.to_string()).unwrap_or_default(),
        id: s.id.to_string(),
    }
}

fn detail(s: &Subnet, color: bool) -> String {
    let mut lines = vec![
        format!("ID:          {}", s.id),
        format!("Name:        {}", s.name),
        format!("CIDR:        {}", s.cidr),
        format!("Mask:        {}", s.mask),
        format!(
            "Gateway:     {}",
            s.gateway.map_or_else(|| "-".into(), |g| g.to_string())
        ),
        format!("Total IPs:   {}", s.total_ips),
        format!("Used IPs:    {}", s.used_ips),
        format!(
            "Utilization: {}",
            output::utilization_cell(s.utilization(), color)
        ),
        format!(
            "DHCP range:  {}",
            s.dhcp_range
                .map_or_else(|| "disabled".into(), |r| r.to_string())
        ),
    ];
    if !s.color_groups.is_empty() {
        let names: Vec<&str> = s.color_groups.iter().map(|g| g.name.as_str()).collect();
        lines.push(format!("Groups:      {}", names.join(", ")));
    }
    if s.truncated {
        lines.push(format!(
            "Note:        only {} of {} addresses are tracked",
            s.addresses.len(),
            s.total_ips
        ));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(store: &Store, args: SubnetsArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        SubnetsCommand::List => {
            let snap = store.list();
            let out = output::render_list(
                settings.output,
                &snap,
                |s| row(s, settings.color),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        SubnetsCommand::Show { subnet } => {
            let subnet = util::resolve_subnet(store, &subnet)?;
            let out = output::render_single(
                settings.output,
                subnet.as_ref(),
                |s| detail(s, settings.color),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        SubnetsCommand::Create {
            name,
            cidr,
            gateway,
        } => {
            let result = store
                .execute(CoreCommand::CreateSubnet(CreateSubnetRequest {
                    name,
                    cidr,
                    gateway,
                }))
                .await?;
            if let Some(subnet) = &result.subnet {
                let out = output::render_single(
                    settings.output,
                    subnet,
                    |s| s.id.to_string(),
                    |s| s.id.to_string(),
                )?;
                output::print_output(&out, settings.quiet);
            }
            output::print_summary(&result.summary, settings.quiet);
            Ok(())
        }

        SubnetsCommand::Update {
            subnet,
            name,
            gateway,
        } => {
            if name.is_none() && gateway.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass --name and/or --gateway".into(),
                });
            }
            let id = util::resolve_subnet_id(store, &subnet)?;
            let result = store
                .execute(CoreCommand::UpdateSubnet {
                    id,
                    update: UpdateSubnetRequest { name, gateway },
                })
                .await?;
            output::print_summary(&result.summary, settings.quiet);
            Ok(())
        }

        SubnetsCommand::Delete { subnet } => {
            let target = util::resolve_subnet(store, &subnet)?;
            let prompt = format!(
                "Delete subnet {} ({}) and all {} recorded addresses?",
                target.name,
                target.cidr,
                target.addresses.len()
            );
            if !util::confirm(&prompt, "subnets delete", settings.yes)? {
                return Ok(());
            }
            let result = store
                .execute(CoreCommand::DeleteSubnet {
                    id: target.id.clone(),
                })
                .await?;
            output::print_summary(&result.summary, settings.quiet);
            Ok(())
        }
    }
}
