//! DHCP range command handlers.

use serde::Serialize;

use subnetly_core::{Command as CoreCommand, CoreError, DhcpRange, DhcpRangeRequest};

use crate::cli::{DhcpArgs, DhcpCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::{Store, util};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeCheck {
    address: String,
    range: Option<DhcpRange>,
    in_range: bool,
}

pub async fn handle(store: &Store, args: DhcpArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        DhcpCommand::Set { subnet, start, end } => {
            let subnet = util::resolve_subnet(store, &subnet)?;
            let range = match (start, end) {
                (Some(start), Some(end)) => DhcpRangeRequest { start, end },
                _ => {
                    let block = subnet.block().map_err(CoreError::from)?;
                    let suggested = DhcpRange::suggested_for(&block);
                    DhcpRangeRequest {
                        start: suggested.start.to_string(),
                        end: suggested.end.to_string(),
                    }
                }
            };
            let result = store
                .execute(CoreCommand::SetDhcpRange {
                    subnet_id: subnet.id.clone(),
                    range: Some(range),
                })
                .await?;
            output::print_summary(&result.summary, settings.quiet);
            Ok(())
        }

        DhcpCommand::Clear { subnet } => {
            let subnet_id = util::resolve_subnet_id(store, &subnet)?;
            let result = store
                .execute(CoreCommand::SetDhcpRange {
                    subnet_id,
                    range: None,
                })
                .await?;
            output::print_summary(&result.summary, settings.quiet);
            Ok(())
        }

        DhcpCommand::Check { subnet, address } => {
            let subnet = util::resolve_subnet(store, &subnet)?;
            let ip = util::parse_ip(&address)?;
            let check = RangeCheck {
                address: ip.to_string(),
                range: subnet.dhcp_range,
                in_range: subnet.in_dhcp_range(ip),
            };
            let out = output::render_single(
                settings.output,
                &check,
                |c| match c.range {
                    Some(range) if c.in_range => format!("{} is inside {range}", c.address),
                    Some(range) => format!("{} is outside {range}", c.address),
                    None => format!("{} has no DHCP range", subnet.name),
                },
                |c| c.in_range.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }
    }
}
