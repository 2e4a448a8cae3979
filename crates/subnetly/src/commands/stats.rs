//! Network-wide statistics handler.

use subnetly_core::NetworkStats;

use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::Store;

fn detail(s: &NetworkStats, color: bool) -> String {
    [
        format!("Total IPs:      {}", s.total_ips),
        format!("Allocated IPs:  {}", s.allocated_ips),
        format!(
            "Utilization:    {}",
            output::utilization_cell(s.utilization, color)
        ),
        format!("DHCP ranges:    {}", s.dhcp_range_count),
    ]
    .join("\n")
}

pub fn handle(store: &Store, settings: &Settings) -> Result<(), CliError> {
    let stats = store.stats();
    let out = output::render_single(
        settings.output,
        &stats,
        |s| detail(s, settings.color),
        |s| s.utilization.to_string(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}
