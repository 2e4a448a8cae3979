//! CIDR arithmetic handler. Works without a data file.

use serde::Serialize;

use subnetly_core::{Cidr, CoreError, IpClass, MAX_ENUMERATED};

use crate::cli::{CidrArgs, CidrCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CidrReport {
    cidr: String,
    network: String,
    broadcast: String,
    mask: String,
    prefix: u8,
    #[serde(rename = "totalIPs")]
    total_ips: u64,
    class: String,
    /// Addresses a subnet created from this block would track.
    tracked: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    contains: Option<Contains>,
}

#[derive(Serialize)]
struct Contains {
    address: String,
    inside: bool,
}

fn report(block: &Cidr, contains: Option<Contains>) -> CidrReport {
    let total = block.total_ips();
    CidrReport {
        cidr: block.to_string(),
        network: block.network().to_string(),
        broadcast: block.broadcast().to_string(),
        mask: block.mask_string(),
        prefix: block.prefix(),
        total_ips: total,
        class: IpClass::of(block.network()).to_string(),
        tracked: total.min(MAX_ENUMERATED),
        contains,
    }
}

fn detail(r: &CidrReport) -> String {
    let mut lines = vec![
        format!("CIDR:       {}", r.cidr),
        format!("Network:    {}", r.network),
        format!("Broadcast:  {}", r.broadcast),
        format!("Mask:       {} (/{})", r.mask, r.prefix),
        format!("Total IPs:  {}", r.total_ips),
        format!("Tracked:    {}", r.tracked),
        format!("Class:      {}", r.class),
    ];
    if let Some(c) = &r.contains {
        let verdict = if c.inside { "inside" } else { "outside" };
        lines.push(format!("{:<11} {verdict}", format!("{}:", c.address)));
    }
    lines.join("\n")
}

pub fn handle(args: CidrArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        CidrCommand::Inspect { cidr, contains } => {
            let block = Cidr::parse(&cidr).map_err(CoreError::from)?;
            let contains = contains
                .map(|text| {
                    util::parse_ip(&text).map(|ip| Contains {
                        address: ip.to_string(),
                        inside: block.contains(ip),
                    })
                })
                .transpose()?;
            let out = output::render_single(
                settings.output,
                &report(&block, contains),
                detail,
                |r| r.cidr.clone(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn report_for_small_block() {
        let r = report(&Cidr::parse("192.168.1.0/24").unwrap(), None);
        assert_eq!(r.network, "192.168.1.0");
        assert_eq!(r.broadcast, "192.168.1.255");
        assert_eq!(r.tracked, 256);
        assert_eq!(r.class, "C");
    }

    #[test]
    fn report_for_large_block_caps_tracked() {
        let r = report(&Cidr::parse("10.0.0.0/8").unwrap(), None);
        assert_eq!(r.total_ips, 16_777_216);
        assert_eq!(r.tracked, MAX_ENUMERATED);
        assert!(detail(&r).contains("Class:      A"));
    }
}
