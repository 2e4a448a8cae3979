//! Color group command handlers.
//!
//! The core only replaces the whole set; `add` and `remove` are built on
//! that by editing the current list.

use tabled::Tabled;

use subnetly_core::{ColorGroup, ColorGroupInput, Command as CoreCommand, Subnet};

use crate::cli::{GroupsArgs, GroupsCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::{Store, util};

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Addresses")]
    members: usize,
    #[tabled(rename = "ID")]
    id: String,
}

fn row(subnet: &Subnet, g: &ColorGroup) -> GroupRow {
    GroupRow {
        name: g.name.clone(),
        color: g.color.clone(),
        members: subnet
            .addresses
            .iter()
            .filter(|a| a.color_group_id.as_ref() == Some(&g.id))
            .count(),
        id: g.id.to_string(),
    }
}

fn current_inputs(subnet: &Subnet) -> Vec<ColorGroupInput> {
    subnet
        .color_groups
        .iter()
        .map(|g| ColorGroupInput {
            id: Some(g.id.clone()),
            name: g.name.clone(),
            color: g.color.clone(),
        })
        .collect()
}

/// Parse `NAME=COLOR`.
fn parse_pair(pair: &str) -> Result<ColorGroupInput, CliError> {
    let (name, color) = pair.split_once('=').ok_or_else(|| CliError::Validation {
        field: "group".into(),
        reason: format!("expected NAME=COLOR, got '{pair}'"),
    })?;
    Ok(ColorGroupInput::new(name, color.trim()))
}

pub async fn handle(store: &Store, args: GroupsArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        GroupsCommand::List { subnet } => {
            let subnet = util::resolve_subnet(store, &subnet)?;
            let out = output::render_list(
                settings.output,
                &subnet.color_groups,
                |g| row(&subnet, g),
                |g| g.name.clone(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        GroupsCommand::Set {
            subnet,
            groups,
            from_file,
        } => {
            let subnet_id = util::resolve_subnet_id(store, &subnet)?;
            let groups = match from_file {
                Some(path) => util::read_json_file::<Vec<ColorGroupInput>>(&path)?,
                None => groups
                    .iter()
                    .map(String::as_str)
                    .map(parse_pair)
                    .collect::<Result<_, _>>()?,
            };
            let result = store
                .execute(CoreCommand::SetColorGroups { subnet_id, groups })
                .await?;
            output::print_summary(&result.summary, settings.quiet);
            Ok(())
        }

        GroupsCommand::Add {
            subnet,
            name,
            color,
        } => {
            let subnet = util::resolve_subnet(store, &subnet)?;
            let mut groups = current_inputs(&subnet);
            groups.push(ColorGroupInput::new(name, color));
            let result = store
                .execute(CoreCommand::SetColorGroups {
                    subnet_id: subnet.id.clone(),
                    groups,
                })
                .await?;
            output::print_summary(&result.summary, settings.quiet);
            Ok(())
        }

        GroupsCommand::Remove { subnet, name } => {
            let subnet = util::resolve_subnet(store, &subnet)?;
            let mut groups = current_inputs(&subnet);
            let before = groups.len();
            groups.retain(|g| !g.name.eq_ignore_ascii_case(name.trim()));
            if groups.len() == before {
                return Err(CliError::NotFound {
                    resource_type: "color group".into(),
                    identifier: name,
                    list_command: format!("groups list {}", subnet.cidr),
                });
            }
            let result = store
                .execute(CoreCommand::SetColorGroups {
                    subnet_id: subnet.id.clone(),
                    groups,
                })
                .await?;
            output::print_summary(&result.summary, settings.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn pair_splits_on_first_equals() {
        let input = parse_pair("Servers=#ff0000").unwrap();
        assert_eq!(input.name, "Servers");
        assert_eq!(input.color, "#ff0000");
        assert!(input.id.is_none());
    }

    #[test]
    fn pair_without_equals_is_rejected() {
        assert!(matches!(
            parse_pair("Servers"),
            Err(CliError::Validation { .. })
        ));
    }
}
