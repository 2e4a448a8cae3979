//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod addresses;
pub mod cidr;
pub mod config_cmd;
pub mod dhcp;
pub mod groups;
pub mod stats;
pub mod subnets;
pub mod util;

use subnetly_core::{JsonFileRepository, SubnetStore};

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// The store every data-bound command runs against.
pub type Store = SubnetStore<JsonFileRepository>;

/// Dispatch a store-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, store: &Store, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::Subnets(args) => subnets::handle(store, args, settings).await,
        Command::Addresses(args) => addresses::handle(store, args, settings).await,
        Command::Dhcp(args) => dhcp::handle(store, args, settings).await,
        Command::Groups(args) => groups::handle(store, args, settings).await,
        Command::Stats => stats::handle(store, settings),
        // Handled before a store is opened
        Command::Cidr(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
