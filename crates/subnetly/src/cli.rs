//! Clap derive structures for the `subnetly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// subnetly -- IPv4 address management from the command line
#[derive(Debug, Parser)]
#[command(
    name = "subnetly",
    version,
    about = "Track IPv4 subnets, address allocations and DHCP pools",
    long_about = "A small IP address manager.\n\n\
        Subnets are stored in a local JSON file. Every address in a block is\n\
        tracked individually; blocks larger than 256 addresses are shown as a\n\
        single /24-sized slice.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "SUBNETLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Subnet data file (overrides profile)
    #[arg(long, short = 'd', env = "SUBNETLY_DATA_FILE", global = true)]
    pub data_file: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "SUBNETLY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage subnets
    #[command(alias = "subnet", alias = "s")]
    Subnets(SubnetsArgs),

    /// Allocate and release addresses inside a subnet
    #[command(alias = "addr", alias = "a")]
    Addresses(AddressesArgs),

    /// Manage a subnet's DHCP range
    Dhcp(DhcpArgs),

    /// Manage a subnet's color groups
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// Network-wide allocation statistics
    Stats,

    /// Address arithmetic without touching stored data
    Cidr(CidrArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUBNETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SubnetsArgs {
    #[command(subcommand)]
    pub command: SubnetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubnetsCommand {
    /// List all subnets
    #[command(alias = "ls")]
    List,

    /// Show subnet details
    #[command(alias = "get")]
    Show {
        /// Subnet ID, name, or CIDR
        subnet: String,
    },

    /// Create a subnet and enumerate its addresses
    Create {
        /// Display name
        #[arg(long, short = 'n')]
        name: String,

        /// Block in CIDR notation (e.g., 192.168.1.0/24)
        #[arg(long, short = 'c')]
        cidr: String,

        /// Gateway address; marked used when inside the block
        #[arg(long, short = 'g')]
        gateway: Option<String>,
    },

    /// Rename a subnet or change its gateway
    Update {
        /// Subnet ID, name, or CIDR
        subnet: String,

        /// New display name
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// New gateway (empty string removes it)
        #[arg(long, short = 'g')]
        gateway: Option<String>,
    },

    /// Delete a subnet and everything recorded in it
    #[command(alias = "rm")]
    Delete {
        /// Subnet ID, name, or CIDR
        subnet: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADDRESSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AddressesArgs {
    #[command(subcommand)]
    pub command: AddressesCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Used,
    Free,
}

#[derive(Debug, Subcommand)]
pub enum AddressesCommand {
    /// List the addresses of a subnet
    #[command(alias = "ls")]
    List {
        /// Subnet ID, name, or CIDR
        subnet: String,

        /// Only addresses with this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Match hostname or device (case-insensitive) or address substring
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Only addresses in this color group
        #[arg(long)]
        group: Option<String>,
    },

    /// Change an address. Omitted fields keep their value; empty strings clear.
    Set {
        /// Subnet ID, name, or CIDR
        subnet: String,

        /// Address to change
        address: String,

        /// New status
        #[arg(long, short = 's', value_enum)]
        status: Option<StatusArg>,

        /// Hostname
        #[arg(long, short = 'H')]
        hostname: Option<String>,

        /// Device description
        #[arg(long)]
        device: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Color group name (empty string removes the assignment)
        #[arg(long)]
        group: Option<String>,
    },

    /// Return an address to the free pool and clear its metadata
    Release {
        /// Subnet ID, name, or CIDR
        subnet: String,

        /// Address to release
        address: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DHCP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DhcpArgs {
    #[command(subcommand)]
    pub command: DhcpCommand,
}

#[derive(Debug, Subcommand)]
pub enum DhcpCommand {
    /// Set the DHCP range (defaults to .100 - .200 of the network)
    Set {
        /// Subnet ID, name, or CIDR
        subnet: String,

        /// First address of the pool
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// Last address of the pool
        #[arg(long, requires = "start")]
        end: Option<String>,
    },

    /// Disable DHCP for a subnet
    Clear {
        /// Subnet ID, name, or CIDR
        subnet: String,
    },

    /// Report whether an address falls inside the subnet's DHCP range
    Check {
        /// Subnet ID, name, or CIDR
        subnet: String,

        /// Address to test
        address: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COLOR GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List color groups
    #[command(alias = "ls")]
    List {
        /// Subnet ID, name, or CIDR
        subnet: String,
    },

    /// Replace all color groups at once
    Set {
        /// Subnet ID, name, or CIDR
        subnet: String,

        /// Group as NAME=COLOR (repeatable)
        #[arg(long = "group", short = 'g', value_name = "NAME=COLOR")]
        groups: Vec<String>,

        /// Read the group list from a JSON file
        #[arg(long, short = 'F', conflicts_with = "groups")]
        from_file: Option<PathBuf>,
    },

    /// Add one color group
    Add {
        /// Subnet ID, name, or CIDR
        subnet: String,

        /// Group name
        name: String,

        /// Display color (e.g., #3b82f6)
        #[arg(id = "group_color", value_name = "COLOR")]
        color: String,
    },

    /// Remove a color group by name
    #[command(alias = "rm")]
    Remove {
        /// Subnet ID, name, or CIDR
        subnet: String,

        /// Group name
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CIDR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CidrArgs {
    #[command(subcommand)]
    pub command: CidrCommand,
}

#[derive(Debug, Subcommand)]
pub enum CidrCommand {
    /// Show network, broadcast, mask and size of a block
    Inspect {
        /// Block in CIDR notation
        cidr: String,

        /// Also test whether this address is inside the block
        #[arg(long)]
        contains: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
