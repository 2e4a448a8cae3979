//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use subnetly_config::ConfigError;
use subnetly_core::{CoreError, RepositoryError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const PERSISTENCE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(subnetly::not_found),
        help("Run: subnetly {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(subnetly::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("{address} is the {label} and cannot be modified")]
    #[diagnostic(
        code(subnetly::reserved_address),
        help("The first and last address of a block are always reserved.")
    )]
    ReservedAddress { address: String, label: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(subnetly::validation))]
    Validation { field: String, reason: String },

    // ── Storage ──────────────────────────────────────────────────────
    #[error("Failed to {operation}")]
    #[diagnostic(
        code(subnetly::persistence),
        help("Nothing was changed. Check that the data file is writable: {path}")
    )]
    Persistence {
        operation: String,
        path: String,
        #[source]
        source: RepositoryError,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(subnetly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: subnetly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(subnetly::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(subnetly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(subnetly::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(subnetly::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to serialize config: {0}")]
    #[diagnostic(code(subnetly::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } | Self::ReservedAddress { .. } => exit_code::CONFLICT,
            Self::Persistence { .. } => exit_code::PERSISTENCE,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the data file location to a storage failure.
    pub fn with_data_file(self, data_file: &std::path::Path) -> Self {
        match self {
            Self::Persistence {
                operation, source, ..
            } => Self::Persistence {
                operation,
                path: data_file.display().to_string(),
                source,
            },
            other => other,
        }
    }

    pub fn subnet_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: "subnet".into(),
            identifier: identifier.into(),
            list_command: "subnets list".into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Cidr(e) => CliError::Validation {
                field: "input".into(),
                reason: e.to_string(),
            },

            CoreError::DuplicateCidr { cidr } => CliError::Conflict {
                resource_type: "subnet".into(),
                identifier: cidr,
            },

            CoreError::DuplicateGroupName { name } => CliError::Conflict {
                resource_type: "color group".into(),
                identifier: name,
            },

            CoreError::InvalidGroupName => CliError::Validation {
                field: "color group".into(),
                reason: "name must not be empty".into(),
            },

            CoreError::InvalidSubnetName => CliError::Validation {
                field: "name".into(),
                reason: "subnet name must not be empty".into(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => {
                let list_command = match entity_type.as_str() {
                    "address" => "addresses list <SUBNET>".to_owned(),
                    other => format!("{other}s list"),
                };
                CliError::NotFound {
                    resource_type: entity_type,
                    identifier,
                    list_command,
                }
            }

            CoreError::ReservedAddress { address, label } => {
                CliError::ReservedAddress { address, label }
            }

            err @ (CoreError::InvalidRangeOrder { .. }
            | CoreError::InvalidRangeEndpoint { .. }) => CliError::Validation {
                field: "DHCP range".into(),
                reason: err.to_string(),
            },

            CoreError::PersistenceFailed { operation, source } => CliError::Persistence {
                operation,
                path: "(unknown)".into(),
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use subnetly_core::{CidrError, CoreError};

    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::DuplicateCidr {
                    cidr: "10.0.0.0/24".into(),
                },
                exit_code::CONFLICT,
            ),
            (
                CoreError::NotFound {
                    entity_type: "subnet".into(),
                    identifier: "x".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Cidr(CidrError::InvalidPrefix {
                    input: "10.0.0.0/40".into(),
                }),
                exit_code::USAGE,
            ),
            (
                CoreError::ReservedAddress {
                    address: "10.0.0.0".into(),
                    label: "network address".into(),
                },
                exit_code::CONFLICT,
            ),
            (
                CoreError::PersistenceFailed {
                    operation: "save".into(),
                    source: RepositoryError::Rejected("read-only".into()),
                },
                exit_code::PERSISTENCE,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn address_not_found_points_at_address_listing() {
        let err = CliError::from(CoreError::NotFound {
            entity_type: "address".into(),
            identifier: "10.0.0.9".into(),
        });
        assert!(matches!(
            err,
            CliError::NotFound { ref list_command, .. } if list_command.starts_with("addresses")
        ));
    }
}
