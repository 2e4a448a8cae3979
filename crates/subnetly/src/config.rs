//! CLI configuration: thin wrapper around `subnetly_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--profile, --data-file, --output, --color).

use std::path::PathBuf;

use clap::ValueEnum;

use subnetly_core::StoreOptions;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use subnetly_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Everything a command handler needs after flags and config are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub profile_name: String,
    pub data_file: PathBuf,
    pub store_options: StoreOptions,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Merge config defaults, the active profile, and flag overrides.
///
/// Flags win over profile values, which win over global defaults.
pub fn resolve_settings(global: &GlobalOpts, config: &Config) -> Result<Settings, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = config.profile(&profile_name).map_err(|_| {
        let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        CliError::ProfileNotFound {
            name: profile_name.clone(),
            available: if names.is_empty() {
                "(none)".into()
            } else {
                names.join(", ")
            },
        }
    })?;

    let output = match global.output {
        Some(format) => format,
        None => parse_choice::<OutputFormat>("defaults.output", &config.defaults.output)?,
    };
    let color_mode = match global.color {
        Some(mode) => mode,
        None => parse_choice::<ColorMode>("defaults.color", &config.defaults.color)?,
    };

    Ok(Settings {
        data_file: global
            .data_file
            .clone()
            .unwrap_or_else(|| profile.resolve_data_file()),
        store_options: profile.store_options(),
        output,
        color: output::should_color(color_mode),
        quiet: global.quiet,
        yes: global.yes,
        profile_name,
    })
}

fn parse_choice<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["subnetly"];
        argv.extend_from_slice(args);
        argv.push("stats");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_lab() -> Config {
        let mut config = Config::default();
        config.defaults.output = "yaml".into();
        config.profiles.insert(
            "lab".into(),
            Profile {
                data_file: Some("/data/lab.json".into()),
                enforce_dhcp_bounds: Some(false),
            },
        );
        config
    }

    #[test]
    fn profile_values_apply() {
        let settings = resolve_settings(&global(&["-p", "lab"]), &config_with_lab()).unwrap();
        assert_eq!(settings.profile_name, "lab");
        assert_eq!(settings.data_file, PathBuf::from("/data/lab.json"));
        assert!(!settings.store_options.enforce_dhcp_bounds);
        assert_eq!(settings.output, OutputFormat::Yaml);
    }

    #[test]
    fn flags_override_profile() {
        let settings = resolve_settings(
            &global(&["-p", "lab", "-d", "/tmp/other.json", "-o", "json"]),
            &config_with_lab(),
        )
        .unwrap();
        assert_eq!(settings.data_file, PathBuf::from("/tmp/other.json"));
        assert_eq!(settings.output, OutputFormat::Json);
    }

    #[test]
    fn unknown_profile_lists_available() {
        let err = resolve_settings(&global(&["-p", "nope"]), &config_with_lab()).unwrap_err();
        assert!(matches!(
            err,
            CliError::ProfileNotFound { ref available, .. } if available == "lab"
        ));
    }

    #[test]
    fn bad_default_output_is_a_validation_error() {
        let mut config = Config::default();
        config.defaults.output = "xml".into();
        let err = resolve_settings(&global(&[]), &config).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
