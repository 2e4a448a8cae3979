//! Config subcommand handlers.

use std::io::IsTerminal;
use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Collect profile values, prompting only when someone can answer.
fn gather_profile(global: &GlobalOpts) -> Result<(String, Profile), CliError> {
    let default_name = global.profile.clone().unwrap_or_else(|| "default".into());
    let default_data = global
        .data_file
        .clone()
        .unwrap_or_else(subnetly_config::default_data_file);

    if global.yes || !std::io::stdin().is_terminal() {
        return Ok((
            default_name,
            Profile {
                data_file: Some(default_data),
                enforce_dhcp_bounds: None,
            },
        ));
    }

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default(default_name)
        .interact_text()
        .map_err(prompt_err)?;

    let data_file: String = Input::new()
        .with_prompt("Subnet data file")
        .default(default_data.display().to_string())
        .interact_text()
        .map_err(prompt_err)?;

    let enforce = Confirm::new()
        .with_prompt("Require DHCP ranges to stay inside their subnet?")
        .default(true)
        .interact()
        .map_err(prompt_err)?;

    Ok((
        name,
        Profile {
            data_file: Some(PathBuf::from(data_file)),
            enforce_dhcp_bounds: (!enforce).then_some(false),
        },
    ))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            if !global.quiet {
                eprintln!("subnetly configuration");
                eprintln!("   Config path: {}\n", config_path.display());
            }

            let (profile_name, profile) = gather_profile(global)?;
            let data_file = profile.resolve_data_file();

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            let written = config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("Configuration written to {}", written.display());
                eprintln!("  Active profile: {profile_name}");
                eprintln!("  Data file:      {}", data_file.display());
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let rendered = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                global.output.unwrap_or(OutputFormat::Table),
                &cfg,
                |_| rendered.trim_end().to_owned(),
                |c| c.default_profile.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
