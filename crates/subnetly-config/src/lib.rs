//! Shared configuration for subnetly tools.
//!
//! TOML profiles naming a data file and store behavior, merged with
//! `SUBNETLY_` environment overrides. The CLI adds flag-aware wrappers
//! on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use subnetly_core::StoreOptions;

/// File name used for subnet data when a profile does not name one.
pub const DEFAULT_DATA_FILE: &str = "subnets.json";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named data profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile; the `default` profile may be absent and then
    /// resolves to an empty one.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile(name.into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named data profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Subnet data file. Relative paths resolve against the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    /// Require DHCP endpoints to lie inside their subnet (default on).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_dhcp_bounds: Option<bool>,
}

impl Profile {
    pub fn store_options(&self) -> StoreOptions {
        let defaults = StoreOptions::default();
        StoreOptions {
            enforce_dhcp_bounds: self
                .enforce_dhcp_bounds
                .unwrap_or(defaults.enforce_dhcp_bounds),
        }
    }

    /// The profile's data file, or `subnets.json` in the platform data dir.
    pub fn resolve_data_file(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(default_data_file)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "subnetly", "subnetly")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the subnet data file.
pub fn default_data_file() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join(DEFAULT_DATA_FILE),
        |dirs| dirs.data_dir().join(DEFAULT_DATA_FILE),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("subnetly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file contributes nothing.
///
/// Environment keys nest on double underscores, e.g.
/// `SUBNETLY_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SUBNETLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.color, "auto");
    }

    #[test]
    fn profiles_parse_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "lab"

[defaults]
output = "json"

[profiles.lab]
data_file = "/srv/ipam/lab.json"
enforce_dhcp_bounds = false
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("lab"));
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.color, "auto");

        let lab = config.profile("lab").unwrap();
        assert_eq!(lab.resolve_data_file(), PathBuf::from("/srv/ipam/lab.json"));
        assert!(!lab.store_options().enforce_dhcp_bounds);
    }

    #[test]
    fn default_profile_may_be_implicit() {
        let config = Config::default();
        let profile = config.profile("default").unwrap();
        assert!(profile.store_options().enforce_dhcp_bounds);
        assert!(profile.resolve_data_file().ends_with(DEFAULT_DATA_FILE));
        assert!(matches!(
            config.profile("missing"),
            Err(ConfigError::UnknownProfile(name)) if name == "missing"
        ));
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "home".into(),
            Profile {
                data_file: Some("home.json".into()),
                enforce_dhcp_bounds: None,
            },
        );
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, config.profiles);
    }
}
