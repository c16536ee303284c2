//! Shared configuration for the wlanprof tooling.
//!
//! Output defaults, the profile store location, the credential redaction
//! mask and the device capability table. Values layer as built-in
//! defaults, then the TOML file, then `WLANPROF_`-prefixed environment
//! variables (`WLANPROF_DEFAULTS_OUTPUT=json`, `WLANPROF_STORE=...`).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wlanprof_core::StaticCapabilities;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

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

/// Accepted values of `defaults.output`.
pub const OUTPUT_FORMATS: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];

/// Accepted values of `defaults.color`.
pub const COLOR_MODES: &[&str] = &["auto", "always", "never"];

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile store file (`.toml` or `.json`). Defaults to the platform
    /// data directory.
    pub store: Option<PathBuf>,

    #[serde(default)]
    pub defaults: Defaults,

    /// What the target device supports, for `check`.
    #[serde(default)]
    pub capabilities: StaticCapabilities,
}

impl Config {
    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(default_store_path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_one_of("defaults.output", &self.defaults.output, OUTPUT_FORMATS)?;
        check_one_of("defaults.color", &self.defaults.color, COLOR_MODES)?;
        if self.defaults.mask.is_empty() {
            return Err(ConfigError::Validation {
                field: "defaults.mask".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Stands in for enterprise passwords in displayed or exported
    /// profiles. A password equal to it is never copied back.
    #[serde(default = "default_mask")]
    pub mask: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            mask: default_mask(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_mask() -> String {
    "*".into()
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::Validation {
        field: field.into(),
        reason: format!("expected one of {}, got '{value}'", allowed.join(", ")),
    })
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "wlanprof", "wlanprof")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where profiles live when the config names no store.
pub fn default_store_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("profiles.toml"),
        |dirs| dirs.data_dir().join("profiles.toml"),
    )
}

fn home_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("wlanprof");
    p
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load and validate the config at `path`, layered over defaults and
/// under the environment. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WLANPROF_").split("_"))
        .extract()?;
    config.validate()?;
    Ok(config)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
