//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ConfigError` and `SuggestionError` into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wlanprof_config::ConfigError;
use wlanprof_core::{CoreError, SecurityError, SuggestionError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(wlanprof::not_found),
        help("Run: wlanprof {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(wlanprof::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    // ── Security resolution ──────────────────────────────────────────

    #[error("Security change rejected: {0}")]
    #[diagnostic(
        code(wlanprof::security),
        help(
            "Personal, enterprise and open types cannot share a profile, and OSEN stands alone.\n\
             Use `profiles set-security` to replace the entries instead."
        )
    )]
    Security(#[from] SecurityError),

    #[error("Invalid suggestion: {0}")]
    #[diagnostic(
        code(wlanprof::suggestion),
        help("Run: wlanprof suggest --help for the accepted flag combinations")
    )]
    Suggestion(#[from] SuggestionError),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wlanprof::validation))]
    Validation { field: String, reason: String },

    // ── Configuration / store ────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(wlanprof::config),
        help("Check the config file (wlanprof config path) and WLANPROF_* variables.")
    )]
    Config(#[from] ConfigError),

    #[error("Profile store {path} could not be used: {reason}")]
    #[diagnostic(
        code(wlanprof::store),
        help("Stores are .toml or .json files; pass another with --store.")
    )]
    Store { path: String, reason: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(wlanprof::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(wlanprof::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. }
            | Self::Security(
                SecurityError::DuplicateSecurityType { .. }
                | SecurityError::IncompatibleSecurityType { .. },
            ) => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::Suggestion(_)
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn profile_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: "profile".into(),
            identifier: identifier.into(),
            list_command: "profiles list".into(),
        }
    }

    /// Wrap a store load/save failure with the store's path.
    pub fn store(path: &std::path::Path, err: CoreError) -> Self {
        match err {
            CoreError::Io(io) => Self::Io(io),
            other => Self::Store {
                path: path.display().to_string(),
                reason: other.to_string(),
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Security(e) => Self::Security(e),
            CoreError::Suggestion(e) => Self::Suggestion(e),
            CoreError::ProfileNotFound { key } => Self::profile_not_found(key),
            CoreError::ProfileExists { key } => Self::Conflict {
                resource_type: "profile".into(),
                identifier: key,
            },
            CoreError::Enterprise(e) => Self::Validation {
                field: "enterprise".into(),
                reason: e.to_string(),
            },
            CoreError::Io(e) => Self::Io(e),
            other => Self::Render(other.to_string()),
        }
    }
}
