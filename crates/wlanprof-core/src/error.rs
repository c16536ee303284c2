// ── Core error types ──
//
// `SecurityError` covers the resolver's structured failures. `CoreError`
// is the crate-wide umbrella that callers at the CLI boundary map into
// user-facing diagnostics.

use thiserror::Error;

use crate::model::SecurityType;
use crate::suggestion::SuggestionError;

/// Failures reported by the security-parameter resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Duplicate security params: {security_type} is already present")]
    DuplicateSecurityType { security_type: SecurityType },

    #[error("Cannot add {security_type}: {reason}")]
    IncompatibleSecurityType {
        security_type: SecurityType,
        reason: String,
    },

    #[error("Invalid state: {message}")]
    InvalidState { message: String },
}

/// Failures from the typed (non field-bag) enterprise credential setters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnterpriseError {
    #[error("Too many {kind} certificates: {count} (max {max})")]
    TooManyCertificates {
        kind: &'static str,
        count: usize,
        max: usize,
    },

    #[error("Client certificate chain requires a private key")]
    MissingPrivateKey,

    #[error("Certificate {subject} is not a CA certificate")]
    NotCaCertificate { subject: String },

    #[error("Invalid client certificate chain: {reason}")]
    InvalidChain { reason: String },

    #[error("Key chain alias exceeds {max} characters")]
    AliasTooLong { max: usize },
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Resolution errors ────────────────────────────────────────────
    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Enterprise(#[from] EnterpriseError),

    #[error("Invalid suggestion: {0}")]
    Suggestion(#[from] SuggestionError),

    // ── Store errors ─────────────────────────────────────────────────
    #[error("Profile not found: {key}")]
    ProfileNotFound { key: String },

    #[error("Profile already exists: {key}")]
    ProfileExists { key: String },

    #[error("Unsupported store format for {path} (expected .toml or .json)")]
    UnsupportedFormat { path: String },

    // ── Codec errors ─────────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
