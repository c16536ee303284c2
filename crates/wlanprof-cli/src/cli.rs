//! Clap derive structures for the `wlanprof` CLI.
//!
//! Defines the complete command tree, global flags, and shared value
//! enums. Only depends on clap so `build.rs` can render man pages from it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wlanprof -- inspect, migrate and build Wi-Fi network profiles
#[derive(Debug, Parser)]
#[command(
    name = "wlanprof",
    version,
    about = "Inspect, migrate and build Wi-Fi network profiles",
    long_about = "Works on a profile store file (TOML or JSON).\n\n\
        Resolves each profile's security entries, converts legacy bit-set\n\
        profiles, validates app-style network suggestions and checks\n\
        profiles against a device capability table.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "WLANPROF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Profile store file, `.toml` or `.json` (overrides config)
    #[arg(long, short = 's', env = "WLANPROF_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(long, short = 'o', env = "WLANPROF_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output (overrides config)
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

// ── Domain value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SecurityTypeArg {
    Open,
    Wep,
    Psk,
    Eap,
    Sae,
    #[value(name = "eap-wpa3-enterprise-192-bit")]
    EapWpa3Enterprise192Bit,
    Owe,
    WapiPsk,
    WapiCert,
    EapWpa3Enterprise,
    Osen,
    #[value(name = "passpoint-r1-r2")]
    PasspointR1R2,
    #[value(name = "passpoint-r3")]
    PasspointR3,
    Dpp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EapMethodArg {
    Peap,
    Tls,
    Ttls,
    Pwd,
    Sim,
    Aka,
    AkaPrime,
    UnauthTls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Phase2Arg {
    Pap,
    Mschap,
    Mschapv2,
    Gtc,
    Sim,
    Aka,
    AkaPrime,
}

/// Which enterprise flavor an `--eap` credential is suggested as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnterpriseKind {
    Wpa2,
    /// WPA3-Enterprise, 192-bit when the certificates allow it
    Wpa3,
    Wpa3Standard,
    Wpa3Suite192,
    Wapi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MacRandomizationArg {
    Persistent,
    NonPersistent,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect and edit stored profiles
    #[command(alias = "p")]
    Profiles(ProfilesArgs),

    /// Build a network suggestion and optionally store it
    Suggest(Box<SuggestArgs>),

    /// Check profiles against the configured device capabilities
    Check(CheckArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    pub command: ProfilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCommand {
    /// List stored profiles
    #[command(alias = "ls")]
    List,

    /// Show one profile with its security entries
    Show {
        /// Profile key or network id
        profile: String,
    },

    /// Show every key derived from a profile
    Keys {
        /// Profile key or network id
        profile: String,
    },

    /// Convert legacy bit-set profiles into security entries
    Migrate,

    /// Add a security type to a profile
    AddSecurity {
        /// Profile key or network id
        profile: String,

        #[arg(value_name = "TYPE")]
        security_type: SecurityTypeArg,
    },

    /// Replace a profile's security entries with a single type
    SetSecurity {
        /// Profile key or network id
        profile: String,

        #[arg(value_name = "TYPE")]
        security_type: SecurityTypeArg,
    },

    /// Remove a profile
    #[command(alias = "rm")]
    Remove {
        /// Profile key or network id
        profile: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUGGEST
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Args)]
pub struct SuggestArgs {
    /// Network name (unquoted)
    #[arg(long)]
    pub ssid: Option<String>,

    /// Restrict to one access point
    #[arg(long)]
    pub bssid: Option<String>,

    /// The network does not broadcast its SSID
    #[arg(long)]
    pub hidden: bool,

    // ── Credential (pick one) ──
    /// Enhanced Open (OWE)
    #[arg(long, help_heading = "Credential")]
    pub owe: bool,

    #[arg(long, value_name = "PASSPHRASE", help_heading = "Credential")]
    pub wpa2_passphrase: Option<String>,

    #[arg(long, value_name = "PASSPHRASE", help_heading = "Credential")]
    pub wpa3_passphrase: Option<String>,

    #[arg(long, value_name = "PASSPHRASE", help_heading = "Credential")]
    pub wapi_passphrase: Option<String>,

    /// EAP method of an enterprise credential
    #[arg(long, value_name = "METHOD", help_heading = "Credential")]
    pub eap: Option<EapMethodArg>,

    /// How the `--eap` credential is used
    #[arg(long, default_value = "wpa2", help_heading = "Credential")]
    pub enterprise: EnterpriseKind,

    #[arg(long, value_name = "METHOD", help_heading = "Credential")]
    pub phase2: Option<Phase2Arg>,

    #[arg(long, help_heading = "Credential")]
    pub identity: Option<String>,

    #[arg(long, help_heading = "Credential")]
    pub anonymous_identity: Option<String>,

    #[arg(long, help_heading = "Credential")]
    pub password: Option<String>,

    #[arg(long, help_heading = "Credential")]
    pub domain_suffix_match: Option<String>,

    /// Key-store alias of the CA certificate
    #[arg(long, value_name = "ALIAS", help_heading = "Credential")]
    pub ca_cert: Option<String>,

    /// Key-store alias of the client certificate
    #[arg(long, value_name = "ALIAS", help_heading = "Credential")]
    pub client_cert: Option<String>,

    // ── Passpoint ──
    /// Passpoint home-SP FQDN (instead of an SSID)
    #[arg(long, help_heading = "Passpoint")]
    pub passpoint_fqdn: Option<String>,

    #[arg(long, help_heading = "Passpoint")]
    pub passpoint_unique_id: Option<String>,

    #[arg(long, help_heading = "Passpoint")]
    pub passpoint_friendly_name: Option<String>,

    // ── Policy ──
    #[arg(long, default_value = "0", help_heading = "Policy")]
    pub priority: u32,

    #[arg(long, default_value = "0", help_heading = "Policy")]
    pub priority_group: u32,

    #[arg(long, help_heading = "Policy")]
    pub carrier_id: Option<i32>,

    #[arg(long, help_heading = "Policy")]
    pub subscription_id: Option<i32>,

    #[arg(long, help_heading = "Policy")]
    pub metered: Option<bool>,

    /// Let the user see and edit the network
    #[arg(long, help_heading = "Policy")]
    pub shared_with_user: Option<bool>,

    /// Do not join automatically after the suggestion is approved
    #[arg(long, help_heading = "Policy")]
    pub no_autojoin: bool,

    #[arg(long, help_heading = "Policy")]
    pub untrusted: bool,

    #[arg(long, help_heading = "Policy")]
    pub restricted: bool,

    #[arg(long, help_heading = "Policy")]
    pub oem_paid: bool,

    #[arg(long, help_heading = "Policy")]
    pub oem_private: bool,

    #[arg(long, help_heading = "Policy")]
    pub carrier_merged: bool,

    #[arg(long, help_heading = "Policy")]
    pub mac_randomization: Option<MacRandomizationArg>,

    /// Only connect with SAE Hash-to-Element
    #[arg(long, help_heading = "Policy")]
    pub sae_h2e_only: bool,

    #[arg(long, help_heading = "Policy")]
    pub no_wifi7: bool,

    // ── Creator ──
    #[arg(long, default_value = "-1", allow_hyphen_values = true, help_heading = "Creator")]
    pub creator_uid: i32,

    #[arg(long, help_heading = "Creator")]
    pub creator_package: Option<String>,

    /// Store the resulting profile
    #[arg(long)]
    pub save: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CHECK
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Profile key or network id (all profiles when omitted)
    pub profile: Option<String>,
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
    /// Write a config file with the default settings
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
