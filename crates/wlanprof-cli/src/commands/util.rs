//! Shared helpers for command handlers.

use std::io::IsTerminal;

use wlanprof_core::{
    EapMethod, NetworkProfile, Phase2Method, ProfileStore, SecurityType,
    model::MacRandomizationSetting,
};

use crate::cli::{EapMethodArg, MacRandomizationArg, Phase2Arg, SecurityTypeArg};
use crate::error::CliError;

/// Resolve a profile key or network id to its stored key.
pub fn resolve_profile_key(store: &ProfileStore, identifier: &str) -> Result<String, CliError> {
    store
        .find(identifier)
        .map(NetworkProfile::key)
        .ok_or_else(|| CliError::profile_not_found(identifier))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// The profile as shown to users: secrets replaced by the mask.
pub fn redacted(p: &NetworkProfile, mask: &str) -> NetworkProfile {
    let mut shown = p.clone();
    shown.enterprise = p.enterprise.redacted(mask);
    if shown.pre_shared_key.is_some() {
        shown.pre_shared_key = Some(format!("\"{mask}\""));
    }
    shown
}

/// Security types of a profile, comma separated.
pub fn security_summary(profile: &NetworkProfile) -> String {
    let types: Vec<String> = profile
        .security()
        .security_types()
        .map(|t| t.to_string())
        .collect();
    if types.is_empty() {
        "legacy".into()
    } else {
        types.join(", ")
    }
}

// ── Argument conversions ────────────────────────────────────────────

impl From<SecurityTypeArg> for SecurityType {
    fn from(arg: SecurityTypeArg) -> Self {
        match arg {
            SecurityTypeArg::Open => Self::Open,
            SecurityTypeArg::Wep => Self::Wep,
            SecurityTypeArg::Psk => Self::Psk,
            SecurityTypeArg::Eap => Self::Eap,
            SecurityTypeArg::Sae => Self::Sae,
            SecurityTypeArg::EapWpa3Enterprise192Bit => Self::EapWpa3Enterprise192Bit,
            SecurityTypeArg::Owe => Self::Owe,
            SecurityTypeArg::WapiPsk => Self::WapiPsk,
            SecurityTypeArg::WapiCert => Self::WapiCert,
            SecurityTypeArg::EapWpa3Enterprise => Self::EapWpa3Enterprise,
            SecurityTypeArg::Osen => Self::Osen,
            SecurityTypeArg::PasspointR1R2 => Self::PasspointR1R2,
            SecurityTypeArg::PasspointR3 => Self::PasspointR3,
            SecurityTypeArg::Dpp => Self::Dpp,
        }
    }
}

impl From<EapMethodArg> for EapMethod {
    fn from(arg: EapMethodArg) -> Self {
        match arg {
            EapMethodArg::Peap => Self::Peap,
            EapMethodArg::Tls => Self::Tls,
            EapMethodArg::Ttls => Self::Ttls,
            EapMethodArg::Pwd => Self::Pwd,
            EapMethodArg::Sim => Self::Sim,
            EapMethodArg::Aka => Self::Aka,
            EapMethodArg::AkaPrime => Self::AkaPrime,
            EapMethodArg::UnauthTls => Self::UnauthTls,
        }
    }
}

impl From<Phase2Arg> for Phase2Method {
    fn from(arg: Phase2Arg) -> Self {
        match arg {
            Phase2Arg::Pap => Self::Pap,
            Phase2Arg::Mschap => Self::Mschap,
            Phase2Arg::Mschapv2 => Self::Mschapv2,
            Phase2Arg::Gtc => Self::Gtc,
            Phase2Arg::Sim => Self::Sim,
            Phase2Arg::Aka => Self::Aka,
            Phase2Arg::AkaPrime => Self::AkaPrime,
        }
    }
}

impl From<MacRandomizationArg> for MacRandomizationSetting {
    fn from(arg: MacRandomizationArg) -> Self {
        match arg {
            MacRandomizationArg::Persistent => Self::Persistent,
            MacRandomizationArg::NonPersistent => Self::NonPersistent,
        }
    }
}
