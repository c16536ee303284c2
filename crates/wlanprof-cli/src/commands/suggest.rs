//! Suggestion builder command handler.

use wlanprof_core::{
    EapMethod, EnterpriseCredential, MacAddress, NetworkSuggestion, PasspointIdentity,
    SuggestionBuilder, Wpa3EnterpriseMode,
};

use crate::cli::{EnterpriseKind, SuggestArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

fn credential(args: &SuggestArgs) -> EnterpriseCredential {
    let mut cred = EnterpriseCredential::new();
    cred.set_eap_method(args.eap.map_or(EapMethod::None, EapMethod::from));
    if let Some(phase2) = args.phase2 {
        cred.set_phase2_method(phase2.into());
    }
    if let Some(identity) = &args.identity {
        cred.set_identity(identity);
    }
    if let Some(anonymous) = &args.anonymous_identity {
        cred.set_anonymous_identity(anonymous);
    }
    if let Some(password) = &args.password {
        cred.set_password(password);
    }
    if let Some(domain) = &args.domain_suffix_match {
        cred.set_domain_suffix_match(domain);
    }
    if let Some(alias) = &args.ca_cert {
        cred.set_ca_certificate_alias(alias);
    }
    if let Some(alias) = &args.client_cert {
        cred.set_client_certificate_alias(alias);
    }
    cred
}

/// Translate flags into builder calls. Conflicting flags are passed
/// through so `build()` reports them.
fn builder(args: &SuggestArgs) -> Result<SuggestionBuilder, CliError> {
    let mut b = SuggestionBuilder::new()
        .hidden_ssid(args.hidden)
        .enhanced_open(args.owe)
        .priority(args.priority)
        .priority_group(args.priority_group)
        .initial_autojoin(!args.no_autojoin)
        .untrusted(args.untrusted)
        .restricted(args.restricted)
        .oem_paid(args.oem_paid)
        .oem_private(args.oem_private)
        .carrier_merged(args.carrier_merged)
        .sae_h2e_only(args.sae_h2e_only)
        .wifi7(!args.no_wifi7);

    if let Some(ssid) = &args.ssid {
        b = b.ssid(ssid.clone());
    }
    if let Some(raw) = &args.bssid {
        let bssid = MacAddress::parse(raw).map_err(|e| CliError::Validation {
            field: "bssid".into(),
            reason: e.to_string(),
        })?;
        b = b.bssid(bssid);
    }
    if let Some(p) = &args.wpa2_passphrase {
        b = b.wpa2_passphrase(p.clone());
    }
    if let Some(p) = &args.wpa3_passphrase {
        b = b.wpa3_passphrase(p.clone());
    }
    if let Some(p) = &args.wapi_passphrase {
        b = b.wapi_passphrase(p.clone());
    }

    let passpoint = args.passpoint_fqdn.is_some() || args.passpoint_unique_id.is_some();
    if passpoint {
        b = b.passpoint(PasspointIdentity {
            fqdn: args.passpoint_fqdn.clone().unwrap_or_default(),
            unique_id: args.passpoint_unique_id.clone().unwrap_or_default(),
            friendly_name: args.passpoint_friendly_name.clone().unwrap_or_default(),
            credential: credential(args),
        });
    } else if args.eap.is_some() {
        let cred = credential(args);
        b = match args.enterprise {
            EnterpriseKind::Wpa2 => b.wpa2_enterprise(cred),
            EnterpriseKind::Wpa3 => b.wpa3_enterprise(cred, Wpa3EnterpriseMode::Auto),
            EnterpriseKind::Wpa3Standard => b.wpa3_enterprise(cred, Wpa3EnterpriseMode::Standard),
            EnterpriseKind::Wpa3Suite192 => b.wpa3_enterprise(cred, Wpa3EnterpriseMode::Suite192),
            EnterpriseKind::Wapi => b.wapi_enterprise(cred),
        };
    }

    if let Some(id) = args.carrier_id {
        b = b.carrier_id(id);
    }
    if let Some(id) = args.subscription_id {
        b = b.subscription_id(id);
    }
    if let Some(metered) = args.metered {
        b = b.metered(metered);
    }
    if let Some(shared) = args.shared_with_user {
        b = b.shared_with_user(shared);
    }
    if let Some(setting) = args.mac_randomization {
        b = b.mac_randomization(setting.into());
    }
    if let Some(package) = &args.creator_package {
        b = b.creator(args.creator_uid, package.clone());
    }
    Ok(b)
}

fn detail(s: &NetworkSuggestion) -> String {
    let p = &s.profile;
    [
        format!("Key:           {}", p.key()),
        format!("Profile key:   {}", p.profile_key()),
        format!("Security:      {}", util::security_summary(p)),
        format!("Shared:        {}", s.shared_with_user),
        format!("Autojoin:      {}", s.initial_autojoin_enabled),
        format!("Priority:      {} (group {})", p.priority, s.priority_group),
        format!("MAC random:    {}", p.mac_randomization),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: SuggestArgs, ctx: &Context) -> Result<(), CliError> {
    let mut suggestion = builder(&args)?.build()?;
    tracing::info!(key = %suggestion.profile.key(), "suggestion built");

    if args.save {
        let mut store = ctx.open_store()?;
        if store.upsert(suggestion.profile.clone()) {
            output::print_status(&format!("Added {}", suggestion.profile.key()), ctx.quiet);
        } else {
            output::print_status(&format!("Replaced {}", suggestion.profile.key()), ctx.quiet);
        }
        ctx.save_store(&store)?;
    }

    suggestion.profile = util::redacted(&suggestion.profile, ctx.mask());
    if let Some(passpoint) = suggestion.passpoint.as_mut() {
        passpoint.credential = passpoint.credential.redacted(ctx.mask());
    }
    let out = output::render_single(ctx.output, &suggestion, detail, |s| s.profile.key())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
