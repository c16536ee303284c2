//! Profile store command handlers.

use serde::Serialize;
use tabled::Tabled;

use wlanprof_core::{CoreError, EapMethod, NetworkProfile, SecurityType};

use crate::cli::{ProfilesArgs, ProfilesCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "EAP")]
    eap: String,
    #[tabled(rename = "Hidden")]
    hidden: String,
    #[tabled(rename = "Priority")]
    priority: i32,
}

impl ProfileRow {
    fn new(p: &NetworkProfile, color: bool) -> Self {
        Self {
            id: p.network_id,
            key: p.key(),
            ssid: p.ssid.clone().unwrap_or_else(|| "-".into()),
            security: util::security_summary(p),
            eap: match p.enterprise.eap_method() {
                EapMethod::None => "-".into(),
                method => method.to_string(),
            },
            hidden: output::yes_no(p.hidden_ssid, color),
            priority: p.priority,
        }
    }
}

#[derive(Clone, Serialize, Tabled)]
struct KeyRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Key")]
    key: String,
}

#[derive(Clone, Serialize, Tabled)]
struct MigratedRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Security")]
    security_type: SecurityType,
}

fn detail(p: &NetworkProfile, color: bool) -> String {
    let none = || output::dim("-", color);
    let mut lines = vec![
        format!("Key:          {}", p.key()),
        format!("Network ID:   {}", p.network_id),
        format!("SSID:         {}", p.ssid.clone().unwrap_or_else(none)),
        format!(
            "BSSID:        {}",
            p.bssid.as_ref().map_or_else(none, ToString::to_string)
        ),
        format!("Hidden:       {}", output::yes_no(p.hidden_ssid, color)),
        format!("Shared:       {}", output::yes_no(p.shared, color)),
        format!("Open:         {}", output::yes_no(p.is_open_network(), color)),
        format!("Enterprise:   {}", output::yes_no(p.is_enterprise(), color)),
        format!("Passpoint:    {}", output::yes_no(p.is_passpoint(), color)),
        format!(
            "Auth type:    {}",
            p.auth_type()
                .map_or_else(|e| e.to_string(), |k| k.to_string())
        ),
        format!("Priority:     {}", p.priority),
        format!("Metered:      {}", p.metered_override),
        format!("MAC random:   {}", p.mac_randomization),
    ];
    if p.enterprise.eap_method() != EapMethod::None {
        lines.push(format!(
            "EAP:          {} / {}",
            p.enterprise.eap_method(),
            p.enterprise.phase2_method()
        ));
        let identity = p.enterprise.identity();
        if !identity.is_empty() {
            lines.push(format!("Identity:     {identity}"));
        }
    }

    let entries = p.security().security_params_list();
    if entries.is_empty() {
        lines.push(format!(
            "Legacy:       key_mgmt={} protocols={}",
            p.security().key_mgmt(),
            p.security().protocols()
        ));
    }
    for params in entries {
        let mut flags = Vec::new();
        if !params.is_enabled() {
            flags.push("disabled");
        }
        if params.is_added_by_auto_upgrade() {
            flags.push("auto-upgrade");
        }
        if params.is_require_pmf() {
            flags.push("pmf");
        }
        if params.is_sae_h2e_only_mode() {
            flags.push("h2e-only");
        }
        if params.is_sae_pk_only_mode() {
            flags.push("pk-only");
        }
        lines.push(format!(
            "Security:     {} key_mgmt={} pairwise={} {}",
            params.security_type(),
            params.key_mgmt(),
            params.pairwise_ciphers(),
            flags.join(",")
        ));
    }
    lines.join("\n").trim_end().to_owned()
}

fn key_rows(p: &NetworkProfile) -> Vec<KeyRow> {
    let mut rows = vec![
        KeyRow {
            kind: "key".into(),
            key: p.key(),
        },
        KeyRow {
            kind: "profile".into(),
            key: p.profile_key(),
        },
    ];
    rows.extend(p.all_network_keys().into_iter().map(|key| KeyRow {
        kind: "network".into(),
        key,
    }));
    if p.enterprise.eap_method() != EapMethod::None {
        if let Ok(key) = p.key_id_for_credentials(None) {
            rows.push(KeyRow {
                kind: "credentials".into(),
                key,
            });
        }
    }
    rows
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ProfilesArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        ProfilesCommand::List => {
            let store = ctx.open_store()?;
            let shown: Vec<NetworkProfile> =
                store.iter().map(|p| util::redacted(p, ctx.mask())).collect();
            let out = output::render_list(
                ctx.output,
                &shown,
                |p| ProfileRow::new(p, ctx.color),
                NetworkProfile::key,
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ProfilesCommand::Show { profile } => {
            let store = ctx.open_store()?;
            let found = store
                .find(&profile)
                .ok_or_else(|| CliError::profile_not_found(&profile))?;
            let shown = util::redacted(found, ctx.mask());
            let out = output::render_single(
                ctx.output,
                &shown,
                |p| detail(p, ctx.color),
                NetworkProfile::key,
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ProfilesCommand::Keys { profile } => {
            let store = ctx.open_store()?;
            let found = store
                .find(&profile)
                .ok_or_else(|| CliError::profile_not_found(&profile))?;
            let rows = key_rows(found);
            let out = output::render_list(
                ctx.output,
                &rows,
                KeyRow::clone,
                |r| r.key.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ProfilesCommand::Migrate => {
            let mut store = ctx.open_store()?;
            let migrated: Vec<MigratedRow> = store
                .migrate_legacy()
                .into_iter()
                .map(|(key, security_type)| MigratedRow { key, security_type })
                .collect();
            if !migrated.is_empty() {
                ctx.save_store(&store)?;
            }
            output::print_status(
                &format!("Migrated {} legacy profile(s)", migrated.len()),
                ctx.quiet,
            );
            let out = output::render_list(
                ctx.output,
                &migrated,
                MigratedRow::clone,
                |m| m.key.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ProfilesCommand::AddSecurity {
            profile,
            security_type,
        } => {
            let security_type = SecurityType::from(security_type);
            edit(ctx, &profile, |p| {
                p.add_security_type(security_type).map_err(CoreError::from)
            })
        }

        ProfilesCommand::SetSecurity {
            profile,
            security_type,
        } => {
            let security_type = SecurityType::from(security_type);
            edit(ctx, &profile, |p| {
                p.set_security_type(security_type);
                Ok(())
            })
        }

        ProfilesCommand::Remove { profile } => {
            let mut store = ctx.open_store()?;
            let key = util::resolve_profile_key(&store, &profile)?;
            if !util::confirm(&format!("Remove profile {key}?"), ctx.yes)? {
                return Ok(());
            }
            store.remove(&key);
            ctx.save_store(&store)?;
            output::print_status(&format!("Removed {key}"), ctx.quiet);
            Ok(())
        }
    }
}

/// Apply an edit to one stored profile, save, and print the new key.
fn edit<F>(ctx: &Context, identifier: &str, change: F) -> Result<(), CliError>
where
    F: FnOnce(&mut NetworkProfile) -> Result<(), CoreError>,
{
    let mut store = ctx.open_store()?;
    let key = util::resolve_profile_key(&store, identifier)?;
    let new_key = store.update(&key, change)?;
    ctx.save_store(&store)?;
    output::print_output(&new_key, ctx.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn detail_lists_security_entries() {
        let mut p = NetworkProfile::with_ssid("home", SecurityType::Psk);
        p.add_security_type(SecurityType::Sae).unwrap();
        let text = detail(&p, false);
        assert!(text.contains("Security:     psk"));
        assert!(text.contains("Security:     sae"));
        assert!(text.contains("Auth type:    WPA_PSK"));
    }

    #[test]
    fn enterprise_profiles_get_a_credentials_key() {
        let mut p = NetworkProfile::with_ssid("corp", SecurityType::Eap);
        p.enterprise.set_eap_method(EapMethod::Peap);
        let rows = key_rows(&p);
        assert!(rows.iter().any(|r| r.kind == "credentials"));
        assert!(rows.iter().any(|r| r.kind == "network" && r.key.contains("wpa2-enterprise")));
    }
}
