// ── Network profile ──
//
// A saved (or suggested) network. Identity for storage purposes is the
// derived key string, never structural equality.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{
    IpConfiguration, MacRandomizationSetting, MeteredOverride, NetworkSelectionStatus,
};
use super::enterprise::{EapMethod, EnterpriseCredential};
use super::mac::MacAddress;
use super::security_type::SecurityType;
use super::suites::KeyMgmt;
use crate::error::SecurityError;
use crate::resolver::SecurityProfileResolver;

pub const INVALID_NETWORK_ID: i32 = -1;
pub const UNKNOWN_UID: i32 = -1;
pub const UNKNOWN_CARRIER_ID: i32 = -1;
pub const INVALID_SUBSCRIPTION_ID: i32 = -1;

/// uids per user; the user handle is `uid / PER_USER_RANGE`.
const PER_USER_RANGE: i32 = 100_000;

/// Key management bits that make up the middle of a credential key id.
const KEY_ID_KEY_MGMT: [KeyMgmt; 5] = [
    KeyMgmt::WpaEap,
    KeyMgmt::Osen,
    KeyMgmt::Ieee8021x,
    KeyMgmt::SuiteB192,
    KeyMgmt::WapiCert,
];

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkProfile {
    pub network_id: i32,
    /// Quoted UTF-8 (`"home"`) or bare hex.
    pub ssid: Option<String>,
    pub bssid: Option<MacAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_shared_key: Option<String>,
    pub hidden_ssid: bool,
    /// Visible to every user on the device.
    pub shared: bool,
    pub creator_uid: i32,
    pub creator_name: Option<String>,
    pub from_suggestion: bool,
    pub carrier_id: i32,
    pub subscription_id: i32,
    pub subscription_group: Option<Uuid>,
    pub passpoint_unique_id: Option<String>,
    pub fqdn: Option<String>,
    pub provider_friendly_name: Option<String>,
    pub priority: i32,
    pub metered_override: MeteredOverride,
    pub mac_randomization: MacRandomizationSetting,
    pub trusted: bool,
    pub restricted: bool,
    pub oem_paid: bool,
    pub oem_private: bool,
    pub carrier_merged: bool,
    pub wifi7_enabled: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub enterprise: EnterpriseCredential,
    pub ip_configuration: IpConfiguration,
    pub selection_status: NetworkSelectionStatus,
    pub security: SecurityProfileResolver,
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self {
            network_id: INVALID_NETWORK_ID,
            ssid: None,
            bssid: None,
            pre_shared_key: None,
            hidden_ssid: false,
            shared: true,
            creator_uid: UNKNOWN_UID,
            creator_name: None,
            from_suggestion: false,
            carrier_id: UNKNOWN_CARRIER_ID,
            subscription_id: INVALID_SUBSCRIPTION_ID,
            subscription_group: None,
            passpoint_unique_id: None,
            fqdn: None,
            provider_friendly_name: None,
            priority: 0,
            metered_override: MeteredOverride::None,
            mac_randomization: MacRandomizationSetting::Auto,
            trusted: true,
            restricted: false,
            oem_paid: false,
            oem_private: false,
            carrier_merged: false,
            wifi7_enabled: true,
            created_at: None,
            updated_at: None,
            enterprise: EnterpriseCredential::default(),
            ip_configuration: IpConfiguration::Dhcp,
            selection_status: NetworkSelectionStatus::default(),
            security: SecurityProfileResolver::default(),
        }
    }
}

impl NetworkProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile for a quoted SSID with a single security type.
    pub fn with_ssid(ssid: &str, security_type: SecurityType) -> Self {
        let mut profile = Self {
            ssid: Some(format!("\"{ssid}\"")),
            created_at: Some(Utc::now()),
            ..Self::default()
        };
        profile.security.set_security_type(security_type);
        profile
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Android-style user handle of the creator.
    pub fn user_id(&self) -> i32 {
        self.creator_uid / PER_USER_RANGE
    }

    // ── Security delegation ──────────────────────────────────────────

    pub fn security(&self) -> &SecurityProfileResolver {
        &self.security
    }

    pub fn security_mut(&mut self) -> &mut SecurityProfileResolver {
        &mut self.security
    }

    pub fn set_security_type(&mut self, security_type: SecurityType) {
        self.security.set_security_type(security_type);
    }

    pub fn add_security_type(&mut self, security_type: SecurityType) -> Result<(), SecurityError> {
        self.security.add_security_type(security_type)
    }

    pub fn is_security_type(&self, security_type: SecurityType) -> bool {
        self.security.is_security_type(security_type)
    }

    /// An enterprise entry plus a credential with an EAP method.
    pub fn is_enterprise(&self) -> bool {
        self.enterprise.eap_method() != EapMethod::None && self.security.is_enterprise()
    }

    pub fn is_open_network(&self) -> bool {
        self.security.is_open_network()
    }

    pub fn needs_pre_shared_key(&self) -> bool {
        self.security.needs_pre_shared_key()
    }

    pub fn auth_type(&self) -> Result<KeyMgmt, SecurityError> {
        self.security.auth_type()
    }

    pub fn is_passpoint(&self) -> bool {
        non_empty(self.fqdn.as_deref())
            && non_empty(self.provider_friendly_name.as_deref())
            && self.enterprise.eap_method() != EapMethod::None
            && non_empty(self.passpoint_unique_id.as_deref())
    }

    // ── Keys ─────────────────────────────────────────────────────────

    pub fn default_security_type(&self) -> &'static str {
        self.security.default_security_type_name()
    }

    /// SSID followed by the default security name, e.g. `"home"WPA_PSK`.
    pub fn ssid_and_security_type_string(&self) -> String {
        format!(
            "{}{}",
            ssid_part(self.ssid.as_deref()),
            self.default_security_type()
        )
    }

    /// Storage key. Passpoint profiles use their unique id.
    pub fn key(&self) -> String {
        if let Some(id) = &self.passpoint_unique_id {
            return id.clone();
        }
        let mut key = self.ssid_and_security_type_string();
        self.push_user_suffix(&mut key);
        key
    }

    pub fn network_key(&self) -> String {
        self.key()
    }

    /// Like [`key`](Self::key), but suggestion profiles also carry the
    /// suggesting app and subscription.
    pub fn profile_key(&self) -> String {
        if let Some(id) = &self.passpoint_unique_id {
            return id.clone();
        }
        let mut key = self.ssid_and_security_type_string();
        self.push_user_suffix(&mut key);
        self.push_suggestion_suffix(&mut key);
        key
    }

    /// Per-security-type key, as used for data-usage accounting.
    pub fn network_key_for_security_type(&self, security_type: SecurityType) -> String {
        if let Some(id) = &self.passpoint_unique_id {
            return format!("{}-{id}", self.subscription_id);
        }
        let mut key = format!(
            "{}{}",
            ssid_part(self.ssid.as_deref()),
            security_type.legacy_name()
        );
        self.push_user_suffix(&mut key);
        self.push_suggestion_suffix(&mut key);
        key
    }

    pub fn all_network_keys(&self) -> BTreeSet<String> {
        self.security
            .security_types()
            .map(|t| self.network_key_for_security_type(t))
            .collect()
    }

    /// Key under which enterprise credentials are stored.
    ///
    /// Values from `current` fill in a missing SSID, an empty key
    /// management set and an unset EAP method.
    pub fn key_id_for_credentials(&self, current: Option<&Self>) -> Result<String, SecurityError> {
        let invalid = || SecurityError::InvalidState {
            message: "Invalid config details".into(),
        };
        let ssid = if non_empty(self.ssid.as_deref()) {
            self.ssid.as_deref()
        } else {
            current.ok_or_else(invalid)?.ssid.as_deref()
        };
        let key_mgmt = if self.security.key_mgmt().is_empty() {
            current.ok_or_else(invalid)?.security.key_mgmt()
        } else {
            self.security.key_mgmt()
        };
        let names: String = KEY_ID_KEY_MGMT
            .into_iter()
            .filter(|k| key_mgmt.contains(*k))
            .map(<&'static str>::from)
            .collect();
        if names.is_empty() {
            return Err(SecurityError::InvalidState {
                message: "Not an EAP network".into(),
            });
        }
        let eap_key = self.enterprise.key_id(current.map(|c| &c.enterprise));
        let key_id = format!(
            "{}_{names}_{}",
            ssid_part(ssid),
            trim_for_key_id(Some(&eap_key))
        );
        if !self.from_suggestion {
            return Ok(key_id);
        }
        let bssid = self.bssid.as_ref().map(MacAddress::as_str);
        Ok(format!(
            "{key_id}_{}_{}",
            trim_for_key_id(bssid),
            trim_for_key_id(self.creator_name.as_deref())
        ))
    }

    fn push_user_suffix(&self, key: &mut String) {
        if !self.shared {
            key.push('-');
            key.push_str(&self.user_id().to_string());
        }
    }

    fn push_suggestion_suffix(&self, key: &mut String) {
        if self.from_suggestion {
            key.push_str(&format!(
                "_{}-{}-{}",
                self.creator_name.as_deref().unwrap_or("null"),
                self.carrier_id,
                self.subscription_id
            ));
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Lowercased unless quoted. A missing SSID renders as `null`.
fn ssid_part(ssid: Option<&str>) -> String {
    match ssid {
        None => "null".to_owned(),
        Some(s) if !s.is_empty() && !s.starts_with('"') => s.to_lowercase(),
        Some(s) => s.to_owned(),
    }
}

fn trim_for_key_id(value: Option<&str>) -> String {
    value
        .map(|v| v.replace(['"', ' '], ""))
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::enterprise::Phase2Method;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn suggestion_profile() -> NetworkProfile {
        let mut p = NetworkProfile::with_ssid("Corp Net", SecurityType::Eap);
        p.from_suggestion = true;
        p.creator_name = Some("com.example.app".into());
        p.carrier_id = 1911;
        p.subscription_id = 2;
        p.shared = false;
        p.creator_uid = 1_010_123;
        p
    }

    #[test]
    fn quoted_ssid_keeps_case() {
        let p = NetworkProfile::with_ssid("HomeNet", SecurityType::Psk);
        assert_snapshot!(p.key(), @r#""HomeNet"WPA_PSK"#);
    }

    #[test]
    fn hex_ssid_is_lowercased() {
        let mut p = NetworkProfile::with_ssid("x", SecurityType::Sae);
        p.ssid = Some("48454C4C4F".into());
        assert_snapshot!(p.key(), @"48454c4c4fSAE");
    }

    #[test]
    fn missing_ssid_renders_null() {
        let mut p = NetworkProfile::new();
        p.set_security_type(SecurityType::Open);
        assert_snapshot!(p.key(), @"nullNONE");
    }

    #[test]
    fn unshared_profile_appends_user() {
        let mut p = NetworkProfile::with_ssid("lab", SecurityType::Owe);
        p.shared = false;
        p.creator_uid = 1_010_123;
        assert_snapshot!(p.key(), @r#""lab"OWE-10"#);
    }

    #[test]
    fn suggestion_keys() {
        let p = suggestion_profile();
        assert_snapshot!(p.key(), @r#""Corp Net"WPA_EAP-10"#);
        assert_snapshot!(p.profile_key(), @r#""Corp Net"WPA_EAP-10_com.example.app-1911-2"#);
        assert_snapshot!(
            p.network_key_for_security_type(SecurityType::Eap),
            @r#""Corp Net"wpa2-enterprise-10_com.example.app-1911-2"#
        );
    }

    #[test]
    fn passpoint_keys_use_unique_id() {
        let mut p = suggestion_profile();
        p.passpoint_unique_id = Some("example.com_realm".into());
        assert_eq!(p.key(), "example.com_realm");
        assert_eq!(p.profile_key(), "example.com_realm");
        assert_eq!(
            p.network_key_for_security_type(SecurityType::PasspointR3),
            "2-example.com_realm"
        );
    }

    #[test]
    fn all_network_keys_cover_each_entry() {
        let mut p = NetworkProfile::with_ssid("cafe", SecurityType::Psk);
        p.add_security_type(SecurityType::Sae).unwrap();
        let keys: Vec<String> = p.all_network_keys().into_iter().collect();
        assert_eq!(keys, vec![r#""cafe"wpa2-psk"#, r#""cafe"wpa3-sae"#]);
    }

    #[test]
    fn wpa3_enterprise_default_security_type() {
        let p = NetworkProfile::with_ssid("corp", SecurityType::EapWpa3Enterprise);
        assert_eq!(p.ssid_and_security_type_string(), r#""corp"WPA3_EAP"#);
    }

    #[test]
    fn key_id_for_credentials() {
        let mut p = NetworkProfile::with_ssid("Corp Net", SecurityType::Eap);
        p.enterprise.set_eap_method(EapMethod::Peap);
        p.enterprise.set_phase2_method(Phase2Method::Mschapv2);
        assert_snapshot!(
            p.key_id_for_credentials(None).unwrap(),
            @r#""Corp Net"_WPA_EAPIEEE8021X_PEAP_MSCHAPV2"#
        );
    }

    #[test]
    fn key_id_for_suggestion_appends_bssid_and_creator() {
        let mut p = suggestion_profile();
        p.bssid = Some(MacAddress::parse("02:11:22:33:44:55").unwrap());
        p.enterprise.set_eap_method(EapMethod::Tls);
        assert_snapshot!(
            p.key_id_for_credentials(None).unwrap(),
            @r#""Corp Net"_WPA_EAPIEEE8021X_TLS_NULL_02:11:22:33:44:55_com.example.app"#
        );
    }

    #[test]
    fn key_id_borrows_from_current() {
        let mut current = NetworkProfile::with_ssid("corp", SecurityType::Eap);
        current.enterprise.set_eap_method(EapMethod::Ttls);
        current.enterprise.set_phase2_method(Phase2Method::Pap);

        let partial = NetworkProfile::new();
        assert_eq!(
            partial.key_id_for_credentials(Some(&current)).unwrap(),
            r#""corp"_WPA_EAPIEEE8021X_TTLS_PAP"#
        );
        assert!(partial.key_id_for_credentials(None).is_err());
    }

    #[test]
    fn key_id_rejects_personal_network() {
        let p = NetworkProfile::with_ssid("home", SecurityType::Sae);
        let err = p.key_id_for_credentials(None).unwrap_err();
        assert_eq!(
            err,
            SecurityError::InvalidState {
                message: "Not an EAP network".into()
            }
        );
    }

    #[test]
    fn profile_enterprise_requires_eap_method() {
        let mut p = NetworkProfile::with_ssid("corp", SecurityType::Eap);
        assert!(!p.is_enterprise());
        assert!(p.security().is_enterprise());
        p.enterprise.set_eap_method(EapMethod::Peap);
        assert!(p.is_enterprise());
    }

    #[test]
    fn profile_round_trips_through_toml() {
        let mut p = suggestion_profile();
        p.enterprise.set_identity("alice");
        p.subscription_group = Some(Uuid::nil());
        let text = toml::to_string_pretty(&p).unwrap();
        let back: NetworkProfile = toml::from_str(&text).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.key(), p.key());
    }
}
