// ── Network suggestion builder ──
//
// Apps describe a network by intent (SSID, one credential kind, policy
// flags). Setters only record; every check runs in `build()`, which
// assembles a `NetworkProfile` through the resolver.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::profile::INVALID_SUBSCRIPTION_ID;
use crate::model::{
    EapMethod, EnterpriseCredential, MacAddress, MacRandomizationSetting, MeteredOverride,
    NetworkProfile, SecurityType,
};

/// Why a suggestion could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    #[error("only one security type (open, passphrase, enterprise or Passpoint) may be set")]
    MultipleSecurityTypes,

    #[error("an SSID must not be set for a Passpoint suggestion")]
    PasspointWithSsid,

    #[error("a Passpoint suggestion cannot be hidden")]
    PasspointHidden,

    #[error("Passpoint configuration needs an FQDN and a unique id")]
    InvalidPasspoint,

    #[error("an SSID is required")]
    MissingSsid,

    #[error("invalid SSID")]
    InvalidSsid,

    #[error("invalid BSSID {0}")]
    InvalidBssid(MacAddress),

    #[error("passphrase is not ASCII")]
    NonAsciiPassphrase,

    #[error("enterprise configuration needs a domain or subject match and a CA certificate")]
    MissingServerCertValidation,

    #[error("192-bit mode: {0}")]
    Suite192(&'static str),

    #[error("Hash-to-Element only mode is only allowed for the SAE network")]
    H2eOnlyWithoutSae,

    #[error("MAC randomization must be persistent or non-persistent")]
    InvalidMacRandomization,

    #[error("subscription id {0} is invalid")]
    InvalidSubscriptionId(i32),

    #[error("an open network cannot be shared with the user")]
    OpenNetworkShared,

    #[error("a network must be shared with the user or joinable automatically")]
    NotSharedNorAutojoin,

    #[error("a network marked {0} cannot be shared with the user")]
    SharedConflict(&'static str),

    #[error("a carrier merged network must be a metered enterprise network with a subscription")]
    InvalidCarrierMerged,

    #[error("subscription group and subscription id are mutually exclusive")]
    SubscriptionGroupAndId,
}

/// How a WPA3-Enterprise credential picks its mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Wpa3EnterpriseMode {
    /// 192-bit when the credential is TLS with Suite-B strength
    /// certificates, standard otherwise.
    #[default]
    Auto,
    Standard,
    Suite192,
}

/// Hotspot 2.0 identity of a Passpoint suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasspointIdentity {
    pub fqdn: String,
    pub unique_id: String,
    #[serde(default)]
    pub friendly_name: String,
    #[serde(default)]
    pub credential: EnterpriseCredential,
}

/// A validated suggestion.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSuggestion {
    pub profile: NetworkProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passpoint: Option<PasspointIdentity>,
    pub app_interaction_required: bool,
    pub user_interaction_required: bool,
    pub shared_with_user: bool,
    pub initial_autojoin_enabled: bool,
    pub priority_group: u32,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Default)]
pub struct SuggestionBuilder {
    ssid: Option<String>,
    bssid: Option<MacAddress>,
    enhanced_open: bool,
    wpa2_passphrase: Option<SecretString>,
    wpa3_passphrase: Option<SecretString>,
    wapi_passphrase: Option<SecretString>,
    wpa2_enterprise: Option<EnterpriseCredential>,
    wpa3_enterprise: Option<(EnterpriseCredential, Wpa3EnterpriseMode)>,
    wapi_enterprise: Option<EnterpriseCredential>,
    passpoint: Option<PasspointIdentity>,
    hidden_ssid: bool,
    priority: u32,
    priority_group: u32,
    carrier_id: Option<i32>,
    subscription_id: Option<i32>,
    subscription_group: Option<Uuid>,
    metered: Option<bool>,
    shared_with_user: Option<bool>,
    initial_autojoin_disabled: bool,
    app_interaction_required: bool,
    user_interaction_required: bool,
    untrusted: bool,
    restricted: bool,
    oem_paid: bool,
    oem_private: bool,
    carrier_merged: bool,
    mac_randomization: Option<MacRandomizationSetting>,
    sae_h2e_only: bool,
    wifi7_disabled: bool,
    creator: Option<(i32, String)>,
}

impl SuggestionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Identity ─────────────────────────────────────────────────────

    pub fn ssid(mut self, ssid: impl Into<String>) -> Self {
        self.ssid = Some(ssid.into());
        self
    }

    pub fn bssid(mut self, bssid: MacAddress) -> Self {
        self.bssid = Some(bssid);
        self
    }

    pub fn hidden_ssid(mut self, hidden: bool) -> Self {
        self.hidden_ssid = hidden;
        self
    }

    /// Suggesting app. Marks the profile as coming from a suggestion.
    pub fn creator(mut self, uid: i32, package: impl Into<String>) -> Self {
        self.creator = Some((uid, package.into()));
        self
    }

    // ── Security ─────────────────────────────────────────────────────

    pub fn enhanced_open(mut self, enabled: bool) -> Self {
        self.enhanced_open = enabled;
        self
    }

    pub fn wpa2_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.wpa2_passphrase = Some(SecretString::from(passphrase.into()));
        self
    }

    pub fn wpa3_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.wpa3_passphrase = Some(SecretString::from(passphrase.into()));
        self
    }

    pub fn wapi_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.wapi_passphrase = Some(SecretString::from(passphrase.into()));
        self
    }

    pub fn wpa2_enterprise(mut self, credential: EnterpriseCredential) -> Self {
        self.wpa2_enterprise = Some(credential);
        self
    }

    pub fn wpa3_enterprise(mut self, credential: EnterpriseCredential, mode: Wpa3EnterpriseMode) -> Self {
        self.wpa3_enterprise = Some((credential, mode));
        self
    }

    pub fn wapi_enterprise(mut self, credential: EnterpriseCredential) -> Self {
        self.wapi_enterprise = Some(credential);
        self
    }

    pub fn passpoint(mut self, identity: PasspointIdentity) -> Self {
        self.passpoint = Some(identity);
        self
    }

    pub fn sae_h2e_only(mut self, enabled: bool) -> Self {
        self.sae_h2e_only = enabled;
        self
    }

    // ── Policy ───────────────────────────────────────────────────────

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn priority_group(mut self, group: u32) -> Self {
        self.priority_group = group;
        self
    }

    pub fn carrier_id(mut self, carrier_id: i32) -> Self {
        self.carrier_id = Some(carrier_id);
        self
    }

    pub fn subscription_id(mut self, subscription_id: i32) -> Self {
        self.subscription_id = Some(subscription_id);
        self
    }

    pub fn subscription_group(mut self, group: Uuid) -> Self {
        self.subscription_group = Some(group);
        self
    }

    pub fn metered(mut self, metered: bool) -> Self {
        self.metered = Some(metered);
        self
    }

    pub fn shared_with_user(mut self, shared: bool) -> Self {
        self.shared_with_user = Some(shared);
        self
    }

    pub fn initial_autojoin(mut self, enabled: bool) -> Self {
        self.initial_autojoin_disabled = !enabled;
        self
    }

    pub fn app_interaction_required(mut self, required: bool) -> Self {
        self.app_interaction_required = required;
        self
    }

    pub fn user_interaction_required(mut self, required: bool) -> Self {
        self.user_interaction_required = required;
        self
    }

    pub fn untrusted(mut self, untrusted: bool) -> Self {
        self.untrusted = untrusted;
        self
    }

    pub fn restricted(mut self, restricted: bool) -> Self {
        self.restricted = restricted;
        self
    }

    pub fn oem_paid(mut self, paid: bool) -> Self {
        self.oem_paid = paid;
        self
    }

    pub fn oem_private(mut self, private: bool) -> Self {
        self.oem_private = private;
        self
    }

    pub fn carrier_merged(mut self, merged: bool) -> Self {
        self.carrier_merged = merged;
        self
    }

    pub fn mac_randomization(mut self, setting: MacRandomizationSetting) -> Self {
        self.mac_randomization = Some(setting);
        self
    }

    pub fn wifi7(mut self, enabled: bool) -> Self {
        self.wifi7_disabled = !enabled;
        self
    }

    // ── Build ────────────────────────────────────────────────────────

    pub fn build(self) -> Result<NetworkSuggestion, SuggestionError> {
        self.validate_inputs()?;
        self.validate_security_count()?;

        let mut shared = self.shared_with_user.unwrap_or(true);
        let explicitly_shared = self.shared_with_user == Some(true);

        let profile = if let Some(passpoint) = &self.passpoint {
            if self.ssid.is_some() {
                return Err(SuggestionError::PasspointWithSsid);
            }
            if self.hidden_ssid {
                return Err(SuggestionError::PasspointHidden);
            }
            self.passpoint_profile(passpoint)
        } else {
            let ssid = self.ssid.as_deref().ok_or(SuggestionError::MissingSsid)?;
            if ssid.is_empty() {
                return Err(SuggestionError::InvalidSsid);
            }
            if let Some(bssid) = self
                .bssid
                .as_ref()
                .filter(|b| b.is_broadcast() || b.is_all_zeros())
            {
                return Err(SuggestionError::InvalidBssid(bssid.clone()));
            }
            if self.sae_h2e_only && !has_text(self.wpa3_passphrase.as_ref()) {
                return Err(SuggestionError::H2eOnlyWithoutSae);
            }
            let profile = self.ssid_profile(ssid);
            if profile.is_open_network() {
                if explicitly_shared {
                    return Err(SuggestionError::OpenNetworkShared);
                }
                shared = false;
            }
            profile
        };

        if !shared && self.initial_autojoin_disabled {
            return Err(SuggestionError::NotSharedNorAutojoin);
        }
        for (flag, label) in [
            (self.untrusted || self.restricted, "untrusted or restricted"),
            (self.oem_paid, "OEM-paid"),
            (self.oem_private, "OEM-private"),
        ] {
            if flag {
                if explicitly_shared {
                    return Err(SuggestionError::SharedConflict(label));
                }
                shared = false;
            }
        }
        if self.carrier_merged {
            let has_subscription = self.subscription_id.is_some() || self.subscription_group.is_some();
            if !has_subscription || self.metered != Some(true) || !self.is_enterprise() {
                return Err(SuggestionError::InvalidCarrierMerged);
            }
        }
        if self.subscription_group.is_some() && self.subscription_id.is_some() {
            return Err(SuggestionError::SubscriptionGroupAndId);
        }

        Ok(NetworkSuggestion {
            profile,
            passpoint: self.passpoint,
            app_interaction_required: self.app_interaction_required,
            user_interaction_required: self.user_interaction_required,
            shared_with_user: shared,
            initial_autojoin_enabled: !self.initial_autojoin_disabled,
            priority_group: self.priority_group,
        })
    }

    /// Per-field checks that do not depend on the rest of the builder.
    fn validate_inputs(&self) -> Result<(), SuggestionError> {
        let passphrases = [
            &self.wpa2_passphrase,
            &self.wpa3_passphrase,
            &self.wapi_passphrase,
        ];
        if passphrases
            .into_iter()
            .flatten()
            .any(|p| !p.expose_secret().is_ascii())
        {
            return Err(SuggestionError::NonAsciiPassphrase);
        }
        let server_cert_configs = [
            self.wpa2_enterprise.as_ref(),
            self.wpa3_enterprise
                .as_ref()
                .filter(|(_, mode)| *mode != Wpa3EnterpriseMode::Suite192)
                .map(|(cred, _)| cred),
        ];
        for cred in server_cert_configs.into_iter().flatten() {
            if cred.is_eap_method_server_cert_used()
                && !cred.is_mandatory_parameter_set_for_server_cert_validation()
            {
                return Err(SuggestionError::MissingServerCertValidation);
            }
        }
        if let Some((cred, Wpa3EnterpriseMode::Suite192)) = &self.wpa3_enterprise {
            if cred.eap_method() != EapMethod::Tls {
                return Err(SuggestionError::Suite192("the EAP method must be TLS"));
            }
            if !cred.client_certificate().is_some_and(|c| c.is_suite_b_cipher_cert()) {
                return Err(SuggestionError::Suite192(
                    "the client certificate is not Suite-B strength",
                ));
            }
            if !cred.ca_certificate().is_some_and(|c| c.is_suite_b_cipher_cert()) {
                return Err(SuggestionError::Suite192(
                    "the CA certificate is not Suite-B strength",
                ));
            }
        }
        if self
            .passpoint
            .as_ref()
            .is_some_and(|p| p.fqdn.is_empty() || p.unique_id.is_empty())
        {
            return Err(SuggestionError::InvalidPasspoint);
        }
        if self.subscription_id == Some(INVALID_SUBSCRIPTION_ID) {
            return Err(SuggestionError::InvalidSubscriptionId(INVALID_SUBSCRIPTION_ID));
        }
        if self.mac_randomization.is_some_and(|setting| {
            !matches!(
                setting,
                MacRandomizationSetting::Persistent | MacRandomizationSetting::NonPersistent
            )
        }) {
            return Err(SuggestionError::InvalidMacRandomization);
        }
        Ok(())
    }

    fn validate_security_count(&self) -> Result<(), SuggestionError> {
        let count = [
            self.enhanced_open,
            has_text(self.wpa2_passphrase.as_ref()),
            has_text(self.wpa3_passphrase.as_ref()),
            has_text(self.wapi_passphrase.as_ref()),
            self.wpa2_enterprise.is_some(),
            self.wpa3_enterprise.is_some(),
            self.wapi_enterprise.is_some(),
            self.passpoint.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count();
        if count > 1 {
            return Err(SuggestionError::MultipleSecurityTypes);
        }
        Ok(())
    }

    fn is_enterprise(&self) -> bool {
        self.wpa2_enterprise.is_some()
            || self.wpa3_enterprise.is_some()
            || self.wapi_enterprise.is_some()
            || self.passpoint.is_some()
    }

    fn ssid_profile(&self, ssid: &str) -> NetworkProfile {
        let mut profile = self.base_profile();
        profile.ssid = Some(format!("\"{ssid}\""));
        profile.bssid.clone_from(&self.bssid);
        profile.hidden_ssid = self.hidden_ssid;
        self.apply_security(&mut profile);
        profile
    }

    fn passpoint_profile(&self, passpoint: &PasspointIdentity) -> NetworkProfile {
        let mut profile = self.base_profile();
        profile.fqdn = Some(passpoint.fqdn.clone());
        profile.passpoint_unique_id = Some(passpoint.unique_id.clone());
        if !passpoint.friendly_name.is_empty() {
            profile.provider_friendly_name = Some(passpoint.friendly_name.clone());
        }
        profile.enterprise = passpoint.credential.clone();
        profile.set_security_type(SecurityType::PasspointR1R2);
        profile
    }

    /// Fields shared by SSID and Passpoint suggestions.
    fn base_profile(&self) -> NetworkProfile {
        let mut profile = NetworkProfile::new();
        profile.priority = i32::try_from(self.priority).unwrap_or(i32::MAX);
        profile.metered_override = match self.metered {
            None => MeteredOverride::None,
            Some(true) => MeteredOverride::Metered,
            Some(false) => MeteredOverride::NotMetered,
        };
        if let Some(carrier_id) = self.carrier_id {
            profile.carrier_id = carrier_id;
        }
        if let Some(subscription_id) = self.subscription_id {
            profile.subscription_id = subscription_id;
        }
        profile.subscription_group = self.subscription_group;
        profile.trusted = !self.untrusted;
        profile.restricted = self.restricted;
        profile.oem_paid = self.oem_paid;
        profile.oem_private = self.oem_private;
        profile.carrier_merged = self.carrier_merged;
        profile.mac_randomization =
            if self.mac_randomization == Some(MacRandomizationSetting::NonPersistent) {
                MacRandomizationSetting::NonPersistent
            } else {
                MacRandomizationSetting::Persistent
            };
        profile.wifi7_enabled = !self.wifi7_disabled;
        if let Some((uid, package)) = &self.creator {
            profile.from_suggestion = true;
            profile.creator_uid = *uid;
            profile.creator_name = Some(package.clone());
        }
        profile
    }

    fn apply_security(&self, profile: &mut NetworkProfile) {
        if let Some(psk) = non_empty_secret(self.wpa2_passphrase.as_ref()) {
            profile.set_security_type(SecurityType::Psk);
            profile.pre_shared_key = Some(format!("\"{psk}\""));
        } else if let Some(psk) = non_empty_secret(self.wpa3_passphrase.as_ref()) {
            profile.set_security_type(SecurityType::Sae);
            profile.pre_shared_key = Some(format!("\"{psk}\""));
            if self.sae_h2e_only {
                profile.security_mut().enable_sae_h2e_only_mode(true);
            }
        } else if let Some(cred) = &self.wpa2_enterprise {
            profile.set_security_type(SecurityType::Eap);
            profile.enterprise = cred.clone();
        } else if let Some((cred, mode)) = &self.wpa3_enterprise {
            let suite_b_auto = *mode == Wpa3EnterpriseMode::Auto
                && cred.eap_method() == EapMethod::Tls
                && cred.client_certificate().is_some_and(|c| c.is_suite_b_cipher_cert())
                && cred.ca_certificate().is_some_and(|c| c.is_suite_b_cipher_cert());
            let security_type = if suite_b_auto || *mode == Wpa3EnterpriseMode::Suite192 {
                SecurityType::EapWpa3Enterprise192Bit
            } else {
                SecurityType::EapWpa3Enterprise
            };
            profile.set_security_type(security_type);
            profile.enterprise = cred.clone();
        } else if self.enhanced_open {
            profile.set_security_type(SecurityType::Owe);
        } else if let Some(psk) = non_empty_secret(self.wapi_passphrase.as_ref()) {
            profile.set_security_type(SecurityType::WapiPsk);
            profile.pre_shared_key = Some(format!("\"{psk}\""));
        } else if let Some(cred) = &self.wapi_enterprise {
            profile.set_security_type(SecurityType::WapiCert);
            profile.enterprise = cred.clone();
        } else {
            profile.set_security_type(SecurityType::Open);
        }
    }
}

fn has_text(secret: Option<&SecretString>) -> bool {
    non_empty_secret(secret).is_some()
}

fn non_empty_secret(secret: Option<&SecretString>) -> Option<&str> {
    secret
        .map(ExposeSecret::expose_secret)
        .filter(|s| !s.is_empty())
}
