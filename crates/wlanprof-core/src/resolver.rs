// ── Security-parameter resolver ──
//
// Owns a profile's list of `SecurityParams` and the legacy bit-set view.
// The legacy fields are a projection of entry 0 and are only written here.
// The one exception is a resolver built from legacy fields alone, which
// carries them unchanged until `convert_legacy_if_needed` runs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SecurityError;
use crate::model::{
    AuthAlgorithm, FlagSet, GroupCipher, GroupMgmtCipher, KeyMgmt, LegacySecurityFields,
    PairwiseCipher, Protocol, SecurityParams, SecurityType, SuiteBCipher,
};

/// Number of WEP key slots.
pub const WEP_KEY_SLOTS: usize = 4;

// ── Legacy inference table ──────────────────────────────────────────

#[derive(Clone, Copy)]
enum Inferred {
    Fixed(SecurityType),
    /// WPA3-Enterprise when the legacy fields have that shape, else EAP.
    Enterprise,
    /// WEP when a key is configured, else open.
    WepOrOpen,
}

/// First matching row wins. The order is part of the on-disk contract for
/// legacy profiles; the second DPP row is unreachable and kept as-is.
const LEGACY_PRIORITY: &[(&[KeyMgmt], Inferred)] = &[
    (&[KeyMgmt::WapiCert], Inferred::Fixed(SecurityType::WapiCert)),
    (&[KeyMgmt::WapiPsk], Inferred::Fixed(SecurityType::WapiPsk)),
    (
        &[KeyMgmt::SuiteB192],
        Inferred::Fixed(SecurityType::EapWpa3Enterprise192Bit),
    ),
    (&[KeyMgmt::Dpp], Inferred::Fixed(SecurityType::Dpp)),
    (&[KeyMgmt::Owe], Inferred::Fixed(SecurityType::Owe)),
    (&[KeyMgmt::Sae], Inferred::Fixed(SecurityType::Sae)),
    (&[KeyMgmt::Osen], Inferred::Fixed(SecurityType::Osen)),
    (
        &[KeyMgmt::Wpa2Psk, KeyMgmt::WpaPskSha256, KeyMgmt::FtPsk],
        Inferred::Fixed(SecurityType::Psk),
    ),
    (
        &[
            KeyMgmt::WpaEap,
            KeyMgmt::FtEap,
            KeyMgmt::Ieee8021x,
            KeyMgmt::WpaEapSha256,
            KeyMgmt::FilsSha256,
            KeyMgmt::FilsSha384,
        ],
        Inferred::Enterprise,
    ),
    (&[KeyMgmt::WpaPsk], Inferred::Fixed(SecurityType::Psk)),
    (&[KeyMgmt::Dpp], Inferred::Fixed(SecurityType::Dpp)),
    (&[KeyMgmt::None], Inferred::WepOrOpen),
];

/// Single-bit answers of [`SecurityProfileResolver::auth_type`], in order.
const AUTH_TYPE_ORDER: [KeyMgmt; 10] = [
    KeyMgmt::WpaPsk,
    KeyMgmt::Wpa2Psk,
    KeyMgmt::WpaEap,
    KeyMgmt::Ieee8021x,
    KeyMgmt::Sae,
    KeyMgmt::Owe,
    KeyMgmt::SuiteB192,
    KeyMgmt::WapiPsk,
    KeyMgmt::WapiCert,
    KeyMgmt::Dpp,
];

// ── Resolver ────────────────────────────────────────────────────────

/// The authoritative security configuration of one network profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResolverRecord", into = "ResolverRecord")]
pub struct SecurityProfileResolver {
    params: Vec<SecurityParams>,
    legacy: LegacySecurityFields,
    wep_keys: [Option<String>; WEP_KEY_SLOTS],
    wep_tx_key_index: usize,
}

impl SecurityProfileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver holding only legacy bit sets, as read from old records.
    pub fn from_legacy(legacy: LegacySecurityFields) -> Self {
        Self {
            legacy,
            ..Self::default()
        }
    }

    // ── Replacing the list ───────────────────────────────────────────

    /// Make `security_type` the only entry, with factory defaults.
    pub fn set_security_type(&mut self, security_type: SecurityType) {
        self.set_security_params(&SecurityParams::for_type(security_type));
    }

    /// Make a copy of `params` the only entry.
    pub fn set_security_params(&mut self, params: &SecurityParams) {
        self.params.clear();
        self.params.push(params.clone());
        self.sync_legacy();
        debug!(security_type = %params.security_type(), "security params replaced");
    }

    /// Replace the whole list with copies of `list`.
    pub fn set_security_params_list(&mut self, list: &[SecurityParams]) -> Result<(), SecurityError> {
        if list.is_empty() {
            return Err(SecurityError::InvalidArgument {
                message: "An empty list is not valid".into(),
            });
        }
        for (i, entry) in list.iter().enumerate() {
            if list[..i]
                .iter()
                .any(|prev| prev.security_type() == entry.security_type())
            {
                return Err(SecurityError::DuplicateSecurityType {
                    security_type: entry.security_type(),
                });
            }
        }
        self.params = list.to_vec();
        self.sync_legacy();
        debug!(count = self.params.len(), "security params list replaced");
        Ok(())
    }

    /// Install `key_mgmt` as the legacy key management set and re-infer
    /// the entry list from it. Other legacy fields are kept as input.
    pub fn set_key_mgmt(&mut self, key_mgmt: FlagSet<KeyMgmt>) {
        self.params.clear();
        self.legacy.key_mgmt = key_mgmt;
        self.convert_legacy_if_needed();
    }

    // ── Adding ───────────────────────────────────────────────────────

    pub fn add_security_type(&mut self, security_type: SecurityType) -> Result<(), SecurityError> {
        self.add_security_params(&SecurityParams::for_type(security_type))
    }

    /// Append a copy of `params`. Entry 0 stays canonical.
    pub fn add_security_params(&mut self, params: &SecurityParams) -> Result<(), SecurityError> {
        let new_type = params.security_type();
        if self.is_security_type(new_type) {
            return Err(SecurityError::DuplicateSecurityType {
                security_type: new_type,
            });
        }
        if !self.params.is_empty() {
            self.check_compatible(params)?;
        }
        self.params.push(params.clone());
        self.sync_legacy();
        debug!(security_type = %new_type, count = self.params.len(), "security params added");
        Ok(())
    }

    fn check_compatible(&self, params: &SecurityParams) -> Result<(), SecurityError> {
        let incompatible = |reason: &str| SecurityError::IncompatibleSecurityType {
            security_type: params.security_type(),
            reason: reason.to_owned(),
        };
        if self.is_enterprise() != params.is_enterprise_security_type() {
            return Err(incompatible(
                "enterprise and personal security types cannot be mixed",
            ));
        }
        if self.is_open_network() != params.is_open_security_type() {
            return Err(incompatible(
                "open and secured security types cannot be mixed",
            ));
        }
        if params.is_security_type(SecurityType::Osen) {
            return Err(incompatible("OSEN must be the only security type"));
        }
        if self.is_security_type(SecurityType::Osen) {
            return Err(incompatible("profile already uses OSEN exclusively"));
        }
        Ok(())
    }

    // ── Per-entry switches ───────────────────────────────────────────

    pub fn set_security_params_enabled(&mut self, security_type: SecurityType, enabled: bool) {
        if let Some(p) = self.find_mut(security_type) {
            p.set_enabled(enabled);
            debug!(%security_type, enabled, "security params toggled");
        }
    }

    pub fn set_security_params_added_by_auto_upgrade(
        &mut self,
        security_type: SecurityType,
        added: bool,
    ) {
        if let Some(p) = self.find_mut(security_type) {
            p.set_added_by_auto_upgrade(added);
        }
    }

    /// Toggle FILS on every entry.
    pub fn enable_fils(&mut self, sha256: bool, sha384: bool) {
        for p in &mut self.params {
            p.enable_fils(sha256, sha384);
        }
        self.sync_legacy();
    }

    /// Applies to the 192-bit entry, if any.
    pub fn enable_suite_b_ciphers(&mut self, ecdhe_ecdsa: bool, ecdhe_rsa: bool) {
        if let Some(p) = self.find_mut(SecurityType::EapWpa3Enterprise192Bit) {
            p.enable_suite_b_ciphers(ecdhe_ecdsa, ecdhe_rsa);
        }
        self.sync_legacy();
    }

    pub fn enable_sae_h2e_only_mode(&mut self, enable: bool) {
        if let Some(p) = self.find_mut(SecurityType::Sae) {
            p.enable_sae_h2e_only_mode(enable);
        }
    }

    pub fn enable_sae_pk_only_mode(&mut self, enable: bool) {
        if let Some(p) = self.find_mut(SecurityType::Sae) {
            p.enable_sae_pk_only_mode(enable);
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn security_params_list(&self) -> &[SecurityParams] {
        &self.params
    }

    /// Copy of the entry for `security_type`.
    pub fn security_params(&self, security_type: SecurityType) -> Option<SecurityParams> {
        self.params
            .iter()
            .find(|p| p.is_security_type(security_type))
            .cloned()
    }

    /// Copy of entry 0.
    pub fn default_security_params(&self) -> Option<SecurityParams> {
        self.params.first().cloned()
    }

    pub fn is_security_type(&self, security_type: SecurityType) -> bool {
        self.params.iter().any(|p| p.is_security_type(security_type))
    }

    pub fn security_types(&self) -> impl Iterator<Item = SecurityType> + '_ {
        self.params.iter().map(SecurityParams::security_type)
    }

    /// Any entry is an 802.1X type.
    pub fn is_enterprise(&self) -> bool {
        self.params
            .iter()
            .any(SecurityParams::is_enterprise_security_type)
    }

    /// Every entry is open and no WEP key is set.
    pub fn is_open_network(&self) -> bool {
        self.params.iter().all(SecurityParams::is_open_security_type) && !self.has_wep_keys()
    }

    pub fn needs_pre_shared_key(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.security_type().needs_pre_shared_key())
    }

    /// PSK present and the legacy protocols allow WPA but not RSN.
    pub fn is_wpa_personal_only(&self) -> bool {
        self.is_security_type(SecurityType::Psk)
            && self.legacy.protocols.contains(Protocol::Wpa)
            && !self.legacy.protocols.contains(Protocol::Rsn)
    }

    pub fn is_fils_sha256_enabled(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.key_mgmt().contains(KeyMgmt::FilsSha256))
    }

    pub fn is_fils_sha384_enabled(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.key_mgmt().contains(KeyMgmt::FilsSha384))
    }

    pub fn is_suite_b_cipher_ecdhe_ecdsa_enabled(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.suite_b_ciphers().contains(SuiteBCipher::EcdheEcdsa))
    }

    pub fn is_suite_b_cipher_ecdhe_rsa_enabled(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.suite_b_ciphers().contains(SuiteBCipher::EcdheRsa))
    }

    /// Collapse the legacy key management set to one value.
    ///
    /// Two multi-bit shapes are recognized, both anchored on WPA_EAP:
    /// exactly {WPA_EAP, IEEE8021X}, and exactly {WPA_EAP, IEEE8021X,
    /// SUITE_B_192}. Anything else with more than one bit is
    /// [`SecurityError::InvalidState`].
    pub fn auth_type(&self) -> Result<KeyMgmt, SecurityError> {
        let km = self.legacy.key_mgmt;
        if km.len() > 1 {
            if km.contains(KeyMgmt::WpaEap) && km.contains(KeyMgmt::Ieee8021x) {
                match km.len() {
                    2 => return Ok(KeyMgmt::WpaEap),
                    3 if km.contains(KeyMgmt::SuiteB192) => return Ok(KeyMgmt::SuiteB192),
                    _ => {}
                }
            }
            return Err(SecurityError::InvalidState {
                message: format!("Invalid auth type set: {km}"),
            });
        }
        Ok(AUTH_TYPE_ORDER
            .into_iter()
            .find(|k| km.contains(*k))
            .unwrap_or(KeyMgmt::None))
    }

    /// Security name used in network keys, e.g. `WPA_PSK` or `WPA3_EAP`.
    pub fn default_security_type_name(&self) -> &'static str {
        let km = self.legacy.key_mgmt;
        if km.contains(KeyMgmt::WpaPsk) {
            return KeyMgmt::WpaPsk.into();
        }
        if km.contains_any(&[KeyMgmt::WpaEap, KeyMgmt::Ieee8021x]) {
            return if self.legacy.is_wpa3_enterprise() {
                "WPA3_EAP"
            } else {
                KeyMgmt::WpaEap.into()
            };
        }
        if self.wep_key(self.wep_tx_key_index).is_some() {
            return "WEP";
        }
        [
            KeyMgmt::Owe,
            KeyMgmt::Sae,
            KeyMgmt::SuiteB192,
            KeyMgmt::WapiPsk,
            KeyMgmt::WapiCert,
            KeyMgmt::Osen,
            KeyMgmt::Dpp,
        ]
        .into_iter()
        .find(|k| km.contains(*k))
        .map_or("NONE", Into::into)
    }

    // ── Legacy view ──────────────────────────────────────────────────

    pub fn legacy(&self) -> &LegacySecurityFields {
        &self.legacy
    }

    pub fn key_mgmt(&self) -> FlagSet<KeyMgmt> {
        self.legacy.key_mgmt
    }

    pub fn protocols(&self) -> FlagSet<Protocol> {
        self.legacy.protocols
    }

    pub fn auth_algorithms(&self) -> FlagSet<AuthAlgorithm> {
        self.legacy.auth_algorithms
    }

    pub fn pairwise_ciphers(&self) -> FlagSet<PairwiseCipher> {
        self.legacy.pairwise_ciphers
    }

    pub fn group_ciphers(&self) -> FlagSet<GroupCipher> {
        self.legacy.group_ciphers
    }

    pub fn group_mgmt_ciphers(&self) -> FlagSet<GroupMgmtCipher> {
        self.legacy.group_mgmt_ciphers
    }

    pub fn suite_b_ciphers(&self) -> FlagSet<SuiteBCipher> {
        self.legacy.suite_b_ciphers
    }

    pub fn is_require_pmf(&self) -> bool {
        self.legacy.require_pmf
    }

    /// Infer a single entry from the legacy fields when the list is empty.
    /// Returns the inferred type, or `None` when nothing had to be done.
    pub fn convert_legacy_if_needed(&mut self) -> Option<SecurityType> {
        if !self.params.is_empty() {
            return None;
        }
        let km = self.legacy.key_mgmt;
        let inferred = LEGACY_PRIORITY
            .iter()
            .find(|(bits, _)| km.contains_any(bits))
            .map_or(Inferred::Fixed(SecurityType::Open), |(_, inferred)| {
                *inferred
            });
        let security_type = match inferred {
            Inferred::Fixed(t) => t,
            Inferred::Enterprise if self.legacy.is_wpa3_enterprise() => {
                SecurityType::EapWpa3Enterprise
            }
            Inferred::Enterprise => SecurityType::Eap,
            Inferred::WepOrOpen if self.has_wep_keys() => SecurityType::Wep,
            Inferred::WepOrOpen => SecurityType::Open,
        };
        debug!(key_mgmt = %km, %security_type, "converted legacy security fields");
        self.set_security_type(security_type);
        Some(security_type)
    }

    // ── WEP keys ─────────────────────────────────────────────────────

    pub fn wep_key(&self, index: usize) -> Option<&str> {
        self.wep_keys.get(index).and_then(Option::as_deref)
    }

    pub fn set_wep_key(&mut self, index: usize, key: Option<String>) -> Result<(), SecurityError> {
        let slot = self
            .wep_keys
            .get_mut(index)
            .ok_or_else(|| SecurityError::InvalidArgument {
                message: format!("WEP key index {index} out of range (0-{})", WEP_KEY_SLOTS - 1),
            })?;
        *slot = key;
        Ok(())
    }

    pub fn wep_tx_key_index(&self) -> usize {
        self.wep_tx_key_index
    }

    pub fn set_wep_tx_key_index(&mut self, index: usize) -> Result<(), SecurityError> {
        if index >= WEP_KEY_SLOTS {
            return Err(SecurityError::InvalidArgument {
                message: format!("WEP transmit key index {index} out of range"),
            });
        }
        self.wep_tx_key_index = index;
        Ok(())
    }

    pub fn has_wep_keys(&self) -> bool {
        self.wep_keys.iter().any(Option::is_some)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn find_mut(&mut self, security_type: SecurityType) -> Option<&mut SecurityParams> {
        self.params
            .iter_mut()
            .find(|p| p.is_security_type(security_type))
    }

    fn sync_legacy(&mut self) {
        if let Some(first) = self.params.first() {
            self.legacy = first.legacy_fields();
        }
    }
}

// ── Serialized form ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct WepKey {
    index: usize,
    key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ResolverRecord {
    wep_tx_key_index: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    wep_keys: Vec<WepKey>,
    legacy: LegacySecurityFields,
    security_params: Vec<SecurityParams>,
}

/// Loading runs the checks of `set_security_params_list` plus a key
/// management check per entry.
impl TryFrom<ResolverRecord> for SecurityProfileResolver {
    type Error = SecurityError;

    fn try_from(record: ResolverRecord) -> Result<Self, Self::Error> {
        if let Some(bad) = record
            .security_params
            .iter()
            .find(|p| !p.has_factory_key_mgmt())
        {
            return Err(SecurityError::InvalidArgument {
                message: format!(
                    "{} entry has key management {} that does not belong to it",
                    bad.security_type(),
                    bad.key_mgmt()
                ),
            });
        }
        let mut resolver = Self::from_legacy(record.legacy);
        for WepKey { index, key } in record.wep_keys {
            if let Some(slot) = resolver.wep_keys.get_mut(index) {
                *slot = Some(key);
            }
        }
        if record.wep_tx_key_index < WEP_KEY_SLOTS {
            resolver.wep_tx_key_index = record.wep_tx_key_index;
        }
        if !record.security_params.is_empty() {
            resolver.set_security_params_list(&record.security_params)?;
        }
        Ok(resolver)
    }
}

impl From<SecurityProfileResolver> for ResolverRecord {
    fn from(resolver: SecurityProfileResolver) -> Self {
        let wep_keys = resolver
            .wep_keys
            .into_iter()
            .enumerate()
            .filter_map(|(index, key)| key.map(|key| WepKey { index, key }))
            .collect();
        Self {
            wep_tx_key_index: resolver.wep_tx_key_index,
            wep_keys,
            legacy: resolver.legacy,
            security_params: resolver.params,
        }
    }
}
