// ── Per-security-type parameter blocks ──

use serde::{Deserialize, Serialize};

use super::flags::FlagSet;
use super::security_type::SecurityType;
use super::suites::{
    AuthAlgorithm, GroupCipher, GroupMgmtCipher, KeyMgmt, PairwiseCipher, Protocol, SuiteBCipher,
};

// ── Legacy projection ───────────────────────────────────────────────

/// The flat bit-set representation of a profile's security settings.
///
/// Inside a resolver this is always a projection of the first security
/// entry. Standalone values are only used as conversion input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySecurityFields {
    pub key_mgmt: FlagSet<KeyMgmt>,
    pub protocols: FlagSet<Protocol>,
    pub auth_algorithms: FlagSet<AuthAlgorithm>,
    pub pairwise_ciphers: FlagSet<PairwiseCipher>,
    pub group_ciphers: FlagSet<GroupCipher>,
    pub group_mgmt_ciphers: FlagSet<GroupMgmtCipher>,
    pub suite_b_ciphers: FlagSet<SuiteBCipher>,
    pub require_pmf: bool,
}

impl LegacySecurityFields {
    /// WPA3-Enterprise shape: an EAP key management bit, PMF required,
    /// RSN as the only protocol and no TKIP anywhere.
    pub fn is_wpa3_enterprise(&self) -> bool {
        self.key_mgmt
            .contains_any(&[KeyMgmt::WpaEapSha256, KeyMgmt::WpaEap, KeyMgmt::Ieee8021x])
            && self.require_pmf
            && self.protocols.len() <= 1
            && self.protocols.contains(Protocol::Rsn)
            && !self.pairwise_ciphers.contains(PairwiseCipher::Tkip)
            && !self.group_ciphers.contains(GroupCipher::Tkip)
    }
}

// ── SecurityParams ──────────────────────────────────────────────────

/// One supported security type of a profile plus its per-type switches.
///
/// The security type is fixed at construction; use [`SecurityParams::for_type`].
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityParams {
    security_type: SecurityType,
    key_mgmt: FlagSet<KeyMgmt>,
    protocols: FlagSet<Protocol>,
    #[serde(default)]
    auth_algorithms: FlagSet<AuthAlgorithm>,
    #[serde(default)]
    pairwise_ciphers: FlagSet<PairwiseCipher>,
    #[serde(default)]
    group_ciphers: FlagSet<GroupCipher>,
    #[serde(default)]
    group_mgmt_ciphers: FlagSet<GroupMgmtCipher>,
    #[serde(default)]
    suite_b_ciphers: FlagSet<SuiteBCipher>,
    #[serde(default)]
    require_pmf: bool,
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    added_by_auto_upgrade: bool,
    #[serde(default)]
    sae_h2e_only: bool,
    #[serde(default)]
    sae_pk_only: bool,
}

fn default_enabled() -> bool {
    true
}

impl SecurityParams {
    /// Build the default parameter block for a security type.
    pub fn for_type(security_type: SecurityType) -> Self {
        use GroupCipher as G;
        use PairwiseCipher as P;

        let mut params = Self::bare(security_type);
        match security_type {
            SecurityType::Open => {
                params.key_mgmt.insert(KeyMgmt::None);
                params.protocols = FlagSet::of(&[Protocol::Rsn, Protocol::Wpa]);
            }
            SecurityType::Wep => {
                params.key_mgmt.insert(KeyMgmt::None);
                params.auth_algorithms = FlagSet::of(&[AuthAlgorithm::Open, AuthAlgorithm::Shared]);
                params.pairwise_ciphers = FlagSet::of(&[P::Ccmp, P::Tkip]);
                params.group_ciphers = FlagSet::of(&[G::Ccmp, G::Tkip, G::Wep40, G::Wep104]);
            }
            SecurityType::Psk => {
                params.key_mgmt.insert(KeyMgmt::WpaPsk);
                params.protocols = FlagSet::of(&[Protocol::Rsn, Protocol::Wpa]);
                params.pairwise_ciphers = FlagSet::of(&[P::Ccmp, P::Tkip]);
                params.group_ciphers = FlagSet::of(&[G::Ccmp, G::Tkip, G::Wep40, G::Wep104]);
            }
            SecurityType::Eap => {
                params.key_mgmt = FlagSet::of(&[KeyMgmt::WpaEap, KeyMgmt::Ieee8021x]);
                params.protocols = FlagSet::of(&[Protocol::Rsn, Protocol::Wpa]);
                params.pairwise_ciphers = FlagSet::of(&[P::Ccmp, P::Tkip]);
                params.group_ciphers = FlagSet::of(&[G::Ccmp, G::Tkip]);
            }
            SecurityType::EapWpa3Enterprise => {
                params.key_mgmt = FlagSet::of(&[KeyMgmt::WpaEap, KeyMgmt::Ieee8021x]);
                params.protocols = FlagSet::of(&[Protocol::Rsn]);
                params.pairwise_ciphers = FlagSet::of(&[P::Ccmp, P::Gcmp256]);
                params.group_ciphers = FlagSet::of(&[G::Ccmp, G::Gcmp256]);
                params.require_pmf = true;
            }
            SecurityType::EapWpa3Enterprise192Bit => {
                params.key_mgmt =
                    FlagSet::of(&[KeyMgmt::WpaEap, KeyMgmt::Ieee8021x, KeyMgmt::SuiteB192]);
                params.protocols = FlagSet::of(&[Protocol::Rsn]);
                params.pairwise_ciphers = FlagSet::of(&[P::Gcmp128, P::Gcmp256]);
                params.group_ciphers = FlagSet::of(&[G::Gcmp128, G::Gcmp256]);
                params.group_mgmt_ciphers = FlagSet::of(&[GroupMgmtCipher::BipGmac256]);
                params.require_pmf = true;
            }
            SecurityType::Sae | SecurityType::Owe | SecurityType::Dpp => {
                params.key_mgmt.insert(match security_type {
                    SecurityType::Sae => KeyMgmt::Sae,
                    SecurityType::Owe => KeyMgmt::Owe,
                    _ => KeyMgmt::Dpp,
                });
                params.protocols = FlagSet::of(&[Protocol::Rsn]);
                params.pairwise_ciphers = FlagSet::of(&[P::Ccmp, P::Gcmp128, P::Gcmp256]);
                params.group_ciphers = FlagSet::of(&[G::Ccmp, G::Gcmp128, G::Gcmp256]);
                params.require_pmf = true;
            }
            SecurityType::WapiPsk | SecurityType::WapiCert => {
                params.key_mgmt.insert(if security_type == SecurityType::WapiPsk {
                    KeyMgmt::WapiPsk
                } else {
                    KeyMgmt::WapiCert
                });
                params.protocols = FlagSet::of(&[Protocol::Wapi]);
                params.pairwise_ciphers = FlagSet::of(&[P::Sms4]);
                params.group_ciphers = FlagSet::of(&[G::Sms4]);
            }
            SecurityType::Osen => {
                params.key_mgmt.insert(KeyMgmt::Osen);
                params.protocols = FlagSet::of(&[Protocol::Osen]);
                params.pairwise_ciphers = FlagSet::of(&[P::Ccmp, P::Gcmp128, P::Gcmp256, P::Tkip]);
                params.group_ciphers = FlagSet::of(&[G::Ccmp, G::Gcmp128, G::Gcmp256, G::Tkip]);
            }
            SecurityType::PasspointR1R2 => {
                params.key_mgmt = FlagSet::of(&[KeyMgmt::WpaEap, KeyMgmt::Ieee8021x]);
                params.protocols = FlagSet::of(&[Protocol::Rsn]);
                params.pairwise_ciphers = FlagSet::of(&[P::Ccmp]);
                params.group_ciphers = FlagSet::of(&[G::Ccmp]);
            }
            SecurityType::PasspointR3 => {
                params.key_mgmt = FlagSet::of(&[KeyMgmt::WpaEap, KeyMgmt::Ieee8021x]);
                params.protocols = FlagSet::of(&[Protocol::Rsn]);
                params.pairwise_ciphers = FlagSet::of(&[P::Ccmp, P::Gcmp256]);
                params.group_ciphers = FlagSet::of(&[G::Ccmp, G::Gcmp256]);
                params.require_pmf = true;
            }
        }
        params
    }

    fn bare(security_type: SecurityType) -> Self {
        Self {
            security_type,
            key_mgmt: FlagSet::empty(),
            protocols: FlagSet::empty(),
            auth_algorithms: FlagSet::empty(),
            pairwise_ciphers: FlagSet::empty(),
            group_ciphers: FlagSet::empty(),
            group_mgmt_ciphers: FlagSet::empty(),
            suite_b_ciphers: FlagSet::empty(),
            require_pmf: false,
            enabled: true,
            added_by_auto_upgrade: false,
            sae_h2e_only: false,
            sae_pk_only: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn security_type(&self) -> SecurityType {
        self.security_type
    }

    pub fn is_security_type(&self, security_type: SecurityType) -> bool {
        self.security_type == security_type
    }

    pub fn key_mgmt(&self) -> FlagSet<KeyMgmt> {
        self.key_mgmt
    }

    pub fn protocols(&self) -> FlagSet<Protocol> {
        self.protocols
    }

    pub fn auth_algorithms(&self) -> FlagSet<AuthAlgorithm> {
        self.auth_algorithms
    }

    pub fn pairwise_ciphers(&self) -> FlagSet<PairwiseCipher> {
        self.pairwise_ciphers
    }

    pub fn group_ciphers(&self) -> FlagSet<GroupCipher> {
        self.group_ciphers
    }

    pub fn group_mgmt_ciphers(&self) -> FlagSet<GroupMgmtCipher> {
        self.group_mgmt_ciphers
    }

    pub fn suite_b_ciphers(&self) -> FlagSet<SuiteBCipher> {
        self.suite_b_ciphers
    }

    pub fn is_require_pmf(&self) -> bool {
        self.require_pmf
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_added_by_auto_upgrade(&self) -> bool {
        self.added_by_auto_upgrade
    }

    pub fn is_sae_h2e_only_mode(&self) -> bool {
        self.sae_h2e_only
    }

    pub fn is_sae_pk_only_mode(&self) -> bool {
        self.sae_pk_only
    }

    // ── Classification ───────────────────────────────────────────────

    /// Any 802.1X-style key management bit is set.
    pub fn is_enterprise_security_type(&self) -> bool {
        self.key_mgmt.contains_any(&[
            KeyMgmt::WpaEap,
            KeyMgmt::Ieee8021x,
            KeyMgmt::SuiteB192,
            KeyMgmt::WapiCert,
        ])
    }

    pub fn is_open_security_type(&self) -> bool {
        self.security_type.is_open()
    }

    // ── Mutators ─────────────────────────────────────────────────────

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_added_by_auto_upgrade(&mut self, added: bool) {
        self.added_by_auto_upgrade = added;
    }

    /// Key management equals the factory set for this entry's type,
    /// apart from the FILS bits [`enable_fils`](Self::enable_fils) toggles.
    pub fn has_factory_key_mgmt(&self) -> bool {
        let without_fils = |mut km: FlagSet<KeyMgmt>| {
            km.remove(KeyMgmt::FilsSha256);
            km.remove(KeyMgmt::FilsSha384);
            km
        };
        without_fils(self.key_mgmt) == without_fils(Self::for_type(self.security_type).key_mgmt)
    }

    /// Toggle the FILS key management bits.
    pub fn enable_fils(&mut self, sha256: bool, sha384: bool) {
        self.key_mgmt.set(KeyMgmt::FilsSha256, sha256);
        self.key_mgmt.set(KeyMgmt::FilsSha384, sha384);
    }

    pub fn enable_suite_b_ciphers(&mut self, ecdhe_ecdsa: bool, ecdhe_rsa: bool) {
        self.suite_b_ciphers.set(SuiteBCipher::EcdheEcdsa, ecdhe_ecdsa);
        self.suite_b_ciphers.set(SuiteBCipher::EcdheRsa, ecdhe_rsa);
    }

    pub fn enable_sae_h2e_only_mode(&mut self, enable: bool) {
        self.sae_h2e_only = enable;
    }

    pub fn enable_sae_pk_only_mode(&mut self, enable: bool) {
        self.sae_pk_only = enable;
    }

    /// The legacy projection of this entry.
    pub fn legacy_fields(&self) -> LegacySecurityFields {
        LegacySecurityFields {
            key_mgmt: self.key_mgmt,
            protocols: self.protocols,
            auth_algorithms: self.auth_algorithms,
            pairwise_ciphers: self.pairwise_ciphers,
            group_ciphers: self.group_ciphers,
            group_mgmt_ciphers: self.group_mgmt_ciphers,
            suite_b_ciphers: self.suite_b_ciphers,
            require_pmf: self.require_pmf,
        }
    }
}
