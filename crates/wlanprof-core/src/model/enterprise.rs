//! Enterprise (802.1X / EAP) credentials.
//!
//! Free-form supplicant settings live in a field bag keyed by the closed
//! [`FieldKey`] enum. Writes to unknown keys or with over-long values are
//! dropped without error, matching how partially populated configs from
//! apps have always been tolerated. Typed settings (EAP method, phase 2,
//! certificates, TLS and TOFU state) are plain fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::warn;

use crate::error::EnterpriseError;

// ── Field bag keys ──────────────────────────────────────────────────

const CERTIFICATE_MAX_LENGTH: usize = 8192;
const KEYCHAIN_ALIAS_MAX_LENGTH: usize = 256;
const CLIENT_CERTIFICATE_CHAIN_MAX_ELEMENTS: usize = 5;
const CA_CERTIFICATES_MAX_ELEMENTS: usize = 100;

/// Stored in place of an explicitly empty value.
pub const EMPTY_VALUE: &str = "NULL";

const KEYSTORE_URI: &str = "keystore://";
const CA_CERT_PREFIX: &str = "keystore://CACERT_";
const CLIENT_CERT_PREFIX: &str = "keystore://USRCERT_";
const USER_PRIVATE_KEY_PREFIX: &str = "USRPKEY_";
const ENGINE_ENABLE: &str = "1";
const ENGINE_DISABLE: &str = "0";
const ENGINE_ID_KEYSTORE: &str = "keystore";

/// Supported supplicant field names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKey {
    AltsubjectMatch,
    AnonymousIdentity,
    CaCert,
    CaPath,
    ClientCert,
    DecoratedUsernamePrefix,
    DomainSuffixMatch,
    EapErp,
    Engine,
    EngineId,
    Identity,
    ProactiveKeyCaching,
    Password,
    Plmn,
    KeyId,
    Realm,
    SubjectMatch,
    WapiCertSuite,
}

impl FieldKey {
    /// Longest accepted value, in characters.
    pub fn max_length(self) -> usize {
        match self {
            Self::AltsubjectMatch | Self::AnonymousIdentity => 1024,
            Self::CaCert | Self::ClientCert | Self::WapiCertSuite => CERTIFICATE_MAX_LENGTH,
            Self::CaPath => 4096,
            Self::DecoratedUsernamePrefix
            | Self::DomainSuffixMatch
            | Self::Identity
            | Self::Password
            | Self::KeyId
            | Self::Realm
            | Self::SubjectMatch => 256,
            Self::EapErp | Self::Engine | Self::ProactiveKeyCaching => 1,
            Self::EngineId => 64,
            Self::Plmn => 16,
        }
    }

    /// Keys whose values are stored without surrounding quotes.
    pub fn is_unquoted(self) -> bool {
        matches!(self, Self::Engine | Self::ProactiveKeyCaching | Self::EapErp)
    }

    fn accepts(self, value: &str) -> bool {
        value.chars().count() <= self.max_length()
    }
}

// ── Methods ─────────────────────────────────────────────────────────

/// Outer EAP method.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum EapMethod {
    #[default]
    #[strum(to_string = "NONE")]
    None,
    #[strum(to_string = "PEAP")]
    Peap,
    #[strum(to_string = "TLS")]
    Tls,
    #[strum(to_string = "TTLS")]
    Ttls,
    #[strum(to_string = "PWD")]
    Pwd,
    #[strum(to_string = "SIM")]
    Sim,
    #[strum(to_string = "AKA")]
    Aka,
    #[strum(to_string = "AKA'", serialize = "aka-prime")]
    AkaPrime,
    #[strum(to_string = "WFA-UNAUTH-TLS", serialize = "unauth-tls")]
    UnauthTls,
    #[strum(to_string = "WAPI_CERT", serialize = "wapi-cert")]
    WapiCert,
}

/// Inner (phase 2) authentication method.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum Phase2Method {
    #[default]
    #[strum(to_string = "NULL", serialize = "none")]
    None,
    #[strum(to_string = "PAP")]
    Pap,
    #[strum(to_string = "MSCHAP")]
    Mschap,
    #[strum(to_string = "MSCHAPV2")]
    Mschapv2,
    #[strum(to_string = "GTC")]
    Gtc,
    #[strum(to_string = "SIM")]
    Sim,
    #[strum(to_string = "AKA")]
    Aka,
    #[strum(to_string = "AKA'", serialize = "aka-prime")]
    AkaPrime,
}

/// OCSP certificate-status policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OcspMode {
    #[default]
    None,
    RequestCertStatus,
    RequireCertStatus,
    RequireAllCertsStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TlsVersion {
    #[default]
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.2")]
    V1_2,
    #[serde(rename = "1.3")]
    V1_3,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TofuConnectionState {
    #[default]
    NotEnabled,
    EnabledPreConnection,
    ConfigureRootCa,
    CertPinning,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TofuDialogState {
    #[default]
    Unspecified,
    Rejected,
    Accepted,
}

// ── Certificates ────────────────────────────────────────────────────

const SHA384_WITH_RSA_OID: &str = "1.2.840.113549.1.1.12";
const ECDSA_WITH_SHA384_OID: &str = "1.2.840.10045.4.3.3";

/// Public key summary of a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum PublicKeyInfo {
    Rsa { modulus_bits: u32 },
    Ec { field_bits: u32 },
    Other,
}

/// The parts of an X.509 certificate the profile logic looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub subject: String,
    pub signature_algorithm_oid: String,
    pub public_key: PublicKeyInfo,
    /// Basic constraints mark this as a CA certificate.
    #[serde(default)]
    pub is_ca: bool,
}

impl Certificate {
    /// Strong enough for WPA3-Enterprise 192-bit mode: sha384WithRSA with
    /// at least 3072-bit modulus, or ecdsa-with-SHA384 on a 384-bit curve.
    pub fn is_suite_b_cipher_cert(&self) -> bool {
        match (self.signature_algorithm_oid.as_str(), &self.public_key) {
            (SHA384_WITH_RSA_OID, PublicKeyInfo::Rsa { modulus_bits }) => *modulus_bits >= 3072,
            (ECDSA_WITH_SHA384_OID, PublicKeyInfo::Ec { field_bits }) => *field_bits >= 384,
            _ => false,
        }
    }
}

/// Opaque handle to a client private key held elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKeyRef {
    pub alias: String,
    pub encoded_len: usize,
}

// ── EnterpriseCredential ────────────────────────────────────────────

#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnterpriseCredential {
    #[serde(with = "field_map")]
    fields: BTreeMap<FieldKey, String>,
    eap_method: EapMethod,
    phase2_method: Phase2Method,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ca_certificates: Vec<Certificate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    client_certificate_chain: Vec<Certificate>,
    client_private_key: Option<PrivateKeyRef>,
    key_chain_alias: Option<String>,
    app_installed_device_key_and_cert: bool,
    app_installed_ca_cert: bool,
    ocsp: OcspMode,
    minimum_tls_version: TlsVersion,
    trust_on_first_use: bool,
    user_approve_no_ca_cert: bool,
    tofu_dialog_state: TofuDialogState,
    tofu_connection_state: TofuConnectionState,
}

impl EnterpriseCredential {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Field bag ────────────────────────────────────────────────────

    /// Store `value` under `key`. Over-long values are dropped.
    pub fn set_field_value(&mut self, key: FieldKey, value: &str) {
        self.set_field_value_with_prefix(key, value, "");
    }

    /// String-keyed variant for values arriving from untyped sources.
    /// Unknown keys are dropped.
    pub fn set_field_value_str(&mut self, key: &str, value: &str) {
        match key.parse::<FieldKey>() {
            Ok(key) => self.set_field_value(key, value),
            Err(_) => warn!(key, "ignoring unsupported enterprise field"),
        }
    }

    /// Decoded value: quotes and storage prefix removed, `""` when unset.
    pub fn field_value(&self, key: FieldKey) -> String {
        self.field_value_with_prefix(key, "")
    }

    /// String-keyed read; `""` for unknown keys.
    pub fn field_value_str(&self, key: &str) -> String {
        key.parse::<FieldKey>()
            .map(|key| self.field_value(key))
            .unwrap_or_default()
    }

    /// Value exactly as stored (quoted, or [`EMPTY_VALUE`]).
    pub fn raw_field(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn set_field_value_with_prefix(&mut self, key: FieldKey, value: &str, prefix: &str) {
        if !key.accepts(value) {
            warn!(field = %key, len = value.len(), "dropping over-long enterprise field");
            return;
        }
        let stored = if value.is_empty() {
            EMPTY_VALUE.to_owned()
        } else if key.is_unquoted() {
            format!("{prefix}{value}")
        } else {
            quoted(&format!("{prefix}{value}"))
        };
        self.fields.insert(key, stored);
    }

    fn field_value_with_prefix(&self, key: FieldKey, prefix: &str) -> String {
        let Some(value) = self.fields.get(&key) else {
            return String::new();
        };
        if value.is_empty() || value == EMPTY_VALUE {
            return String::new();
        }
        let value = remove_double_quotes(value);
        value.strip_prefix(prefix).unwrap_or(value).to_owned()
    }

    // ── Named field accessors ────────────────────────────────────────

    pub fn identity(&self) -> String {
        self.field_value(FieldKey::Identity)
    }

    pub fn set_identity(&mut self, identity: &str) {
        self.set_field_value(FieldKey::Identity, identity);
    }

    pub fn anonymous_identity(&self) -> String {
        self.field_value(FieldKey::AnonymousIdentity)
    }

    pub fn set_anonymous_identity(&mut self, identity: &str) {
        self.set_field_value(FieldKey::AnonymousIdentity, identity);
    }

    pub fn password(&self) -> String {
        self.field_value(FieldKey::Password)
    }

    pub fn set_password(&mut self, password: &str) {
        self.set_field_value(FieldKey::Password, password);
    }

    pub fn realm(&self) -> String {
        self.field_value(FieldKey::Realm)
    }

    pub fn set_realm(&mut self, realm: &str) {
        self.set_field_value(FieldKey::Realm, realm);
    }

    pub fn domain_suffix_match(&self) -> String {
        self.field_value(FieldKey::DomainSuffixMatch)
    }

    pub fn set_domain_suffix_match(&mut self, domain: &str) {
        self.set_field_value(FieldKey::DomainSuffixMatch, domain);
    }

    pub fn alt_subject_match(&self) -> String {
        self.field_value(FieldKey::AltsubjectMatch)
    }

    pub fn set_alt_subject_match(&mut self, alt_subject: &str) {
        self.set_field_value(FieldKey::AltsubjectMatch, alt_subject);
    }

    pub fn ca_path(&self) -> String {
        self.field_value(FieldKey::CaPath)
    }

    pub fn set_ca_path(&mut self, path: &str) {
        self.set_field_value(FieldKey::CaPath, path);
    }

    pub fn plmn(&self) -> String {
        self.field_value(FieldKey::Plmn)
    }

    pub fn set_plmn(&mut self, plmn: &str) {
        self.set_field_value(FieldKey::Plmn, plmn);
    }

    pub fn wapi_cert_suite(&self) -> String {
        self.field_value(FieldKey::WapiCertSuite)
    }

    pub fn set_wapi_cert_suite(&mut self, suite: &str) {
        self.set_field_value(FieldKey::WapiCertSuite, suite);
    }

    /// Key store alias of the CA certificate, `""` when unset.
    pub fn ca_certificate_alias(&self) -> String {
        self.field_value_with_prefix(FieldKey::CaCert, CA_CERT_PREFIX)
    }

    pub fn set_ca_certificate_alias(&mut self, alias: &str) {
        self.set_field_value_with_prefix(FieldKey::CaCert, alias, CA_CERT_PREFIX);
    }

    pub fn client_certificate_alias(&self) -> String {
        self.field_value_with_prefix(FieldKey::ClientCert, CLIENT_CERT_PREFIX)
    }

    /// Also points the private key id and engine at the key store.
    pub fn set_client_certificate_alias(&mut self, alias: &str) {
        self.set_field_value_with_prefix(FieldKey::ClientCert, alias, CLIENT_CERT_PREFIX);
        self.set_field_value_with_prefix(FieldKey::KeyId, alias, USER_PRIVATE_KEY_PREFIX);
        if alias.is_empty() {
            self.set_field_value(FieldKey::Engine, ENGINE_DISABLE);
            self.set_field_value(FieldKey::EngineId, "");
        } else {
            self.set_field_value(FieldKey::Engine, ENGINE_ENABLE);
            self.set_field_value(FieldKey::EngineId, ENGINE_ID_KEYSTORE);
        }
    }

    // ── EAP ──────────────────────────────────────────────────────────

    pub fn eap_method(&self) -> EapMethod {
        self.eap_method
    }

    /// TLS-family methods clear phase 2; every method but WAPI-CERT turns
    /// on proactive key caching.
    pub fn set_eap_method(&mut self, method: EapMethod) {
        match method {
            EapMethod::WapiCert => {
                self.eap_method = method;
                self.phase2_method = Phase2Method::None;
            }
            EapMethod::Tls | EapMethod::UnauthTls => {
                self.phase2_method = Phase2Method::None;
                self.eap_method = method;
                self.set_field_value(FieldKey::ProactiveKeyCaching, "1");
            }
            EapMethod::None => self.eap_method = method,
            _ => {
                self.eap_method = method;
                self.set_field_value(FieldKey::ProactiveKeyCaching, "1");
            }
        }
    }

    pub fn phase2_method(&self) -> Phase2Method {
        self.phase2_method
    }

    pub fn set_phase2_method(&mut self, method: Phase2Method) {
        self.phase2_method = method;
    }

    /// `<EAP>_<PHASE2>`, e.g. `PEAP_MSCHAPV2`. With no EAP method set the
    /// `current` credential answers, and [`EMPTY_VALUE`] without one.
    pub fn key_id(&self, current: Option<&Self>) -> String {
        if self.eap_method == EapMethod::None {
            return current.map_or_else(|| EMPTY_VALUE.to_owned(), |c| c.key_id(None));
        }
        format!("{}_{}", self.eap_method, self.phase2_method)
    }

    pub fn is_authentication_sim_based(&self) -> bool {
        match self.eap_method {
            EapMethod::Sim | EapMethod::Aka | EapMethod::AkaPrime => true,
            EapMethod::Peap => matches!(
                self.phase2_method,
                Phase2Method::Sim | Phase2Method::Aka | Phase2Method::AkaPrime
            ),
            _ => false,
        }
    }

    pub fn is_eap_method_server_cert_used(&self) -> bool {
        matches!(
            self.eap_method,
            EapMethod::Peap | EapMethod::Tls | EapMethod::Ttls | EapMethod::UnauthTls
        )
    }

    /// A subject or domain match plus some CA source is configured.
    pub fn is_mandatory_parameter_set_for_server_cert_validation(&self) -> bool {
        if self.alt_subject_match().is_empty() && self.domain_suffix_match().is_empty() {
            return false;
        }
        self.app_installed_ca_cert
            || !self.ca_certificate_alias().is_empty()
            || !self.ca_path().is_empty()
    }

    pub fn has_ca_certificate(&self) -> bool {
        !self.ca_certificate_alias().is_empty()
            || !self.ca_certificates.is_empty()
            || !self.ca_path().is_empty()
    }

    // ── Certificates ─────────────────────────────────────────────────

    pub fn ca_certificates(&self) -> &[Certificate] {
        &self.ca_certificates
    }

    pub fn ca_certificate(&self) -> Option<&Certificate> {
        self.ca_certificates.first()
    }

    /// Install app-provided CA certificates. Every entry must be a CA.
    pub fn set_ca_certificates(&mut self, certs: Vec<Certificate>) -> Result<(), EnterpriseError> {
        if certs.len() > CA_CERTIFICATES_MAX_ELEMENTS {
            self.ca_certificates.clear();
            return Err(EnterpriseError::TooManyCertificates {
                kind: "CA",
                count: certs.len(),
                max: CA_CERTIFICATES_MAX_ELEMENTS,
            });
        }
        if let Some(bad) = certs.iter().find(|c| !c.is_ca) {
            self.ca_certificates.clear();
            return Err(EnterpriseError::NotCaCertificate {
                subject: bad.subject.clone(),
            });
        }
        self.app_installed_ca_cert = !certs.is_empty();
        self.ca_certificates = certs;
        Ok(())
    }

    pub fn client_certificate_chain(&self) -> &[Certificate] {
        &self.client_certificate_chain
    }

    pub fn client_certificate(&self) -> Option<&Certificate> {
        self.client_certificate_chain.first()
    }

    pub fn client_private_key(&self) -> Option<&PrivateKeyRef> {
        self.client_private_key.as_ref()
    }

    /// Install a client key and its chain: an end-entity certificate
    /// followed only by CA certificates.
    pub fn set_client_key_entry(
        &mut self,
        private_key: Option<PrivateKeyRef>,
        chain: Vec<Certificate>,
    ) -> Result<(), EnterpriseError> {
        if chain.is_empty() {
            self.client_certificate_chain.clear();
            self.client_private_key = None;
            self.app_installed_device_key_and_cert = false;
            return Ok(());
        }
        if chain.len() > CLIENT_CERTIFICATE_CHAIN_MAX_ELEMENTS {
            return Err(EnterpriseError::TooManyCertificates {
                kind: "client",
                count: chain.len(),
                max: CLIENT_CERTIFICATE_CHAIN_MAX_ELEMENTS,
            });
        }
        if chain.first().is_some_and(|c| c.is_ca) {
            return Err(EnterpriseError::InvalidChain {
                reason: "first certificate must be a client end certificate".into(),
            });
        }
        if chain.iter().skip(1).any(|c| !c.is_ca) {
            return Err(EnterpriseError::InvalidChain {
                reason: "all certificates following the first must be CA certificates".into(),
            });
        }
        let key = private_key.ok_or(EnterpriseError::MissingPrivateKey)?;
        if key.encoded_len > CERTIFICATE_MAX_LENGTH {
            return Err(EnterpriseError::InvalidChain {
                reason: "private key is too large".into(),
            });
        }
        self.client_private_key = Some(key);
        self.client_certificate_chain = chain;
        self.app_installed_device_key_and_cert = true;
        Ok(())
    }

    pub fn key_chain_alias(&self) -> Option<&str> {
        self.key_chain_alias.as_deref()
    }

    pub fn set_key_chain_alias(&mut self, alias: &str) -> Result<(), EnterpriseError> {
        if alias.chars().count() > KEYCHAIN_ALIAS_MAX_LENGTH {
            return Err(EnterpriseError::AliasTooLong {
                max: KEYCHAIN_ALIAS_MAX_LENGTH,
            });
        }
        self.key_chain_alias = Some(alias.to_owned());
        Ok(())
    }

    pub fn is_app_installed_device_key_and_cert(&self) -> bool {
        self.app_installed_device_key_and_cert
    }

    pub fn is_app_installed_ca_cert(&self) -> bool {
        self.app_installed_ca_cert
    }

    // ── TLS / OCSP / TOFU ────────────────────────────────────────────

    pub fn ocsp(&self) -> OcspMode {
        self.ocsp
    }

    pub fn set_ocsp(&mut self, ocsp: OcspMode) {
        self.ocsp = ocsp;
    }

    pub fn minimum_tls_version(&self) -> TlsVersion {
        self.minimum_tls_version
    }

    pub fn set_minimum_tls_version(&mut self, version: TlsVersion) {
        self.minimum_tls_version = version;
    }

    pub fn is_trust_on_first_use_enabled(&self) -> bool {
        self.trust_on_first_use
    }

    /// Toggle TOFU. The connection state only follows while TOFU has not
    /// progressed past the pre-connection stage.
    pub fn enable_trust_on_first_use(&mut self, enable: bool) {
        self.trust_on_first_use = enable;
        if !matches!(
            self.tofu_connection_state,
            TofuConnectionState::ConfigureRootCa | TofuConnectionState::CertPinning
        ) {
            self.tofu_connection_state = if enable {
                TofuConnectionState::EnabledPreConnection
            } else {
                TofuConnectionState::NotEnabled
            };
        }
    }

    pub fn tofu_connection_state(&self) -> TofuConnectionState {
        self.tofu_connection_state
    }

    pub fn set_tofu_connection_state(&mut self, state: TofuConnectionState) {
        self.tofu_connection_state = state;
    }

    pub fn tofu_dialog_state(&self) -> TofuDialogState {
        self.tofu_dialog_state
    }

    pub fn set_tofu_dialog_state(&mut self, state: TofuDialogState) {
        self.tofu_dialog_state = state;
    }

    pub fn is_user_approve_no_ca_cert(&self) -> bool {
        self.user_approve_no_ca_cert
    }

    pub fn set_user_approve_no_ca_cert(&mut self, approve: bool) {
        self.user_approve_no_ca_cert = approve;
    }

    // ── Copying ──────────────────────────────────────────────────────

    /// Merge an externally supplied credential into this one. A password
    /// still equal to the redaction `mask` is left untouched.
    pub fn copy_from_external(&mut self, external: &Self, mask: &str) {
        self.copy_from(external, Some(&quoted(mask)));
    }

    fn copy_from(&mut self, source: &Self, masked_password: Option<&str>) {
        for (key, value) in &source.fields {
            if *key == FieldKey::Password && masked_password == Some(value.as_str()) {
                continue;
            }
            if key.accepts(remove_double_quotes(value)) {
                self.fields.insert(*key, value.clone());
            }
        }
        self.ca_certificates.clone_from(&source.ca_certificates);
        self.client_private_key.clone_from(&source.client_private_key);
        self.client_certificate_chain
            .clone_from(&source.client_certificate_chain);
        self.key_chain_alias.clone_from(&source.key_chain_alias);
        self.eap_method = source.eap_method;
        self.phase2_method = source.phase2_method;
        self.app_installed_device_key_and_cert = source.app_installed_device_key_and_cert;
        self.app_installed_ca_cert = source.app_installed_ca_cert;
        self.ocsp = source.ocsp;
        self.trust_on_first_use = source.trust_on_first_use;
        self.user_approve_no_ca_cert = source.user_approve_no_ca_cert;
        self.minimum_tls_version = source.minimum_tls_version;
        self.tofu_dialog_state = source.tofu_dialog_state;
        self.tofu_connection_state = source.tofu_connection_state;
    }

    /// Copy with the password field replaced by the redaction `mask`.
    pub fn redacted(&self, mask: &str) -> Self {
        let mut copy = self.clone();
        if copy.fields.contains_key(&FieldKey::Password) {
            copy.fields.insert(FieldKey::Password, quoted(mask));
        }
        copy
    }
}

/// Never prints the password.
impl fmt::Debug for EnterpriseCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: BTreeMap<&'static str, &str> = self
            .fields
            .iter()
            .map(|(k, v)| {
                let shown = if *k == FieldKey::Password {
                    "<removed>"
                } else {
                    v.as_str()
                };
                (<&'static str>::from(*k), shown)
            })
            .collect();
        f.debug_struct("EnterpriseCredential")
            .field("fields", &fields)
            .field("eap_method", &self.eap_method)
            .field("phase2_method", &self.phase2_method)
            .field("ca_certificates", &self.ca_certificates.len())
            .field("client_certificate_chain", &self.client_certificate_chain.len())
            .field("ocsp", &self.ocsp)
            .field("minimum_tls_version", &self.minimum_tls_version)
            .field("trust_on_first_use", &self.trust_on_first_use)
            .field("tofu_dialog_state", &self.tofu_dialog_state)
            .field("tofu_connection_state", &self.tofu_connection_state)
            .finish_non_exhaustive()
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

fn remove_double_quotes(value: &str) -> &str {
    if value.len() > 1 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Field bag serde: string keys on the wire, invalid entries dropped on load.
mod field_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::{FieldKey, remove_double_quotes};

    pub fn serialize<S: Serializer>(
        fields: &BTreeMap<FieldKey, String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            fields
                .iter()
                .map(|(k, v)| (<&'static str>::from(*k), v.as_str())),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<FieldKey, String>, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| {
                let key = k.parse::<FieldKey>().ok()?;
                key.accepts(remove_double_quotes(&v)).then_some((key, v))
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ec384_cert(is_ca: bool) -> Certificate {
        Certificate {
            subject: "CN=test".into(),
            signature_algorithm_oid: ECDSA_WITH_SHA384_OID.into(),
            public_key: PublicKeyInfo::Ec { field_bits: 384 },
            is_ca,
        }
    }

    #[test]
    fn values_are_stored_quoted_and_read_back_plain() {
        let mut cred = EnterpriseCredential::new();
        cred.set_identity("alice");
        assert_eq!(cred.raw_field(FieldKey::Identity), Some("\"alice\""));
        assert_eq!(cred.identity(), "alice");
    }

    #[test]
    fn unquoted_keys_keep_raw_value() {
        let mut cred = EnterpriseCredential::new();
        cred.set_field_value(FieldKey::EapErp, "1");
        assert_eq!(cred.raw_field(FieldKey::EapErp), Some("1"));
    }

    #[test]
    fn empty_value_is_stored_as_null_marker() {
        let mut cred = EnterpriseCredential::new();
        cred.set_realm("");
        assert_eq!(cred.raw_field(FieldKey::Realm), Some(EMPTY_VALUE));
        assert_eq!(cred.realm(), "");
    }

    #[test]
    fn unknown_key_write_is_dropped() {
        let mut cred = EnterpriseCredential::new();
        cred.set_field_value_str("not_a_field", "value");
        assert_eq!(cred.field_value_str("not_a_field"), "");
        assert_eq!(cred.fields().count(), 0);
    }

    #[test]
    fn over_long_value_is_dropped() {
        let mut cred = EnterpriseCredential::new();
        cred.set_plmn(&"1".repeat(17));
        assert_eq!(cred.plmn(), "");
        cred.set_plmn(&"1".repeat(16));
        assert_eq!(cred.plmn().len(), 16);
    }

    #[test]
    fn over_long_value_keeps_previous_value() {
        let mut cred = EnterpriseCredential::new();
        cred.set_identity("bob");
        cred.set_identity(&"x".repeat(257));
        assert_eq!(cred.identity(), "bob");
    }

    #[test]
    fn tls_clears_phase2_and_enables_key_caching() {
        let mut cred = EnterpriseCredential::new();
        cred.set_eap_method(EapMethod::Peap);
        cred.set_phase2_method(Phase2Method::Mschapv2);
        cred.set_eap_method(EapMethod::Tls);
        assert_eq!(cred.phase2_method(), Phase2Method::None);
        assert_eq!(cred.raw_field(FieldKey::ProactiveKeyCaching), Some("1"));
    }

    #[test]
    fn wapi_cert_does_not_touch_key_caching() {
        let mut cred = EnterpriseCredential::new();
        cred.set_eap_method(EapMethod::WapiCert);
        assert_eq!(cred.raw_field(FieldKey::ProactiveKeyCaching), None);
    }

    #[test]
    fn key_id_formats() {
        let mut cred = EnterpriseCredential::new();
        assert_eq!(cred.key_id(None), "NULL");

        let mut current = EnterpriseCredential::new();
        current.set_eap_method(EapMethod::Ttls);
        current.set_phase2_method(Phase2Method::Pap);
        assert_eq!(cred.key_id(Some(&current)), "TTLS_PAP");

        cred.set_eap_method(EapMethod::AkaPrime);
        assert_eq!(cred.key_id(None), "AKA'_NULL");
    }

    #[test]
    fn client_alias_sets_key_id_and_engine() {
        let mut cred = EnterpriseCredential::new();
        cred.set_client_certificate_alias("mycert");
        assert_eq!(cred.client_certificate_alias(), "mycert");
        assert_eq!(cred.field_value(FieldKey::KeyId), "USRPKEY_mycert");
        assert_eq!(cred.raw_field(FieldKey::Engine), Some("1"));
        assert_eq!(cred.field_value(FieldKey::EngineId), "keystore");
    }

    #[test]
    fn server_cert_validation_needs_match_and_ca() {
        let mut cred = EnterpriseCredential::new();
        cred.set_eap_method(EapMethod::Peap);
        assert!(cred.is_eap_method_server_cert_used());
        assert!(!cred.is_mandatory_parameter_set_for_server_cert_validation());

        cred.set_domain_suffix_match("example.com");
        assert!(!cred.is_mandatory_parameter_set_for_server_cert_validation());

        cred.set_ca_certificate_alias("corp-ca");
        assert!(cred.is_mandatory_parameter_set_for_server_cert_validation());
        assert!(cred.has_ca_certificate());
    }

    #[test]
    fn sim_based_detection() {
        let mut cred = EnterpriseCredential::new();
        cred.set_eap_method(EapMethod::Peap);
        cred.set_phase2_method(Phase2Method::Aka);
        assert!(cred.is_authentication_sim_based());
        cred.set_phase2_method(Phase2Method::Gtc);
        assert!(!cred.is_authentication_sim_based());
        cred.set_eap_method(EapMethod::Sim);
        assert!(cred.is_authentication_sim_based());
    }

    #[test]
    fn masked_password_is_not_copied() {
        let mut external = EnterpriseCredential::new();
        external.set_password("*");
        external.set_identity("carol");

        let mut target = EnterpriseCredential::new();
        target.copy_from_external(&external, "*");
        assert_eq!(target.raw_field(FieldKey::Password), None);
        assert_eq!(target.identity(), "carol");
    }

    #[test]
    fn real_password_is_copied_verbatim() {
        let mut external = EnterpriseCredential::new();
        external.set_password("hunter2");

        let mut target = EnterpriseCredential::new();
        target.copy_from_external(&external, "*");
        assert_eq!(target.password(), "hunter2");
    }

    #[test]
    fn clone_keeps_masked_password() {
        let mut cred = EnterpriseCredential::new();
        cred.set_password("*");
        let copy = cred.clone();
        assert_eq!(copy.raw_field(FieldKey::Password), Some("\"*\""));
    }

    #[test]
    fn debug_output_hides_password() {
        let mut cred = EnterpriseCredential::new();
        cred.set_password("s3cret");
        let dbg = format!("{cred:?}");
        assert!(!dbg.contains("s3cret"));
        assert!(dbg.contains("<removed>"));
    }

    #[test]
    fn tofu_state_machine() {
        let mut cred = EnterpriseCredential::new();
        cred.enable_trust_on_first_use(true);
        assert_eq!(
            cred.tofu_connection_state(),
            TofuConnectionState::EnabledPreConnection
        );
        cred.set_tofu_connection_state(TofuConnectionState::CertPinning);
        cred.enable_trust_on_first_use(false);
        assert!(!cred.is_trust_on_first_use_enabled());
        assert_eq!(cred.tofu_connection_state(), TofuConnectionState::CertPinning);
    }

    #[test]
    fn ca_certificates_must_be_ca() {
        let mut cred = EnterpriseCredential::new();
        assert!(cred.set_ca_certificates(vec![ec384_cert(false)]).is_err());
        cred.set_ca_certificates(vec![ec384_cert(true)]).unwrap();
        assert!(cred.is_app_installed_ca_cert());
    }

    #[test]
    fn client_chain_requires_key_and_end_entity_first() {
        let mut cred = EnterpriseCredential::new();
        let err = cred
            .set_client_key_entry(None, vec![ec384_cert(false)])
            .unwrap_err();
        assert_eq!(err, EnterpriseError::MissingPrivateKey);

        let key = PrivateKeyRef {
            alias: "k".into(),
            encoded_len: 128,
        };
        assert!(
            cred.set_client_key_entry(Some(key.clone()), vec![ec384_cert(true)])
                .is_err()
        );
        cred.set_client_key_entry(Some(key), vec![ec384_cert(false), ec384_cert(true)])
            .unwrap();
        assert_eq!(cred.client_certificate_chain().len(), 2);
    }

    #[test]
    fn suite_b_certificate_strength() {
        assert!(ec384_cert(false).is_suite_b_cipher_cert());
        let weak_rsa = Certificate {
            subject: "CN=rsa".into(),
            signature_algorithm_oid: SHA384_WITH_RSA_OID.into(),
            public_key: PublicKeyInfo::Rsa { modulus_bits: 2048 },
            is_ca: false,
        };
        assert!(!weak_rsa.is_suite_b_cipher_cert());
    }

    #[test]
    fn field_bag_serde_drops_unknown_keys() {
        let json = r#"{"fields":{"identity":"\"dave\"","bogus":"x"},"eap_method":"ttls"}"#;
        let cred: EnterpriseCredential = serde_json::from_str(json).unwrap();
        assert_eq!(cred.identity(), "dave");
        assert_eq!(cred.eap_method(), EapMethod::Ttls);
        assert_eq!(cred.fields().count(), 1);
    }
}
