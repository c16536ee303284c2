// ── Security type ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// Closed set of authentication/encryption schemes a profile can carry.
///
/// The discriminant is the legacy integer constant. `Osen` is internal:
/// it is never offered to apps and must be the only entry of a profile.
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
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SecurityType {
    Open = 0,
    Wep = 1,
    Psk = 2,
    Eap = 3,
    Sae = 4,
    #[serde(rename = "eap-wpa3-enterprise-192-bit")]
    #[strum(serialize = "eap-wpa3-enterprise-192-bit")]
    EapWpa3Enterprise192Bit = 5,
    Owe = 6,
    WapiPsk = 7,
    WapiCert = 8,
    #[serde(rename = "eap-wpa3-enterprise")]
    #[strum(serialize = "eap-wpa3-enterprise")]
    EapWpa3Enterprise = 9,
    Osen = 10,
    #[serde(rename = "passpoint-r1-r2")]
    #[strum(serialize = "passpoint-r1-r2")]
    PasspointR1R2 = 11,
    #[serde(rename = "passpoint-r3")]
    #[strum(serialize = "passpoint-r3")]
    PasspointR3 = 12,
    Dpp = 13,
}

/// Names used in data-usage network keys, indexed by legacy constant.
/// Slot 10 is historical and shared with the 192-bit entry.
const LEGACY_NAMES: [&str; 14] = [
    "open",
    "wep",
    "wpa2-psk",
    "wpa2-enterprise",
    "wpa3-sae",
    "wpa3 enterprise 192-bit",
    "owe",
    "wapi-psk",
    "wapi-cert",
    "wpa3 enterprise",
    "wpa3 enterprise 192-bit",
    "passpoint r1/r2",
    "passpoint r3",
    "dpp",
];

impl SecurityType {
    /// Legacy integer constant.
    #[allow(clippy::as_conversions)]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Name from the legacy security-type table, as embedded in
    /// per-type network keys.
    pub fn legacy_name(self) -> &'static str {
        LEGACY_NAMES
            .get(usize::from(self.code()))
            .copied()
            .unwrap_or("unknown")
    }

    /// Name for a raw legacy constant; `"unknown"` when out of range.
    pub fn legacy_name_for_code(code: i32) -> &'static str {
        usize::try_from(code)
            .ok()
            .and_then(|i| LEGACY_NAMES.get(i).copied())
            .unwrap_or("unknown")
    }

    /// Uses 802.1X / certificate based authentication.
    pub fn is_enterprise(self) -> bool {
        matches!(
            self,
            Self::Eap
                | Self::EapWpa3Enterprise
                | Self::EapWpa3Enterprise192Bit
                | Self::PasspointR1R2
                | Self::PasspointR3
                | Self::WapiCert
        )
    }

    /// No credential is needed to associate.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open | Self::Owe)
    }

    /// Authenticates with a pre-shared key or passphrase.
    pub fn needs_pre_shared_key(self) -> bool {
        matches!(self, Self::Psk | Self::Sae | Self::WapiPsk)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_match_legacy_constants() {
        assert_eq!(SecurityType::Open.code(), 0);
        assert_eq!(SecurityType::Osen.code(), 10);
        assert_eq!(SecurityType::Dpp.code(), 13);
        assert_eq!(SecurityType::from_repr(9), Some(SecurityType::EapWpa3Enterprise));
    }

    #[test]
    fn legacy_names() {
        assert_eq!(SecurityType::Psk.legacy_name(), "wpa2-psk");
        assert_eq!(SecurityType::Eap.legacy_name(), "wpa2-enterprise");
        assert_eq!(SecurityType::PasspointR1R2.legacy_name(), "passpoint r1/r2");
        assert_eq!(SecurityType::Osen.legacy_name(), "wpa3 enterprise 192-bit");
        assert_eq!(SecurityType::legacy_name_for_code(-1), "unknown");
        assert_eq!(SecurityType::legacy_name_for_code(14), "unknown");
    }

    #[test]
    fn parse_from_cli_names() {
        let parsed: SecurityType = "EAP-WPA3-Enterprise-192-bit".parse().unwrap();
        assert_eq!(parsed, SecurityType::EapWpa3Enterprise192Bit);
        assert_eq!(SecurityType::WapiPsk.to_string(), "wapi-psk");
    }

    #[test]
    fn classification_is_disjoint_for_open_and_enterprise() {
        for t in SecurityType::iter() {
            assert!(!(t.is_open() && t.is_enterprise()), "{t}");
        }
        assert!(!SecurityType::Osen.is_enterprise());
        assert!(!SecurityType::Osen.is_open());
    }
}
