// ── 802.11 security suite enumerations ──
//
// Discriminants are the legacy bit indices; display names match the
// legacy string tables exactly. Never renumber.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

use super::flags::impl_flag;

/// Key management scheme.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyMgmt {
    None = 0,
    WpaPsk = 1,
    WpaEap = 2,
    #[serde(rename = "IEEE8021X")]
    #[strum(serialize = "IEEE8021X")]
    Ieee8021x = 3,
    #[serde(rename = "WPA2_PSK")]
    #[strum(serialize = "WPA2_PSK")]
    Wpa2Psk = 4,
    Osen = 5,
    FtPsk = 6,
    FtEap = 7,
    Sae = 8,
    Owe = 9,
    #[serde(rename = "SUITE_B_192")]
    #[strum(serialize = "SUITE_B_192")]
    SuiteB192 = 10,
    #[serde(rename = "WPA_PSK_SHA256")]
    #[strum(serialize = "WPA_PSK_SHA256")]
    WpaPskSha256 = 11,
    #[serde(rename = "WPA_EAP_SHA256")]
    #[strum(serialize = "WPA_EAP_SHA256")]
    WpaEapSha256 = 12,
    WapiPsk = 13,
    WapiCert = 14,
    #[serde(rename = "FILS_SHA256")]
    #[strum(serialize = "FILS_SHA256")]
    FilsSha256 = 15,
    #[serde(rename = "FILS_SHA384")]
    #[strum(serialize = "FILS_SHA384")]
    FilsSha384 = 16,
    Dpp = 17,
}

/// Security protocol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Protocol {
    Wpa = 0,
    Rsn = 1,
    Osen = 2,
    Wapi = 3,
}

/// 802.11 authentication algorithm.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthAlgorithm {
    Open = 0,
    Shared = 1,
    Leap = 2,
    Sae = 3,
}

/// Pairwise (unicast) cipher.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PairwiseCipher {
    None = 0,
    Tkip = 1,
    Ccmp = 2,
    #[serde(rename = "GCMP_256")]
    #[strum(serialize = "GCMP_256")]
    Gcmp256 = 3,
    #[serde(rename = "SMS4")]
    #[strum(serialize = "SMS4")]
    Sms4 = 4,
    #[serde(rename = "GCMP_128")]
    #[strum(serialize = "GCMP_128")]
    Gcmp128 = 5,
}

/// Group (broadcast) cipher.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupCipher {
    #[serde(rename = "WEP40")]
    #[strum(serialize = "WEP40")]
    Wep40 = 0,
    #[serde(rename = "WEP104")]
    #[strum(serialize = "WEP104")]
    Wep104 = 1,
    Tkip = 2,
    Ccmp = 3,
    GtkNotUsed = 4,
    #[serde(rename = "GCMP_256")]
    #[strum(serialize = "GCMP_256")]
    Gcmp256 = 5,
    #[serde(rename = "SMS4")]
    #[strum(serialize = "SMS4")]
    Sms4 = 6,
    #[serde(rename = "GCMP_128")]
    #[strum(serialize = "GCMP_128")]
    Gcmp128 = 7,
}

/// Group management cipher (protected management frames).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum GroupMgmtCipher {
    #[serde(rename = "BIP_CMAC_256")]
    #[strum(serialize = "BIP_CMAC_256")]
    BipCmac256 = 0,
    #[serde(rename = "BIP_GMAC_128")]
    #[strum(serialize = "BIP_GMAC_128")]
    BipGmac128 = 1,
    #[serde(rename = "BIP_GMAC_256")]
    #[strum(serialize = "BIP_GMAC_256")]
    BipGmac256 = 2,
}

/// Suite-B cipher used in WPA3-Enterprise 192-bit mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SuiteBCipher {
    EcdheEcdsa = 0,
    EcdheRsa = 1,
}

impl_flag!(
    KeyMgmt,
    Protocol,
    AuthAlgorithm,
    PairwiseCipher,
    GroupCipher,
    GroupMgmtCipher,
    SuiteBCipher,
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::flags::Flag;
    use strum::IntoEnumIterator;

    #[test]
    fn key_mgmt_names_match_legacy_table() {
        let names: Vec<&str> = KeyMgmt::iter().map(Flag::name).collect();
        assert_eq!(
            names,
            vec![
                "NONE",
                "WPA_PSK",
                "WPA_EAP",
                "IEEE8021X",
                "WPA2_PSK",
                "OSEN",
                "FT_PSK",
                "FT_EAP",
                "SAE",
                "OWE",
                "SUITE_B_192",
                "WPA_PSK_SHA256",
                "WPA_EAP_SHA256",
                "WAPI_PSK",
                "WAPI_CERT",
                "FILS_SHA256",
                "FILS_SHA384",
                "DPP",
            ]
        );
    }

    #[test]
    fn indices_are_contiguous() {
        for (i, km) in KeyMgmt::iter().enumerate() {
            assert_eq!(usize::from(km.index()), i);
        }
        for (i, gc) in GroupCipher::iter().enumerate() {
            assert_eq!(usize::from(gc.index()), i);
        }
    }

    #[test]
    fn serde_and_display_agree() {
        let json = serde_json::to_string(&GroupMgmtCipher::BipGmac256).unwrap();
        assert_eq!(json, format!("\"{}\"", GroupMgmtCipher::BipGmac256));
        let parsed: PairwiseCipher = "GCMP_128".parse().unwrap();
        assert_eq!(parsed, PairwiseCipher::Gcmp128);
    }
}
