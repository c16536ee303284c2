// ── Device capability boundary ──
//
// Profiles are resolved without asking the hardware anything. Callers that
// want to know whether a device can actually use a profile ask a
// `DeviceCapabilities` implementation through `check_profile`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::model::{NetworkProfile, SecurityType};

/// Channel bandwidth.
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
)]
pub enum ChannelWidth {
    #[serde(rename = "20mhz")]
    #[strum(serialize = "20mhz")]
    Mhz20,
    #[serde(rename = "40mhz")]
    #[strum(serialize = "40mhz")]
    Mhz40,
    #[serde(rename = "80mhz")]
    #[strum(serialize = "80mhz")]
    Mhz80,
    #[serde(rename = "160mhz")]
    #[strum(serialize = "160mhz")]
    Mhz160,
    #[serde(rename = "320mhz")]
    #[strum(serialize = "320mhz")]
    Mhz320,
}

/// Answers "can this device do X" questions.
pub trait DeviceCapabilities {
    fn supports_security_type(&self, security_type: SecurityType) -> bool;

    fn supports_wpa3_suite_b(&self) -> bool;

    fn supports_sae_h2e(&self) -> bool;

    fn supports_sae_pk(&self) -> bool;

    fn supports_bandwidth(&self, width: ChannelWidth) -> bool;
}

/// A fixed capability table, usually loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticCapabilities {
    pub security_types: BTreeSet<SecurityType>,
    pub wpa3_suite_b: bool,
    pub sae_h2e: bool,
    pub sae_pk: bool,
    pub bandwidths: BTreeSet<ChannelWidth>,
}

impl Default for StaticCapabilities {
    fn default() -> Self {
        Self {
            security_types: SecurityType::iter()
                .filter(|t| *t != SecurityType::EapWpa3Enterprise192Bit)
                .collect(),
            wpa3_suite_b: false,
            sae_h2e: true,
            sae_pk: false,
            bandwidths: [
                ChannelWidth::Mhz20,
                ChannelWidth::Mhz40,
                ChannelWidth::Mhz80,
                ChannelWidth::Mhz160,
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl DeviceCapabilities for StaticCapabilities {
    fn supports_security_type(&self, security_type: SecurityType) -> bool {
        if security_type == SecurityType::EapWpa3Enterprise192Bit && !self.wpa3_suite_b {
            return false;
        }
        self.security_types.contains(&security_type)
    }

    fn supports_wpa3_suite_b(&self) -> bool {
        self.wpa3_suite_b
    }

    fn supports_sae_h2e(&self) -> bool {
        self.sae_h2e
    }

    fn supports_sae_pk(&self) -> bool {
        self.sae_pk
    }

    fn supports_bandwidth(&self, width: ChannelWidth) -> bool {
        self.bandwidths.contains(&width)
    }
}

// ── Profile check ───────────────────────────────────────────────────

/// One reason a device falls short of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", content = "security_type", rename_all = "kebab-case")]
pub enum CapabilityIssue {
    UnsupportedSecurityType(SecurityType),
    SaeH2eOnlyUnsupported,
    SaePkOnlyUnsupported,
    Wifi7BandwidthUnsupported,
}

impl fmt::Display for CapabilityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSecurityType(t) => write!(f, "security type {t} is not supported"),
            Self::SaeH2eOnlyUnsupported => f.write_str("SAE Hash-to-Element only mode is not supported"),
            Self::SaePkOnlyUnsupported => f.write_str("SAE public key only mode is not supported"),
            Self::Wifi7BandwidthUnsupported => f.write_str("320 MHz channels are not supported"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityReport {
    pub key: String,
    /// Enabled entries the device can connect with.
    pub usable: Vec<SecurityType>,
    pub issues: Vec<CapabilityIssue>,
}

impl CapabilityReport {
    pub fn is_usable(&self) -> bool {
        !self.usable.is_empty()
    }
}

/// Which of `profile`'s enabled security entries `caps` can use.
pub fn check_profile(profile: &NetworkProfile, caps: &impl DeviceCapabilities) -> CapabilityReport {
    let mut usable = Vec::new();
    let mut issues = Vec::new();
    for params in profile.security().security_params_list() {
        if !params.is_enabled() {
            continue;
        }
        let security_type = params.security_type();
        if !caps.supports_security_type(security_type) {
            issues.push(CapabilityIssue::UnsupportedSecurityType(security_type));
        } else if params.is_sae_h2e_only_mode() && !caps.supports_sae_h2e() {
            issues.push(CapabilityIssue::SaeH2eOnlyUnsupported);
        } else if params.is_sae_pk_only_mode() && !caps.supports_sae_pk() {
            issues.push(CapabilityIssue::SaePkOnlyUnsupported);
        } else {
            usable.push(security_type);
        }
    }
    if profile.wifi7_enabled && !caps.supports_bandwidth(ChannelWidth::Mhz320) {
        issues.push(CapabilityIssue::Wifi7BandwidthUnsupported);
    }
    CapabilityReport {
        key: profile.key(),
        usable,
        issues,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn suite_b_needs_flag_and_type() {
        let mut caps = StaticCapabilities::default();
        assert!(!caps.supports_security_type(SecurityType::EapWpa3Enterprise192Bit));
        caps.security_types
            .insert(SecurityType::EapWpa3Enterprise192Bit);
        assert!(!caps.supports_security_type(SecurityType::EapWpa3Enterprise192Bit));
        caps.wpa3_suite_b = true;
        assert!(caps.supports_security_type(SecurityType::EapWpa3Enterprise192Bit));
    }

    #[test]
    fn check_reports_unusable_entries() {
        let mut profile = NetworkProfile::with_ssid("home", SecurityType::Psk);
        profile.add_security_type(SecurityType::Sae).unwrap();
        profile.security_mut().enable_sae_h2e_only_mode(true);

        let caps = StaticCapabilities {
            sae_h2e: false,
            bandwidths: BTreeSet::from([ChannelWidth::Mhz320]),
            ..StaticCapabilities::default()
        };
        let report = check_profile(&profile, &caps);
        assert_eq!(report.usable, vec![SecurityType::Psk]);
        assert_eq!(report.issues, vec![CapabilityIssue::SaeH2eOnlyUnsupported]);
        assert!(report.is_usable());
    }

    #[test]
    fn disabled_entries_are_skipped() {
        let mut profile = NetworkProfile::with_ssid("home", SecurityType::Sae);
        profile.wifi7_enabled = false;
        profile
            .security_mut()
            .set_security_params_enabled(SecurityType::Sae, false);
        let report = check_profile(&profile, &StaticCapabilities::default());
        assert!(!report.is_usable());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn wifi7_without_320mhz_is_reported() {
        let profile = NetworkProfile::with_ssid("home", SecurityType::Owe);
        let report = check_profile(&profile, &StaticCapabilities::default());
        assert_eq!(report.issues, vec![CapabilityIssue::Wifi7BandwidthUnsupported]);
    }

    #[test]
    fn capabilities_load_from_toml() {
        let caps: StaticCapabilities = toml::from_str(
            r#"
            security_types = ["open", "psk", "sae"]
            bandwidths = ["20mhz", "80mhz"]
            "#,
        )
        .unwrap();
        assert!(caps.supports_security_type(SecurityType::Sae));
        assert!(!caps.supports_security_type(SecurityType::Owe));
        assert!(caps.supports_bandwidth(ChannelWidth::Mhz80));
        assert!(caps.supports_sae_h2e());
    }
}
