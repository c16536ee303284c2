// ── Common types shared across the profile model ──

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::security_params::SecurityParams;

/// Whether a network is treated as metered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MeteredOverride {
    /// Use the platform's heuristics.
    #[default]
    None,
    Metered,
    NotMetered,
}

/// MAC address randomization policy for connections to this network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MacRandomizationSetting {
    None,
    Persistent,
    NonPersistent,
    #[default]
    Auto,
}

/// IP configuration reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "assignment", rename_all = "lowercase")]
pub enum IpConfiguration {
    #[default]
    Dhcp,
    Static {
        /// Address in CIDR notation, e.g. `192.168.1.20/24`.
        address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gateway: Option<IpAddr>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        dns_servers: Vec<IpAddr>,
    },
}

// ── Network selection ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SelectionStatus {
    #[default]
    Enabled,
    TemporarilyDisabled,
    PermanentlyDisabled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DisableReason {
    #[default]
    None,
    AssociationRejection,
    AuthenticationFailure,
    DhcpFailure,
    NoInternetTemporary,
    AuthenticationNoCredentials,
    NoInternetPermanent,
    ByWrongPassword,
    AuthenticationNoSubscription,
    ConsecutiveFailures,
    ByUser,
}

/// Selection bookkeeping kept alongside a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSelectionStatus {
    pub status: SelectionStatus,
    pub disable_reason: DisableReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_security_params: Option<SecurityParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_security_params: Option<SecurityParams>,
}

impl NetworkSelectionStatus {
    pub fn is_network_enabled(&self) -> bool {
        self.status == SelectionStatus::Enabled
    }

    pub fn disable(&mut self, reason: DisableReason, permanent: bool) {
        self.status = if permanent {
            SelectionStatus::PermanentlyDisabled
        } else {
            SelectionStatus::TemporarilyDisabled
        };
        self.disable_reason = reason;
    }

    pub fn enable(&mut self) {
        self.status = SelectionStatus::Enabled;
        self.disable_reason = DisableReason::None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn static_ip_round_trips_through_json() {
        let ip = IpConfiguration::Static {
            address: "10.0.0.5/24".into(),
            gateway: Some("10.0.0.1".parse().unwrap()),
            dns_servers: vec!["1.1.1.1".parse().unwrap()],
        };
        let json = serde_json::to_string(&ip).unwrap();
        assert!(json.contains(r#""assignment":"static""#));
        let back: IpConfiguration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ip);
    }

    #[test]
    fn selection_status_disable_and_enable() {
        let mut status = NetworkSelectionStatus::default();
        status.disable(DisableReason::ByWrongPassword, true);
        assert_eq!(status.status, SelectionStatus::PermanentlyDisabled);
        assert!(!status.is_network_enabled());
        status.enable();
        assert_eq!(status.disable_reason, DisableReason::None);
    }

    #[test]
    fn metered_override_parses_cli_names() {
        let parsed: MeteredOverride = "not-metered".parse().unwrap();
        assert_eq!(parsed, MeteredOverride::NotMetered);
    }
}
