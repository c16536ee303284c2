// ── MacAddress ──
//
// BSSIDs are kept normalized (lowercase, colon-separated) so that
// string comparisons and key derivation are stable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not six hex octets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid MAC address: {0}")]
pub struct InvalidMacAddress(pub String);

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    pub const BROADCAST: &'static str = "ff:ff:ff:ff:ff:ff";
    pub const ALL_ZEROS: &'static str = "00:00:00:00:00:00";

    /// Parse any common format: colon-separated, dash-separated, or bare hex.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, InvalidMacAddress> {
        let raw = raw.as_ref();
        let hex: String = raw
            .chars()
            .filter(|c| *c != ':' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidMacAddress(raw.to_owned()));
        }
        let octets: Vec<&str> = (0..6).filter_map(|i| hex.get(i * 2..i * 2 + 2)).collect();
        Ok(Self(octets.join(":")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_broadcast(&self) -> bool {
        self.0 == Self::BROADCAST
    }

    pub fn is_all_zeros(&self) -> bool {
        self.0 == Self::ALL_ZEROS
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = InvalidMacAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = InvalidMacAddress;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mac_address_normalizes_dashes() {
        let mac = MacAddress::parse("AA-BB-CC-DD-EE-FF").unwrap();
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_address_accepts_bare_hex() {
        let mac: MacAddress = "0011223344AA".parse().unwrap();
        assert_eq!(mac.to_string(), "00:11:22:33:44:aa");
    }

    #[test]
    fn mac_address_rejects_garbage() {
        assert!(MacAddress::parse("not-a-mac").is_err());
        assert!(MacAddress::parse("aa:bb:cc:dd:ee").is_err());
    }

    #[test]
    fn broadcast_and_zero_detection() {
        assert!(MacAddress::parse("FF:FF:FF:FF:FF:FF").unwrap().is_broadcast());
        assert!(MacAddress::parse("00-00-00-00-00-00").unwrap().is_all_zeros());
    }
}
