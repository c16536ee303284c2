// ── Profile domain model ──
//
// Closed enumerations for the 802.11 security suites, the per-type
// `SecurityParams` blocks, the enterprise credential field bag and the
// network profile record that ties them together.

pub mod common;
pub mod enterprise;
pub mod flags;
pub mod mac;
pub mod profile;
pub mod security_params;
pub mod security_type;
pub mod suites;

// ── Re-exports ──────────────────────────────────────────────────────

// Suites and flag sets
pub use flags::{Flag, FlagSet};
pub use suites::{
    AuthAlgorithm, GroupCipher, GroupMgmtCipher, KeyMgmt, PairwiseCipher, Protocol, SuiteBCipher,
};

// Security entries
pub use security_params::{LegacySecurityFields, SecurityParams};
pub use security_type::SecurityType;

// Profile
pub use common::{
    DisableReason, IpConfiguration, MacRandomizationSetting, MeteredOverride,
    NetworkSelectionStatus, SelectionStatus,
};
pub use mac::{InvalidMacAddress, MacAddress};
pub use profile::NetworkProfile;

// Enterprise
pub use enterprise::{
    Certificate, EapMethod, EnterpriseCredential, FieldKey, OcspMode, Phase2Method,
    PrivateKeyRef, PublicKeyInfo, TlsVersion, TofuConnectionState, TofuDialogState,
};
