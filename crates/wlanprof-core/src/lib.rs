// wlanprof-core: Wi-Fi network profiles and the security-parameter resolver.

pub mod capability;
pub mod error;
pub mod model;
pub mod resolver;
pub mod store;
pub mod suggestion;

// ── Primary re-exports ──────────────────────────────────────────────
pub use capability::{
    CapabilityIssue, CapabilityReport, ChannelWidth, DeviceCapabilities, StaticCapabilities,
    check_profile,
};
pub use error::{CoreError, EnterpriseError, SecurityError};
pub use resolver::SecurityProfileResolver;
pub use store::{ProfileStore, StoreFormat};
pub use suggestion::{
    NetworkSuggestion, PasspointIdentity, SuggestionBuilder, SuggestionError, Wpa3EnterpriseMode,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Security suites
    AuthAlgorithm, FlagSet, GroupCipher, GroupMgmtCipher, KeyMgmt, PairwiseCipher, Protocol,
    SecurityType, SuiteBCipher,
    // Security entries
    LegacySecurityFields, SecurityParams,
    // Profile
    MacAddress, NetworkProfile,
    // Enterprise
    EapMethod, EnterpriseCredential, FieldKey, Phase2Method,
};
