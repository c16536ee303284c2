// ── Profile store ──
//
// Insertion-ordered profiles keyed by `NetworkProfile::key()`, with a
// secondary index on network id. Persists to a TOML or JSON file whose
// root holds a `profiles` array.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::NetworkProfile;
use crate::model::SecurityType;
use crate::model::profile::INVALID_NETWORK_ID;

/// On-disk encoding, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Toml,
    Json,
}

impl StoreFormat {
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(CoreError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    pub fn encode(self, profiles: &[NetworkProfile]) -> Result<String, CoreError> {
        let file = StoreFileRef { profiles };
        Ok(match self {
            Self::Toml => toml::to_string_pretty(&file)?,
            Self::Json => serde_json::to_string_pretty(&file)?,
        })
    }

    pub fn decode(self, text: &str) -> Result<Vec<NetworkProfile>, CoreError> {
        let file: StoreFile = match self {
            Self::Toml => toml::from_str(text)?,
            Self::Json => serde_json::from_str(text)?,
        };
        Ok(file.profiles)
    }
}

#[derive(Deserialize)]
struct StoreFile {
    #[serde(default)]
    profiles: Vec<NetworkProfile>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    profiles: &'a [NetworkProfile],
}

// ── ProfileStore ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    /// Primary storage: profile key -> profile.
    by_key: IndexMap<String, NetworkProfile>,

    /// Secondary index: network id -> profile key.
    id_to_key: HashMap<i32, String>,

    next_network_id: i32,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = NetworkProfile>) -> Self {
        let mut store = Self::new();
        for profile in profiles {
            let key = profile.key();
            if !store.upsert(profile) {
                warn!(%key, "duplicate profile key, keeping the last one");
            }
        }
        store
    }

    /// Read a store file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let format = StoreFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        let store = Self::from_profiles(format.decode(&text)?);
        debug!(path = %path.display(), profiles = store.len(), "loaded profile store");
        Ok(store)
    }

    /// Like [`load`](Self::load), but a missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        StoreFormat::from_path(path)?;
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let format = StoreFormat::from_path(path)?;
        let profiles: Vec<NetworkProfile> = self.by_key.values().cloned().collect();
        let text = format.encode(&profiles)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)?;
        debug!(path = %path.display(), profiles = self.len(), "saved profile store");
        Ok(())
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Insert or replace a profile. Returns `true` if the key was new.
    ///
    /// Profiles without a network id get the next free one; a replaced
    /// profile keeps its predecessor's id.
    pub fn upsert(&mut self, mut profile: NetworkProfile) -> bool {
        let key = profile.key();
        if profile.network_id == INVALID_NETWORK_ID {
            profile.network_id = self
                .by_key
                .get(&key)
                .map_or_else(|| self.allocate_id(), |old| old.network_id);
        }
        self.bump_next_id(profile.network_id);

        // Clean up a stale id mapping if the key existed with a different id.
        let stale_id = self
            .by_key
            .get(&key)
            .map(|old| old.network_id)
            .filter(|id| *id != profile.network_id);
        if let Some(id) = stale_id {
            self.id_to_key.remove(&id);
        }
        self.id_to_key.insert(profile.network_id, key.clone());
        self.by_key.insert(key, profile).is_none()
    }

    /// Remove a profile by key.
    pub fn remove(&mut self, key: &str) -> Option<NetworkProfile> {
        let removed = self.by_key.shift_remove(key)?;
        self.id_to_key.remove(&removed.network_id);
        Some(removed)
    }

    /// Apply `edit` to the profile at `key`, re-keying it in place if the
    /// edit changed its key. Returns the new key.
    pub fn update<F>(&mut self, key: &str, edit: F) -> Result<String, CoreError>
    where
        F: FnOnce(&mut NetworkProfile) -> Result<(), CoreError>,
    {
        let index = self
            .by_key
            .get_index_of(key)
            .ok_or_else(|| CoreError::ProfileNotFound { key: key.into() })?;
        let mut profile = self.by_key[index].clone();
        edit(&mut profile)?;
        profile.touch();

        let new_key = profile.key();
        if new_key != key && self.by_key.contains_key(&new_key) {
            return Err(CoreError::ProfileExists { key: new_key });
        }
        let (_, old) = self
            .by_key
            .shift_remove_index(index)
            .ok_or_else(|| CoreError::ProfileNotFound { key: key.into() })?;
        self.id_to_key.remove(&old.network_id);
        self.bump_next_id(profile.network_id);
        self.id_to_key.insert(profile.network_id, new_key.clone());
        self.by_key.shift_insert(index, new_key.clone(), profile);
        Ok(new_key)
    }

    /// Run legacy conversion on every profile whose security list is
    /// empty. Returns `(new key, inferred type)` per converted profile.
    ///
    /// A profile whose converted key already belongs to another profile
    /// is left unconverted under its old key.
    pub fn migrate_legacy(&mut self) -> Vec<(String, SecurityType)> {
        let mut migrated = Vec::new();
        let old = std::mem::take(&mut self.by_key);
        let old_keys: HashSet<String> = old.keys().cloned().collect();
        self.id_to_key.clear();
        for (old_key, profile) in old {
            let mut converted = profile.clone();
            let Some(security_type) = converted.security_mut().convert_legacy_if_needed() else {
                self.upsert(profile);
                continue;
            };
            let new_key = converted.key();
            if new_key != old_key
                && (old_keys.contains(&new_key) || self.by_key.contains_key(&new_key))
            {
                warn!(%old_key, %new_key, "converted key is taken, leaving legacy profile as is");
                self.upsert(profile);
                continue;
            }
            converted.touch();
            migrated.push((new_key, security_type));
            self.upsert(converted);
        }
        debug!(count = migrated.len(), "migrated legacy profiles");
        migrated
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get_by_key(&self, key: &str) -> Option<&NetworkProfile> {
        self.by_key.get(key)
    }

    pub fn get_by_id(&self, network_id: i32) -> Option<&NetworkProfile> {
        let key = self.id_to_key.get(&network_id)?;
        self.by_key.get(key)
    }

    /// Resolve a key or a numeric network id.
    pub fn find(&self, key_or_id: &str) -> Option<&NetworkProfile> {
        self.get_by_key(key_or_id).or_else(|| {
            key_or_id
                .parse::<i32>()
                .ok()
                .and_then(|id| self.get_by_id(id))
        })
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkProfile> {
        self.by_key.values()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// The next id past the highest in use, or the lowest free one once
    /// that has run up against `i32::MAX`.
    fn allocate_id(&self) -> i32 {
        if !self.id_to_key.contains_key(&self.next_network_id) {
            return self.next_network_id;
        }
        (0..i32::MAX)
            .find(|id| !self.id_to_key.contains_key(id))
            .unwrap_or(INVALID_NETWORK_ID)
    }

    fn bump_next_id(&mut self, used: i32) {
        self.next_network_id = self.next_network_id.max(used.saturating_add(1));
    }
}

impl<'a> IntoIterator for &'a ProfileStore {
    type Item = &'a NetworkProfile;
    type IntoIter = indexmap::map::Values<'a, String, NetworkProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_key.values()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{FlagSet, KeyMgmt, LegacySecurityFields};
    use crate::resolver::SecurityProfileResolver;
    use pretty_assertions::assert_eq;

    fn profile(ssid: &str, security_type: SecurityType) -> NetworkProfile {
        NetworkProfile::with_ssid(ssid, security_type)
    }

    #[test]
    fn upsert_returns_true_for_new_key() {
        let mut store = ProfileStore::new();
        assert!(store.upsert(profile("a", SecurityType::Psk)));
        assert!(store.upsert(profile("b", SecurityType::Psk)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn upsert_returns_false_for_existing_key_and_keeps_id() {
        let mut store = ProfileStore::new();
        store.upsert(profile("a", SecurityType::Psk));
        let id = store.get_by_key(r#""a"WPA_PSK"#).unwrap().network_id;

        let mut replacement = profile("a", SecurityType::Psk);
        replacement.priority = 5;
        assert!(!store.upsert(replacement));
        let stored = store.get_by_id(id).unwrap();
        assert_eq!(stored.priority, 5);
        assert_eq!(stored.network_id, id);
    }

    #[test]
    fn ids_are_allocated_sequentially() {
        let mut store = ProfileStore::new();
        store.upsert(profile("a", SecurityType::Psk));
        store.upsert(profile("b", SecurityType::Sae));
        let ids: Vec<i32> = store.iter().map(|p| p.network_id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(store.find("1").unwrap().ssid.as_deref(), Some("\"b\""));
    }

    #[test]
    fn remove_clears_secondary_index() {
        let mut store = ProfileStore::new();
        store.upsert(profile("a", SecurityType::Owe));
        let removed = store.remove(r#""a"OWE"#).unwrap();
        assert!(store.get_by_id(removed.network_id).is_none());
        assert!(store.is_empty());
        assert!(store.remove(r#""a"OWE"#).is_none());
    }

    #[test]
    fn update_rekeys_in_place() {
        let mut store = ProfileStore::new();
        store.upsert(profile("a", SecurityType::Psk));
        store.upsert(profile("b", SecurityType::Psk));
        let new_key = store
            .update(r#""a"WPA_PSK"#, |p| {
                p.set_security_type(SecurityType::Sae);
                Ok(())
            })
            .unwrap();
        assert_eq!(new_key, r#""a"SAE"#);
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec![r#""a"SAE"#, r#""b"WPA_PSK"#]);
        assert_eq!(store.get_by_id(0).unwrap().key(), new_key);
    }

    #[test]
    fn update_refuses_key_collision() {
        let mut store = ProfileStore::new();
        store.upsert(profile("a", SecurityType::Psk));
        store.upsert(profile("a", SecurityType::Sae));
        let err = store
            .update(r#""a"WPA_PSK"#, |p| {
                p.set_security_type(SecurityType::Sae);
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::ProfileExists { .. }));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn migrate_legacy_converts_and_rekeys() {
        let mut legacy = NetworkProfile::new();
        legacy.ssid = Some("\"old\"".into());
        legacy.security = SecurityProfileResolver::from_legacy(LegacySecurityFields {
            key_mgmt: FlagSet::of(&[KeyMgmt::Wpa2Psk]),
            ..LegacySecurityFields::default()
        });
        let mut store = ProfileStore::from_profiles([legacy, profile("new", SecurityType::Sae)]);
        assert!(store.get_by_key(r#""old"NONE"#).is_some());

        let migrated = store.migrate_legacy();
        assert_eq!(
            migrated,
            vec![(r#""old"WPA_PSK"#.to_owned(), SecurityType::Psk)]
        );
        assert!(store.get_by_key(r#""old"WPA_PSK"#).is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn save_and_load_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::new();
        store.upsert(profile("a", SecurityType::Psk));
        let mut corp = profile("corp", SecurityType::Eap);
        corp.enterprise.set_identity("alice");
        store.upsert(corp);

        for name in ["profiles.toml", "nested/profiles.json"] {
            let path = dir.path().join(name);
            store.save(&path).unwrap();
            let loaded = ProfileStore::load(&path).unwrap();
            let original: Vec<&NetworkProfile> = store.iter().collect();
            let reloaded: Vec<&NetworkProfile> = loaded.iter().collect();
            assert_eq!(reloaded, original);
        }
    }

    #[test]
    fn open_missing_file_is_empty_and_bad_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(&dir.path().join("none.toml")).unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            ProfileStore::open(&dir.path().join("profiles.yaml")),
            Err(CoreError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn migrate_legacy_leaves_profile_when_key_is_taken() {
        let mut legacy = NetworkProfile::new();
        legacy.ssid = Some("\"cafe\"".into());
        legacy.security = SecurityProfileResolver::from_legacy(LegacySecurityFields {
            key_mgmt: FlagSet::of(&[KeyMgmt::Wpa2Psk]),
            ..LegacySecurityFields::default()
        });
        let mut store = ProfileStore::from_profiles([legacy, profile("cafe", SecurityType::Psk)]);
        assert_eq!(store.len(), 2);

        let migrated = store.migrate_legacy();
        assert!(migrated.is_empty());
        assert_eq!(store.len(), 2);
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec![r#""cafe"NONE"#, r#""cafe"WPA_PSK"#]);
    }

    #[test]
    fn max_network_id_does_not_overflow() {
        let mut top = profile("top", SecurityType::Psk);
        top.network_id = i32::MAX;
        let mut store = ProfileStore::from_profiles([top]);
        assert_eq!(store.get_by_id(i32::MAX).unwrap().key(), r#""top"WPA_PSK"#);
        store.upsert(profile("next", SecurityType::Owe));
        assert_eq!(store.get_by_key(r#""next"OWE"#).unwrap().network_id, 0);
        assert_eq!(store.get_by_id(i32::MAX).unwrap().key(), r#""top"WPA_PSK"#);
    }

    #[test]
    fn update_drops_the_old_network_id() {
        let mut store = ProfileStore::new();
        store.upsert(profile("a", SecurityType::Psk));
        store
            .update(r#""a"WPA_PSK"#, |p| {
                p.network_id = 7;
                Ok(())
            })
            .unwrap();
        assert!(store.get_by_id(0).is_none());
        assert!(store.find("0").is_none());
        assert_eq!(store.get_by_id(7).unwrap().key(), r#""a"WPA_PSK"#);
        store.upsert(profile("b", SecurityType::Psk));
        assert_eq!(store.get_by_key(r#""b"WPA_PSK"#).unwrap().network_id, 8);
    }
}
