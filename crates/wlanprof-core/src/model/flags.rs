// ── Fixed-size flag sets ──
//
// Legacy security fields are bit sets indexed by small, stable integers
// that line up with display-string tables. `FlagSet` keeps that layout
// (one `u32` mask) while only admitting members of a closed enum.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A closed enumeration usable as a `FlagSet` member.
pub trait Flag: Copy + Eq + fmt::Debug + 'static {
    /// Stable legacy index of this flag (its bit position).
    fn index(self) -> u8;

    fn from_index(index: u8) -> Option<Self>;

    /// Legacy display name.
    fn name(self) -> &'static str;
}

/// Implements [`Flag`] for `#[repr(u8)]` enums deriving strum's
/// `FromRepr` and `IntoStaticStr`.
macro_rules! impl_flag {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::model::flags::Flag for $ty {
                #[allow(clippy::as_conversions)]
                fn index(self) -> u8 {
                    self as u8
                }

                fn from_index(index: u8) -> Option<Self> {
                    Self::from_repr(index)
                }

                fn name(self) -> &'static str {
                    self.into()
                }
            }
        )+
    };
}
pub(crate) use impl_flag;

// ── FlagSet ─────────────────────────────────────────────────────────

/// Bit set over a closed enum. Serialized as the list of member names.
pub struct FlagSet<F: Flag> {
    bits: u32,
    marker: PhantomData<F>,
}

impl<F: Flag> FlagSet<F> {
    pub const fn empty() -> Self {
        Self {
            bits: 0,
            marker: PhantomData,
        }
    }

    pub fn of(flags: &[F]) -> Self {
        flags.iter().copied().collect()
    }

    pub fn bits(self) -> u32 {
        self.bits
    }

    pub fn contains(self, flag: F) -> bool {
        self.bits & Self::mask(flag) != 0
    }

    /// True if any of `flags` is a member.
    pub fn contains_any(self, flags: &[F]) -> bool {
        flags.iter().any(|f| self.contains(*f))
    }

    pub fn insert(&mut self, flag: F) {
        self.bits |= Self::mask(flag);
    }

    pub fn remove(&mut self, flag: F) {
        self.bits &= !Self::mask(flag);
    }

    /// Insert or remove `flag` depending on `on`.
    pub fn set(&mut self, flag: F, on: bool) {
        if on {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Cardinality.
    pub fn len(self) -> usize {
        // count_ones() of a u32 is at most 32
        self.bits.count_ones().try_into().unwrap_or(usize::MAX)
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// The set holds exactly `flag` and nothing else.
    pub fn only(self, flag: F) -> bool {
        self.bits == Self::mask(flag)
    }

    /// Members in ascending index order.
    pub fn iter(&self) -> Iter<F> {
        Iter {
            bits: self.bits,
            marker: PhantomData,
        }
    }

    fn mask(flag: F) -> u32 {
        1u32 << u32::from(flag.index())
    }
}

impl<F: Flag> Clone for FlagSet<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: Flag> Copy for FlagSet<F> {}

impl<F: Flag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: Flag> PartialEq for FlagSet<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F: Flag> Eq for FlagSet<F> {}

impl<F: Flag> Hash for FlagSet<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<F: Flag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Flag::name)).finish()
    }
}

/// Space-separated member names, e.g. `WPA_EAP IEEE8021X`.
impl<F: Flag> fmt::Display for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Flag::name).collect();
        f.write_str(&names.join(" "))
    }
}

impl<F: Flag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::empty();
        set.extend(iter);
        set
    }
}

impl<F: Flag> Extend<F> for FlagSet<F> {
    fn extend<I: IntoIterator<Item = F>>(&mut self, iter: I) {
        for flag in iter {
            self.insert(flag);
        }
    }
}

impl<F: Flag> IntoIterator for &FlagSet<F> {
    type Item = F;
    type IntoIter = Iter<F>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<F: Flag> IntoIterator for FlagSet<F> {
    type Item = F;
    type IntoIter = Iter<F>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Iteration ───────────────────────────────────────────────────────

pub struct Iter<F> {
    bits: u32,
    marker: PhantomData<F>,
}

impl<F: Flag> Iterator for Iter<F> {
    type Item = F;

    fn next(&mut self) -> Option<F> {
        while self.bits != 0 {
            let index = self.bits.trailing_zeros();
            self.bits &= self.bits - 1;
            if let Some(flag) = u8::try_from(index).ok().and_then(F::from_index) {
                return Some(flag);
            }
        }
        None
    }
}

// ── Serde ───────────────────────────────────────────────────────────

impl<F: Flag + Serialize> Serialize for FlagSet<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, F: Flag + Deserialize<'de>> Deserialize<'de> for FlagSet<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flags = Vec::<F>::deserialize(deserializer)?;
        Ok(flags.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{GroupCipher, KeyMgmt};

    #[test]
    fn insert_and_contains_use_legacy_index() {
        let mut set = FlagSet::<KeyMgmt>::empty();
        set.insert(KeyMgmt::Sae);
        assert!(set.contains(KeyMgmt::Sae));
        assert_eq!(set.bits(), 1 << 8);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn iter_is_ascending_by_index() {
        let set = FlagSet::of(&[KeyMgmt::Dpp, KeyMgmt::WpaEap, KeyMgmt::Ieee8021x]);
        let members: Vec<_> = set.iter().collect();
        assert_eq!(
            members,
            vec![KeyMgmt::WpaEap, KeyMgmt::Ieee8021x, KeyMgmt::Dpp]
        );
    }

    #[test]
    fn remove_and_set_toggle_members() {
        let mut set = FlagSet::of(&[GroupCipher::Tkip, GroupCipher::Ccmp]);
        set.remove(GroupCipher::Tkip);
        assert!(!set.contains(GroupCipher::Tkip));
        set.set(GroupCipher::Wep40, true);
        set.set(GroupCipher::Ccmp, false);
        assert_eq!(set, FlagSet::of(&[GroupCipher::Wep40]));
    }

    #[test]
    fn display_joins_legacy_names() {
        let set = FlagSet::of(&[KeyMgmt::Ieee8021x, KeyMgmt::WpaEap, KeyMgmt::SuiteB192]);
        assert_eq!(set.to_string(), "WPA_EAP IEEE8021X SUITE_B_192");
    }

    #[test]
    fn serializes_as_name_list() {
        let set = FlagSet::of(&[KeyMgmt::WpaPsk, KeyMgmt::FtPsk]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["WPA_PSK","FT_PSK"]"#);
        let back: FlagSet<KeyMgmt> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
