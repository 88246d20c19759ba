//! Set identity layer
//!
//! [`IdentitySet`] stores the elements of an unordered, deduplicated
//! collection keyed by their [`SetId`]. Iteration is always in identity
//! order, so two sets built from the same elements in different orders
//! compare equal, serialize identically and render identically.

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::hash::{SetId, hash_tokens};

/// An element that can live in an [`IdentitySet`]
pub trait SetElement {
    /// Canonical tokens in identity order
    ///
    /// Absent optional values must be yielded as empty strings.
    fn tokens(&self) -> Vec<Cow<'_, str>>;

    /// Content identity of this element
    fn set_id(&self) -> SetId {
        hash_tokens(self.tokens())
    }
}

/// Unordered collection deduplicated by content identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySet<T> {
    elements: BTreeMap<SetId, T>,
}

impl<T> Default for IdentitySet<T> {
    fn default() -> Self {
        Self {
            elements: BTreeMap::new(),
        }
    }
}

impl<T> IdentitySet<T> {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up an element by identity
    pub fn get(&self, id: SetId) -> Option<&T> {
        self.elements.get(&id)
    }

    /// Iterate elements in identity order
    pub fn iter(&self) -> btree_map::Values<'_, SetId, T> {
        self.elements.values()
    }

    /// Iterate `(identity, element)` pairs in identity order
    pub fn entries(&self) -> btree_map::Iter<'_, SetId, T> {
        self.elements.iter()
    }

    /// Identities of all elements, ascending
    pub fn ids(&self) -> impl Iterator<Item = SetId> + '_ {
        self.elements.keys().copied()
    }
}

impl<T: SetElement> IdentitySet<T> {
    /// Insert an element
    ///
    /// Returns `false` if an element with the same identity was already
    /// present, in which case the set is left unchanged.
    pub fn insert(&mut self, element: T) -> bool {
        match self.elements.entry(element.set_id()) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(element);
                true
            }
        }
    }

    pub fn contains(&self, element: &T) -> bool {
        self.elements.contains_key(&element.set_id())
    }

    /// Canonical text of the whole set
    ///
    /// Used as the leading token of a parent element's identity. Entries are
    /// rendered as `identity:[tokens]` in identity order, so the text does not
    /// depend on insertion order.
    pub fn render(&self) -> String {
        let entries: Vec<String> = self
            .elements
            .iter()
            .map(|(id, element)| format!("{}:{:?}", id, element.tokens()))
            .collect();
        format!("{{{}}}", entries.join(","))
    }
}

impl<T: SetElement> FromIterator<T> for IdentitySet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: SetElement> Extend<T> for IdentitySet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T> IntoIterator for IdentitySet<T> {
    type Item = T;
    type IntoIter = btree_map::IntoValues<SetId, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_values()
    }
}

impl<'a, T> IntoIterator for &'a IdentitySet<T> {
    type Item = &'a T;
    type IntoIter = btree_map::Values<'a, SetId, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.values()
    }
}

impl<T: Serialize> Serialize for IdentitySet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.elements.len()))?;
        for element in self.elements.values() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

/// Elements that do not resolve to `T` are skipped with a warning rather
/// than failing the whole document.
impl<'de, T> Deserialize<'de> for IdentitySet<T>
where
    T: SetElement + DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
        let mut set = Self::new();
        for value in raw {
            match serde_json::from_value::<T>(value) {
                Ok(element) => {
                    set.insert(element);
                }
                Err(e) => {
                    tracing::warn!("Skipping unrecognized set element: {}", e);
                }
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Pair {
        left: String,
        right: String,
    }

    impl Pair {
        fn new(left: &str, right: &str) -> Self {
            Self {
                left: left.to_string(),
                right: right.to_string(),
            }
        }
    }

    impl SetElement for Pair {
        fn tokens(&self) -> Vec<Cow<'_, str>> {
            vec![Cow::from(self.left.as_str()), Cow::from(self.right.as_str())]
        }
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let forward: IdentitySet<Pair> =
            [Pair::new("a", "1"), Pair::new("b", "2"), Pair::new("c", "3")]
                .into_iter()
                .collect();
        let backward: IdentitySet<Pair> =
            [Pair::new("c", "3"), Pair::new("b", "2"), Pair::new("a", "1")]
                .into_iter()
                .collect();

        assert_eq!(forward, backward);
        assert_eq!(forward.render(), backward.render());
        assert_eq!(
            forward.ids().collect::<Vec<_>>(),
            backward.ids().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_identical_elements_collapse() {
        let mut set = IdentitySet::new();
        assert!(set.insert(Pair::new("a", "1")));
        assert!(!set.insert(Pair::new("a", "1")));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&Pair::new("a", "1")));
        assert!(!set.contains(&Pair::new("a", "2")));
    }

    #[test]
    fn test_iteration_is_sorted_by_identity() {
        let set: IdentitySet<Pair> = [Pair::new("x", "9"), Pair::new("a", "1")]
            .into_iter()
            .collect();
        let ids: Vec<SetId> = set.ids().collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_render_empty_set() {
        let set: IdentitySet<Pair> = IdentitySet::new();
        assert_eq!(set.render(), "{}");
    }

    #[test]
    fn test_deserialize_skips_malformed_elements() {
        let json = r#"[{"left":"a","right":"1"}, 42, {"left":"b"}, {"left":"c","right":"3"}]"#;
        let set: IdentitySet<Pair> = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Pair::new("a", "1")));
        assert!(set.contains(&Pair::new("c", "3")));
    }

    #[test]
    fn test_serializes_in_identity_order() {
        let a: IdentitySet<Pair> = [Pair::new("a", "1"), Pair::new("b", "2")]
            .into_iter()
            .collect();
        let b: IdentitySet<Pair> = [Pair::new("b", "2"), Pair::new("a", "1")]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
