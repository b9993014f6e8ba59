//! Name -> item mapping held by every container.
//! Keeps insertion order alongside the lookup map; only ordered containers
//! expose that order as meaningful.

use std::collections::{HashMap, HashSet};

use crate::errors::{NamespaceError, NsResult};

use super::ItemId;

#[derive(Debug, Clone, Default)]
pub struct Entries {
    order: Vec<String>,
    map: HashMap<String, ItemId>,
}

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<ItemId> {
        self.map.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in their current order.
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ItemId)> + '_ {
        self.order
            .iter()
            .filter_map(|k| self.map.get(k).map(|id| (k.as_str(), *id)))
    }

    /// Insert under a free name. Callers check for collisions first.
    pub(crate) fn insert(&mut self, name: &str, id: ItemId) {
        if self.map.insert(name.to_string(), id).is_none() {
            self.order.push(name.to_string());
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<ItemId> {
        let id = self.map.remove(name)?;
        if let Some(pos) = self.order.iter().position(|k| k == name) {
            self.order.remove(pos);
        }
        Some(id)
    }

    /// Replace the key order. `order` must be a bijection on the current keys.
    pub fn reorder(&mut self, order: &[String]) -> NsResult<()> {
        if order.len() != self.order.len() {
            return Err(NamespaceError::InvalidOrder(format!(
                "expected {} keys, got {}",
                self.order.len(),
                order.len()
            )));
        }
        let mut seen: HashSet<&str> = HashSet::with_capacity(order.len());
        for key in order {
            if !self.map.contains_key(key) {
                return Err(NamespaceError::InvalidOrder(format!("unknown key '{key}'")));
            }
            if !seen.insert(key.as_str()) {
                return Err(NamespaceError::InvalidOrder(format!("duplicate key '{key}'")));
            }
        }
        self.order = order.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Entries {
        let mut e = Entries::new();
        e.insert("a", ItemId(1));
        e.insert("b", ItemId(2));
        e.insert("c", ItemId(3));
        e
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut e = sample();
        assert_eq!(e.remove("b"), Some(ItemId(2)));
        assert_eq!(e.keys(), ["a", "c"]);
        assert_eq!(e.remove("b"), None);
    }

    #[test]
    fn reorder_accepts_permutation() {
        let mut e = sample();
        let order: Vec<String> = ["c", "a", "b"].iter().map(|s| s.to_string()).collect();
        e.reorder(&order).unwrap();
        assert_eq!(e.keys(), ["c", "a", "b"]);
        let pairs: Vec<_> = e.iter().collect();
        assert_eq!(pairs[0], ("c", ItemId(3)));
    }

    #[test]
    fn reorder_rejects_non_bijection() {
        let mut e = sample();
        let short: Vec<String> = vec!["a".into(), "b".into()];
        assert!(matches!(e.reorder(&short), Err(NamespaceError::InvalidOrder(_))));
        let dup: Vec<String> = vec!["a".into(), "a".into(), "b".into()];
        assert!(matches!(e.reorder(&dup), Err(NamespaceError::InvalidOrder(_))));
        let unknown: Vec<String> = vec!["a".into(), "b".into(), "z".into()];
        assert!(matches!(e.reorder(&unknown), Err(NamespaceError::InvalidOrder(_))));
        assert_eq!(e.keys(), ["a", "b", "c"]);
    }
}
