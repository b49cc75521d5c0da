use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::model::Item;

/// Authoritative, ordered item collection keyed by identity.
///
/// Iteration order is presentation order: insertion order unless a caller has
/// asserted an explicit order through [`ItemStore::set_presentation_order`].
#[derive(Debug, Default, Clone)]
pub struct ItemStore {
    items: IndexMap<String, Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new item. Duplicate identities are ignored; the first registration wins.
    pub fn add(&mut self, identity: &str, value: &str, disabled: bool) -> bool {
        match self.items.entry(identity.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let item = Item::from_owned(slot.key().clone(), value.to_string(), disabled);
                slot.insert(item);
                true
            }
        }
    }

    pub fn forget(&mut self, identity: &str) -> Option<Item> {
        self.items.shift_remove(identity)
    }

    pub fn get(&self, identity: &str) -> Option<&Item> {
        self.items.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.items.contains_key(identity)
    }

    pub fn position(&self, identity: &str) -> Option<usize> {
        self.items.get_index_of(identity)
    }

    pub fn at(&self, position: usize) -> Option<&Item> {
        self.items.get_index(position).map(|(_, item)| item)
    }

    /// Snapshot of every item in presentation order. Later mutations do not affect it.
    pub fn all(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns whether the flag actually changed.
    pub fn set_disabled(&mut self, identity: &str, disabled: bool) -> bool {
        match self.items.get_mut(identity) {
            Some(item) if item.disabled != disabled => {
                item.disabled = disabled;
                true
            }
            _ => false,
        }
    }

    /// Moves the listed identities to the front, in the given order. Unknown and
    /// repeated identities are skipped; unlisted items keep their relative order
    /// after the listed ones. Returns whether the order changed.
    pub fn set_presentation_order(&mut self, identities: &[String]) -> bool {
        let before: Vec<String> = self.items.keys().cloned().collect();

        let mut reordered = IndexMap::with_capacity(self.items.len());
        for identity in identities {
            if let Some(item) = self.items.shift_remove(identity) {
                reordered.insert(identity.clone(), item);
            }
        }
        reordered.extend(self.items.drain(..));
        self.items = reordered;

        !self.items.keys().eq(before.iter())
    }
}
