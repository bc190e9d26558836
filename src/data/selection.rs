use crate::data::slot_key::SlotKey;
use std::collections::BTreeSet;

/// The set of selected slots for the session. Membership is the only state a slot has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    slots: BTreeSet<SlotKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, key: &SlotKey) -> bool {
        self.slots.contains(key)
    }

    /// Flips the slot's presence and returns the new value.
    pub fn toggle(&mut self, key: SlotKey) -> bool {
        if self.slots.remove(&key) {
            false
        } else {
            self.slots.insert(key);
            true
        }
    }

    /// Sets presence explicitly. Returns true if membership actually changed.
    pub fn set_presence(&mut self, key: SlotKey, present: bool) -> bool {
        if present {
            self.slots.insert(key)
        } else {
            self.slots.remove(&key)
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Selected slots in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotKey> {
        self.slots.iter()
    }
}

impl FromIterator<SlotKey> for Selection {
    fn from_iter<I: IntoIterator<Item = SlotKey>>(iter: I) -> Self {
        Selection {
            slots: iter.into_iter().collect(),
        }
    }
}
