//! EntryTable: the Store and the Reverse Index behind stable handles.
//!
//! Entries live in a generational slot map. Two hash tables index the same
//! slots, one by composite key and one by assigned value, so both directions
//! of lookup are O(1) average and can never disagree about which entry they
//! name. Each entry also stores both precomputed hashes; rehashing always
//! uses the stored hashes.

use crate::composite_key::CompositeKey;
use crate::ActionValue;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Stable reference to a live entry. Stale handles never resolve, even when
/// the underlying slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.0
    }
}

/// One registered key and its value.
#[derive(Debug)]
pub struct Entry {
    key: CompositeKey,
    value: ActionValue,
    seq: u64,
    key_hash: u64,
    value_hash: u64,
}

impl Entry {
    pub fn key(&self) -> &CompositeKey {
        &self.key
    }

    pub fn value(&self) -> ActionValue {
        self.value
    }

    /// The namespace recorded for this entry; `None` for the default one.
    pub fn namespace(&self) -> Option<&str> {
        self.key.namespace()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InsertError {
    DuplicateKey,
    DuplicateValue,
}

pub struct EntryTable<S = RandomState> {
    hasher: S,
    by_key: HashTable<DefaultKey>,
    by_value: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry>,
    next_seq: u64,
}

impl EntryTable {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl Default for EntryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> EntryTable<S>
where
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            by_key: HashTable::new(),
            by_value: HashTable::new(),
            slots: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn find_key<Q>(&self, q: &Q) -> Option<Handle>
    where
        CompositeKey: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.by_key
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|e| e.key.borrow() == q)
                    .unwrap_or(false)
            })
            .map(|&k| Handle::new(k))
    }

    pub fn find_value(&self, value: ActionValue) -> Option<Handle> {
        let hash = self.make_hash(&value);
        self.by_value
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|e| e.value == value)
                    .unwrap_or(false)
            })
            .map(|&k| Handle::new(k))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        CompositeKey: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_key(q).is_some()
    }

    pub fn contains_value(&self, value: ActionValue) -> bool {
        self.find_value(value).is_some()
    }

    /// Insert a new entry. Fails without touching the table when either the
    /// key or the value is already present.
    pub fn insert(&mut self, key: CompositeKey, value: ActionValue) -> Result<Handle, InsertError> {
        let key_hash = self.make_hash(&key);
        let value_hash = self.make_hash(&value);

        let value_taken = self
            .by_value
            .find(value_hash, |&k| {
                self.slots
                    .get(k)
                    .map(|e| e.value == value)
                    .unwrap_or(false)
            })
            .is_some();

        match self.by_key.entry(
            key_hash,
            |&kk| self.slots.get(kk).map(|e| e.key == key).unwrap_or(false),
            |&kk| self.slots.get(kk).map(|e| e.key_hash).unwrap_or(0),
        ) {
            hashbrown::hash_table::Entry::Occupied(_) => Err(InsertError::DuplicateKey),
            hashbrown::hash_table::Entry::Vacant(_) if value_taken => {
                Err(InsertError::DuplicateValue)
            }
            hashbrown::hash_table::Entry::Vacant(v) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let k = self.slots.insert(Entry {
                    key,
                    value,
                    seq,
                    key_hash,
                    value_hash,
                });
                let _ = v.insert(k);
                let slots = &self.slots;
                let _ = self.by_value.insert_unique(value_hash, k, |&kk| {
                    slots.get(kk).map(|e| e.value_hash).unwrap_or(0)
                });
                Ok(Handle::new(k))
            }
        }
    }

    /// Remove an entry from the slots and both indices.
    pub fn remove(&mut self, handle: Handle) -> Option<Entry> {
        let k = handle.raw_handle();
        let entry = self.slots.remove(k)?;

        if let Ok(occupied) = self.by_key.find_entry(entry.key_hash, |&kk| kk == k) {
            let _ = occupied.remove();
        }
        if let Ok(occupied) = self.by_value.find_entry(entry.value_hash, |&kk| kk == k) {
            let _ = occupied.remove();
        }

        Some(entry)
    }

    pub fn get(&self, handle: Handle) -> Option<&Entry> {
        self.slots.get(handle.raw_handle())
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
        self.by_value.clear();
        self.slots.clear();
        self.next_seq = 0;
    }

    /// Live entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Entry)> {
        self.slots.iter().map(|(k, e)| (Handle::new(k), e))
    }

    /// Live entries in insertion order.
    pub fn ordered(&self) -> Vec<(Handle, &Entry)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|(_, e)| e.seq);
        entries
    }
}
