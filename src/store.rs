//! IndexedStore: the entry table and the namespace index as one unit.
//!
//! Every write goes through `apply`, which updates the forward map, the
//! reverse map and the namespace lists before returning. Callers never see
//! one index updated without the others.

use crate::composite_key::CompositeKey;
use crate::entry_table::{Entry, EntryTable, Handle, InsertError};
use crate::namespace_index::NamespaceIndex;
use crate::reentrancy::CriticalSection;
use crate::ActionValue;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

#[derive(Debug)]
pub enum Mutation<'a> {
    Insert { key: CompositeKey, value: ActionValue },
    Delete(Handle),
    ClearNamespace(&'a str),
    Reset,
}

#[derive(Debug, Eq, PartialEq)]
pub enum Outcome {
    Inserted(Handle),
    /// Number of entries removed.
    Deleted(usize),
}

pub struct IndexedStore<S = RandomState> {
    table: EntryTable<S>,
    namespaces: NamespaceIndex,
    section: CriticalSection,
}

impl IndexedStore {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl Default for IndexedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> IndexedStore<S>
where
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: EntryTable::with_hasher(hasher),
            namespaces: NamespaceIndex::new(),
            section: CriticalSection::new(),
        }
    }

    pub fn apply(&mut self, mutation: Mutation<'_>) -> Result<Outcome, InsertError> {
        let _g = self.section.enter();
        match mutation {
            Mutation::Insert { key, value } => {
                let namespace = key.namespace().map(str::to_owned);
                let handle = self.table.insert(key, value)?;
                if let Some(ns) = namespace {
                    self.namespaces.push(&ns, handle);
                }
                Ok(Outcome::Inserted(handle))
            }
            Mutation::Delete(handle) => {
                let Some(entry) = self.table.remove(handle) else {
                    return Ok(Outcome::Deleted(0));
                };
                if let Some(ns) = entry.namespace() {
                    self.namespaces.remove(ns, handle);
                }
                Ok(Outcome::Deleted(1))
            }
            Mutation::ClearNamespace(namespace) => {
                let handles = self.namespaces.take(namespace).unwrap_or_default();
                let removed = handles
                    .into_iter()
                    .filter(|&h| self.table.remove(h).is_some())
                    .count();
                Ok(Outcome::Deleted(removed))
            }
            Mutation::Reset => {
                let removed = self.table.len();
                self.table.clear();
                self.namespaces.clear();
                Ok(Outcome::Deleted(removed))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn table(&self) -> &EntryTable<S> {
        debug_assert!(!self.section.is_held());
        &self.table
    }

    pub fn get(&self, handle: Handle) -> Option<&Entry> {
        self.table.get(handle)
    }

    pub fn find_key(&self, key: &str) -> Option<Handle> {
        self.table.find_key(key)
    }

    pub fn find_value(&self, value: ActionValue) -> Option<Handle> {
        self.table.find_value(value)
    }

    /// Handles indexed under `namespace`, in insertion order.
    pub fn namespace_handles(&self, namespace: &str) -> &[Handle] {
        self.namespaces.handles(namespace)
    }

    pub fn in_namespace(&self, namespace: &str, handle: Handle) -> bool {
        self.namespaces.contains(namespace, handle)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.namespaces()
    }

    /// Verify the cross-index invariants; returns a description of the first
    /// violation found.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        use std::collections::HashSet;

        let mut values = HashSet::new();
        for (handle, entry) in self.table.iter() {
            if !values.insert(entry.value()) {
                return Err(format!("value {} assigned twice", entry.value()));
            }
            if self.table.find_key(entry.key().as_str()) != Some(handle) {
                return Err(format!("forward index misses {}", entry.key()));
            }
            if self.table.find_value(entry.value()) != Some(handle) {
                return Err(format!("reverse index misses {}", entry.value()));
            }
            if let Some(ns) = entry.namespace() {
                if !self.namespaces.contains(ns, handle) {
                    return Err(format!("namespace {ns:?} does not list {}", entry.key()));
                }
            }
        }
        for ns in self.namespaces.namespaces() {
            let listed = self.namespaces.handles(ns);
            let unique: HashSet<_> = listed.iter().collect();
            if unique.len() != listed.len() {
                return Err(format!("namespace {ns:?} lists a handle twice"));
            }
            for &h in listed {
                match self.table.get(h) {
                    Some(e) if e.namespace() == Some(ns) => {}
                    Some(e) => return Err(format!("namespace {ns:?} lists foreign key {}", e.key())),
                    None => return Err(format!("namespace {ns:?} lists a stale handle")),
                }
            }
        }
        Ok(())
    }
}
