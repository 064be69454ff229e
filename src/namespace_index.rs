//! NamespaceIndex: per-namespace, insertion-ordered lists of entry handles.
//!
//! The default namespace has no list; callers only index entries whose
//! namespace is non-empty. Lists are created lazily on first push and stay
//! (possibly empty) until the namespace is taken out with `take`.

use crate::entry_table::Handle;
use hashbrown::HashMap;

#[derive(Debug, Default)]
pub struct NamespaceIndex {
    lists: HashMap<String, Vec<Handle>>,
}

impl NamespaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, namespace: &str, handle: Handle) {
        debug_assert!(!namespace.is_empty(), "default namespace is not indexed");
        match self.lists.get_mut(namespace) {
            Some(list) => {
                debug_assert!(!list.contains(&handle), "handle indexed twice");
                list.push(handle);
            }
            None => {
                self.lists.insert(namespace.to_owned(), vec![handle]);
            }
        }
    }

    /// Drop `handle` from the namespace's list, keeping every other handle in
    /// order.
    pub fn remove(&mut self, namespace: &str, handle: Handle) {
        if let Some(list) = self.lists.get_mut(namespace) {
            list.retain(|&h| h != handle);
        }
    }

    pub fn contains(&self, namespace: &str, handle: Handle) -> bool {
        self.lists
            .get(namespace)
            .is_some_and(|list| list.contains(&handle))
    }

    /// Handles registered under `namespace`, in insertion order. Empty for an
    /// unknown namespace.
    pub fn handles(&self, namespace: &str) -> &[Handle] {
        self.lists.get(namespace).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove the namespace entry itself and return its handles.
    pub fn take(&mut self, namespace: &str) -> Option<Vec<Handle>> {
        self.lists.remove(namespace)
    }

    /// Known namespaces, including ones whose list has been emptied by
    /// removals but not cleared.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }
}
