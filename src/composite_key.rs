//! Composite keys: `namespace + "/" + raw_key`.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};

/// Separator between the namespace part and the raw key.
pub const SEPARATOR: char = '/';

/// The unique lookup key of one dictionary entry.
///
/// Both parts may themselves contain `/`, so the position of the separator is
/// recorded at construction instead of being recovered by parsing. Equality
/// and hashing only look at the full string, which keeps `Borrow<str>`
/// lookups consistent.
#[derive(Clone)]
pub struct CompositeKey {
    full: String,
    split: usize,
}

impl CompositeKey {
    /// Build the key for `raw_key` under `namespace`. Returns `None` for an
    /// empty raw key. An empty namespace is the default namespace.
    pub fn new(raw_key: &str, namespace: Option<&str>) -> Option<Self> {
        if raw_key.is_empty() {
            return None;
        }
        let ns = namespace.unwrap_or("");
        let mut full = String::with_capacity(ns.len() + 1 + raw_key.len());
        full.push_str(ns);
        full.push(SEPARATOR);
        full.push_str(raw_key);
        Some(Self {
            full,
            split: ns.len(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }

    pub fn raw_key(&self) -> &str {
        &self.full[self.split + SEPARATOR.len_utf8()..]
    }

    /// The namespace part, `None` for the default namespace.
    pub fn namespace(&self) -> Option<&str> {
        match &self.full[..self.split] {
            "" => None,
            ns => Some(ns),
        }
    }
}

impl PartialEq for CompositeKey {
    fn eq(&self, other: &Self) -> bool {
        self.full == other.full
    }
}

impl Eq for CompositeKey {}

impl PartialEq<str> for CompositeKey {
    fn eq(&self, other: &str) -> bool {
        self.full == other
    }
}

impl PartialEq<&str> for CompositeKey {
    fn eq(&self, other: &&str) -> bool {
        self.full == *other
    }
}

impl Hash for CompositeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full.hash(state);
    }
}

impl Borrow<str> for CompositeKey {
    fn borrow(&self) -> &str {
        &self.full
    }
}

impl AsRef<str> for CompositeKey {
    fn as_ref(&self) -> &str {
        &self.full
    }
}

impl fmt::Debug for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.full, f)
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl From<CompositeKey> for String {
    fn from(k: CompositeKey) -> Self {
        k.full
    }
}
