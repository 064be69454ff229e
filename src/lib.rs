//! action-dictionary: a namespaced, in-memory registry that assigns stable
//! numeric values to string keys, with lookup in both directions.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep three indices (key -> value, namespace -> keys,
//!   value -> key) consistent under every mutation, by construction rather
//!   than by convention.
//! - Layers:
//!   - EntryTable: slot storage with generational handles, indexed by
//!     composite key and by value. Both directions resolve to the same slot,
//!     so the forward and reverse maps cannot drift apart.
//!   - NamespaceIndex: insertion-ordered handle lists per namespace.
//!   - IndexedStore: owns both and funnels every write through one `apply`
//!     routine, inside a debug-only critical-section guard.
//!   - ActionDictionary: public API; builds composite keys, assigns values,
//!     applies namespace scoping and validators.
//!   - SharedActionDictionary: the same API behind a mutex.
//!
//! Keys
//! - A composite key is `namespace + "/" + raw_key`; the default namespace
//!   is the empty string. An empty namespace given by a caller means the
//!   default namespace.
//! - Raw keys must be non-empty. The same raw key may live in several
//!   namespaces.
//!
//! Value assignment
//! - Hashed (default): magnitude of the 31-multiplier polynomial hash of the
//!   composite key over UTF-16 units, wrapped to 32 bits. On collision, add
//!   once the same hash of a JSON snapshot of the store in insertion order.
//!   Deterministic: the same key against the same store state always gets
//!   the same value, so clearing and re-adding reproduces earlier values.
//!   Not strictly injective; a salted value that still collides is reported
//!   as `RegistryError::ValueCollision`.
//! - Sequential: `1, 2, 3, ...`, strictly injective, rewound only by a full
//!   clear.
//!
//! Failure model
//! - Adding keys and the type-erased validator setters are the only fallible
//!   operations; each failure aborts before the failing key mutates anything.
//! - Lookups and removals are total: unknown input yields `None`, empty
//!   results or a no-op.
//!
//! Concurrency
//! - `ActionDictionary` is `Send` but not `Sync` and has no internal locking.
//!   Share it through `SharedActionDictionary`.

mod assigner;
mod composite_key;
mod config;
mod dictionary;
mod dictionary_proptest;
pub mod entry_table;
mod error;
mod namespace_index;
mod reentrancy;
mod shared;
mod store;
pub mod validator;

/// Value assigned to an action key.
pub type ActionValue = i64;

// Public surface
pub use assigner::{hash_value, string_hash};
pub use composite_key::CompositeKey;
pub use config::{AllocationStrategy, DictionaryConfig};
pub use dictionary::{ActionDictionary, RemoveActions};
pub use error::{RegistryError, Result, ValidatorSlot};
pub use shared::SharedActionDictionary;
pub use validator::{ActionCheck, ActionPayload, PayloadCheck, Validator};
