//! Value assignment for new composite keys.
//!
//! The hashed allocator computes the 31-multiplier polynomial hash over the
//! UTF-16 code units of the composite key, wrapped to `i32`, and takes its
//! magnitude. When that value is already assigned it adds, once, the
//! magnitude of the same hash over a JSON snapshot of the whole store
//! (`{"<composite key>":<value>,...}` in insertion order). A salted value may
//! still collide; the caller surfaces that as an error rather than retrying.

use crate::composite_key::CompositeKey;
use crate::config::AllocationStrategy;
use crate::entry_table::EntryTable;
use crate::ActionValue;
use core::hash::BuildHasher;
use serde_json::{Map, Value};

/// Rolling polynomial hash, `h = h * 31 + unit` with 32-bit wrap-around.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Magnitude of `string_hash`, widened first so `i32::MIN` stays positive.
pub fn hash_value(s: &str) -> ActionValue {
    i64::from(string_hash(s)).abs()
}

/// The store as one compact JSON object, `{"<composite key>":<value>,...}`
/// in insertion order.
pub fn snapshot_json<S>(table: &EntryTable<S>) -> String
where
    S: BuildHasher + Clone + Default,
{
    let map: Map<String, Value> = table
        .ordered()
        .into_iter()
        .map(|(_, e)| (e.key().to_string(), Value::from(e.value())))
        .collect();
    Value::Object(map).to_string()
}

#[derive(Debug)]
pub enum Allocator {
    Hashed,
    Sequential { next: ActionValue },
}

impl Allocator {
    pub fn new(strategy: AllocationStrategy) -> Self {
        match strategy {
            AllocationStrategy::Hashed => Allocator::Hashed,
            AllocationStrategy::Sequential => Allocator::Sequential { next: 1 },
        }
    }

    /// Pick the value for `key` against the current table contents. The key
    /// itself must not be in the table yet.
    pub fn assign<S>(&mut self, key: &CompositeKey, table: &EntryTable<S>) -> ActionValue
    where
        S: BuildHasher + Clone + Default,
    {
        match self {
            Allocator::Hashed => {
                let value = hash_value(key.as_str());
                if !table.contains_value(value) {
                    return value;
                }
                let salt = hash_value(&snapshot_json(table));
                tracing::trace!(key = %key, value, salt, "value taken, salting with store snapshot");
                value + salt
            }
            Allocator::Sequential { next } => {
                let value = *next;
                *next += 1;
                value
            }
        }
    }

    /// Forget allocation history. Called when the whole store is reset.
    pub fn reset(&mut self) {
        if let Allocator::Sequential { next } = self {
            *next = 1;
        }
    }
}
