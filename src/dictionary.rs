//! ActionDictionary: the public registry of action keys and their values.

use crate::assigner::Allocator;
use crate::composite_key::CompositeKey;
use crate::config::DictionaryConfig;
use crate::entry_table::{Handle, InsertError};
use crate::error::{RegistryError, Result, ValidatorSlot};
use crate::store::{IndexedStore, Mutation, Outcome};
use crate::validator::{
    downcast_action_check, downcast_payload_check, is_positive_action, is_structured_payload,
    ActionCheck, ActionPayload, PayloadCheck, Validator,
};
use crate::ActionValue;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Empty namespaces address the default namespace.
fn scope(namespace: Option<&str>) -> Option<&str> {
    namespace.filter(|ns| !ns.is_empty())
}

/// What `remove_actions` should delete.
///
/// `actions` are values; only those accepted by the current action validator
/// are considered. `keys` are raw keys resolved within `namespace`. When
/// `namespace` is set, both are further restricted to entries of that
/// namespace; an empty namespace restricts them to the default namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveActions {
    pub namespace: Option<String>,
    pub actions: Vec<ActionValue>,
    pub keys: Vec<String>,
}

impl RemoveActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn actions(mut self, actions: impl IntoIterator<Item = ActionValue>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn keys<K: Into<String>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }
}

/// A namespaced registry assigning stable numeric values to string keys.
///
/// Values are unique across the whole dictionary. Each entry can be reached
/// by composite key (`namespace/raw_key`), by value, or through its
/// namespace. Only `add_actions` and the fallible validator setters report
/// errors; lookups and removals degrade to `None`, empty results or no-ops.
pub struct ActionDictionary {
    store: IndexedStore,
    allocator: Allocator,
    config: DictionaryConfig,
    action_validator: Validator<ActionCheck>,
    payload_validator: Validator<PayloadCheck>,
}

impl ActionDictionary {
    pub fn new() -> Self {
        Self::with_config(DictionaryConfig::default())
    }

    pub fn with_config(config: DictionaryConfig) -> Self {
        Self {
            store: IndexedStore::new(),
            allocator: Allocator::new(config.allocation),
            config,
            action_validator: Validator::Default,
            payload_validator: Validator::Default,
        }
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Namespaces that currently hold at least one key, in no fixed order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.store
            .namespaces()
            .filter(|ns| !self.store.namespace_handles(ns).is_empty())
    }

    pub fn contains_key(&self, key: &str, namespace: Option<&str>) -> bool {
        self.find(key, namespace).is_some()
    }

    fn find(&self, key: &str, namespace: Option<&str>) -> Option<Handle> {
        let key = CompositeKey::new(key, scope(namespace))?;
        self.store.find_key(key.as_str())
    }

    /// Whether the entry behind `handle` falls within `namespace` for the
    /// reverse operations. `None` accepts any namespace and `Some("")` only
    /// the default one. A named namespace must also still list the entry.
    fn in_scope(&self, handle: Handle, namespace: Option<&str>) -> bool {
        let Some(entry) = self.store.get(handle) else {
            return false;
        };
        match namespace {
            None => true,
            Some("") => entry.namespace().is_none(),
            Some(ns) => entry.namespace() == Some(ns) && self.store.in_namespace(ns, handle),
        }
    }

    /// Register `keys` under `namespace` and return their values in order.
    ///
    /// Keys are added one at a time. The first failing key aborts the call;
    /// keys before it stay registered.
    pub fn add_actions<I, K>(&mut self, keys: I, namespace: Option<&str>) -> Result<Vec<ActionValue>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let namespace = scope(namespace);
        let values = keys
            .into_iter()
            .map(|k| self.add_action(k.as_ref(), namespace))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = values.len(), namespace, "actions added");
        Ok(values)
    }

    fn add_action(&mut self, raw: &str, namespace: Option<&str>) -> Result<ActionValue> {
        let key = CompositeKey::new(raw, namespace).ok_or(RegistryError::EmptyKey)?;
        if self.store.find_key(key.as_str()).is_some() {
            return Err(RegistryError::DuplicateKey {
                key: raw.to_owned(),
                namespace: namespace.map(str::to_owned),
            });
        }
        let value = self.allocator.assign(&key, self.store.table());
        tracing::trace!(key = %key, value, "assigning action value");
        match self.store.apply(Mutation::Insert { key, value }) {
            Ok(_) => Ok(value),
            Err(InsertError::DuplicateKey) => Err(RegistryError::DuplicateKey {
                key: raw.to_owned(),
                namespace: namespace.map(str::to_owned),
            }),
            Err(InsertError::DuplicateValue) => {
                tracing::warn!(key = raw, namespace, value, "salted action value still collides");
                Err(RegistryError::ValueCollision {
                    key: raw.to_owned(),
                    value,
                })
            }
        }
    }

    /// Delete the entries named by `params`. Unknown keys, unknown values and
    /// values rejected by the action validator are skipped.
    pub fn remove_actions(&mut self, params: RemoveActions) -> &mut Self {
        let namespace = params.namespace.as_deref();

        let by_value = params
            .actions
            .iter()
            .copied()
            .filter(|&v| self.validate_action(v))
            .filter_map(|v| self.store.find_value(v));
        let by_key = params.keys.iter().filter_map(|k| self.find(k, namespace));
        let candidates: Vec<Handle> = by_value
            .chain(by_key)
            .filter(|&h| self.in_scope(h, namespace))
            .collect();

        let mut removed = 0;
        for handle in candidates {
            if let Ok(Outcome::Deleted(n)) = self.store.apply(Mutation::Delete(handle)) {
                removed += n;
            }
        }
        tracing::debug!(removed, namespace, "actions removed");
        self
    }

    /// With no namespace, drop every entry and namespace. With a namespace,
    /// drop every entry listed under it and the namespace itself.
    pub fn clear_actions(&mut self, namespace: Option<&str>) -> &mut Self {
        let mutation = match namespace {
            None => Mutation::Reset,
            Some(ns) => Mutation::ClearNamespace(ns),
        };
        let removed = match self.store.apply(mutation) {
            Ok(Outcome::Deleted(n)) => n,
            _ => 0,
        };
        if namespace.is_none() {
            self.allocator.reset();
        }
        tracing::debug!(removed, namespace, "actions cleared");
        self
    }

    /// Composite key to value, in insertion order. Without a namespace this
    /// is the whole dictionary; with one it is that namespace's entries, or
    /// empty for an unknown namespace.
    pub fn get_dictionary(&self, namespace: Option<&str>) -> IndexMap<String, ActionValue> {
        match scope(namespace) {
            None => self
                .store
                .table()
                .ordered()
                .into_iter()
                .map(|(_, e)| (e.key().to_string(), e.value()))
                .collect(),
            Some(ns) => self
                .store
                .namespace_handles(ns)
                .iter()
                .filter_map(|&h| self.store.get(h))
                .map(|e| (e.key().to_string(), e.value()))
                .collect(),
        }
    }

    /// Values for `keys` within `namespace`; `None` where a key is absent.
    pub fn get_action_values<I, K>(&self, keys: I, namespace: Option<&str>) -> Vec<Option<ActionValue>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .map(|k| {
                self.find(k.as_ref(), namespace)
                    .and_then(|h| self.store.get(h))
                    .map(|e| e.value())
            })
            .collect()
    }

    /// Composite keys for `actions`. With a namespace, a value only resolves
    /// when its entry belongs to that namespace and is still listed in it;
    /// an empty namespace resolves only default-namespace entries.
    pub fn get_action_keys<I>(&self, actions: I, namespace: Option<&str>) -> Vec<Option<CompositeKey>>
    where
        I: IntoIterator<Item = ActionValue>,
    {
        actions
            .into_iter()
            .map(|v| {
                let handle = self.store.find_value(v)?;
                if !self.in_scope(handle, namespace) {
                    return None;
                }
                self.store.get(handle).map(|e| e.key().clone())
            })
            .collect()
    }

    pub fn action_validator(&self) -> &Validator<ActionCheck> {
        &self.action_validator
    }

    pub fn action_payload_validator(&self) -> &Validator<PayloadCheck> {
        &self.payload_validator
    }

    pub fn validate_action(&self, value: ActionValue) -> bool {
        match &self.action_validator {
            Validator::Default => is_positive_action(value),
            Validator::Custom(f) => f(value),
        }
    }

    pub fn validate_action_payload(&self, payload: &ActionPayload) -> bool {
        match &self.payload_validator {
            Validator::Default => {
                self.validate_action(payload.action) && is_structured_payload(&payload.payload)
            }
            Validator::Custom(f) => f(payload),
        }
    }

    pub fn set_action_validator<F>(&mut self, validator: F) -> &mut Self
    where
        F: Fn(ActionValue) -> bool + Send + Sync + 'static,
    {
        self.replace_action_validator(Validator::Custom(Arc::new(validator)))
    }

    /// Install a validator slot as is; `Validator::Default` restores the
    /// positive-integer check.
    pub fn replace_action_validator(&mut self, validator: Validator<ActionCheck>) -> &mut Self {
        self.action_validator = validator;
        self
    }

    pub fn reset_action_validator(&mut self) -> &mut Self {
        self.replace_action_validator(Validator::Default)
    }

    /// Install a type-erased action validator; `None` restores the default.
    /// Fails, leaving the current validator installed, when the value is not
    /// an `Arc<ActionCheck>`, `Box<ActionCheck>` or `fn(ActionValue) -> bool`.
    pub fn try_set_action_validator(&mut self, validator: Option<Box<dyn Any + Send>>) -> Result<&mut Self> {
        let slot = match validator {
            None => Validator::Default,
            Some(v) => Validator::Custom(downcast_action_check(v).ok_or(
                RegistryError::InvalidValidator {
                    slot: ValidatorSlot::Action,
                },
            )?),
        };
        Ok(self.replace_action_validator(slot))
    }

    pub fn set_action_payload_validator<F>(&mut self, validator: F) -> &mut Self
    where
        F: Fn(&ActionPayload) -> bool + Send + Sync + 'static,
    {
        self.replace_action_payload_validator(Validator::Custom(Arc::new(validator)))
    }

    pub fn replace_action_payload_validator(&mut self, validator: Validator<PayloadCheck>) -> &mut Self {
        self.payload_validator = validator;
        self
    }

    pub fn reset_action_payload_validator(&mut self) -> &mut Self {
        self.replace_action_payload_validator(Validator::Default)
    }

    /// Type-erased counterpart of `set_action_payload_validator`; see
    /// `try_set_action_validator`.
    pub fn try_set_action_payload_validator(
        &mut self,
        validator: Option<Box<dyn Any + Send>>,
    ) -> Result<&mut Self> {
        let slot = match validator {
            None => Validator::Default,
            Some(v) => Validator::Custom(downcast_payload_check(v).ok_or(
                RegistryError::InvalidValidator {
                    slot: ValidatorSlot::ActionPayload,
                },
            )?),
        };
        Ok(self.replace_action_payload_validator(slot))
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        self.store.check_invariants()
    }
}

impl Default for ActionDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDictionary")
            .field("len", &self.len())
            .field("config", &self.config)
            .field("action_validator", &self.action_validator)
            .field("payload_validator", &self.payload_validator)
            .finish()
    }
}
