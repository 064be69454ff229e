//! SharedActionDictionary: a cloneable, lock-protected dictionary handle.
//!
//! `ActionDictionary` has no internal locking. This wrapper turns every
//! public operation into one critical section under a `parking_lot::Mutex`,
//! so several threads can drive the same dictionary.

use crate::composite_key::CompositeKey;
use crate::config::DictionaryConfig;
use crate::dictionary::{ActionDictionary, RemoveActions};
use crate::error::Result;
use crate::validator::ActionPayload;
use crate::ActionValue;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct SharedActionDictionary {
    inner: Arc<Mutex<ActionDictionary>>,
}

impl SharedActionDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DictionaryConfig) -> Self {
        Self::from(ActionDictionary::with_config(config))
    }

    /// Run `f` with exclusive access, for call sequences that must not
    /// interleave with other threads.
    pub fn with<R>(&self, f: impl FnOnce(&mut ActionDictionary) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn add_actions<I, K>(&self, keys: I, namespace: Option<&str>) -> Result<Vec<ActionValue>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.inner.lock().add_actions(keys, namespace)
    }

    pub fn remove_actions(&self, params: RemoveActions) -> &Self {
        self.inner.lock().remove_actions(params);
        self
    }

    pub fn clear_actions(&self, namespace: Option<&str>) -> &Self {
        self.inner.lock().clear_actions(namespace);
        self
    }

    pub fn get_dictionary(&self, namespace: Option<&str>) -> IndexMap<String, ActionValue> {
        self.inner.lock().get_dictionary(namespace)
    }

    pub fn get_action_values<I, K>(&self, keys: I, namespace: Option<&str>) -> Vec<Option<ActionValue>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.inner.lock().get_action_values(keys, namespace)
    }

    pub fn get_action_keys<I>(&self, actions: I, namespace: Option<&str>) -> Vec<Option<CompositeKey>>
    where
        I: IntoIterator<Item = ActionValue>,
    {
        self.inner.lock().get_action_keys(actions, namespace)
    }

    pub fn validate_action(&self, value: ActionValue) -> bool {
        self.inner.lock().validate_action(value)
    }

    pub fn validate_action_payload(&self, payload: &ActionPayload) -> bool {
        self.inner.lock().validate_action_payload(payload)
    }
}

impl From<ActionDictionary> for SharedActionDictionary {
    fn from(dictionary: ActionDictionary) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dictionary)),
        }
    }
}
