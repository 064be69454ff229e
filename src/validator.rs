//! Action and payload validators.
//!
//! Each dictionary holds two validator slots. A slot is either the built-in
//! default or a caller-supplied predicate; installing `None` puts the default
//! back.

use crate::ActionValue;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub type ActionCheck = dyn Fn(ActionValue) -> bool + Send + Sync;
pub type PayloadCheck = dyn Fn(&ActionPayload) -> bool + Send + Sync;

/// An action dispatched to the automaton together with its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPayload {
    pub action: ActionValue,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ActionPayload {
    pub fn new(action: ActionValue, payload: serde_json::Value) -> Self {
        Self { action, payload }
    }
}

/// Default action check: the value is a positive integer.
pub fn is_positive_action(value: ActionValue) -> bool {
    value > 0
}

/// Default payload shape check: the payload is a JSON object or array.
/// `null` and scalars are rejected.
pub fn is_structured_payload(payload: &serde_json::Value) -> bool {
    payload.is_object() || payload.is_array()
}

/// One validator slot.
pub enum Validator<F: ?Sized> {
    Default,
    Custom(Arc<F>),
}

impl<F: ?Sized> Validator<F> {
    pub fn is_default(&self) -> bool {
        matches!(self, Validator::Default)
    }
}

impl<F: ?Sized> Default for Validator<F> {
    fn default() -> Self {
        Validator::Default
    }
}

impl<F: ?Sized> Clone for Validator<F> {
    fn clone(&self) -> Self {
        match self {
            Validator::Default => Validator::Default,
            Validator::Custom(f) => Validator::Custom(Arc::clone(f)),
        }
    }
}

impl<F: ?Sized> fmt::Debug for Validator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Default => f.write_str("Validator::Default"),
            Validator::Custom(_) => f.write_str("Validator::Custom(..)"),
        }
    }
}

/// Recover an action check from a type-erased value. Accepts
/// `Arc<ActionCheck>`, `Box<ActionCheck>` and plain `fn(ActionValue) -> bool`.
pub(crate) fn downcast_action_check(value: Box<dyn Any + Send>) -> Option<Arc<ActionCheck>> {
    let value = match value.downcast::<Arc<ActionCheck>>() {
        Ok(f) => return Some(*f),
        Err(v) => v,
    };
    let value = match value.downcast::<Box<ActionCheck>>() {
        Ok(f) => return Some(Arc::from(*f)),
        Err(v) => v,
    };
    let f: Arc<ActionCheck> = Arc::new(*value.downcast::<fn(ActionValue) -> bool>().ok()?);
    Some(f)
}

/// Recover a payload check from a type-erased value. Accepts
/// `Arc<PayloadCheck>`, `Box<PayloadCheck>` and plain
/// `fn(&ActionPayload) -> bool`.
pub(crate) fn downcast_payload_check(value: Box<dyn Any + Send>) -> Option<Arc<PayloadCheck>> {
    let value = match value.downcast::<Arc<PayloadCheck>>() {
        Ok(f) => return Some(*f),
        Err(v) => v,
    };
    let value = match value.downcast::<Box<PayloadCheck>>() {
        Ok(f) => return Some(Arc::from(*f)),
        Err(v) => v,
    };
    let f: Arc<PayloadCheck> = Arc::new(*value.downcast::<fn(&ActionPayload) -> bool>().ok()?);
    Some(f)
}
