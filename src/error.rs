//! Errors reported by the dictionary API.

use crate::ActionValue;

pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

/// Misuse of the dictionary. Every variant aborts the failing call before it
/// mutates anything.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// An add was given an empty raw key.
    #[error("action key is empty")]
    EmptyKey,

    /// The composite key is already registered.
    #[error("action key {key:?} is taken within {}", describe_namespace(.namespace.as_deref()))]
    DuplicateKey {
        key: String,
        namespace: Option<String>,
    },

    /// A type-erased validator was not a validator closure.
    #[error("passed {slot} validator is not a function")]
    InvalidValidator { slot: ValidatorSlot },

    /// The salted value still collided with an existing entry.
    #[error("value {value} for action key {key:?} collides with an existing entry")]
    ValueCollision { key: String, value: ActionValue },
}

/// Which validator a setter targets.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ValidatorSlot {
    Action,
    ActionPayload,
}

impl std::fmt::Display for ValidatorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidatorSlot::Action => f.write_str("action"),
            ValidatorSlot::ActionPayload => f.write_str("action payload"),
        }
    }
}

fn describe_namespace(namespace: Option<&str>) -> String {
    match namespace {
        None => "default namespace".to_owned(),
        Some(ns) => format!("namespace {ns:?}"),
    }
}
