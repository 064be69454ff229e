#![cfg(test)]

// Property tests for ActionDictionary kept inside the crate so they can check
// the cross-index invariants of the private store after every operation.

use crate::config::{AllocationStrategy, DictionaryConfig};
use crate::dictionary::{ActionDictionary, RemoveActions};
use crate::error::RegistryError;
use crate::ActionValue;
use indexmap::IndexMap;
use proptest::prelude::*;
use std::collections::HashSet;

const NAMESPACES: [Option<&str>; 4] = [None, Some(""), Some("x"), Some("y")];

// Operations index into small pools so shrinking converges on short names.
#[derive(Clone, Debug)]
enum Op {
    Add(usize, Vec<String>),
    RemoveKeys(usize, Vec<String>),
    RemoveValues(usize, Vec<usize>, Vec<ActionValue>),
    RemoveUnscoped(Vec<usize>),
    Clear(Option<usize>),
}

fn arb_key() -> impl Strategy<Value = String> {
    "[a-d]{0,2}"
}

fn arb_op() -> impl Strategy<Value = Op> {
    let ns = 0..NAMESPACES.len();
    prop_oneof![
        4 => (ns.clone(), proptest::collection::vec(arb_key(), 1..4)).prop_map(|(n, k)| Op::Add(n, k)),
        2 => (ns.clone(), proptest::collection::vec(arb_key(), 0..3)).prop_map(|(n, k)| Op::RemoveKeys(n, k)),
        2 => (
            ns.clone(),
            proptest::collection::vec(0usize..64, 0..3),
            proptest::collection::vec(-5i64..5, 0..2),
        )
            .prop_map(|(n, picks, raw)| Op::RemoveValues(n, picks, raw)),
        1 => proptest::collection::vec(0usize..64, 0..3).prop_map(Op::RemoveUnscoped),
        1 => proptest::option::of(ns).prop_map(Op::Clear),
    ]
}

fn scope(ns: Option<&str>) -> Option<&str> {
    ns.filter(|n| !n.is_empty())
}

fn composite(ns: Option<&str>, raw: &str) -> String {
    format!("{}/{}", scope(ns).unwrap_or(""), raw)
}

/// Reference model: composite key -> (value, namespace), insertion ordered.
#[derive(Default)]
struct Model {
    entries: IndexMap<String, (ActionValue, Option<String>)>,
}

impl Model {
    fn remove(&mut self, key: &str) {
        self.entries.shift_remove(key);
    }

    fn key_of(&self, value: ActionValue) -> Option<String> {
        self.entries
            .iter()
            .find(|(_, (v, _))| *v == value)
            .map(|(k, _)| k.clone())
    }
}

fn run(strategy: AllocationStrategy, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut sut = ActionDictionary::with_config(DictionaryConfig::default().with_allocation(strategy));
    let mut model = Model::default();
    // Every value ever handed out, including removed ones.
    let mut seen: Vec<ActionValue> = Vec::new();

    for op in ops {
        match op {
            Op::Add(n, keys) => {
                let ns = NAMESPACES[n];
                let res = sut.add_actions(&keys, ns);
                let mut expected_ok = true;
                let mut committed = Vec::new();
                for raw in &keys {
                    let ck = composite(ns, raw);
                    if raw.is_empty() || model.entries.contains_key(&ck) {
                        expected_ok = false;
                        break;
                    }
                    // The value is whatever the dictionary recorded.
                    match sut.get_action_values([raw], ns)[0] {
                        Some(v) => {
                            model.entries.insert(ck, (v, scope(ns).map(str::to_owned)));
                            committed.push(v);
                        }
                        None => {
                            expected_ok = false;
                            break;
                        }
                    }
                }
                match res {
                    Ok(values) => {
                        prop_assert!(expected_ok);
                        prop_assert_eq!(values, committed.clone());
                    }
                    Err(RegistryError::EmptyKey) | Err(RegistryError::DuplicateKey { .. }) => {
                        prop_assert!(!expected_ok);
                    }
                    Err(RegistryError::ValueCollision { .. }) => {
                        prop_assert_eq!(strategy, AllocationStrategy::Hashed);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                }
                seen.extend(committed);
            }
            Op::RemoveKeys(n, keys) => {
                let ns = NAMESPACES[n];
                for raw in keys.iter().filter(|k| !k.is_empty()) {
                    model.remove(&composite(ns, raw));
                }
                sut.remove_actions(RemoveActions {
                    namespace: ns.map(str::to_owned),
                    actions: Vec::new(),
                    keys,
                });
            }
            Op::RemoveValues(n, picks, raw) => {
                let ns = NAMESPACES[n];
                let mut actions: Vec<ActionValue> = picks
                    .iter()
                    .filter_map(|&i| seen.get(i % seen.len().max(1)).copied())
                    .collect();
                actions.extend(raw);
                for &v in actions.iter().filter(|&&v| v > 0) {
                    if let Some(k) = model.key_of(v) {
                        let entry_ns = model.entries[&k].1.clone();
                        // No namespace reaches everything; an empty one only
                        // the default namespace.
                        if ns.is_none() || entry_ns.as_deref() == scope(ns) {
                            model.remove(&k);
                        }
                    }
                }
                let mut params = RemoveActions::new().actions(actions);
                params.namespace = ns.map(str::to_owned);
                sut.remove_actions(params);
            }
            Op::RemoveUnscoped(picks) => {
                let actions: Vec<ActionValue> = picks
                    .iter()
                    .filter_map(|&i| seen.get(i % seen.len().max(1)).copied())
                    .collect();
                for &v in actions.iter().filter(|&&v| v > 0) {
                    if let Some(k) = model.key_of(v) {
                        model.remove(&k);
                    }
                }
                sut.remove_actions(RemoveActions::new().actions(actions));
            }
            Op::Clear(n) => match n.and_then(|i| NAMESPACES[i]) {
                None => {
                    model.entries.clear();
                    sut.clear_actions(None);
                }
                Some(ns) => {
                    // An empty namespace names no partition; nothing matches.
                    model.entries.retain(|_, (_, entry_ns)| entry_ns.as_deref() != Some(ns));
                    sut.clear_actions(Some(ns));
                }
            },
        }

        // Post-conditions after each op
        if let Err(msg) = sut.check_invariants() {
            prop_assert!(false, "invariant violated: {}", msg);
        }
        // IndexMap equality ignores order, so compare as sequences.
        let expected: Vec<(String, ActionValue)> =
            model.entries.iter().map(|(k, (v, _))| (k.clone(), *v)).collect();
        let actual: Vec<(String, ActionValue)> = sut.get_dictionary(None).into_iter().collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(sut.len(), model.entries.len());

        let values: HashSet<ActionValue> = model.entries.values().map(|(v, _)| *v).collect();
        prop_assert_eq!(values.len(), model.entries.len(), "values must be unique");

        for ns in ["x", "y"] {
            let scoped: Vec<&String> = model
                .entries
                .iter()
                .filter(|(_, (_, n))| n.as_deref() == Some(ns))
                .map(|(k, _)| k)
                .collect();
            let dict = sut.get_dictionary(Some(ns));
            prop_assert_eq!(dict.keys().collect::<Vec<_>>(), scoped);
        }

        for (k, (v, ns)) in &model.entries {
            let keys = sut.get_action_keys([*v], ns.as_deref());
            prop_assert_eq!(keys[0].as_ref().map(|c| c.as_str()), Some(k.as_str()));
            let raw = keys[0].as_ref().map(|c| c.raw_key().to_owned()).unwrap_or_default();
            prop_assert_eq!(sut.get_action_values([raw], ns.as_deref()), vec![Some(*v)]);
        }
    }
    Ok(())
}

// Property: state-machine equivalence against an insertion-ordered model.
// Invariants exercised across random operation sequences:
// - Adds fail exactly on empty or already registered keys; earlier keys of a
//   failing call stay registered.
// - Removal by key or value honors namespace scoping and the validator.
// - Clearing a namespace leaves every other namespace intact.
// - Forward, reverse and namespace indices agree after every operation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_hashed(ops in proptest::collection::vec(arb_op(), 1..60)) {
        run(AllocationStrategy::Hashed, ops)?;
    }

    #[test]
    fn prop_state_machine_sequential(ops in proptest::collection::vec(arb_op(), 1..60)) {
        run(AllocationStrategy::Sequential, ops)?;
    }
}
