use action_dictionary::{
    hash_value, ActionDictionary, ActionPayload, AllocationStrategy, DictionaryConfig, RegistryError,
    RemoveActions,
};
use serde_json::json;

fn pairs(d: &ActionDictionary, ns: Option<&str>) -> Vec<(String, i64)> {
    d.get_dictionary(ns).into_iter().collect()
}

#[test]
fn add_then_remove_in_default_namespace() {
    let mut d = ActionDictionary::new();
    let v = d.add_actions(["a", "b", "c"], None).expect("add ok");
    assert_eq!(v.len(), 3);
    assert!(v.iter().all(|&x| x > 0));
    assert!(v[0] != v[1] && v[1] != v[2] && v[0] != v[2]);
    assert_eq!(
        pairs(&d, None),
        vec![("/a".to_string(), v[0]), ("/b".to_string(), v[1]), ("/c".to_string(), v[2])]
    );

    d.remove_actions(RemoveActions::new().keys(["b"]));
    assert_eq!(
        pairs(&d, None),
        vec![("/a".to_string(), v[0]), ("/c".to_string(), v[2])]
    );
}

#[test]
fn same_raw_key_in_two_namespaces() {
    let mut d = ActionDictionary::new();
    let scoped = d.add_actions(["a"], Some("ns")).unwrap()[0];
    let dflt = d.add_actions(["a"], None).unwrap()[0];
    assert_ne!(scoped, dflt);
    assert_eq!(d.get_action_values(["a"], Some("ns")), vec![Some(scoped)]);
    assert_eq!(d.get_action_values(["a"], None), vec![Some(dflt)]);

    let keys = d.get_action_keys([scoped, dflt], None);
    assert_eq!(keys[0].as_ref().map(|k| k.as_str()), Some("ns/a"));
    assert_eq!(keys[1].as_ref().map(|k| k.as_str()), Some("/a"));
    assert_eq!(keys[0].as_ref().and_then(|k| k.namespace()), Some("ns"));
    assert_eq!(keys[1].as_ref().and_then(|k| k.namespace()), None);
}

#[test]
fn values_follow_composite_key_hash() {
    let mut d = ActionDictionary::new();
    let v = d.add_actions(["open", "close"], Some("door")).unwrap();
    assert_eq!(v, vec![hash_value("door/open"), hash_value("door/close")]);
}

#[test]
fn clear_and_readd_reproduces_values() {
    for strategy in [AllocationStrategy::Hashed, AllocationStrategy::Sequential] {
        let mut d = ActionDictionary::with_config(DictionaryConfig::default().with_allocation(strategy));
        let first = d.add_actions(["a", "b", "c"], Some("ns")).unwrap();
        d.clear_actions(None);
        assert!(d.is_empty());
        let second = d.add_actions(["a", "b", "c"], Some("ns")).unwrap();
        assert_eq!(first, second, "{strategy:?}");
    }
}

#[test]
fn namespace_isolation() {
    let mut d = ActionDictionary::new();
    let v = d.add_actions(["k"], Some("A")).unwrap()[0];

    assert_eq!(d.get_action_values(["k"], Some("B")), vec![None]);
    assert_eq!(d.get_action_values(["k"], None), vec![None]);
    assert_eq!(d.get_action_keys([v], Some("B")), vec![None]);
    assert!(d.get_dictionary(Some("B")).is_empty());

    // A key-based removal scoped elsewhere does not touch it.
    d.remove_actions(RemoveActions::new().namespace("B").keys(["k"]));
    d.remove_actions(RemoveActions::new().keys(["k"]));
    // Neither does a value-based removal scoped to another namespace.
    d.remove_actions(RemoveActions::new().namespace("B").actions([v]));
    assert!(d.contains_key("k", Some("A")));
}

#[test]
fn default_namespace_scope_excludes_named_namespaces() {
    let mut d = ActionDictionary::new();
    let v = d.add_actions(["k"], Some("A")).unwrap()[0];

    // An empty namespace is the default namespace, not "any namespace".
    assert_eq!(d.get_action_keys([v], Some("")), vec![None]);
    assert_eq!(d.get_action_values(["k"], Some("")), vec![None]);
    d.remove_actions(RemoveActions::new().namespace("").actions([v]));
    d.remove_actions(RemoveActions::new().namespace("").keys(["k"]));
    assert!(d.contains_key("k", Some("A")));

    // Without a namespace, value lookups still reach every namespace.
    let keys = d.get_action_keys([v], None);
    assert_eq!(keys[0].as_ref().map(|k| k.as_str()), Some("A/k"));
}

#[test]
fn duplicate_rejection_leaves_store_unchanged() {
    let mut d = ActionDictionary::new();
    d.add_actions(["k"], Some("ns")).unwrap();
    let before = pairs(&d, None);

    let err = d.add_actions(["k"], Some("ns")).unwrap_err();
    match &err {
        RegistryError::DuplicateKey { key, namespace } => {
            assert_eq!(key, "k");
            assert_eq!(namespace.as_deref(), Some("ns"));
        }
        other => panic!("expected duplicate key, got {other:?}"),
    }
    assert!(err.to_string().contains("\"k\""));
    assert_eq!(pairs(&d, None), before);
}

#[test]
fn empty_key_is_rejected() {
    let mut d = ActionDictionary::new();
    assert!(matches!(d.add_actions([""], Some("ns")), Err(RegistryError::EmptyKey)));
    assert!(d.is_empty());
    assert_eq!(d.get_action_values([""], None), vec![None]);
}

#[test]
fn removal_completeness() {
    let mut d = ActionDictionary::new();
    let v = d.add_actions(["k", "other"], Some("ns")).unwrap();
    d.remove_actions(RemoveActions::new().namespace("ns").keys(["k"]));

    assert!(!d.get_dictionary(Some("ns")).contains_key("ns/k"));
    assert!(d.get_dictionary(Some("ns")).contains_key("ns/other"));
    assert_eq!(d.get_action_keys([v[0]], None), vec![None]);
    assert_eq!(d.get_action_values(["k"], Some("ns")), vec![None]);
}

#[test]
fn remove_by_value_and_key_together() {
    let mut d = ActionDictionary::new();
    let v = d.add_actions(["a", "b", "c"], Some("ns")).unwrap();
    d.remove_actions(
        RemoveActions::new()
            .namespace("ns")
            .actions([v[0], -1, 0, 12345])
            .keys(["c", "missing", ""]),
    );
    assert_eq!(pairs(&d, Some("ns")), vec![("ns/b".to_string(), v[1])]);

    // Repeating the same removal is a no-op.
    d.remove_actions(RemoveActions::new().namespace("ns").actions([v[0]]).keys(["c"]));
    assert_eq!(d.len(), 1);
}

#[test]
fn unscoped_value_removal_reaches_any_namespace() {
    let mut d = ActionDictionary::new();
    let x = d.add_actions(["a"], Some("x")).unwrap()[0];
    let y = d.add_actions(["a"], Some("y")).unwrap()[0];
    d.remove_actions(RemoveActions::new().actions([x, y]));
    assert!(d.is_empty());
    assert_eq!(d.namespaces().count(), 0);
}

#[test]
fn clear_one_namespace() {
    let mut d = ActionDictionary::new();
    d.add_actions(["a", "b"], Some("x")).unwrap();
    let y = d.add_actions(["a"], Some("y")).unwrap();
    let dflt = d.add_actions(["a"], None).unwrap();

    d.clear_actions(Some("x"));
    assert!(d.get_dictionary(Some("x")).is_empty());
    assert_eq!(d.get_action_values(["a"], Some("y")), vec![Some(y[0])]);
    assert_eq!(d.get_action_values(["a"], None), vec![Some(dflt[0])]);
    assert_eq!(d.namespaces().collect::<Vec<_>>(), vec!["y"]);

    // The cleared namespace can be repopulated.
    d.add_actions(["a"], Some("x")).unwrap();
    assert_eq!(d.len(), 3);
}

#[test]
fn clear_unknown_namespace_is_noop() {
    let mut d = ActionDictionary::new();
    d.add_actions(["a"], None).unwrap();
    d.clear_actions(Some("nope")).clear_actions(Some(""));
    assert_eq!(d.len(), 1);
}

#[test]
fn lookups_preserve_order_and_multiplicity() {
    let mut d = ActionDictionary::new();
    let v = d.add_actions(["a", "b"], None).unwrap();
    assert_eq!(
        d.get_action_values(["b", "zz", "a", "b"], None),
        vec![Some(v[1]), None, Some(v[0]), Some(v[1])]
    );
    let keys: Vec<Option<String>> = d
        .get_action_keys([v[0], 7, v[0]], None)
        .into_iter()
        .map(|k| k.map(|k| k.raw_key().to_owned()))
        .collect();
    assert_eq!(keys, vec![Some("a".to_string()), None, Some("a".to_string())]);
}

#[test]
fn custom_action_validator_controls_removal() {
    let mut d = ActionDictionary::new();
    let v = d.add_actions(["a", "b"], None).unwrap();
    let keep = v[1];
    d.set_action_validator(move |a| a != keep);
    d.remove_actions(RemoveActions::new().actions(v.clone()));
    assert_eq!(pairs(&d, None), vec![("/b".to_string(), v[1])]);

    // Removal by key bypasses the action validator.
    d.remove_actions(RemoveActions::new().keys(["b"]));
    assert!(d.is_empty());
}

#[test]
fn default_payload_validator() {
    let d = ActionDictionary::new();
    assert!(d.validate_action_payload(&ActionPayload::new(1, json!({}))));
    assert!(d.validate_action_payload(&ActionPayload::new(1, json!([1, 2]))));
    assert!(!d.validate_action_payload(&ActionPayload::new(1, json!("text"))));
    assert!(!d.validate_action_payload(&ActionPayload::new(1, json!(5))));
    assert!(!d.validate_action_payload(&ActionPayload::new(0, json!({}))));
}

#[test]
fn payload_record_deserializes() {
    let d = ActionDictionary::new();
    let p: ActionPayload = serde_json::from_str(r#"{"action": 9, "payload": {"to": "b"}}"#).unwrap();
    assert!(d.validate_action_payload(&p));
    let bare: ActionPayload = serde_json::from_str(r#"{"action": 9}"#).unwrap();
    assert!(bare.payload.is_null());
    assert!(!d.validate_action_payload(&bare));
}

#[test]
fn type_erased_validators() {
    let mut d = ActionDictionary::new();
    fn even(a: i64) -> bool {
        a % 2 == 0
    }
    d.try_set_action_validator(Some(Box::new(even as fn(i64) -> bool)))
        .unwrap();
    assert!(d.validate_action(-4));
    assert!(!d.validate_action(3));

    let err = d.try_set_action_validator(Some(Box::new(42i32))).unwrap_err();
    assert_eq!(err.to_string(), "passed action validator is not a function");
    assert!(d.validate_action(-4));

    d.try_set_action_validator(None).unwrap();
    assert!(d.action_validator().is_default());
    assert!(!d.validate_action(-4));
}

#[test]
fn config_deserializes_with_defaults() {
    let cfg: DictionaryConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg.allocation, AllocationStrategy::Hashed);
    let cfg: DictionaryConfig = serde_json::from_str(r#"{"allocation":"sequential"}"#).unwrap();
    let mut d = ActionDictionary::with_config(cfg);
    assert_eq!(d.config().allocation, AllocationStrategy::Sequential);
    assert_eq!(d.add_actions(["a", "b"], Some("ns")).unwrap(), vec![1, 2]);
}
