//! Deep cloning of story state.

use storylens_core::clone::{clone_value, clone_with, CloneMap};
use storylens_core::diff::{compare_raw, ChangeKind, DEFAULT_MAX_DEPTH};
use storylens_core::value::{Key, Value};

fn child(value: &Value, name: &str) -> Value {
    value.get(&Key::name(name)).unwrap()
}

#[test]
fn test_clone_preserves_sharing() {
    let shared = Value::object([("x", Value::from(1))]);
    let root = Value::object([("a", shared.clone()), ("b", shared.clone())]);

    let copy = clone_value(&root);

    let a = child(&copy, "a");
    let b = child(&copy, "b");
    assert!(a.same_value(&b), "both branches should resolve to one clone");
    assert!(!a.same_value(&shared), "the clone must not alias the source");
}

#[test]
fn test_clone_preserves_indirect_cycles() {
    let hall = Value::object([("name", Value::from("hall"))]);
    let cellar = Value::object([("name", Value::from("cellar"))]);
    hall.set(Key::name("down"), cellar.clone());
    cellar.set(Key::name("up"), hall.clone());

    let copy = clone_value(&hall);

    let down = child(&copy, "down");
    let up = child(&down, "up");
    assert!(up.same_value(&copy));
    assert!(!down.same_value(&cellar));
}

#[test]
fn test_clone_is_detached_from_later_mutation() {
    let state = Value::object([
        ("gold", Value::from(5)),
        ("inventory", Value::array([Value::from("lamp")])),
    ]);
    let copy = clone_value(&state);

    state.set(Key::name("gold"), Value::from(9));
    child(&state, "inventory").push(Value::from("rope"));

    assert!(child(&copy, "gold").same_value(&Value::from(5)));
    assert_eq!(child(&copy, "inventory").len(), Some(1));

    let records = compare_raw(&state, &copy, "State", DEFAULT_MAX_DEPTH);
    let kinds: Vec<ChangeKind> = records.iter().map(|r| r.change).collect();
    assert_eq!(kinds, vec![ChangeKind::ValueChanged, ChangeKind::ValuesAdded]);
    assert_eq!(records[0].path, "State.gold");
    assert_eq!(records[1].path, "State.inventory");
}

#[test]
fn test_map_insertion_order_is_preserved() {
    let bag = Value::map([
        ("zeta", Value::from(1)),
        ("alpha", Value::from(2)),
        ("mid", Value::from(3)),
    ]);
    let copy = clone_value(&bag);

    let Value::Map(entries) = &copy else {
        panic!("expected a map clone, got {:?}", copy);
    };
    let names: Vec<String> = entries.borrow().iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_functions_and_opaque_values_are_dropped() {
    let state = Value::object([
        ("hp", Value::from(3)),
        ("on_turn", Value::function("on_turn")),
        ("passage", Value::opaque("Passage")),
    ]);
    let copy = clone_value(&state);

    assert_eq!(copy.len(), Some(1));
    assert!(copy.get(&Key::name("on_turn")).is_none());
    assert!(copy.get(&Key::name("passage")).is_none());
}

#[test]
fn test_shared_map_across_calls() {
    let shared = Value::array([Value::from(1)]);
    let left = Value::object([("s", shared.clone())]);
    let right = Value::object([("s", shared.clone())]);

    let mut clones = CloneMap::new();
    let left_copy = clone_with(&left, &mut clones);
    let right_copy = clone_with(&right, &mut clones);

    assert!(child(&left_copy, "s").same_value(&child(&right_copy, "s")));
    assert_eq!(clones.len(), 3);
    assert!(clones.get(&shared).is_some());
}

#[test]
fn test_separate_clones_compare_equal() {
    let state = Value::from_json(&serde_json::json!({
        "gold": 3,
        "inventory": ["lamp", "rope"],
        "flags": {"$map": [["seen", true]]},
        "party": [{"name": "Ada"}, {"name": "Bo", "bag": [["key"]]}]
    }))
    .unwrap();

    let before = clone_value(&state);
    let after = clone_value(&state);
    assert!(compare_raw(&after, &before, "State", DEFAULT_MAX_DEPTH).is_empty());
    assert!(compare_raw(&state, &before, "State", DEFAULT_MAX_DEPTH).is_empty());
}

#[test]
fn test_clone_then_edit_array_element_reports_the_leaf() {
    let state = Value::from_json(&serde_json::json!({"party": [{"name": "Ada", "hp": 3}]})).unwrap();
    let before = clone_value(&state);

    let ada = child(&state, "party").get(&Key::Index(0)).unwrap();
    ada.set(Key::name("hp"), Value::from(1));

    let records = compare_raw(&clone_value(&state), &before, "State", DEFAULT_MAX_DEPTH);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].change, ChangeKind::ValueChanged);
    assert_eq!(records[0].path, "State.party[0].hp");
}
