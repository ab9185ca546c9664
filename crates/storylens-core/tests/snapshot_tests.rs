//! Snapshot construction over realistic story state.

use storylens_core::ignore::IgnoreSet;
use storylens_core::snapshot::{build, build_at, NodeBody};
use storylens_core::value::{Key, Value};
use storylens_core::Kind;

fn story_state() -> Value {
    Value::object([
        ("gold", Value::from(12)),
        ("name", Value::from("Ada")),
        ("inventory", Value::array([Value::from("lamp"), Value::from("rope")])),
        (
            "flags",
            Value::map([("met_troll", Value::from(true)), ("door open", Value::from(false))]),
        ),
        ("on_enter", Value::function("on_enter")),
        ("engine", Value::opaque("Passage")),
        ("notes", Value::array([])),
    ])
}

#[test]
fn test_tree_mirrors_state_with_exact_paths() {
    let tree = build_at(&story_state(), &IgnoreSet::new(), "State").unwrap();

    assert_eq!(tree.path, "State");
    assert_eq!(tree.kind, Kind::Object);
    assert_eq!(
        tree.keys().iter().map(Key::as_name).collect::<Vec<_>>(),
        vec!["flags", "gold", "inventory", "name", "notes"]
    );

    let paths: Vec<&str> = tree.items().iter().map(|i| i.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["State.flags", "State.gold", "State.inventory", "State.name", "State.notes"]
    );

    let flags = tree.find("State.flags").unwrap();
    assert_eq!(flags.kind, Kind::Map);
    assert!(tree.find("State.flags.get('door open')").is_some());
    assert!(tree.find("State.flags.get('met_troll')").is_some());
    assert!(tree.find("State.inventory[1]").is_some());
}

#[test]
fn test_empty_containers_keep_collapsed_kind() {
    let tree = build(&story_state(), &IgnoreSet::new()).unwrap();
    let notes = tree.find("notes").unwrap();
    assert_eq!(notes.kind, Kind::Array);
    assert_eq!(notes.size(), Some(0));
}

#[test]
fn test_functions_and_opaque_values_are_invisible() {
    let tree = build(&story_state(), &IgnoreSet::new()).unwrap();
    assert!(tree.find("on_enter").is_none());
    assert!(tree.find("engine").is_none());
    assert_eq!(tree.size(), Some(5));
}

#[test]
fn test_ignored_path_is_omitted() {
    let mut ignore = IgnoreSet::new();
    ignore.insert("State.inventory");
    ignore.insert("State.flags.get('met_troll')");

    let tree = build_at(&story_state(), &ignore, "State").unwrap();

    assert!(tree.find("State.inventory").is_none());
    assert!(tree.find("State.inventory[0]").is_none());
    assert!(tree.find("State.flags.get('met_troll')").is_none());
    assert_eq!(tree.find("State.flags").unwrap().size(), Some(1));
    assert!(!tree.keys().contains(&Key::name("inventory")));
}

#[test]
fn test_root_is_never_ignored() {
    let ignore: IgnoreSet = ["State"].into_iter().collect();
    let tree = build_at(&story_state(), &ignore, "State").unwrap();
    assert_eq!(tree.size(), Some(5));
}

#[test]
fn test_self_cycle_terminates() {
    let node = Value::object([("label", Value::from("a"))]);
    node.set(Key::name("next"), node.clone());

    let tree = build(&node, &IgnoreSet::new()).unwrap();

    let next = tree.find("next").unwrap();
    assert!(next.is_back_reference());
    assert!(next.items().is_empty());
    assert_eq!(tree.node_count(), 3);
}

#[test]
fn test_indirect_cycle_is_cut_at_the_ancestor() {
    let room_a = Value::object([("name", Value::from("hall"))]);
    let room_b = Value::object([("name", Value::from("cellar"))]);
    room_a.set(Key::name("exit"), room_b.clone());
    room_b.set(Key::name("exit"), room_a.clone());
    let state = Value::object([("here", room_a)]);

    let tree = build(&state, &IgnoreSet::new()).unwrap();

    let back = tree.find("here.exit.exit").unwrap();
    assert!(matches!(back.body, NodeBody::BackReference));
    assert!(tree.find("here.exit.exit.name").is_none());
}

#[test]
fn test_diamond_sharing_is_expanded_on_both_branches() {
    let shared = Value::object([("x", Value::from(1))]);
    let state = Value::object([("a", shared.clone()), ("b", shared)]);

    let tree = build(&state, &IgnoreSet::new()).unwrap();

    assert!(!tree.find("a").unwrap().is_back_reference());
    assert!(!tree.find("b").unwrap().is_back_reference());
    assert!(tree.find("a.x").is_some());
    assert!(tree.find("b.x").is_some());
}

#[test]
fn test_snapshot_holds_live_handles() {
    let inventory = Value::array([Value::from("lamp")]);
    let state = Value::object([("inventory", inventory.clone())]);
    let tree = build(&state, &IgnoreSet::new()).unwrap();

    inventory.push(Value::from("rope"));

    let node = tree.find("inventory").unwrap();
    // Structure is frozen, the handle is not
    assert_eq!(node.size(), Some(1));
    assert_eq!(node.value.len(), Some(2));
}

#[test]
fn test_sparse_array_indices_sort_numerically() {
    let arr = Value::array([]);
    arr.set(Key::Index(10), Value::from("j"));
    arr.set(Key::Index(2), Value::from("b"));

    let tree = build(&arr, &IgnoreSet::new()).unwrap();
    let keys: Vec<_> = tree.keys().to_vec();
    assert_eq!(keys.first(), Some(&Key::Index(0)));
    assert_eq!(keys.last(), Some(&Key::Index(10)));
    assert_eq!(keys.len(), 11);
    assert!(tree.find("[10]").is_none());
    assert!(tree.find("10").is_some());
}
