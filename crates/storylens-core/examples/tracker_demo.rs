//! Tracker Demonstration
//!
//! This example plays a few turns of a tiny story and prints what the
//! trackers report after each one.
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Key concepts illustrated:
//! 1. Snapshot tracking with an ignore set
//! 2. Comparing the live state against a deep clone
//! 3. Adaptive polling delay

use storylens_core::{
    clone_value, compare_raw_ignoring,
    diff::render_human_summary,
    logging_facility::{init, Profile},
    CheckOutcome, Key, Tracker, TrackerConfig, Value,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);
    println!("=== StoryLens Tracker Demo ===\n");

    let state = Value::object([
        ("gold", Value::from(0)),
        ("inventory", Value::array([])),
        ("turns", Value::from(0)),
        ("on_turn", Value::function("on_turn")),
    ]);

    let config = TrackerConfig::from_toml_str(
        r#"
        ignore_paths = ["State.turns"]
        "#,
    )?;
    let ignore = config.ignore_set();
    let max_depth = config.max_depth;
    let mut tracker = Tracker::new(config)?;
    tracker.start(&state)?;
    let opening = clone_value(&state);

    let turns: [(&str, fn(&Value)); 3] = [
        ("pick up lamp", |s| {
            s.get(&Key::name("inventory")).unwrap().push(Value::from("lamp"));
        }),
        ("sell lamp", |s| {
            s.set(Key::name("inventory"), Value::array([]));
            s.set(Key::name("gold"), Value::from(15));
        }),
        ("wait", |_| {}),
    ];

    for (turn, (action, apply)) in turns.iter().enumerate() {
        apply(&state);
        state.set(Key::name("turns"), Value::from(turn as i32 + 1));

        println!("## Turn {}: {}\n", turn + 1, action);
        match tracker.check(&state) {
            CheckOutcome::Unchanged => println!("_No changes._\n"),
            CheckOutcome::Changed(records) => println!("{}", render_human_summary(&records)),
            CheckOutcome::Failed(err) => println!("check failed: {}\n", err),
        }
        let since_opening = compare_raw_ignoring(&state, &opening, "State", max_depth, &ignore);
        println!("{} record(s) since the opening turn", since_opening.len());
        println!("next check in {:?}\n", tracker.next_delay());
    }

    Ok(())
}
