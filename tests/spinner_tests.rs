//! Integration tests for the spinner engine

use std::sync::{Arc, Mutex};

use rs_spinner::{
    hal::{MockClock, MockField},
    Outcome, SettingKey, SettingsPatch, SpinEvent, SpinPhase, Spinner, StepDivisibility,
};

type Events = Arc<Mutex<Vec<SpinEvent>>>;

fn spinner_with(text: &str, patch: SettingsPatch) -> (Spinner<MockField, MockClock>, MockClock, Events) {
    let clock = MockClock::new();
    let mut spinner = Spinner::new(MockField::new(text), clock.clone(), patch);
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    spinner.on_event(move |event| sink.lock().unwrap().push(event));
    (spinner, clock, events)
}

fn drain(events: &Events) -> Vec<SpinEvent> {
    std::mem::take(&mut *events.lock().unwrap())
}

#[test]
fn step_up_at_max_emits_max_only() {
    let patch = SettingsPatch::new().with_min(0).with_max(10).with_step(1);
    let (mut spinner, _, events) = spinner_with("10", patch);

    assert_eq!(spinner.step_up(), Outcome::Unchanged);

    assert_eq!(drain(&events), vec![SpinEvent::Max]);
    assert_eq!(spinner.value(), 10.0);
    assert_eq!(spinner.field().change_count, 0);
}

#[test]
fn step_down_at_min_emits_min_only() {
    let (mut spinner, _, events) = spinner_with("0", SettingsPatch::new());
    assert_eq!(spinner.step_down(), Outcome::Unchanged);
    assert_eq!(drain(&events), vec![SpinEvent::Min]);
}

#[test]
fn step_landing_on_bound_emits_change_then_bound() {
    let (mut spinner, _, events) = spinner_with("9", SettingsPatch::new().with_max(10));
    assert_eq!(spinner.step_up(), Outcome::Applied);
    assert_eq!(drain(&events), vec![SpinEvent::Change, SpinEvent::Max]);
}

#[test]
fn initial_value_quantized_by_round() {
    let patch = SettingsPatch::new()
        .with_step(3)
        .with_force_step_divisibility(StepDivisibility::Round);
    let (spinner, _, _) = spinner_with("10", patch);
    assert_eq!(spinner.value(), 9.0);
}

#[test]
fn initial_value_setting_quantized_into_empty_field() {
    let patch = SettingsPatch::new().with_step(3).with_initial_value(10);
    let (spinner, _, _) = spinner_with("", patch);
    assert_eq!(spinner.field().text, "9");
}

#[test]
fn ten_hundredth_steps_give_exact_text() {
    let patch = SettingsPatch::new().with_decimals(2).with_step(0.01);
    let (mut spinner, _, _) = spinner_with("0.00", patch);
    for _ in 0..10 {
        spinner.step_up();
    }
    assert_eq!(spinner.field().text, "0.10");
    assert_eq!(spinner.value(), 0.1);
}

#[test]
fn inverted_bounds_swapped_and_value_clamped() {
    let (mut spinner, _, _) = spinner_with("20", SettingsPatch::new());
    assert_eq!(
        spinner.update_settings(SettingsPatch::new().with_min(100).with_max(50)),
        Outcome::Applied
    );
    assert_eq!(spinner.settings().min, Some(50.0));
    assert_eq!(spinner.settings().max, Some(100.0));
    assert_eq!(spinner.value(), 50.0);
}

#[test]
fn step_up_then_down_round_trips() {
    let patch = SettingsPatch::new().with_min(-50).with_max(50).with_step(0.5).with_decimals(1);
    for start in ["-10.0", "0.0", "0.5", "12.5", "49.0"] {
        let (mut spinner, _, _) = spinner_with(start, patch.clone());
        let before = spinner.value();
        spinner.step_up();
        spinner.step_down();
        assert_eq!(spinner.value(), before, "start {start}");
    }
}

#[test]
fn double_start_emits_one_pair() {
    let (mut spinner, _, events) = spinner_with("5", SettingsPatch::new());
    spinner.start_spin_up();
    spinner.start_spin_up();

    let starts: Vec<SpinEvent> = drain(&events)
        .into_iter()
        .filter(|event| matches!(event, SpinEvent::StartSpin | SpinEvent::StartUpSpin))
        .collect();
    assert_eq!(starts, vec![SpinEvent::StartSpin, SpinEvent::StartUpSpin]);
}

#[test]
fn start_spin_at_bound_emits_bound_and_stays_idle() {
    let (mut spinner, _, events) = spinner_with("100", SettingsPatch::new());
    assert_eq!(spinner.start_spin_up(), Outcome::Unchanged);
    assert_eq!(drain(&events), vec![SpinEvent::Max]);
    assert!(!spinner.is_spinning());
    assert_eq!(spinner.phase(), SpinPhase::Idle);

    // Nothing to stop
    assert_eq!(spinner.stop_spin(), Outcome::Unchanged);
    assert!(drain(&events).is_empty());
}

#[test]
fn start_spin_reaching_bound_immediately_arms_no_timer() {
    let (mut spinner, clock, events) = spinner_with("99", SettingsPatch::new());
    assert_eq!(spinner.start_spin_up(), Outcome::Applied);
    assert_eq!(
        drain(&events),
        vec![
            SpinEvent::StartSpin,
            SpinEvent::StartUpSpin,
            SpinEvent::Change,
            SpinEvent::Max
        ]
    );
    assert_eq!(spinner.phase(), SpinPhase::Idle);

    clock.advance(5_000);
    assert_eq!(spinner.update(), Outcome::Unchanged);
    assert!(drain(&events).is_empty());

    spinner.stop_spin();
    assert_eq!(
        drain(&events),
        vec![SpinEvent::StopUpSpin, SpinEvent::StopSpin]
    );
}

#[test]
fn restarting_spin_parked_at_bound_emits_bound() {
    let (mut spinner, _, events) = spinner_with("99", SettingsPatch::new());
    spinner.start_spin_up();
    drain(&events);

    assert_eq!(spinner.start_spin_up(), Outcome::Unchanged);
    assert_eq!(drain(&events), vec![SpinEvent::Max]);
    assert!(spinner.is_spinning());
}

#[test]
fn min_equal_max_is_fixed_point() {
    let patch = SettingsPatch::new().with_min(7).with_max(7);
    let (mut spinner, _, events) = spinner_with("3", patch);
    assert_eq!(spinner.value(), 7.0);
    spinner.step_up();
    spinner.step_down();
    assert_eq!(spinner.value(), 7.0);
    assert_eq!(drain(&events), vec![SpinEvent::Max, SpinEvent::Min]);
}

#[test]
fn unbounded_range_steps_freely() {
    let patch = SettingsPatch::new().with_min_unbounded().with_max_unbounded();
    let (mut spinner, _, _) = spinner_with("0", patch);
    spinner.step_down();
    spinner.step_down();
    assert_eq!(spinner.field().text, "-2");
    spinner.set_value(1e9);
    spinner.step_up();
    assert_eq!(spinner.value(), 1e9 + 1.0);
}

#[test]
fn floor_and_ceil_policies_on_commit() {
    let (mut floor, _, _) = spinner_with(
        "",
        SettingsPatch::new()
            .with_step(5)
            .with_force_step_divisibility(StepDivisibility::Floor),
    );
    floor.field_mut().type_text("14");
    floor.commit();
    assert_eq!(floor.field().text, "10");

    let (mut ceil, _, _) = spinner_with(
        "",
        SettingsPatch::new()
            .with_step(5)
            .with_force_step_divisibility(StepDivisibility::Ceil),
    );
    ceil.field_mut().type_text("11");
    ceil.commit();
    assert_eq!(ceil.field().text, "15");
}

#[test]
fn no_divisibility_keeps_off_grid_values() {
    let patch = SettingsPatch::new()
        .with_step(5)
        .with_decimals(1)
        .with_force_step_divisibility(StepDivisibility::None);
    let (mut spinner, _, _) = spinner_with("3.3", patch);
    assert_eq!(spinner.field().text, "3.3");
    spinner.step_up();
    assert_eq!(spinner.field().text, "8.3");
}

#[test]
fn commit_emits_change_only_when_text_differs() {
    let (mut spinner, _, events) = spinner_with("5", SettingsPatch::new());
    assert_eq!(spinner.commit(), Outcome::Unchanged);
    spinner.field_mut().type_text(" 7 ");
    assert_eq!(spinner.commit(), Outcome::Applied);
    assert_eq!(spinner.field().text, "7");
    assert_eq!(drain(&events), vec![SpinEvent::Change]);
    assert_eq!(spinner.field().change_count, 1);
}

#[test]
fn observers_notified_once_per_changed_key() {
    let (mut spinner, _, _) = spinner_with("5", SettingsPatch::new().with_max(200));
    let seen = Arc::new(Mutex::new(Vec::new()));

    for key in [SettingKey::Min, SettingKey::Max, SettingKey::Decimals] {
        let sink = Arc::clone(&seen);
        spinner.observe_setting(key, move |_| sink.lock().unwrap().push(key));
    }

    spinner.update_settings(SettingsPatch::new().with_min(100).with_max(50));
    assert_eq!(*seen.lock().unwrap(), vec![SettingKey::Min, SettingKey::Max]);
}

#[test]
fn external_attribute_change_routes_to_settings() {
    let (mut spinner, _, _) = spinner_with("80", SettingsPatch::new());
    let patch = rs_spinner::attributes::patch_from_attribute_change("max", Some("60")).unwrap();
    assert_eq!(spinner.on_external_attribute_change(patch), Outcome::Applied);
    assert_eq!(spinner.settings().max, Some(60.0));
    assert_eq!(spinner.value(), 60.0);
}

#[test]
fn attributes_configure_spinner() {
    let field = MockField::new("")
        .with_attribute("min", "10")
        .with_attribute("max", "20")
        .with_attribute("data-bts-init-val", "12");
    let patch = rs_spinner::attributes::patch_from_field(&field);
    let spinner = Spinner::new(field, MockClock::new(), patch);
    assert_eq!(spinner.field().text, "12");
    assert_eq!(spinner.settings().min, Some(10.0));
}
