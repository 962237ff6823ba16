//! Spin timing tests: delay, interval, booster, and catch-up

use std::sync::{Arc, Mutex};

use rs_spinner::{
    hal::{MockClock, MockField},
    spin::MAX_CATCH_UP_TICKS,
    Outcome, SettingsPatch, SpinEvent, SpinPhase, Spinner,
};

type Events = Arc<Mutex<Vec<SpinEvent>>>;

fn spinning(text: &str, patch: SettingsPatch) -> (Spinner<MockField, MockClock>, MockClock, Events) {
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

/// Advance in 100 ms ticks, recording the value after each.
fn values_at_ticks(spinner: &mut Spinner<MockField, MockClock>, clock: &MockClock, ticks: usize) -> Vec<f64> {
    (0..ticks)
        .map(|_| {
            clock.advance(100);
            spinner.update();
            spinner.value()
        })
        .collect()
}

// ============================================================================
// Delay and interval
// ============================================================================

#[test]
fn immediate_step_then_delay_then_interval() {
    let (mut spinner, clock, _) = spinning("0", SettingsPatch::new().with_booster(false));

    spinner.start_spin_up();
    assert_eq!(spinner.value(), 1.0);
    assert_eq!(spinner.phase(), SpinPhase::DelayPending { due_ms: 500 });

    // Delay elapsed but first tick is one interval later
    clock.set(500);
    assert_eq!(spinner.update(), Outcome::Unchanged);
    assert_eq!(spinner.phase(), SpinPhase::Repeating { next_due_ms: 600 });

    clock.set(599);
    spinner.update();
    assert_eq!(spinner.value(), 1.0);

    clock.set(600);
    assert_eq!(spinner.update(), Outcome::Applied);
    assert_eq!(spinner.value(), 2.0);
    assert_eq!(spinner.spin_state().step_count, 1);
}

#[test]
fn missed_ticks_are_caught_up_in_order() {
    let (mut spinner, clock, events) = spinning("0", SettingsPatch::new().with_booster(false));
    spinner.start_spin_up();
    drain(&events);

    clock.set(1_000);
    spinner.update();
    // Ticks at 600, 700, 800, 900, 1000
    assert_eq!(spinner.value(), 6.0);
    assert_eq!(spinner.spin_state().step_count, 5);
    assert_eq!(drain(&events), vec![SpinEvent::Change; 5]);
}

#[test]
fn clock_jump_replays_bounded_ticks() {
    let patch = SettingsPatch::new()
        .with_min_unbounded()
        .with_max_unbounded()
        .with_booster(false)
        .with_step_interval_delay_ms(0)
        .with_step_interval_ms(0);
    let (mut spinner, clock, events) = spinning("0", patch);
    spinner.start_spin_up();
    drain(&events);
    let writes = spinner.field().text_writes;

    clock.advance(3_600_000);
    assert_eq!(spinner.update(), Outcome::Applied);

    let ticks = MAX_CATCH_UP_TICKS as usize;
    assert_eq!(spinner.spin_state().step_count, MAX_CATCH_UP_TICKS);
    assert_eq!(spinner.value(), 1.0 + ticks as f64);
    assert_eq!(spinner.field().text_writes - writes, MAX_CATCH_UP_TICKS);
    assert_eq!(drain(&events), vec![SpinEvent::Change; ticks]);

    // Regular cadence afterwards
    clock.advance(1);
    spinner.update();
    assert_eq!(spinner.value(), 2.0 + ticks as f64);
}

#[test]
fn zero_delay_and_interval() {
    let patch = SettingsPatch::new()
        .with_booster(false)
        .with_step_interval_delay_ms(0)
        .with_step_interval_ms(0);
    let (mut spinner, clock, _) = spinning("0", patch);
    spinner.start_spin_up();
    clock.set(3);
    spinner.update();
    // Interval of 0 runs at 1 ms: ticks at 1, 2, 3
    assert_eq!(spinner.value(), 4.0);
}

// ============================================================================
// Booster
// ============================================================================

#[test]
fn booster_doubles_every_n_ticks() {
    let patch = SettingsPatch::new()
        .with_max(1000)
        .with_step(1)
        .with_boost_every(5);
    let (mut spinner, clock, _) = spinning("0", patch);
    spinner.start_spin_up();
    clock.set(500);
    spinner.update();

    let values = values_at_ticks(&mut spinner, &clock, 10);
    assert_eq!(
        values,
        vec![2.0, 3.0, 4.0, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0, 19.0]
    );
}

#[test]
fn boosted_step_capped() {
    let patch = SettingsPatch::new()
        .with_max(1000)
        .with_boost_every(5)
        .with_max_boosted_step(3);
    let (mut spinner, clock, _) = spinning("0", patch);
    spinner.start_spin_up();
    clock.set(1_500);
    spinner.update();
    // Step 4 at tick 10 is capped to 3
    assert_eq!(spinner.value(), 18.0);
}

#[test]
fn runaway_booster_never_writes_infinity() {
    let patch = SettingsPatch::new()
        .with_min_unbounded()
        .with_max_unbounded()
        .with_step(10)
        .with_boost_every(1)
        .with_step_interval_delay_ms(0)
        .with_step_interval_ms(1);
    let (mut spinner, clock, _) = spinning("0", patch);
    spinner.start_spin_up();
    for _ in 0..1_100 {
        clock.advance(1);
        spinner.update();
    }
    assert_eq!(spinner.spin_state().step_count, 1_100);
    assert!(spinner.value().is_finite());
    assert!(!spinner.field().text.contains("inf"));

    spinner.stop_spin();
    assert_eq!(spinner.set_value(5), Outcome::Applied);
    spinner.step_down();
    assert_eq!(spinner.value(), -5.0);
}

#[test]
fn booster_off_keeps_base_step() {
    let patch = SettingsPatch::new().with_max(1000).with_boost_every(2).with_booster(false);
    let (mut spinner, clock, _) = spinning("0", patch);
    spinner.start_spin_up();
    clock.set(1_500);
    spinner.update();
    assert_eq!(spinner.value(), 11.0);
}

#[test]
fn restart_resets_boost() {
    let patch = SettingsPatch::new().with_max(1000).with_boost_every(1);
    let (mut spinner, clock, _) = spinning("0", patch);
    spinner.start_spin_up();
    clock.set(700);
    spinner.update();
    // 1, then +2, +4
    assert_eq!(spinner.value(), 7.0);

    spinner.stop_spin();
    spinner.start_spin_up();
    assert_eq!(spinner.value(), 8.0);
    assert_eq!(spinner.spin_state().step_count, 0);
}

// ============================================================================
// Bounds and interruptions
// ============================================================================

#[test]
fn spin_into_bound_keeps_emitting_bound() {
    let patch = SettingsPatch::new().with_booster(false);
    let (mut spinner, clock, events) = spinning("97", patch);
    spinner.start_spin_up();
    clock.set(700);
    spinner.update();
    assert_eq!(spinner.value(), 100.0);
    assert!(spinner.is_spinning());
    assert_eq!(
        drain(&events),
        vec![
            SpinEvent::StartSpin,
            SpinEvent::StartUpSpin,
            SpinEvent::Change,
            SpinEvent::Change,
            SpinEvent::Change,
            SpinEvent::Max
        ]
    );

    clock.set(1_000);
    assert_eq!(spinner.update(), Outcome::Applied);
    assert_eq!(drain(&events), vec![SpinEvent::Max; 3]);

    spinner.stop_spin();
    assert_eq!(drain(&events), vec![SpinEvent::StopUpSpin, SpinEvent::StopSpin]);
}

#[test]
fn reversing_stops_previous_spin_first() {
    let (mut spinner, _, events) = spinning("50", SettingsPatch::new());
    spinner.start_spin_up();
    drain(&events);

    spinner.start_spin_down();
    assert_eq!(
        drain(&events),
        vec![
            SpinEvent::StopUpSpin,
            SpinEvent::StopSpin,
            SpinEvent::StartSpin,
            SpinEvent::StartDownSpin,
            SpinEvent::Change
        ]
    );
    assert_eq!(spinner.value(), 50.0);
}

#[test]
fn disabling_mid_spin_stops_on_next_update() {
    let (mut spinner, clock, events) = spinning("10", SettingsPatch::new());
    spinner.start_spin_down();
    drain(&events);

    spinner.field_mut().disabled = true;
    clock.set(2_000);
    assert_eq!(spinner.update(), Outcome::Applied);
    assert!(!spinner.is_spinning());
    assert_eq!(spinner.value(), 9.0);
    assert_eq!(drain(&events), vec![SpinEvent::StopDownSpin, SpinEvent::StopSpin]);
}

#[test]
fn settings_change_applies_from_next_tick() {
    let (mut spinner, clock, _) = spinning("0", SettingsPatch::new().with_booster(false));
    spinner.start_spin_up();
    clock.set(600);
    spinner.update();
    assert_eq!(spinner.value(), 2.0);

    spinner.update_settings(SettingsPatch::new().with_step(2));
    assert!(spinner.is_spinning());
    clock.set(700);
    spinner.update();
    assert_eq!(spinner.value(), 4.0);
}

#[test]
fn stop_is_idempotent() {
    let (mut spinner, _, events) = spinning("5", SettingsPatch::new());
    spinner.start_spin_up();
    drain(&events);
    assert_eq!(spinner.stop_spin(), Outcome::Applied);
    assert_eq!(spinner.stop_spin(), Outcome::Unchanged);
    assert_eq!(drain(&events), vec![SpinEvent::StopUpSpin, SpinEvent::StopSpin]);
    assert_eq!(spinner.phase(), SpinPhase::Idle);
}
