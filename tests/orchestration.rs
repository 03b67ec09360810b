//! Host-level tests for the shared clock state and the task loops.

mod common;

use core::num::NonZeroU16;

use alarm_clock::{
    AlarmEvent, Buttons, ClockConfig, ClockShared, ClockState, ClockTime, DigitalOutput, Event,
    InputLine, Polarity, Screen, tasks,
};
use common::{
    FakeIndicator, FrameRecorder, ScriptedPin, alarms_drained, events_drained, queued_events,
};
use embassy_futures::{
    block_on,
    select::{select, select3},
};
use embassy_time::{Duration, Instant, Timer};

/// One engine tick per second keeps the tests short.
const CONFIG: ClockConfig = ClockConfig {
    ticks_per_second: match NonZeroU16::new(1) {
        Some(ticks) => ticks,
        None => panic!("non-zero"),
    },
    ..ClockConfig::new()
};

/// Millisecond periods for running the timed loops in real time.
const FAST: ClockConfig = ClockConfig {
    tick_period: Duration::from_millis(10),
    refresh_period: Duration::from_millis(1),
    input_poll_period: Duration::from_millis(1),
    debounce: Duration::from_millis(10),
    blink_period: Duration::from_millis(50),
    watchdog_period: Duration::from_millis(5),
    inactivity_timeout: Duration::from_millis(40),
    ..CONFIG
};

fn shared() -> ClockShared<FrameRecorder> {
    ClockShared::new(&CONFIG, Screen::new(4, FrameRecorder::default()))
}

fn hms(hours: u8, minutes: u8, seconds: u8) -> ClockTime {
    ClockTime::from_hms(hours, minutes, seconds).expect("valid time")
}

fn running_at(shared: &ClockShared<FrameRecorder>, time: ClockTime) {
    shared.lock(|context| {
        context.clock.set_time(time);
        context.controller.publish_time(&context.clock);
    });
    assert_eq!(shared.state(), ClockState::Normal);
}

/// Lets the controller task work through everything queued.
fn run_controller(shared: &ClockShared<FrameRecorder>) {
    block_on(select(
        tasks::controller_loop(shared),
        events_drained(shared.events()),
    ));
}

/// Lets the alarm task work through everything queued.
fn run_alarm(shared: &ClockShared<FrameRecorder>, indicator: &mut FakeIndicator) {
    block_on(select(
        tasks::alarm_loop(shared, indicator),
        alarms_drained(shared.alarms()),
    ));
}

#[test]
fn set_time_then_two_accepts_returns_to_normal_with_zero_seconds() {
    let shared = shared();
    running_at(&shared, hms(10, 15, 42));

    assert_eq!(shared.dispatch(Event::SetTime), ClockState::SetMinutes);
    assert_eq!(shared.dispatch(Event::Accept), ClockState::SetHours);
    assert_eq!(shared.dispatch(Event::Accept), ClockState::Normal);
    assert_eq!(shared.lock(|context| context.clock.time()), (true, hms(10, 15, 0)));
}

#[test]
fn controller_task_drains_queued_button_events() {
    let shared = shared();
    for event in [
        Event::SetTime,
        Event::Increment,
        Event::Increment,
        Event::Accept,
        Event::Decrement,
        Event::Accept,
    ] {
        assert!(shared.send_event(event));
    }
    run_controller(&shared);

    assert_eq!(shared.state(), ClockState::Normal);
    assert_eq!(shared.lock(|context| context.clock.time()), (true, hms(23, 2, 0)));
}

#[test]
fn ticks_do_not_overwrite_an_edit_in_progress() {
    let shared = shared();
    running_at(&shared, hms(8, 0, 0));
    shared.dispatch(Event::SetTime);
    shared.dispatch(Event::Increment);

    for _ in 0..5 {
        shared.tick();
    }
    let (edit, shown, time) = shared.lock(|context| {
        (
            context.controller.edit_time(),
            context.controller.shown_time(),
            context.clock.time().1,
        )
    });
    assert_eq!(edit, hms(8, 1, 0));
    assert_eq!(shown, hms(8, 0, 0));
    assert_eq!(time, hms(8, 0, 5));
}

#[test]
fn tick_publishes_time_in_normal() {
    let shared = shared();
    running_at(&shared, hms(8, 0, 0));
    shared.tick();
    assert_eq!(
        shared.lock(|context| context.controller.shown_time()),
        hms(8, 0, 1)
    );
}

#[test]
fn alarm_task_sounds_and_silences_the_indicator() {
    let shared = shared();
    running_at(&shared, hms(6, 59, 59));
    shared.lock(|context| {
        context.clock.set_alarm(hms(7, 0, 0));
        context.clock.enable_alarm();
    });
    let mut indicator = FakeIndicator::default();

    shared.tick();
    run_alarm(&shared, &mut indicator);
    assert!(indicator.is_active());
    assert!(shared.lock(|context| context.controller.is_alarm_triggered()));

    // Accept snoozes.
    shared.dispatch(Event::Accept);
    run_alarm(&shared, &mut indicator);
    assert!(!indicator.is_active());
    assert_eq!(shared.lock(|context| context.clock.alarm()), hms(7, 5, 0));
    assert_eq!(indicator.switches, 2);
}

#[test]
fn forced_alarm_requests_drive_the_indicator() {
    let shared = shared();
    running_at(&shared, hms(12, 0, 0));
    let mut indicator = FakeIndicator::default();

    shared.send_alarm_event(AlarmEvent::Activate);
    run_alarm(&shared, &mut indicator);
    assert!(indicator.is_active());

    shared.send_alarm_event(AlarmEvent::Deactivate);
    run_alarm(&shared, &mut indicator);
    assert!(!indicator.is_active());
}

#[test]
fn inactivity_cancels_an_abandoned_edit_once() {
    let shared = shared();
    running_at(&shared, hms(8, 0, 0));
    let timeout = Duration::from_secs(30);

    shared.record_input(Instant::from_secs(100));
    shared.dispatch(Event::SetAlarm);
    assert!(!shared.check_inactivity(Instant::from_secs(129), timeout));
    assert!(shared.check_inactivity(Instant::from_secs(130), timeout));
    // The synthesized cancel restarts the timeout.
    assert!(!shared.check_inactivity(Instant::from_secs(131), timeout));

    run_controller(&shared);
    assert_eq!(shared.state(), ClockState::Normal);
    assert!(!shared.check_inactivity(Instant::from_secs(500), timeout));
}

#[test]
fn inactivity_is_ignored_outside_edits() {
    let shared = shared();
    running_at(&shared, hms(8, 0, 0));
    assert!(!shared.check_inactivity(Instant::from_secs(1000), Duration::from_secs(30)));
    assert!(shared.events().is_empty());
}

#[test]
fn abandoned_first_time_edit_falls_back_to_init() {
    let shared = shared();
    shared.record_input(Instant::from_secs(0));
    shared.dispatch(Event::SetTime);
    assert!(shared.check_inactivity(Instant::from_secs(30), Duration::from_secs(30)));
    run_controller(&shared);
    assert_eq!(shared.state(), ClockState::Init);
}

#[test]
fn separator_toggles() {
    let shared = shared();
    assert!(!shared.toggle_separator());
    assert!(shared.toggle_separator());
}

#[test]
fn refresh_draws_the_face() {
    let shared = shared();
    running_at(&shared, hms(21, 47, 0));
    for _ in 0..4 {
        shared.refresh().expect("recorder never fails");
    }
    let frame = shared.lock(|context| context.screen.driver().frame);
    assert_eq!(
        frame,
        [
            common::image(2, false),
            common::image(1, true),
            common::image(4, false),
            common::image(7, false),
        ]
    );
}

fn line(levels: &[bool]) -> InputLine<ScriptedPin> {
    InputLine::new(ScriptedPin::new(levels), Polarity::ActiveHigh)
}

#[test]
fn input_task_queues_one_event_per_press() {
    let shared = shared();
    // Two presses of set-time: held for three samples, released, then pressed again.
    let mut buttons = Buttons::new(
        line(&[true, true, true, false, true, true]),
        line(&[]),
        line(&[]),
        line(&[]),
        line(&[]),
        line(&[]),
    );
    let start = Instant::now();
    block_on(select(
        tasks::input_loop(&shared, &mut buttons, &FAST),
        Timer::after(Duration::from_millis(150)),
    ));

    assert_eq!(
        queued_events(shared.events()),
        [Event::SetTime, Event::SetTime]
    );
    let last_input = shared.last_input();
    assert!(last_input >= start);
    assert!(last_input <= Instant::now());
}

#[test]
fn input_task_pauses_for_the_debounce_after_a_press() {
    let shared = shared();
    let mut buttons = Buttons::new(
        line(&[true]),
        line(&[]),
        line(&[]),
        line(&[]),
        line(&[]),
        line(&[]),
    );
    let config = ClockConfig {
        debounce: Duration::from_secs(10),
        ..FAST
    };
    block_on(select(
        tasks::input_loop(&shared, &mut buttons, &config),
        Timer::after(Duration::from_millis(100)),
    ));

    let [set_time, ..] = buttons.into_lines();
    // Only the press itself was sampled; the debounce outlasted the run.
    assert_eq!(set_time.release().reads, 1);
    assert_eq!(queued_events(shared.events()), [Event::SetTime]);
}

#[test]
fn watchdog_task_abandons_an_idle_edit() {
    let shared = shared();
    running_at(&shared, hms(8, 0, 0));
    shared.record_input(Instant::now());
    assert_eq!(shared.dispatch(Event::SetAlarm), ClockState::SetAlarmMinutes);

    block_on(select3(
        tasks::watchdog_loop(&shared, &FAST),
        tasks::controller_loop(&shared),
        Timer::after(Duration::from_millis(150)),
    ));

    assert_eq!(shared.state(), ClockState::Normal);
    assert!(shared.events().is_empty());
}

#[test]
fn watchdog_task_leaves_a_busy_edit_alone() {
    let shared = shared();
    running_at(&shared, hms(8, 0, 0));
    shared.record_input(Instant::now());
    shared.dispatch(Event::SetTime);

    let config = ClockConfig {
        inactivity_timeout: Duration::from_secs(10),
        ..FAST
    };
    block_on(select(
        tasks::watchdog_loop(&shared, &config),
        Timer::after(Duration::from_millis(50)),
    ));

    assert_eq!(shared.state(), ClockState::SetMinutes);
    assert!(shared.events().is_empty());
}

#[test]
fn tick_and_refresh_tasks_redraw_the_new_minute() {
    let shared = shared();
    running_at(&shared, hms(21, 47, 58));

    block_on(select3(
        tasks::tick_loop(&shared, &FAST),
        tasks::refresh_loop(&shared, &FAST),
        Timer::after(Duration::from_millis(150)),
    ));

    let (time, frame) =
        shared.lock(|context| (context.clock.time().1, context.screen.driver().frame));
    assert_eq!((time.hours(), time.minutes()), (21, 48), "clock at {time}");
    assert_eq!(
        frame,
        [
            common::image(2, false),
            common::image(1, true),
            common::image(4, false),
            common::image(8, false),
        ]
    );
}

#[test]
fn blink_task_toggles_the_separator() {
    let shared = shared();
    assert!(shared.is_separator_on());
    block_on(select(
        tasks::blink_loop(&shared, &FAST),
        Timer::after(Duration::from_millis(75)),
    ));
    assert!(!shared.is_separator_on());
}
