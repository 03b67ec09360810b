//! The state the clock tasks share, behind one lock.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embassy_time::{Duration, Instant};
use portable_atomic::{AtomicBool, AtomicU64, Ordering};

use crate::{
    AlarmChannel, AlarmEvent, Clock, ClockConfig, ClockState, Controller, Event, EventChannel,
    Result, Screen, ScreenDriver,
    event::{send_alarm_event, send_event},
};

/// Everything guarded by the shared lock.
pub struct ClockContext<D> {
    pub clock: Clock,
    pub controller: Controller,
    pub screen: Screen<D>,
}

/// The clock's shared state: one lock around the engine, the state machine and the screen, plus
/// the two queues and two lock-free flags.
///
/// Each method takes the lock once and does its whole read-modify-write inside it, so no task ever
/// sees a half-updated time or a state without its edit buffer. Queue sends happen after the lock
/// is released.
///
/// Meant to live in a `static` (for example through `static_cell::StaticCell`) and be shared by
/// reference with every task in [`crate::tasks`].
pub struct ClockShared<D> {
    context: Mutex<CriticalSectionRawMutex, RefCell<ClockContext<D>>>,
    events: EventChannel,
    alarms: AlarmChannel,
    separator_on: AtomicBool,
    last_input_ticks: AtomicU64,
}

impl<D: ScreenDriver> ClockShared<D> {
    /// Creates the shared state with a blank screen on `driver`.
    #[must_use]
    pub fn new(config: &ClockConfig, screen: Screen<D>) -> Self {
        Self {
            context: Mutex::new(RefCell::new(ClockContext {
                clock: Clock::new(config.ticks_per_second),
                controller: Controller::new(config.postpone_minutes, config.flash_divisor),
                screen,
            })),
            events: EventChannel::new(),
            alarms: AlarmChannel::new(),
            separator_on: AtomicBool::new(true),
            last_input_ticks: AtomicU64::new(0),
        }
    }

    /// Runs `action` with the lock held.
    pub fn lock<R>(&self, action: impl FnOnce(&mut ClockContext<D>) -> R) -> R {
        self.context.lock(|context| action(&mut context.borrow_mut()))
    }

    #[must_use]
    pub fn state(&self) -> ClockState {
        self.lock(|context| context.controller.state())
    }

    #[must_use]
    pub const fn events(&self) -> &EventChannel {
        &self.events
    }

    #[must_use]
    pub const fn alarms(&self) -> &AlarmChannel {
        &self.alarms
    }

    /// Queues a button event; drops it if the queue is full.
    pub fn send_event(&self, event: Event) -> bool {
        send_event(&self.events, event)
    }

    /// Queues an alarm request; drops it if the queue is full.
    pub fn send_alarm_event(&self, event: AlarmEvent) -> bool {
        send_alarm_event(&self.alarms, event)
    }

    /// Applies one event to the state machine, forwards any alarm request, then asks for an alarm
    /// check in case the new state allows the alarm to sound.
    pub fn dispatch(&self, event: Event) -> ClockState {
        let (state, alarm_request) = self.lock(|context| {
            let request = context
                .controller
                .handle_event(&mut context.clock, event);
            (context.controller.state(), request)
        });
        if let Some(request) = alarm_request {
            self.send_alarm_event(request);
        }
        self.send_alarm_event(AlarmEvent::Check);
        state
    }

    /// Advances the engine one tick, publishes the time for display, and asks for an alarm check.
    pub fn tick(&self) {
        self.lock(|context| {
            context.clock.tick();
            context.controller.publish_time(&context.clock);
        });
        self.send_alarm_event(AlarmEvent::Check);
    }

    /// Applies an alarm request to the latch. Returns whether the alarm should now be sounding.
    pub fn handle_alarm_event(&self, event: AlarmEvent) -> bool {
        self.lock(|context| {
            let controller = &mut context.controller;
            match event {
                AlarmEvent::Check => {
                    controller.check_alarm(&context.clock);
                }
                AlarmEvent::Activate => controller.set_alarm_triggered(true),
                AlarmEvent::Deactivate => controller.set_alarm_triggered(false),
            }
            controller.is_alarm_triggered()
        })
    }

    /// Draws the next digit of the face for the current state.
    ///
    /// # Errors
    ///
    /// Returns the screen driver's error, or [`crate::Error::InvalidFlashRange`] if the screen is
    /// too narrow for the clock face.
    pub fn refresh(&self) -> Result<()> {
        let separator_on = self.separator_on.load(Ordering::Relaxed);
        self.lock(|context| {
            let ClockContext {
                clock,
                controller,
                screen,
            } = context;
            controller.compose(clock, screen, separator_on)?;
            screen.refresh()
        })
    }

    /// Flips the seconds separator. Returns the new phase.
    pub fn toggle_separator(&self) -> bool {
        !self.separator_on.fetch_not(Ordering::Relaxed)
    }

    /// Whether the seconds separator is in its lit phase.
    #[must_use]
    pub fn is_separator_on(&self) -> bool {
        self.separator_on.load(Ordering::Relaxed)
    }

    /// When a button was last pressed, or an abandoned edit last cancelled.
    #[must_use]
    pub fn last_input(&self) -> Instant {
        Instant::from_ticks(self.last_input_ticks.load(Ordering::Relaxed))
    }

    /// Notes that a button was pressed at `now`.
    pub fn record_input(&self, now: Instant) {
        self.last_input_ticks.store(now.as_ticks(), Ordering::Relaxed);
    }

    /// Cancels an edit that has seen no button press for `timeout`. Returns `true` if a `Cancel`
    /// was queued.
    ///
    /// The cancel counts as input, so the next one can only come a full `timeout` later.
    pub fn check_inactivity(&self, now: Instant, timeout: Duration) -> bool {
        if !self.state().is_editing() {
            return false;
        }
        if now.saturating_duration_since(self.last_input()) < timeout {
            return false;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("No input for {:?}, cancelling edit", timeout);
        self.record_input(now);
        self.send_event(Event::Cancel)
    }
}
