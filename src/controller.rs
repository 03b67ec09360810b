//! State machine for setting the clock and the alarm with six buttons.
//!
//! The [`Controller`] owns the user-facing state: which mode the clock is in, the edit buffers, and
//! whether the alarm is sounding. It never blocks and never touches hardware; the tasks in
//! [`crate::tasks`] call it while holding the shared lock.

use crate::{
    AlarmEvent, Clock, ClockTime, Event, Result, Screen, ScreenDriver,
    clock_time::{HOURS_TENS, MINUTES_UNITS, Step},
};

/// Number of digits the clock face uses: `HH MM`.
pub const FACE_DIGITS: u8 = 4;

// Positions in the least-significant-first digit order given to `Screen::write_bcd`.
const ALARM_POINT: usize = 0;
const SEPARATOR_POINT: usize = 2;

/// Modes of the alarm clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockState {
    /// The time has never been set. The face flashes `00:00`.
    #[default]
    Init,
    /// Showing the time.
    Normal,
    SetHours,
    SetMinutes,
    SetAlarmHours,
    SetAlarmMinutes,
}

impl ClockState {
    /// `true` in the four `Set*` states.
    #[must_use]
    pub const fn is_editing(self) -> bool {
        !matches!(self, Self::Init | Self::Normal)
    }

    /// Which digits and points blink in this state.
    #[must_use]
    const fn flash_layout(self, alarm_triggered: bool) -> FlashLayout {
        match self {
            Self::Init => FlashLayout {
                digits: Some((0, FACE_DIGITS - 1)),
                points: Some((1, 1)),
            },
            Self::Normal if alarm_triggered => FlashLayout {
                digits: Some((0, FACE_DIGITS - 1)),
                points: None,
            },
            Self::Normal => FlashLayout {
                digits: None,
                points: None,
            },
            Self::SetHours | Self::SetAlarmHours => FlashLayout {
                digits: Some((0, 1)),
                points: None,
            },
            Self::SetMinutes | Self::SetAlarmMinutes => FlashLayout {
                digits: Some((2, 3)),
                points: None,
            },
        }
    }
}

/// Digit and point ranges (inclusive, counted from the left) that should blink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct FlashLayout {
    digits: Option<(u8, u8)>,
    points: Option<(u8, u8)>,
}

impl FlashLayout {
    fn apply<D: ScreenDriver>(self, screen: &mut Screen<D>, divisor: u8) -> Result<()> {
        match self.digits {
            Some((from, to)) => screen.flash_digits(from, to, divisor)?,
            None => screen.flash_digits(0, 0, 0)?,
        }
        match self.points {
            Some((from, to)) => screen.flash_points(from, to, divisor),
            None => screen.flash_points(0, 0, 0),
        }
    }
}

/// The clock's mode, edit buffers and alarm latch.
///
/// ```
/// use core::num::NonZeroU16;
/// use alarm_clock::{Clock, ClockState, ClockTime, Controller, Event};
///
/// let mut clock = Clock::new(NonZeroU16::new(1000).expect("non-zero"));
/// let mut controller = Controller::new(5, 25);
///
/// controller.handle_event(&mut clock, Event::SetTime);
/// assert_eq!(controller.state(), ClockState::SetMinutes);
/// controller.handle_event(&mut clock, Event::Increment);
/// controller.handle_event(&mut clock, Event::Accept);
/// controller.handle_event(&mut clock, Event::Accept);
/// assert_eq!(controller.state(), ClockState::Normal);
/// assert_eq!(clock.time(), (true, ClockTime::from_hms(0, 1, 0)?));
/// # Ok::<(), alarm_clock::Error>(())
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Controller {
    state: ClockState,
    shown_time: ClockTime,
    edit_time: ClockTime,
    edit_alarm: ClockTime,
    alarm_triggered: bool,
    alarm_matched: bool,
    postpone_minutes: u8,
    flash_divisor: u8,
    applied_layout: Option<FlashLayout>,
}

impl Controller {
    /// `postpone_minutes` is the snooze length; `flash_divisor` sets the blink speed in full
    /// multiplex cycles.
    #[must_use]
    pub const fn new(postpone_minutes: u8, flash_divisor: u8) -> Self {
        Self {
            state: ClockState::Init,
            shown_time: ClockTime::MIDNIGHT,
            edit_time: ClockTime::MIDNIGHT,
            edit_alarm: ClockTime::MIDNIGHT,
            alarm_triggered: false,
            alarm_matched: false,
            postpone_minutes,
            flash_divisor,
            applied_layout: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ClockState {
        self.state
    }

    #[must_use]
    pub const fn is_alarm_triggered(&self) -> bool {
        self.alarm_triggered
    }

    /// The time last published for display.
    #[must_use]
    pub const fn shown_time(&self) -> ClockTime {
        self.shown_time
    }

    #[must_use]
    pub const fn edit_time(&self) -> ClockTime {
        self.edit_time
    }

    #[must_use]
    pub const fn edit_alarm(&self) -> ClockTime {
        self.edit_alarm
    }

    /// Runs one transition of the state machine.
    ///
    /// Returns the request the alarm task must act on, if any. Events that mean nothing in the
    /// current state are ignored.
    pub fn handle_event(&mut self, clock: &mut Clock, event: Event) -> Option<AlarmEvent> {
        #[cfg(feature = "defmt")]
        let old_state = self.state;
        let mut alarm_request = None;

        self.state = match (self.state, event) {
            (ClockState::Init | ClockState::Normal, Event::SetTime) => {
                self.edit_time = clock.time().1;
                ClockState::SetMinutes
            }
            (ClockState::Init | ClockState::Normal, Event::SetAlarm) => {
                self.edit_alarm = clock.alarm();
                ClockState::SetAlarmMinutes
            }
            (ClockState::Normal, Event::Accept) => {
                if self.alarm_triggered {
                    clock.postpone_alarm(self.postpone_minutes);
                    self.alarm_triggered = false;
                    alarm_request = Some(AlarmEvent::Deactivate);
                } else {
                    clock.enable_alarm();
                }
                ClockState::Normal
            }
            (ClockState::Normal, Event::Cancel) => {
                if self.alarm_triggered {
                    self.alarm_triggered = false;
                    alarm_request = Some(AlarmEvent::Deactivate);
                } else {
                    clock.disable_alarm();
                }
                ClockState::Normal
            }
            (
                ClockState::Init | ClockState::Normal,
                Event::Accept | Event::Cancel | Event::Increment | Event::Decrement,
            ) => self.state,

            (ClockState::SetMinutes, Event::Accept) => ClockState::SetHours,
            (ClockState::SetMinutes, Event::Increment) => {
                self.edit_time.step_minutes(Step::Increment);
                ClockState::SetMinutes
            }
            (ClockState::SetMinutes, Event::Decrement) => {
                self.edit_time.step_minutes(Step::Decrement);
                ClockState::SetMinutes
            }
            (ClockState::SetHours, Event::Accept) => {
                clock.set_time(self.edit_time.with_seconds_zeroed());
                self.shown_time = clock.time().1;
                ClockState::Normal
            }
            (ClockState::SetHours, Event::Increment) => {
                self.edit_time.step_hours(Step::Increment);
                ClockState::SetHours
            }
            (ClockState::SetHours, Event::Decrement) => {
                self.edit_time.step_hours(Step::Decrement);
                ClockState::SetHours
            }
            (ClockState::SetMinutes | ClockState::SetHours, Event::Cancel) => {
                let init = clock.cancel_set_time();
                self.shown_time = clock.time().1;
                if init {
                    ClockState::Init
                } else {
                    ClockState::Normal
                }
            }

            (ClockState::SetAlarmMinutes, Event::Accept) => ClockState::SetAlarmHours,
            (ClockState::SetAlarmMinutes, Event::Increment) => {
                self.edit_alarm.step_minutes(Step::Increment);
                ClockState::SetAlarmMinutes
            }
            (ClockState::SetAlarmMinutes, Event::Decrement) => {
                self.edit_alarm.step_minutes(Step::Decrement);
                ClockState::SetAlarmMinutes
            }
            (ClockState::SetAlarmHours, Event::Accept) => {
                clock.set_alarm(self.edit_alarm.with_seconds_zeroed());
                clock.enable_alarm();
                Self::idle_state(clock)
            }
            (ClockState::SetAlarmHours, Event::Increment) => {
                self.edit_alarm.step_hours(Step::Increment);
                ClockState::SetAlarmHours
            }
            (ClockState::SetAlarmHours, Event::Decrement) => {
                self.edit_alarm.step_hours(Step::Decrement);
                ClockState::SetAlarmHours
            }
            (ClockState::SetAlarmMinutes | ClockState::SetAlarmHours, Event::Cancel) => {
                Self::idle_state(clock)
            }

            (
                ClockState::SetMinutes
                | ClockState::SetHours
                | ClockState::SetAlarmMinutes
                | ClockState::SetAlarmHours,
                Event::SetTime | Event::SetAlarm,
            ) => self.state,
        };

        #[cfg(feature = "defmt")]
        if self.state != old_state {
            defmt::info!("{:?} --{:?}--> {:?}", old_state, event, self.state);
        }

        alarm_request
    }

    /// Copies the engine's time for display. Only `Init` and `Normal` follow the engine; the edit
    /// states show their own buffers.
    ///
    /// `Init` becomes `Normal` once the engine holds a valid time.
    pub fn publish_time(&mut self, clock: &Clock) {
        if self.state.is_editing() {
            return;
        }
        let (is_valid, time) = clock.time();
        self.shown_time = time;
        if self.state == ClockState::Init && is_valid && !clock.is_init_mode() {
            self.state = ClockState::Normal;
            #[cfg(feature = "defmt")]
            defmt::info!("Init --valid time--> Normal");
        }
    }

    /// Latches the alarm when the time starts matching it, the clock is in `Normal` and the alarm
    /// is not already sounding. Returns `true` if the alarm started sounding.
    ///
    /// Only the first check of a matching second counts, so a silenced alarm stays silent for the
    /// rest of that second.
    pub fn check_alarm(&mut self, clock: &Clock) -> bool {
        let matches = clock.alarm_matches_time();
        let starts_matching = matches && !self.alarm_matched;
        self.alarm_matched = matches;

        if starts_matching && !self.alarm_triggered && self.state == ClockState::Normal {
            self.alarm_triggered = true;
            #[cfg(feature = "defmt")]
            defmt::info!("Alarm triggered at {:?}", clock.alarm());
            return true;
        }
        false
    }

    /// Forces the alarm latch.
    pub fn set_alarm_triggered(&mut self, triggered: bool) {
        #[cfg(feature = "defmt")]
        if triggered != self.alarm_triggered {
            defmt::info!("Alarm latch forced to {}", triggered);
        }
        self.alarm_triggered = triggered;
    }

    /// Writes the face for the current state to `screen` and updates its flash windows when the
    /// state calls for different ones.
    ///
    /// `separator_on` is the blink phase of the seconds separator in `Normal`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidFlashRange`] if `screen` has fewer than [`FACE_DIGITS`] digits.
    pub fn compose<D: ScreenDriver>(
        &mut self,
        clock: &Clock,
        screen: &mut Screen<D>,
        separator_on: bool,
    ) -> Result<()> {
        let (time, separator, alarm_point) = match self.state {
            ClockState::Init => (self.shown_time, true, clock.is_alarm_enabled()),
            ClockState::Normal => (self.shown_time, separator_on, clock.is_alarm_enabled()),
            ClockState::SetHours | ClockState::SetMinutes => (self.edit_time, false, false),
            ClockState::SetAlarmHours | ClockState::SetAlarmMinutes => {
                (self.edit_alarm, false, true)
            }
        };

        let mut points = [false; FACE_DIGITS as usize];
        if let Some(point) = points.get_mut(SEPARATOR_POINT) {
            *point = separator;
        }
        if let Some(point) = points.get_mut(ALARM_POINT) {
            *point = alarm_point;
        }
        let bcd = time.bcd();
        screen.write_bcd(bcd.get(MINUTES_UNITS..=HOURS_TENS).unwrap_or(&[]), &points);

        let layout = self.state.flash_layout(self.alarm_triggered);
        if self.applied_layout != Some(layout) {
            layout.apply(screen, self.flash_divisor)?;
            self.applied_layout = Some(layout);
        }
        Ok(())
    }

    const fn idle_state(clock: &Clock) -> ClockState {
        if clock.is_valid() {
            ClockState::Normal
        } else {
            ClockState::Init
        }
    }
}
