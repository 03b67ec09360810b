//! The clock/alarm engine: current time and alarm time in BCD, advanced by ticks.
//!
//! See [`Clock`] for usage.

use core::num::NonZeroU16;

use crate::clock_time::ClockTime;

const MINUTES_PER_HOUR: u16 = 60;
const HOURS_PER_DAY: u16 = 24;

/// Keeps the time of day and one alarm.
///
/// The engine starts with an invalid (zeroed) time and a disabled, zeroed alarm. Time only
/// advances once it has been set with [`Clock::set_time`].
///
/// ```
/// use core::num::NonZeroU16;
/// use alarm_clock::{Clock, ClockTime};
///
/// let mut clock = Clock::new(NonZeroU16::new(5).expect("non-zero"));
/// clock.set_time(ClockTime::MIDNIGHT);
/// for _ in 0..5 {
///     clock.tick();
/// }
/// assert_eq!(clock.time(), (true, ClockTime::from_bcd([1, 0, 0, 0, 0, 0])));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clock {
    ticks_per_second: NonZeroU16,
    tick_counter: u16,
    time: ClockTime,
    is_valid: bool,
    alarm: ClockTime,
    alarm_enabled: bool,
    init_mode: bool,
}

impl Clock {
    /// Creates an engine that advances one second every `ticks_per_second` calls to [`Clock::tick`].
    #[must_use]
    pub const fn new(ticks_per_second: NonZeroU16) -> Self {
        Self {
            ticks_per_second,
            tick_counter: 0,
            time: ClockTime::MIDNIGHT,
            is_valid: false,
            alarm: ClockTime::MIDNIGHT,
            alarm_enabled: false,
            init_mode: false,
        }
    }

    /// A copy of the current time, with `true` once the time has been set.
    #[must_use]
    pub const fn time(&self) -> (bool, ClockTime) {
        (self.is_valid, self.time)
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Sets the current time. The value is taken as is; range checking is up to the caller.
    ///
    /// Marks the time valid, leaves init mode and restarts the sub-second tick count.
    /// Always returns `true`.
    pub fn set_time(&mut self, new_time: ClockTime) -> bool {
        self.time = new_time;
        self.is_valid = true;
        self.init_mode = false;
        self.tick_counter = 0;
        self.is_valid
    }

    /// Counts one tick, advancing the time by one second every `ticks_per_second` ticks.
    ///
    /// Ticks are ignored while the time is invalid or the engine is in init mode.
    pub fn tick(&mut self) {
        if !self.is_valid || self.init_mode {
            return;
        }
        self.tick_counter = self.tick_counter.saturating_add(1);
        if self.tick_counter >= self.ticks_per_second.get() {
            self.tick_counter = 0;
            self.time.advance_one_second();
        }
    }

    pub fn set_alarm(&mut self, alarm: ClockTime) {
        self.alarm = alarm;
    }

    #[must_use]
    pub const fn alarm(&self) -> ClockTime {
        self.alarm
    }

    pub fn enable_alarm(&mut self) {
        self.alarm_enabled = true;
    }

    pub fn disable_alarm(&mut self) {
        self.alarm_enabled = false;
    }

    #[must_use]
    pub const fn is_alarm_enabled(&self) -> bool {
        self.alarm_enabled
    }

    /// `true` when the alarm is enabled and all six BCD digits of time and alarm are equal.
    #[must_use]
    pub fn alarm_matches_time(&self) -> bool {
        self.alarm_enabled && self.time == self.alarm
    }

    /// Moves an enabled alarm `minutes` later, wrapping past midnight. Alarm seconds are kept.
    ///
    /// Does nothing when the alarm is disabled or `minutes` is zero.
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::integer_division_remainder_used,
        clippy::cast_possible_truncation,
        reason = "Operands are bounded by u8 inputs; the modulo keeps results below 60 and 24"
    )]
    pub fn postpone_alarm(&mut self, minutes: u8) {
        if !self.alarm_enabled || minutes == 0 {
            return;
        }
        let total = u16::from(self.alarm.minutes()) + u16::from(minutes);
        let hours = (u16::from(self.alarm.hours()) + total / MINUTES_PER_HOUR) % HOURS_PER_DAY;
        self.alarm.set_minutes((total % MINUTES_PER_HOUR) as u8);
        self.alarm.set_hours(hours as u8);
    }

    /// Abandons a time edit.
    ///
    /// If the time has never been set, zeroes it, enters init mode and returns `true`: the caller
    /// should keep showing a flashing `00:00`. Otherwise just leaves init mode and returns `false`.
    pub fn cancel_set_time(&mut self) -> bool {
        if self.is_valid {
            self.init_mode = false;
        } else {
            self.time = ClockTime::MIDNIGHT;
            self.tick_counter = 0;
            self.init_mode = true;
        }
        self.init_mode
    }

    #[must_use]
    pub const fn is_init_mode(&self) -> bool {
        self.init_mode
    }
}
