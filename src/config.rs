//! Timing and behavior settings for the clock tasks.

use core::num::NonZeroU16;

use embassy_time::Duration;

const DEFAULT_TICKS_PER_SECOND: NonZeroU16 = match NonZeroU16::new(1000) {
    Some(ticks) => ticks,
    None => panic!("ticks per second must be non-zero"),
};

/// Settings shared by the clock tasks. [`ClockConfig::new`] gives the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Engine ticks per second. Must match `tick_period`.
    pub ticks_per_second: NonZeroU16,
    pub tick_period: Duration,
    /// One digit is drawn per refresh.
    pub refresh_period: Duration,
    pub input_poll_period: Duration,
    /// Pause after a button press is accepted.
    pub debounce: Duration,
    /// Seconds separator toggle period.
    pub blink_period: Duration,
    pub watchdog_period: Duration,
    /// How long an edit state may go without a button press before it is cancelled.
    pub inactivity_timeout: Duration,
    /// Snooze length.
    pub postpone_minutes: u8,
    /// Blink half-period, in full multiplex cycles.
    pub flash_divisor: u8,
}

impl ClockConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            tick_period: Duration::from_millis(1),
            refresh_period: Duration::from_millis(3),
            input_poll_period: Duration::from_millis(2),
            debounce: Duration::from_millis(30),
            blink_period: Duration::from_secs(1),
            watchdog_period: Duration::from_millis(100),
            inactivity_timeout: Duration::from_secs(30),
            postpone_minutes: 5,
            flash_divisor: 25,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::new()
    }
}
