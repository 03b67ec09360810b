//! Binary-coded-decimal wall-clock time.
//!
//! See [`ClockTime`] for the digit layout.

use core::fmt;

use crate::{Error, Result};

/// Index of the seconds units digit.
pub const SECONDS_UNITS: usize = 0;
/// Index of the seconds tens digit.
pub const SECONDS_TENS: usize = 1;
/// Index of the minutes units digit.
pub const MINUTES_UNITS: usize = 2;
/// Index of the minutes tens digit.
pub const MINUTES_TENS: usize = 3;
/// Index of the hours units digit.
pub const HOURS_UNITS: usize = 4;
/// Index of the hours tens digit.
pub const HOURS_TENS: usize = 5;

/// Number of BCD digits in a [`ClockTime`].
pub const BCD_DIGITS: usize = 6;

const MINUTES_PER_HOUR: u8 = 60;
const HOURS_PER_DAY: u8 = 24;

/// A time of day as six BCD digits, least significant first:
/// seconds units, seconds tens, minutes units, minutes tens, hours units, hours tens.
///
/// The digits are stored as given. Nothing here range-checks them except [`ClockTime::from_hms`];
/// comparisons are digit-by-digit, so a malformed value never equals a well-formed one.
///
/// ```
/// use alarm_clock::ClockTime;
///
/// let time = ClockTime::from_bcd([5, 4, 3, 2, 1, 0]);
/// assert_eq!((time.hours(), time.minutes(), time.seconds()), (1, 23, 45));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime([u8; BCD_DIGITS]);

/// Direction of a user edit on a two-digit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Increment,
    Decrement,
}

impl Step {
    /// Steps `value` within `0..limit`, wrapping at both ends. Out-of-range values wrap too.
    #[must_use]
    pub fn apply(self, value: u8, limit: u8) -> u8 {
        match self {
            Self::Increment => value.checked_add(1).filter(|next| *next < limit).unwrap_or(0),
            Self::Decrement => value
                .checked_sub(1)
                .filter(|next| *next < limit)
                .unwrap_or_else(|| limit.saturating_sub(1)),
        }
    }
}

impl ClockTime {
    /// `00:00:00`.
    pub const MIDNIGHT: Self = Self([0; BCD_DIGITS]);

    /// Wraps raw BCD digits without checking them.
    #[must_use]
    pub const fn from_bcd(bcd: [u8; BCD_DIGITS]) -> Self {
        Self(bcd)
    }

    /// Builds a time from decimal hours, minutes and seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimeOutOfRange`] unless `hours < 24`, `minutes < 60` and `seconds < 60`.
    pub fn from_hms(hours: u8, minutes: u8, seconds: u8) -> Result<Self> {
        if hours >= HOURS_PER_DAY || minutes >= MINUTES_PER_HOUR || seconds >= MINUTES_PER_HOUR {
            return Err(Error::TimeOutOfRange {
                hours,
                minutes,
                seconds,
            });
        }
        let (seconds_units, seconds_tens) = split(seconds);
        let (minutes_units, minutes_tens) = split(minutes);
        let (hours_units, hours_tens) = split(hours);
        Ok(Self([
            seconds_units,
            seconds_tens,
            minutes_units,
            minutes_tens,
            hours_units,
            hours_tens,
        ]))
    }

    /// The raw BCD digits, least significant first.
    #[must_use]
    pub const fn bcd(&self) -> [u8; BCD_DIGITS] {
        self.0
    }

    #[must_use]
    pub const fn hours(&self) -> u8 {
        join(self.0[HOURS_UNITS], self.0[HOURS_TENS])
    }

    #[must_use]
    pub const fn minutes(&self) -> u8 {
        join(self.0[MINUTES_UNITS], self.0[MINUTES_TENS])
    }

    #[must_use]
    pub const fn seconds(&self) -> u8 {
        join(self.0[SECONDS_UNITS], self.0[SECONDS_TENS])
    }

    /// The same time with both seconds digits cleared.
    #[must_use]
    pub const fn with_seconds_zeroed(self) -> Self {
        let mut bcd = self.0;
        bcd[SECONDS_UNITS] = 0;
        bcd[SECONDS_TENS] = 0;
        Self(bcd)
    }

    /// Replaces the minutes pair with `minutes` (decimal, expected `< 60`).
    pub fn set_minutes(&mut self, minutes: u8) {
        (self.0[MINUTES_UNITS], self.0[MINUTES_TENS]) = split(minutes);
    }

    /// Replaces the hours pair with `hours` (decimal, expected `< 24`).
    pub fn set_hours(&mut self, hours: u8) {
        (self.0[HOURS_UNITS], self.0[HOURS_TENS]) = split(hours);
    }

    /// Steps the minutes as a decimal number, wrapping between 59 and 0.
    pub fn step_minutes(&mut self, step: Step) {
        self.set_minutes(step.apply(self.minutes(), MINUTES_PER_HOUR));
    }

    /// Steps the hours as a decimal number, wrapping between 23 and 0.
    pub fn step_hours(&mut self, step: Step) {
        self.set_hours(step.apply(self.hours(), HOURS_PER_DAY));
    }

    /// Advances by one second, carrying digit by digit.
    ///
    /// Seconds and minutes carry at 10 (units) and 6 (tens); the hours units carry at 10 and
    /// the pair resets to zero on reaching 24.
    pub fn advance_one_second(&mut self) {
        let digits = &mut self.0;
        digits[SECONDS_UNITS] = digits[SECONDS_UNITS].wrapping_add(1);
        if digits[SECONDS_UNITS] == 10 {
            digits[SECONDS_UNITS] = 0;
            digits[SECONDS_TENS] = digits[SECONDS_TENS].wrapping_add(1);
        }
        if digits[SECONDS_TENS] == 6 {
            digits[SECONDS_TENS] = 0;
            digits[MINUTES_UNITS] = digits[MINUTES_UNITS].wrapping_add(1);
        }
        if digits[MINUTES_UNITS] == 10 {
            digits[MINUTES_UNITS] = 0;
            digits[MINUTES_TENS] = digits[MINUTES_TENS].wrapping_add(1);
        }
        if digits[MINUTES_TENS] == 6 {
            digits[MINUTES_TENS] = 0;
            digits[HOURS_UNITS] = digits[HOURS_UNITS].wrapping_add(1);
        }
        if digits[HOURS_UNITS] == 10 {
            digits[HOURS_UNITS] = 0;
            digits[HOURS_TENS] = digits[HOURS_TENS].wrapping_add(1);
        }
        if digits[HOURS_TENS] == 2 && digits[HOURS_UNITS] == 4 {
            digits[HOURS_UNITS] = 0;
            digits[HOURS_TENS] = 0;
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [seconds_units, seconds_tens, minutes_units, minutes_tens, hours_units, hours_tens] =
            self.0;
        write!(
            formatter,
            "{hours_tens}{hours_units}:{minutes_tens}{minutes_units}:{seconds_tens}{seconds_units}"
        )
    }
}

#[inline]
const fn join(units: u8, tens: u8) -> u8 {
    tens.wrapping_mul(10).wrapping_add(units)
}

#[inline]
#[expect(
    clippy::integer_division_remainder_used,
    reason = "Splitting a decimal value into its BCD digits"
)]
const fn split(value: u8) -> (u8, u8) {
    (value % 10, value / 10)
}
