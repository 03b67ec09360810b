//! Multiplexed 7-segment screen: digit buffers, one-digit-per-call refresh and flicker windows.
//!
//! See [`Screen`] for usage.

use heapless::Vec;

use crate::{Error, Result};

/// Largest number of digits a [`Screen`] drives.
pub const MAX_DIGITS: usize = 8;

// ============================================================================
// Segment constants
// ============================================================================

pub const SEGMENT_A: u8 = 0b_0000_0001;
pub const SEGMENT_B: u8 = 0b_0000_0010;
pub const SEGMENT_C: u8 = 0b_0000_0100;
pub const SEGMENT_D: u8 = 0b_0000_1000;
pub const SEGMENT_E: u8 = 0b_0001_0000;
pub const SEGMENT_F: u8 = 0b_0010_0000;
pub const SEGMENT_G: u8 = 0b_0100_0000;
/// Decimal point.
pub const SEGMENT_P: u8 = 0b_1000_0000;

/// Segment images for the decimal digits 0-9.
pub const IMAGES: [u8; 10] = [
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F, // 0
    SEGMENT_B | SEGMENT_C,                                                 // 1
    SEGMENT_A | SEGMENT_B | SEGMENT_D | SEGMENT_E | SEGMENT_G,             // 2
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_G,             // 3
    SEGMENT_B | SEGMENT_C | SEGMENT_F | SEGMENT_G,                         // 4
    SEGMENT_A | SEGMENT_C | SEGMENT_D | SEGMENT_F | SEGMENT_G,             // 5
    SEGMENT_A | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F | SEGMENT_G, // 6
    SEGMENT_A | SEGMENT_B | SEGMENT_C,                                     // 7
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F | SEGMENT_G, // 8
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_F | SEGMENT_G, // 9
];

/// The three primitives a multiplexed display needs from the hardware.
///
/// Implemented by [`PinScreen`](crate::PinScreen) for GPIO pins, and by test doubles.
pub trait ScreenDriver {
    /// Powers every digit off.
    ///
    /// # Errors
    ///
    /// Returns an error if an output cannot be driven.
    fn digits_turn_off(&mut self) -> Result<()>;

    /// Drives the segment lines. `points` is either `0` or [`SEGMENT_P`].
    ///
    /// # Errors
    ///
    /// Returns an error if an output cannot be driven.
    fn segments_update(&mut self, segments: u8, points: u8) -> Result<()>;

    /// Powers the digit at `digit`, counted from the left.
    ///
    /// # Errors
    ///
    /// Returns an error if an output cannot be driven or `digit` has no line.
    fn digit_turn_on(&mut self, digit: u8) -> Result<()>;
}

/// A digit range blanked for the first half of every `2 × divisor` multiplex cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct FlashWindow {
    from: u8,
    to: u8,
    period: u16,
    count: u16,
}

impl FlashWindow {
    fn new(from: u8, to: u8, divisor: u8) -> Self {
        Self {
            from,
            to,
            period: u16::from(divisor).wrapping_mul(2),
            count: 0,
        }
    }

    /// Called once per full multiplex cycle.
    fn advance(&mut self) {
        if self.period != 0 {
            self.count = self.count.wrapping_add(1);
            if self.count >= self.period {
                self.count = 0;
            }
        }
    }

    fn blanks(&self, digit: u8) -> bool {
        self.period != 0
            && self.count < self.period / 2
            && (self.from..=self.to).contains(&digit)
    }
}

/// A multiplexed 7-segment screen of one to [`MAX_DIGITS`] digits.
///
/// Only one digit is lit at a time. Each [`Screen::refresh`] call moves to the next digit, so it
/// must be called often (every few milliseconds) for the whole screen to look steadily lit.
///
/// Digit `0` is the leftmost. [`Screen::write_bcd`] takes its digits least significant first, the
/// same order as [`ClockTime`](crate::ClockTime), and lays them out right to left.
///
/// ```
/// use alarm_clock::{Result, Screen, ScreenDriver, IMAGES, SEGMENT_P};
///
/// #[derive(Default)]
/// struct LastDigit(u8, u8);
///
/// impl ScreenDriver for LastDigit {
///     fn digits_turn_off(&mut self) -> Result<()> { Ok(()) }
///     fn segments_update(&mut self, segments: u8, points: u8) -> Result<()> {
///         self.0 = segments | points;
///         Ok(())
///     }
///     fn digit_turn_on(&mut self, digit: u8) -> Result<()> {
///         self.1 = digit;
///         Ok(())
///     }
/// }
///
/// let mut screen = Screen::new(4, LastDigit::default());
/// // 12:34, separator point after the hours.
/// screen.write_bcd(&[4, 3, 2, 1], &[false, false, true, false]);
/// screen.refresh()?;
/// assert_eq!((screen.driver().0, screen.driver().1), (IMAGES[1], 0));
/// screen.refresh()?;
/// assert_eq!((screen.driver().0, screen.driver().1), (IMAGES[2] | SEGMENT_P, 1));
/// # Ok::<(), alarm_clock::Error>(())
/// ```
pub struct Screen<D> {
    driver: D,
    segments: Vec<u8, MAX_DIGITS>,
    points: Vec<u8, MAX_DIGITS>,
    current_digit: u8,
    digit_flash: FlashWindow,
    point_flash: FlashWindow,
}

impl<D: ScreenDriver> Screen<D> {
    /// Creates a blank screen. `digits` is clamped to `1..=MAX_DIGITS`.
    #[must_use]
    pub fn new(digits: u8, driver: D) -> Self {
        let digits = usize::from(digits).clamp(1, MAX_DIGITS);
        let blank: Vec<u8, MAX_DIGITS> = core::iter::repeat_n(0, digits).collect();
        Self {
            driver,
            segments: blank.clone(),
            points: blank,
            // The first refresh wraps to digit 0 and starts a new cycle.
            current_digit: digit_index(digits.saturating_sub(1)),
            digit_flash: FlashWindow::default(),
            point_flash: FlashWindow::default(),
        }
    }

    /// Number of digits on this screen.
    #[must_use]
    pub fn digits(&self) -> u8 {
        digit_index(self.segments.len())
    }

    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    pub const fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[must_use]
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Replaces the screen contents with BCD digits, least significant first.
    ///
    /// `values[0]` lands on the rightmost digit. `points[i]` stays attached to `values[i]`.
    /// Digits beyond the screen width are ignored, digits not given are blank, and values
    /// outside 0-9 show blank.
    pub fn write_bcd(&mut self, values: &[u8], points: &[bool]) {
        self.segments.iter_mut().for_each(|segments| *segments = 0);
        self.points.iter_mut().for_each(|point| *point = 0);

        for (target, value) in self.segments.iter_mut().rev().zip(values) {
            *target = IMAGES.get(usize::from(*value)).copied().unwrap_or(0);
        }
        for (target, point) in self.points.iter_mut().rev().zip(points) {
            *target = if *point { SEGMENT_P } else { 0 };
        }
    }

    /// Shows the next digit: all digits off, advance, drive segments, light the new digit.
    ///
    /// Flicker counters advance each time the scan wraps back to digit 0.
    ///
    /// # Errors
    ///
    /// Returns the driver's error.
    pub fn refresh(&mut self) -> Result<()> {
        self.driver.digits_turn_off()?;

        let next = self.current_digit.wrapping_add(1);
        self.current_digit = if next >= self.digits() { 0 } else { next };
        if self.current_digit == 0 {
            self.digit_flash.advance();
            self.point_flash.advance();
        }

        let index = usize::from(self.current_digit);
        let segments = if self.digit_flash.blanks(self.current_digit) {
            0
        } else {
            self.segments.get(index).copied().unwrap_or(0)
        };
        let points = if self.point_flash.blanks(self.current_digit) {
            0
        } else {
            self.points.get(index).copied().unwrap_or(0)
        };

        self.driver.segments_update(segments, points)?;
        self.driver.digit_turn_on(self.current_digit)
    }

    /// Blinks digits `from..=to`: blank for `divisor` multiplex cycles, shown for `divisor`.
    ///
    /// A `divisor` of 0 stops blinking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFlashRange`] if `from > to` or `to` is not a digit of this screen.
    /// The current window is then left unchanged.
    pub fn flash_digits(&mut self, from: u8, to: u8, divisor: u8) -> Result<()> {
        self.digit_flash = self.flash_window(from, to, divisor)?;
        Ok(())
    }

    /// Blinks the decimal points of digits `from..=to`, like [`Screen::flash_digits`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFlashRange`] if `from > to` or `to` is not a digit of this screen.
    pub fn flash_points(&mut self, from: u8, to: u8, divisor: u8) -> Result<()> {
        self.point_flash = self.flash_window(from, to, divisor)?;
        Ok(())
    }

    fn flash_window(&self, from: u8, to: u8, divisor: u8) -> Result<FlashWindow> {
        let digits = self.digits();
        if from > to || to >= digits {
            return Err(Error::InvalidFlashRange { from, to, digits });
        }
        Ok(FlashWindow::new(from, to, divisor))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Digit positions are bounded by MAX_DIGITS"
)]
const fn digit_index(index: usize) -> u8 {
    index as u8
}
