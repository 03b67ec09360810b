//! Logical digital inputs and outputs.
//!
//! The traits speak in terms of *active* and *inactive* so the rest of the crate never needs to
//! know whether a line is wired active-high or active-low.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::{Error, Result};

/// A line that can be sampled, with edge detection.
pub trait DigitalInput {
    /// Whether the line is active right now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CannotReadInputState`] if the line cannot be read.
    fn is_active(&mut self) -> Result<bool>;

    /// `true` exactly once per inactive-to-active transition, as seen between successive calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CannotReadInputState`] if the line cannot be read.
    fn has_activated(&mut self) -> Result<bool>;
}

/// A line that can be switched on and off.
pub trait DigitalOutput {
    /// # Errors
    ///
    /// Returns [`Error::CannotSetOutputState`] if the line cannot be driven.
    fn activate(&mut self) -> Result<()>;

    /// # Errors
    ///
    /// Returns [`Error::CannotSetOutputState`] if the line cannot be driven.
    fn deactivate(&mut self) -> Result<()>;

    /// # Errors
    ///
    /// Returns [`Error::CannotSetOutputState`] if the line cannot be driven.
    fn toggle(&mut self) -> Result<()>;

    fn is_active(&self) -> bool;
}

/// Whether a line is active at its high or its low level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    #[default]
    ActiveHigh,
    /// For example, a button that pulls a pulled-up pin to ground.
    ActiveLow,
}

impl Polarity {
    const fn active_state(self) -> PinState {
        match self {
            Self::ActiveHigh => PinState::High,
            Self::ActiveLow => PinState::Low,
        }
    }

    const fn inactive_state(self) -> PinState {
        match self {
            Self::ActiveHigh => PinState::Low,
            Self::ActiveLow => PinState::High,
        }
    }
}

/// An [`InputPin`] seen as a [`DigitalInput`].
///
/// ```
/// use alarm_clock::{DigitalInput, InputLine, Polarity};
/// use embedded_hal_mock::eh1::digital::{Mock, State, Transaction};
///
/// let expectations = [
///     Transaction::get(State::High),
///     Transaction::get(State::Low),
///     Transaction::get(State::Low),
/// ];
/// let mut button = InputLine::new(Mock::new(&expectations), Polarity::ActiveLow);
/// assert!(!button.has_activated()?); // released
/// assert!(button.has_activated()?); // pressed
/// assert!(!button.has_activated()?); // still held
/// button.release().done();
/// # Ok::<(), alarm_clock::Error>(())
/// ```
pub struct InputLine<P> {
    pin: P,
    polarity: Polarity,
    was_active: bool,
}

impl<P: InputPin> InputLine<P> {
    /// The line starts out as inactive, so a line already active on the first
    /// [`DigitalInput::has_activated`] counts as a new activation.
    pub const fn new(pin: P, polarity: Polarity) -> Self {
        Self {
            pin,
            polarity,
            was_active: false,
        }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> DigitalInput for InputLine<P> {
    fn is_active(&mut self) -> Result<bool> {
        let is_high = self.pin.is_high().map_err(|_| Error::CannotReadInputState)?;
        Ok(is_high == (self.polarity == Polarity::ActiveHigh))
    }

    fn has_activated(&mut self) -> Result<bool> {
        let is_active = self.is_active()?;
        let activated = is_active && !self.was_active;
        self.was_active = is_active;
        Ok(activated)
    }
}

/// An [`OutputPin`] seen as a [`DigitalOutput`].
///
/// Keeps its own copy of the logical state so [`DigitalOutput::toggle`] works on pins that cannot
/// be read back.
pub struct OutputLine<P> {
    pin: P,
    polarity: Polarity,
    is_active: bool,
}

impl<P: OutputPin> OutputLine<P> {
    /// Takes the pin and drives it inactive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CannotSetOutputState`] if the pin cannot be driven.
    pub fn new(pin: P, polarity: Polarity) -> Result<Self> {
        let mut line = Self {
            pin,
            polarity,
            is_active: false,
        };
        line.deactivate()?;
        Ok(line)
    }

    pub fn release(self) -> P {
        self.pin
    }

    fn drive(&mut self, active: bool) -> Result<()> {
        let state = if active {
            self.polarity.active_state()
        } else {
            self.polarity.inactive_state()
        };
        self.pin
            .set_state(state)
            .map_err(|_| Error::CannotSetOutputState)?;
        self.is_active = active;
        Ok(())
    }
}

impl<P: OutputPin> DigitalOutput for OutputLine<P> {
    fn activate(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn deactivate(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn toggle(&mut self) -> Result<()> {
        self.drive(!self.is_active)
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use embedded_hal_mock::eh1::{
        MockError,
        digital::{Mock, State, Transaction},
    };

    use super::*;

    #[test]
    fn active_high_input_reports_level() {
        let expectations = [Transaction::get(State::High), Transaction::get(State::Low)];
        let mut line = InputLine::new(Mock::new(&expectations), Polarity::ActiveHigh);
        assert!(line.is_active().expect("mock pins never fail"));
        assert!(!line.is_active().expect("mock pins never fail"));
        line.release().done();
    }

    #[test]
    fn is_active_does_not_consume_the_edge() {
        let expectations = [Transaction::get(State::High), Transaction::get(State::High)];
        let mut line = InputLine::new(Mock::new(&expectations), Polarity::ActiveHigh);
        assert!(line.is_active().expect("mock pins never fail"));
        assert!(line.has_activated().expect("mock pins never fail"));
        line.release().done();
    }

    #[test]
    fn each_press_activates_once() {
        let expectations = [
            Transaction::get(State::High),
            Transaction::get(State::High),
            Transaction::get(State::Low),
            Transaction::get(State::High),
        ];
        let mut line = InputLine::new(Mock::new(&expectations), Polarity::ActiveHigh);
        let seen: std::vec::Vec<bool> = (0..4)
            .map(|_| line.has_activated().expect("mock pins never fail"))
            .collect();
        assert_eq!(seen, [true, false, false, true]);
        line.release().done();
    }

    #[test]
    fn output_starts_inactive_and_toggles() {
        let expectations = [
            Transaction::set(State::High),
            Transaction::set(State::Low),
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ];
        let mut line =
            OutputLine::new(Mock::new(&expectations), Polarity::ActiveLow).expect("mock pins never fail");
        assert!(!line.is_active());
        line.toggle().expect("mock pins never fail");
        assert!(line.is_active());
        line.deactivate().expect("mock pins never fail");
        line.activate().expect("mock pins never fail");
        assert!(line.is_active());
        line.release().done();
    }

    #[test]
    fn pin_failures_map_to_line_errors() {
        let failing_read =
            [Transaction::get(State::High).with_error(MockError::Io(ErrorKind::NotConnected))];
        let mut input = InputLine::new(Mock::new(&failing_read), Polarity::ActiveHigh);
        assert!(matches!(input.has_activated(), Err(Error::CannotReadInputState)));
        input.release().done();

        let failing_write =
            [Transaction::set(State::Low).with_error(MockError::Io(ErrorKind::NotConnected))];
        let mut pin = Mock::new(&failing_write);
        assert!(matches!(
            OutputLine::new(pin.clone(), Polarity::ActiveHigh),
            Err(Error::CannotSetOutputState)
        ));
        pin.done();
    }
}
