//! The six buttons of the alarm clock.

use crate::{DigitalInput, Event, Result};

/// The six button lines, each turned into an [`Event`] when pressed.
///
/// ```
/// use alarm_clock::{Buttons, Event, InputLine, Polarity};
/// use embedded_hal_mock::eh1::digital::{Mock, State, Transaction};
///
/// // Set-time is released and accept is pressed; the lines after accept are not read.
/// let released = || InputLine::new(Mock::new(&[Transaction::get(State::Low)]), Polarity::ActiveHigh);
/// let pressed = || InputLine::new(Mock::new(&[Transaction::get(State::High)]), Polarity::ActiveHigh);
/// let idle = || InputLine::new(Mock::new(&[]), Polarity::ActiveHigh);
/// let mut buttons = Buttons::new(released(), released(), pressed(), idle(), idle(), idle());
///
/// assert_eq!(buttons.poll()?, Some(Event::Accept));
/// for line in buttons.into_lines() {
///     line.release().done();
/// }
/// # Ok::<(), alarm_clock::Error>(())
/// ```
pub struct Buttons<I> {
    set_time: I,
    set_alarm: I,
    accept: I,
    cancel: I,
    increment: I,
    decrement: I,
}

impl<I: DigitalInput> Buttons<I> {
    pub const fn new(
        set_time: I,
        set_alarm: I,
        accept: I,
        cancel: I,
        increment: I,
        decrement: I,
    ) -> Self {
        Self {
            set_time,
            set_alarm,
            accept,
            cancel,
            increment,
            decrement,
        }
    }

    /// Samples the lines in priority order (set-time, set-alarm, accept, cancel, increment,
    /// decrement) and returns the event of the first one that has just been pressed.
    ///
    /// Lines after the first pressed one are not sampled, so their presses are seen on a later
    /// poll.
    ///
    /// # Errors
    ///
    /// Returns the error of the first line that cannot be read.
    pub fn poll(&mut self) -> Result<Option<Event>> {
        for (line, event) in [
            (&mut self.set_time, Event::SetTime),
            (&mut self.set_alarm, Event::SetAlarm),
            (&mut self.accept, Event::Accept),
            (&mut self.cancel, Event::Cancel),
            (&mut self.increment, Event::Increment),
            (&mut self.decrement, Event::Decrement),
        ] {
            if line.has_activated()? {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    /// Gives back the lines in priority order.
    pub fn into_lines(self) -> [I; 6] {
        [
            self.set_time,
            self.set_alarm,
            self.accept,
            self.cancel,
            self.increment,
            self.decrement,
        ]
    }
}
