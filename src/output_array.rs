//! GPIO output arrays and the pin-driven [`ScreenDriver`].

use embedded_hal::digital::{OutputPin, PinState};

use crate::{Error, Result, ScreenDriver};

/// Number of segment lines, decimal point included.
pub const SEGMENT_COUNT: usize = u8::BITS as usize;

/// Array of GPIO output pins.
///
/// See [`PinScreen`] for usage.
pub struct OutputArray<P, const N: usize>([P; N]);

impl<P: OutputPin, const N: usize> OutputArray<P, N> {
    pub const fn new(outputs: [P; N]) -> Self {
        Self(outputs)
    }

    /// Drives every pin to `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CannotSetOutputState`] if a pin rejects the write.
    #[inline]
    pub fn set_all(&mut self, state: PinState) -> Result<()> {
        for output in &mut self.0 {
            output
                .set_state(state)
                .map_err(|_| Error::CannotSetOutputState)?;
        }
        Ok(())
    }

    /// Drives the pin at `index` to `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if there is no pin at `index`, or
    /// [`Error::CannotSetOutputState`] if the pin rejects the write.
    #[inline]
    pub fn set_state_at_index(&mut self, index: u8, state: PinState) -> Result<()> {
        self.0
            .get_mut(usize::from(index))
            .ok_or(Error::IndexOutOfBounds)?
            .set_state(state)
            .map_err(|_| Error::CannotSetOutputState)
    }

    pub fn into_inner(self) -> [P; N] {
        self.0
    }
}

impl<P: OutputPin> OutputArray<P, SEGMENT_COUNT> {
    /// Drives pin `i` high exactly when bit `i` of `bits` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CannotSetOutputState`] if a pin rejects the write.
    #[inline]
    pub fn set_from_bits(&mut self, bits: u8) -> Result<()> {
        let mut remaining = bits;
        for output in &mut self.0 {
            output
                .set_state(((remaining & 1) == 1).into())
                .map_err(|_| Error::CannotSetOutputState)?;
            remaining >>= 1;
        }
        Ok(())
    }
}

/// A multiplexed common-cathode display wired straight to GPIO pins.
///
/// Segment lines are active high (A on the first pin, decimal point on the last). Cell lines sink
/// the digit's current, so a cell is lit while its pin is low.
///
/// ```
/// use alarm_clock::{OutputArray, PinScreen, Screen};
/// use embedded_hal_mock::eh1::digital::{Mock, State, Transaction};
///
/// let cell_expectations = [
///     // digits_turn_off, then digit_turn_on(0)
///     Transaction::set(State::High),
///     Transaction::set(State::Low),
/// ];
/// let cell = Mock::new(&cell_expectations);
/// // A blank screen drives every segment low.
/// let segments: [Mock; 8] = core::array::from_fn(|_| Mock::new(&[Transaction::set(State::Low)]));
///
/// let mut screen = Screen::new(1, PinScreen::new(OutputArray::new([cell]), OutputArray::new(segments)));
/// screen.refresh()?;
///
/// let (cells, segments) = screen.into_driver().release();
/// for mut pin in cells.into_inner().into_iter().chain(segments.into_inner()) {
///     pin.done();
/// }
/// # Ok::<(), alarm_clock::Error>(())
/// ```
pub struct PinScreen<P, const CELLS: usize> {
    cells: OutputArray<P, CELLS>,
    segments: OutputArray<P, SEGMENT_COUNT>,
}

impl<P: OutputPin, const CELLS: usize> PinScreen<P, CELLS> {
    pub const fn new(cells: OutputArray<P, CELLS>, segments: OutputArray<P, SEGMENT_COUNT>) -> Self {
        Self { cells, segments }
    }

    /// Gives back the pins.
    pub fn release(self) -> (OutputArray<P, CELLS>, OutputArray<P, SEGMENT_COUNT>) {
        (self.cells, self.segments)
    }
}

impl<P: OutputPin, const CELLS: usize> ScreenDriver for PinScreen<P, CELLS> {
    fn digits_turn_off(&mut self) -> Result<()> {
        self.cells.set_all(PinState::High)
    }

    fn segments_update(&mut self, segments: u8, points: u8) -> Result<()> {
        self.segments.set_from_bits(segments | points)
    }

    fn digit_turn_on(&mut self, digit: u8) -> Result<()> {
        self.cells.set_state_at_index(digit, PinState::Low)
    }
}
