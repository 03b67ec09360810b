//! Test doubles shared by the integration tests.
#![allow(dead_code, reason = "Each test binary uses a different subset")]

use core::convert::Infallible;

use alarm_clock::{
    AlarmChannel, DigitalOutput, Event, EventChannel, IMAGES, Result, SEGMENT_P, Screen,
    ScreenDriver,
};
use embassy_futures::yield_now;
use embedded_hal::digital::{ErrorType, InputPin};

/// A screen driver that remembers what each digit showed when it was last lit.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pending: u8,
    pub frame: [u8; 4],
    pub lit_count: usize,
}

impl ScreenDriver for FrameRecorder {
    fn digits_turn_off(&mut self) -> Result<()> {
        Ok(())
    }

    fn segments_update(&mut self, segments: u8, points: u8) -> Result<()> {
        self.pending = segments | points;
        Ok(())
    }

    fn digit_turn_on(&mut self, digit: u8) -> Result<()> {
        if let Some(slot) = self.frame.get_mut(usize::from(digit)) {
            *slot = self.pending;
        }
        self.lit_count += 1;
        Ok(())
    }
}

/// Refreshes one full multiplex cycle and returns the frame.
pub fn scan(screen: &mut Screen<FrameRecorder>) -> [u8; 4] {
    for _ in 0..screen.digits() {
        screen.refresh().expect("recorder never fails");
    }
    screen.driver().frame
}

/// Segment byte for a digit with or without its decimal point.
pub fn image(digit: u8, point: bool) -> u8 {
    IMAGES[usize::from(digit)] | if point { SEGMENT_P } else { 0 }
}

/// An alarm indicator that only remembers its state.
#[derive(Debug, Default)]
pub struct FakeIndicator {
    active: bool,
    pub switches: usize,
}

impl DigitalOutput for FakeIndicator {
    fn activate(&mut self) -> Result<()> {
        self.active = true;
        self.switches += 1;
        Ok(())
    }

    fn deactivate(&mut self) -> Result<()> {
        self.active = false;
        self.switches += 1;
        Ok(())
    }

    fn toggle(&mut self) -> Result<()> {
        if self.active {
            self.deactivate()
        } else {
            self.activate()
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Completes once every queued event has been taken off `channel`.
pub async fn events_drained(channel: &EventChannel) {
    while !channel.is_empty() {
        yield_now().await;
    }
}

/// Completes once every queued request has been taken off `channel`.
pub async fn alarms_drained(channel: &AlarmChannel) {
    while !channel.is_empty() {
        yield_now().await;
    }
}

/// An input pin that replays `levels` (high is `true`), one per read, then stays low.
#[derive(Debug, Default)]
pub struct ScriptedPin {
    levels: std::vec::IntoIter<bool>,
    pub reads: usize,
}

impl ScriptedPin {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.to_vec().into_iter(),
            reads: 0,
        }
    }
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        self.reads += 1;
        Ok(self.levels.next().unwrap_or(false))
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Takes everything queued on `channel` without waiting.
pub fn queued_events(channel: &EventChannel) -> Vec<Event> {
    std::iter::from_fn(|| channel.try_receive().ok()).collect()
}
