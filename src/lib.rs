//! Core of a six-button digital alarm clock with a multiplexed 7-segment display.
//!
//! * [`Clock`] keeps the time and the alarm in BCD and advances on ticks.
//! * [`Screen`] multiplexes a 7-segment display one digit per refresh, with blinking windows.
//! * [`Controller`] is the set-time / set-alarm state machine.
//! * [`ClockShared`] and the loops in [`tasks`] tie them together as concurrent Embassy tasks.
//!
//! The library is hardware independent. The `pico1` feature builds the Raspberry Pi Pico
//! firmware in `src/main.rs`.
#![cfg_attr(not(test), no_std)]

mod buttons;
mod clock;
pub mod clock_time;
mod config;
mod controller;
mod digital;
mod error;
mod event;
mod output_array;
pub mod screen;
mod shared;
pub mod tasks;

// Re-export commonly used items
pub use buttons::Buttons;
pub use clock::Clock;
pub use clock_time::{ClockTime, Step};
pub use config::ClockConfig;
pub use controller::{ClockState, Controller, FACE_DIGITS};
pub use digital::{DigitalInput, DigitalOutput, InputLine, OutputLine, Polarity};
pub use error::{Error, Result};
pub use event::{AlarmChannel, AlarmEvent, Event, EventChannel};
pub use output_array::{OutputArray, PinScreen, SEGMENT_COUNT};
pub use screen::{IMAGES, MAX_DIGITS, SEGMENT_P, Screen, ScreenDriver};
pub use shared::{ClockContext, ClockShared};
