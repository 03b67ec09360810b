//! The seven clock tasks as plain async loops.
//!
//! Embassy tasks cannot be generic, so firmware wraps each loop in its own
//! `#[embassy_executor::task]` function with concrete pin types. Every loop runs forever.

use embassy_time::{Instant, Ticker, Timer};

use crate::{Buttons, ClockConfig, ClockShared, DigitalInput, DigitalOutput, ScreenDriver};

/// Polls the buttons and queues one event per press.
///
/// After a press the loop sleeps for the debounce time before polling again.
pub async fn input_loop<I: DigitalInput, D: ScreenDriver>(
    shared: &ClockShared<D>,
    buttons: &mut Buttons<I>,
    config: &ClockConfig,
) -> ! {
    loop {
        match buttons.poll() {
            Ok(Some(event)) => {
                shared.send_event(event);
                shared.record_input(Instant::now());
                Timer::after(config.debounce).await;
            }
            Ok(None) => {}
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Button read failed: {}", _err);
            }
        }
        Timer::after(config.input_poll_period).await;
    }
}

/// Ticks the engine at a fixed rate.
pub async fn tick_loop<D: ScreenDriver>(shared: &ClockShared<D>, config: &ClockConfig) -> ! {
    let mut ticker = Ticker::every(config.tick_period);
    loop {
        shared.tick();
        ticker.next().await;
    }
}

/// Keeps `indicator` in step with the alarm latch.
pub async fn alarm_loop<O: DigitalOutput, D: ScreenDriver>(
    shared: &ClockShared<D>,
    indicator: &mut O,
) -> ! {
    loop {
        let event = shared.alarms().receive().await;
        let sounding = shared.handle_alarm_event(event);
        if sounding == indicator.is_active() {
            continue;
        }
        let result = if sounding {
            indicator.activate()
        } else {
            indicator.deactivate()
        };
        match result {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("Alarm indicator {}", if sounding { "on" } else { "off" });
            }
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Alarm indicator failed: {}", _err);
            }
        }
    }
}

/// Feeds queued button events to the state machine.
pub async fn controller_loop<D: ScreenDriver>(shared: &ClockShared<D>) -> ! {
    loop {
        let event = shared.events().receive().await;
        shared.dispatch(event);
    }
}

/// Draws one digit per period.
pub async fn refresh_loop<D: ScreenDriver>(shared: &ClockShared<D>, config: &ClockConfig) -> ! {
    let mut ticker = Ticker::every(config.refresh_period);
    loop {
        if let Err(_err) = shared.refresh() {
            #[cfg(feature = "defmt")]
            defmt::error!("Screen refresh failed: {}", _err);
        }
        ticker.next().await;
    }
}

/// Blinks the seconds separator.
pub async fn blink_loop<D: ScreenDriver>(shared: &ClockShared<D>, config: &ClockConfig) -> ! {
    let mut ticker = Ticker::every(config.blink_period);
    loop {
        ticker.next().await;
        shared.toggle_separator();
    }
}

/// Cancels edits that have been left alone for too long.
pub async fn watchdog_loop<D: ScreenDriver>(shared: &ClockShared<D>, config: &ClockConfig) -> ! {
    let mut ticker = Ticker::every(config.watchdog_period);
    loop {
        ticker.next().await;
        shared.check_inactivity(Instant::now(), config.inactivity_timeout);
    }
}
