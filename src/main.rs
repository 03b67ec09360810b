//! Six-button alarm clock on a 4-digit 7-segment display.
//!
//! Runs on a Raspberry Pi Pico (RP2040). Build with `--features pico1`.
//!
//! Wiring:
//! * digit cells (low = lit): GPIO 1-4, left to right
//! * segments A-G and the decimal point: GPIO 5-12
//! * buttons to ground (set time, set alarm, accept, cancel, increment, decrement): GPIO 13-18
//! * alarm indicator: the on-board LED, GPIO 25
//!
//! Task priorities, highest first:
//! 1. display refresh (`SWI_IRQ_0`)
//! 2. buttons (`SWI_IRQ_1`)
//! 3. tick, alarm and controller (`SWI_IRQ_2`)
//! 4. blink and watchdog (thread mode)
#![no_std]
#![no_main]
#![allow(clippy::future_not_send, reason = "Tasks never move between executors")]

use alarm_clock::{
    Buttons, ClockConfig, ClockShared, FACE_DIGITS, InputLine, OutputArray, OutputLine, PinScreen,
    Polarity, Result, Screen, tasks,
};
use defmt::info;
use defmt_rtt as _;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::{
    Peri,
    gpio::{AnyPin, Input, Level, Output, Pull},
    interrupt,
    interrupt::{InterruptExt, Priority},
};
use panic_probe as _;
use static_cell::StaticCell;

const CELL_COUNT: usize = FACE_DIGITS as usize;

type Display = PinScreen<Output<'static>, CELL_COUNT>;
type Shared = ClockShared<Display>;
type Button = InputLine<Input<'static>>;
type Indicator = OutputLine<Output<'static>>;

static CONFIG: ClockConfig = ClockConfig::new();

// Preempts everything else so the multiplexing never stalls.
static EXECUTOR_REFRESH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_INPUT: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_CLOCK: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
#[expect(unsafe_code, reason = "Executor interrupt handler")]
fn SWI_IRQ_0() {
    // SAFETY: Only this interrupt runs the refresh executor.
    unsafe { EXECUTOR_REFRESH.on_interrupt() }
}

#[interrupt]
#[expect(unsafe_code, reason = "Executor interrupt handler")]
fn SWI_IRQ_1() {
    // SAFETY: Only this interrupt runs the input executor.
    unsafe { EXECUTOR_INPUT.on_interrupt() }
}

#[interrupt]
#[expect(unsafe_code, reason = "Executor interrupt handler")]
fn SWI_IRQ_2() {
    // SAFETY: Only this interrupt runs the clock executor.
    unsafe { EXECUTOR_CLOCK.on_interrupt() }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // If it returns an error, something went wrong.
    if let Err(err) = inner_main(spawner) {
        panic!("{err}");
    }
}

fn inner_main(spawner: Spawner) -> Result<()> {
    static SHARED: StaticCell<Shared> = StaticCell::new();
    static BUTTONS: StaticCell<Buttons<Button>> = StaticCell::new();
    static INDICATOR: StaticCell<Indicator> = StaticCell::new();

    let peripherals = embassy_rp::init(embassy_rp::config::Config::default());

    let cells = OutputArray::new([
        Output::new(peripherals.PIN_1, Level::High),
        Output::new(peripherals.PIN_2, Level::High),
        Output::new(peripherals.PIN_3, Level::High),
        Output::new(peripherals.PIN_4, Level::High),
    ]);
    let segments = OutputArray::new([
        Output::new(peripherals.PIN_5, Level::Low),
        Output::new(peripherals.PIN_6, Level::Low),
        Output::new(peripherals.PIN_7, Level::Low),
        Output::new(peripherals.PIN_8, Level::Low),
        Output::new(peripherals.PIN_9, Level::Low),
        Output::new(peripherals.PIN_10, Level::Low),
        Output::new(peripherals.PIN_11, Level::Low),
        Output::new(peripherals.PIN_12, Level::Low),
    ]);
    let screen = Screen::new(FACE_DIGITS, PinScreen::new(cells, segments));
    let shared: &'static Shared = SHARED.init(ClockShared::new(&CONFIG, screen));

    let button = |pin: Peri<'static, AnyPin>| {
        InputLine::new(Input::new(pin, Pull::Up), Polarity::ActiveLow)
    };
    let buttons = BUTTONS.init(Buttons::new(
        button(peripherals.PIN_13.into()),
        button(peripherals.PIN_14.into()),
        button(peripherals.PIN_15.into()),
        button(peripherals.PIN_16.into()),
        button(peripherals.PIN_17.into()),
        button(peripherals.PIN_18.into()),
    ));
    let indicator = INDICATOR.init(OutputLine::new(
        Output::new(peripherals.PIN_25, Level::Low),
        Polarity::ActiveHigh,
    )?);

    interrupt::SWI_IRQ_0.set_priority(Priority::P1);
    let refresh_spawner = EXECUTOR_REFRESH.start(interrupt::SWI_IRQ_0);
    refresh_spawner.spawn(refresh_task(shared)?);

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let input_spawner = EXECUTOR_INPUT.start(interrupt::SWI_IRQ_1);
    input_spawner.spawn(input_task(shared, buttons)?);

    interrupt::SWI_IRQ_2.set_priority(Priority::P3);
    let clock_spawner = EXECUTOR_CLOCK.start(interrupt::SWI_IRQ_2);
    clock_spawner.spawn(tick_task(shared)?);
    clock_spawner.spawn(alarm_task(shared, indicator)?);
    clock_spawner.spawn(controller_task(shared)?);

    spawner.spawn(blink_task(shared)?);
    spawner.spawn(watchdog_task(shared)?);

    info!("Alarm clock started");
    Ok(())
}

#[embassy_executor::task]
async fn refresh_task(shared: &'static Shared) -> ! {
    tasks::refresh_loop(shared, &CONFIG).await
}

#[embassy_executor::task]
async fn input_task(shared: &'static Shared, buttons: &'static mut Buttons<Button>) -> ! {
    tasks::input_loop(shared, buttons, &CONFIG).await
}

#[embassy_executor::task]
async fn tick_task(shared: &'static Shared) -> ! {
    tasks::tick_loop(shared, &CONFIG).await
}

#[embassy_executor::task]
async fn alarm_task(shared: &'static Shared, indicator: &'static mut Indicator) -> ! {
    tasks::alarm_loop(shared, indicator).await
}

#[embassy_executor::task]
async fn controller_task(shared: &'static Shared) -> ! {
    tasks::controller_loop(shared).await
}

#[embassy_executor::task]
async fn blink_task(shared: &'static Shared) -> ! {
    tasks::blink_loop(shared, &CONFIG).await
}

#[embassy_executor::task]
async fn watchdog_task(shared: &'static Shared) -> ! {
    tasks::watchdog_loop(shared, &CONFIG).await
}
