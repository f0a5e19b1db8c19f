//! Valvetimer - Single-button valve timer firmware
//!
//! Main firmware binary for STM32F401-based controllers. A short press
//! opens the valve for the configured number of seconds; a long press
//! enters configuration mode, where short presses step through the
//! allowed durations and a second long press stores the choice in flash.
//!
//! Pin assignment (reference board):
//! - PA0: button
//! - PB12: valve driver
//! - PA1-PA8: display segments a-g, dp
//! - PB13-PB15: display digit enables, left to right

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::flash::Flash;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use {defmt_rtt as _, panic_probe as _};

use valvetimer_core::config::{ButtonConfig, ConfigStore};
use valvetimer_core::state::Ports;
use valvetimer_core::Appliance;
use valvetimer_drivers::compat::{EhInput, EhOutput};
use valvetimer_drivers::display::{Multiplexer, PinSegments};
use valvetimer_drivers::input::GpioButton;
use valvetimer_drivers::valve::GpioValve;
use valvetimer_hal_stm32f4::ConfigFlash;

use crate::display::{DisplayHandle, RefreshGate};
use crate::tasks::Controller;

mod board;
mod display;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Valvetimer firmware starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    // Board configuration, already range-checked by build.rs
    let mut button_config = board::button_config();
    if let Err(e) = button_config.validate() {
        warn!("Invalid button configuration {:?}, using defaults", e);
        button_config = ButtonConfig::default();
    }

    // Button: pull towards the released level
    let pull = if board::ACTIVE_LEVEL_HIGH {
        Pull::Down
    } else {
        Pull::Up
    };
    let mut button = GpioButton::new(EhInput(Input::new(p.PA0, pull)), button_config);

    // Valve starts closed whatever the wiring polarity
    let valve_idle = if board::VALVE_INVERTED {
        Level::High
    } else {
        Level::Low
    };
    let valve_pin = EhOutput::new(
        Output::new(p.PB12, valve_idle, Speed::Low),
        valve_idle == Level::High,
    );
    let valve = GpioValve::new(valve_pin, board::VALVE_INVERTED);
    info!("Valve closed (inverted={})", board::VALVE_INVERTED);

    // Display
    let segments = PinSegments::new([
        low_output(Output::new(p.PA1, Level::Low, Speed::Low)),
        low_output(Output::new(p.PA2, Level::Low, Speed::Low)),
        low_output(Output::new(p.PA3, Level::Low, Speed::Low)),
        low_output(Output::new(p.PA4, Level::Low, Speed::Low)),
        low_output(Output::new(p.PA5, Level::Low, Speed::Low)),
        low_output(Output::new(p.PA6, Level::Low, Speed::Low)),
        low_output(Output::new(p.PA7, Level::Low, Speed::Low)),
        low_output(Output::new(p.PA8, Level::Low, Speed::Low)),
    ]);
    let digits = [
        low_output(Output::new(p.PB13, Level::Low, Speed::Low)),
        low_output(Output::new(p.PB14, Level::Low, Speed::Low)),
        low_output(Output::new(p.PB15, Level::Low, Speed::Low)),
    ];
    display::install(Multiplexer::new(segments, digits));

    // Persisted configuration
    let flash = ConfigFlash::new(Flash::new_blocking(p.FLASH));
    let mut store = ConfigStore::new(flash, RefreshGate::new());
    let record = store.load();
    info!("Loaded configuration: {} s", record.seconds);

    // Seed the classifier from the real pin level
    let initial_level = button.sample();
    let appliance = Appliance::new(
        button_config,
        initial_level,
        record.seconds,
        tasks::controller::now_ms(),
    );

    let mut ports = Ports::new(valve, DisplayHandle, store);
    appliance.start(&mut ports);

    spawner.spawn(tasks::refresh_task()).unwrap();
    spawner
        .spawn(tasks::controller_task(Controller {
            appliance,
            button,
            ports,
        }))
        .unwrap();

    info!("All tasks spawned");
}

/// Display line that starts off
fn low_output(pin: Output<'static>) -> display::BoardPin {
    EhOutput::new(pin, false)
}
