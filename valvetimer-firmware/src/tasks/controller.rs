//! Controller task
//!
//! Wakes every millisecond, samples the button and lets the appliance
//! catch up on elapsed time. Flash writes for a committed configuration
//! change happen inline and block this task until they finish.

use defmt::*;
use embassy_stm32::gpio::{Input, Output};
use embassy_time::{Duration, Instant, Ticker};

use valvetimer_core::config::ConfigStore;
use valvetimer_core::state::{Ports, SaveOutcome, Step};
use valvetimer_core::Appliance;
use valvetimer_drivers::compat::{EhInput, EhOutput};
use valvetimer_drivers::input::GpioButton;
use valvetimer_drivers::valve::GpioValve;
use valvetimer_hal_stm32f4::ConfigFlash;

use crate::display::{DisplayHandle, RefreshGate};

/// Poll period of the main loop
pub const POLL_INTERVAL_MS: u64 = 1;

pub type BoardValve = GpioValve<EhOutput<Output<'static>>>;
pub type BoardStore = ConfigStore<ConfigFlash<'static>, RefreshGate>;
pub type BoardPorts = Ports<BoardValve, DisplayHandle, BoardStore>;

/// Everything the controller task owns
pub struct Controller {
    pub appliance: Appliance,
    pub button: GpioButton<EhInput<Input<'static>>>,
    pub ports: BoardPorts,
}

/// Milliseconds since boot, wrapping at 32 bits
pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

fn report(step: &Step) {
    if step.state_changed() {
        info!("{:?} -> {:?} on {:?}", step.from, step.to, step.event);
    }
    match step.save {
        SaveOutcome::NotNeeded => {}
        SaveOutcome::Saved => info!("Configuration saved"),
        SaveOutcome::Failed(e) => warn!("Configuration not saved: {:?}", e),
    }
}

#[embassy_executor::task]
pub async fn controller_task(mut controller: Controller) {
    info!("Controller task started");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        ticker.next().await;

        let Controller {
            appliance,
            button,
            ports,
        } = &mut controller;

        appliance.service(now_ms(), || button.sample(), ports, report);
    }
}
