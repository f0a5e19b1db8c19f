//! Display refresh task
//!
//! Lights one digit per period. Runs independently of the controller and
//! never touches appliance state.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::board::DIGIT_PERIOD_US;
use crate::display;

#[embassy_executor::task]
pub async fn refresh_task() {
    info!("Refresh task started, {} us per digit", DIGIT_PERIOD_US);

    let mut ticker = Ticker::every(Duration::from_micros(DIGIT_PERIOD_US as u64));

    loop {
        ticker.next().await;
        display::refresh();
    }
}
