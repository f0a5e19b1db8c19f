//! Configuration types
//!
//! Board configuration (button polarity and timing) and the persisted
//! countdown record with its flash store.

pub mod board;
pub mod cycle;
pub mod record;
pub mod store;

pub use board::{ActiveLevel, ButtonConfig, ConfigError};
pub use cycle::{next_in_cycle, SECONDS_CYCLE};
pub use record::{
    clamp_seconds, ConfigRecord, CONFIG_MAGIC, CONFIG_VERSION, RECORD_LEN, SECONDS_DEFAULT,
    SECONDS_MAX, SECONDS_MIN,
};
pub use store::{ConfigStore, StoreError};
