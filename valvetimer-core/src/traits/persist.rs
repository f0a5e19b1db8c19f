//! Configuration persistence trait

use crate::config::StoreError;

/// Durable home for the configured countdown
///
/// Implemented by [`ConfigStore`](crate::config::ConfigStore); tests use
/// in-memory doubles.
pub trait ConfigSink {
    /// Persist a new countdown duration
    fn persist(&mut self, seconds: u8) -> Result<(), StoreError>;
}

impl<T: ConfigSink + ?Sized> ConfigSink for &mut T {
    fn persist(&mut self, seconds: u8) -> Result<(), StoreError> {
        (**self).persist(seconds)
    }
}
