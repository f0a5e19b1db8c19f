//! Configuration persistence
//!
//! Loads and saves the [`ConfigRecord`] at the start of a dedicated flash
//! partition. Saving is erase-then-program with read-back verification and
//! is skipped entirely when the stored record already matches, to bound
//! wear on the flash.

use valvetimer_hal::flash::{FlashError, NorFlash};
use valvetimer_hal::irq::{IrqGate, IrqSuspended};
use valvetimer_hal::WORD_SIZE;

use super::record::{ConfigRecord, RECORD_LEN};
use crate::traits::ConfigSink;

/// Offset of the record within the partition
pub const RECORD_OFFSET: u32 = 0;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Block erase failed (includes a refused unlock)
    Erase(FlashError),
    /// Word programming failed
    Program(FlashError),
    /// Reading the record back failed
    Read(FlashError),
    /// Record read back after programming is not the one written
    Verify,
    /// Partition cannot hold a word-programmed record
    Geometry,
}

/// Persisted configuration store
///
/// Owns the configuration partition and the interrupt gate that is held
/// suspended while the partition is erased and programmed.
pub struct ConfigStore<F, G> {
    flash: F,
    gate: G,
    current: ConfigRecord,
}

impl<F: NorFlash, G: IrqGate> ConfigStore<F, G> {
    /// Create a store over a configuration partition
    pub fn new(flash: F, gate: G) -> Self {
        Self {
            flash,
            gate,
            current: ConfigRecord::default(),
        }
    }

    /// Load the stored record
    ///
    /// An absent, torn or corrupted record is replaced by the default, which
    /// is written back before returning. Never returns an invalid record.
    pub fn load(&mut self) -> ConfigRecord {
        match self.read_record() {
            Ok(record) if record.is_valid() => {
                debug!("Loaded config: {} s", record.seconds);
                self.current = record;
                record
            }
            Ok(_) => {
                warn!("Stored config invalid, writing defaults");
                self.restore_default()
            }
            Err(e) => {
                warn!("Failed to read config: {:?}, writing defaults", e);
                self.restore_default()
            }
        }
    }

    /// Save a record
    ///
    /// The record is re-sealed first (seconds clamped, integrity field
    /// recomputed). Interrupts are suspended for the erase and program
    /// sequence and resumed afterwards whether or not it succeeded.
    pub fn save(&mut self, record: ConfigRecord) -> Result<(), StoreError> {
        let candidate = record.sealed();
        let bytes = candidate.encode();
        self.current = candidate;

        if let Ok(stored) = self.read_raw() {
            if stored == bytes && ConfigRecord::decode(&stored).is_valid() {
                debug!("Config unchanged, skipping flash write");
                return Ok(());
            }
        }

        self.program(&bytes)?;

        let stored = self.read_raw()?;
        if stored != bytes || !ConfigRecord::decode(&stored).is_valid() {
            warn!("Config verification failed after write");
            return Err(StoreError::Verify);
        }

        info!("Saved config: {} s", candidate.seconds);
        Ok(())
    }

    /// Most recent record loaded or handed to [`save`](Self::save)
    pub fn current(&self) -> ConfigRecord {
        self.current
    }

    /// Access the underlying partition
    pub fn flash(&self) -> &F {
        &self.flash
    }

    /// Mutable access to the underlying partition
    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    /// Access the interrupt gate
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Give back the partition and gate
    pub fn release(self) -> (F, G) {
        (self.flash, self.gate)
    }

    fn restore_default(&mut self) -> ConfigRecord {
        let record = ConfigRecord::default();
        if let Err(e) = self.save(record) {
            warn!("Failed to write default config: {:?}", e);
        }
        record
    }

    fn read_record(&mut self) -> Result<ConfigRecord, StoreError> {
        self.read_raw().map(|bytes| ConfigRecord::decode(&bytes))
    }

    fn read_raw(&mut self) -> Result<[u8; RECORD_LEN], StoreError> {
        let mut bytes = [0u8; RECORD_LEN];
        self.flash
            .read(RECORD_OFFSET, &mut bytes)
            .map_err(|e| StoreError::Read(FlashError::from_nor(e)))?;
        Ok(bytes)
    }

    /// Erase the block and program the record word by word
    fn program(&mut self, bytes: &[u8; RECORD_LEN]) -> Result<(), StoreError> {
        if F::ERASE_SIZE > self.flash.capacity() || WORD_SIZE % F::WRITE_SIZE != 0 {
            return Err(StoreError::Geometry);
        }

        let _irq = IrqSuspended::new(&mut self.gate);

        self.flash
            .erase(RECORD_OFFSET, RECORD_OFFSET + F::ERASE_SIZE as u32)
            .map_err(|e| StoreError::Erase(FlashError::from_nor(e)))?;

        for (index, word) in bytes.chunks_exact(WORD_SIZE).enumerate() {
            let offset = RECORD_OFFSET + (index * WORD_SIZE) as u32;
            self.flash
                .write(offset, word)
                .map_err(|e| StoreError::Program(FlashError::from_nor(e)))?;
        }

        Ok(())
    }
}

impl<F: NorFlash, G: IrqGate> ConfigSink for ConfigStore<F, G> {
    fn persist(&mut self, seconds: u8) -> Result<(), StoreError> {
        self.save(ConfigRecord::new(seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::record::{CONFIG_MAGIC, SECONDS_DEFAULT, SECONDS_MAX};
    use valvetimer_hal::mock::{MockFlash, MockIrqGate};

    type Store = ConfigStore<MockFlash<256>, MockIrqGate>;

    fn blank_store() -> Store {
        ConfigStore::new(MockFlash::new(), MockIrqGate::new())
    }

    fn store_with(bytes: &[u8]) -> Store {
        ConfigStore::new(MockFlash::with_contents(bytes), MockIrqGate::new())
    }

    #[test]
    fn test_first_boot_writes_default() {
        let mut store = blank_store();
        let record = store.load();

        assert_eq!(record, ConfigRecord::default());
        assert_eq!(store.flash().erase_count(), 1);
        assert_eq!(&store.flash().contents()[..RECORD_LEN], &record.encode());
    }

    #[test]
    fn test_valid_record_loads_without_writing() {
        let mut store = store_with(&ConfigRecord::new(5).encode());
        let record = store.load();

        assert_eq!(record.seconds, 5);
        assert_eq!(store.flash().erase_count(), 0);
        assert_eq!(store.flash().write_count(), 0);
    }

    #[test]
    fn test_save_of_loaded_record_is_noop() {
        let mut store = store_with(&ConfigRecord::new(6).encode());
        let record = store.load();
        assert_eq!(store.save(record), Ok(()));

        assert_eq!(store.flash().erase_count(), 0);
        assert_eq!(store.gate().suspends(), 0);
    }

    #[test]
    fn test_save_changed_record() {
        let mut store = store_with(&ConfigRecord::new(3).encode());
        assert_eq!(store.save(ConfigRecord::new(4)), Ok(()));

        assert_eq!(store.flash().erase_count(), 1);
        assert_eq!(store.flash().write_count(), 3);
        assert_eq!(store.load().seconds, 4);
        assert_eq!(store.gate().suspends(), 1);
        assert_eq!(store.gate().resumes(), 1);
    }

    #[test]
    fn test_save_clamps_and_seals() {
        let mut store = blank_store();
        let raw = ConfigRecord {
            magic: 0,
            version: 0,
            seconds: 42,
            seconds_inv: 0,
            reserved: 0xDEAD_BEEF,
        };
        assert_eq!(store.save(raw), Ok(()));

        let loaded = store.load();
        assert!(loaded.is_valid());
        assert_eq!(loaded.seconds, SECONDS_MAX);
        assert_eq!(loaded.magic, CONFIG_MAGIC);
        assert_eq!(loaded.reserved, 0);
    }

    #[test]
    fn test_corrupted_integrity_is_replaced() {
        let mut bytes = ConfigRecord::new(5).encode();
        bytes[7] ^= 0x01;
        let mut store = store_with(&bytes);

        assert_eq!(store.load().seconds, SECONDS_DEFAULT);
        assert_eq!(store.flash().erase_count(), 1);
    }

    #[test]
    fn test_nonzero_reserved_is_repaired_once() {
        let mut bytes = ConfigRecord::new(5).encode();
        bytes[8..12].copy_from_slice(&0x1234_5678u32.to_le_bytes());
        let mut store = store_with(&bytes);

        let loaded = store.load();
        assert_eq!(loaded, ConfigRecord::default());
        assert_eq!(store.flash().erase_count(), 1);

        // Every later round trip leaves the flash alone
        let loaded = store.load();
        assert_eq!(store.save(loaded), Ok(()));
        assert_eq!(store.flash().erase_count(), 1);
        assert_eq!(store.flash().write_count(), 3);
    }

    #[test]
    fn test_erase_failure_resumes_interrupts() {
        let mut store = store_with(&ConfigRecord::new(3).encode());
        store.flash_mut().fail_erase(true);

        assert_eq!(
            store.save(ConfigRecord::new(5)),
            Err(StoreError::Erase(FlashError::Other))
        );
        assert_eq!(store.gate().suspends(), 1);
        assert_eq!(store.gate().resumes(), 1);
        assert!(!store.gate().is_suspended());
    }

    #[test]
    fn test_program_failure_resumes_interrupts() {
        let mut store = blank_store();
        store.flash_mut().fail_after_words(Some(0));

        assert_eq!(
            store.save(ConfigRecord::new(4)),
            Err(StoreError::Program(FlashError::Other))
        );
        assert!(!store.gate().is_suspended());
    }

    #[test]
    fn test_torn_write_recovers_on_next_boot() {
        let mut store = store_with(&ConfigRecord::new(3).encode());
        // Power lost after the first word of the new record
        store.flash_mut().fail_after_words(Some(1));
        assert!(store.save(ConfigRecord::new(6)).is_err());

        let (mut flash, gate) = store.release();
        flash.fail_after_words(None);
        let mut rebooted = ConfigStore::new(flash, gate);
        assert_eq!(rebooted.load(), ConfigRecord::default());
    }

    #[test]
    fn test_read_back_failure() {
        let mut store = blank_store();
        store.flash_mut().fail_read(true);
        assert_eq!(
            store.save(ConfigRecord::new(4)),
            Err(StoreError::Read(FlashError::Other))
        );
    }

    #[test]
    fn test_load_never_returns_invalid_even_if_write_fails() {
        let mut store = store_with(&[0x00; RECORD_LEN]);
        store.flash_mut().fail_erase(true);
        let record = store.load();
        assert!(record.is_valid());
        assert_eq!(record.seconds, SECONDS_DEFAULT);
    }

    #[test]
    fn test_persist_via_sink() {
        let mut store = blank_store();
        assert_eq!(store.persist(5), Ok(()));
        assert_eq!(store.current().seconds, 5);
        assert_eq!(store.load().seconds, 5);
    }
}
