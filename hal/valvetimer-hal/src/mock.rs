//! In-memory test doubles
//!
//! Host-side stand-ins for the capabilities in this crate. The flash double
//! follows NOR semantics (erase sets bytes to `0xFF`, programming can only
//! clear bits) and counts erase/program cycles so write-avoidance can be
//! asserted. Fault injection covers failed erases, failed programming and
//! power loss part way through a record.

use embedded_storage::nor_flash::{check_erase, check_read, check_write};

use crate::flash::{ErrorType, FlashError, NorFlash, ReadNorFlash, WORD_SIZE};
use crate::gpio::{InputPin, OutputPin};
use crate::irq::IrqGate;

/// Value of an erased flash byte
pub const ERASED: u8 = 0xFF;

/// RAM-backed NOR flash partition of `N` bytes forming one erase block
#[derive(Debug, Clone)]
pub struct MockFlash<const N: usize> {
    data: [u8; N],
    erase_count: u32,
    write_count: u32,
    fail_erase: bool,
    fail_read: bool,
    /// Number of further word writes that succeed before programming fails
    writes_before_failure: Option<u32>,
}

impl<const N: usize> Default for MockFlash<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MockFlash<N> {
    /// Create a fully erased partition
    pub const fn new() -> Self {
        Self {
            data: [ERASED; N],
            erase_count: 0,
            write_count: 0,
            fail_erase: false,
            fail_read: false,
            writes_before_failure: None,
        }
    }

    /// Create a partition whose first bytes hold `contents`
    ///
    /// Preloading bypasses NOR semantics and the cycle counters.
    pub fn with_contents(contents: &[u8]) -> Self {
        let mut flash = Self::new();
        flash.poke(0, contents);
        flash
    }

    /// Overwrite raw bytes, simulating corruption or a previous firmware
    pub fn poke(&mut self, offset: usize, bytes: &[u8]) {
        let end = (offset + bytes.len()).min(N);
        self.data[offset..end].copy_from_slice(&bytes[..end - offset]);
    }

    /// Raw view of the partition
    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    /// Number of block erases performed
    pub fn erase_count(&self) -> u32 {
        self.erase_count
    }

    /// Number of successful write calls performed
    pub fn write_count(&self) -> u32 {
        self.write_count
    }

    /// Make every subsequent erase fail
    pub fn fail_erase(&mut self, fail: bool) {
        self.fail_erase = fail;
    }

    /// Make every subsequent read fail
    pub fn fail_read(&mut self, fail: bool) {
        self.fail_read = fail;
    }

    /// Let `words` more word writes succeed, then fail all programming
    ///
    /// `Some(0)` fails the very next write; `None` disables the fault.
    pub fn fail_after_words(&mut self, words: Option<u32>) {
        self.writes_before_failure = words;
    }
}

impl<const N: usize> ErrorType for MockFlash<N> {
    type Error = FlashError;
}

impl<const N: usize> ReadNorFlash for MockFlash<N> {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        check_read(self, offset, bytes.len()).map_err(FlashError::from_nor)?;
        if self.fail_read {
            return Err(FlashError::Other);
        }
        let start = offset as usize;
        bytes.copy_from_slice(&self.data[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> NorFlash for MockFlash<N> {
    const WRITE_SIZE: usize = WORD_SIZE;
    const ERASE_SIZE: usize = N;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        check_erase(self, from, to).map_err(FlashError::from_nor)?;
        if self.fail_erase {
            return Err(FlashError::Other);
        }
        self.data[from as usize..to as usize].fill(ERASED);
        self.erase_count += 1;
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        check_write(self, offset, bytes.len()).map_err(FlashError::from_nor)?;

        let start = offset as usize;
        for (index, word) in bytes.chunks(WORD_SIZE).enumerate() {
            match self.writes_before_failure {
                Some(0) => return Err(FlashError::Other),
                Some(remaining) => self.writes_before_failure = Some(remaining - 1),
                None => {}
            }
            let at = start + index * WORD_SIZE;
            for (cell, byte) in self.data[at..at + word.len()].iter_mut().zip(word) {
                // NOR programming can only clear bits
                *cell &= *byte;
            }
        }
        self.write_count += 1;
        Ok(())
    }
}

/// Input pin whose level is set by the test
#[derive(Debug, Clone, Copy, Default)]
pub struct MockInputPin {
    high: bool,
    reads: u32,
}

impl MockInputPin {
    /// Create a pin reading the given level
    pub const fn new(high: bool) -> Self {
        Self { high, reads: 0 }
    }

    /// Change the level seen by subsequent reads
    pub fn set_high(&mut self, high: bool) {
        self.high = high;
    }

    /// Number of times the pin has been sampled
    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl InputPin for MockInputPin {
    fn is_high(&mut self) -> bool {
        self.reads += 1;
        self.high
    }
}

/// Output pin recording its level and the number of level changes
#[derive(Debug, Clone, Copy, Default)]
pub struct MockOutputPin {
    high: bool,
    toggles: u32,
}

impl MockOutputPin {
    /// Create a pin starting at the given level
    pub const fn new(high: bool) -> Self {
        Self { high, toggles: 0 }
    }

    /// Number of writes that changed the level
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

impl OutputPin for MockOutputPin {
    fn set_high(&mut self) {
        if !self.high {
            self.toggles += 1;
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        if self.high {
            self.toggles += 1;
        }
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Interrupt gate counting suspend/resume calls
#[derive(Debug, Clone, Copy, Default)]
pub struct MockIrqGate {
    suspends: u32,
    resumes: u32,
    depth: i32,
}

impl MockIrqGate {
    /// Create a gate with interrupts enabled
    pub const fn new() -> Self {
        Self {
            suspends: 0,
            resumes: 0,
            depth: 0,
        }
    }

    /// Number of `suspend` calls
    pub fn suspends(&self) -> u32 {
        self.suspends
    }

    /// Number of `resume` calls
    pub fn resumes(&self) -> u32 {
        self.resumes
    }

    /// True while more suspends than resumes have been seen
    pub fn is_suspended(&self) -> bool {
        self.depth > 0
    }
}

impl IrqGate for MockIrqGate {
    fn suspend(&mut self) {
        self.suspends += 1;
        self.depth += 1;
    }

    fn resume(&mut self) {
        self.resumes += 1;
        self.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nor_programming_only_clears_bits() {
        let mut flash = MockFlash::<64>::new();
        flash.write(0, &[0x0F, 0xF0, 0xAA, 0x55]).unwrap();
        flash.write(0, &[0xFF, 0xFF, 0x0F, 0xFF]).unwrap();
        assert_eq!(&flash.contents()[..4], &[0x0F, 0xF0, 0x0A, 0x55]);

        flash.erase(0, 64).unwrap();
        assert!(flash.contents().iter().all(|b| *b == ERASED));
        assert_eq!(flash.erase_count(), 1);
    }

    #[test]
    fn test_alignment_is_enforced() {
        let mut flash = MockFlash::<64>::new();
        assert_eq!(flash.write(1, &[0; 4]), Err(FlashError::NotAligned));
        assert_eq!(flash.write(0, &[0; 3]), Err(FlashError::NotAligned));
        assert_eq!(flash.erase(0, 32), Err(FlashError::NotAligned));
        assert_eq!(flash.write(64, &[0; 4]), Err(FlashError::OutOfBounds));
    }

    #[test]
    fn test_power_loss_mid_record() {
        let mut flash = MockFlash::<64>::new();
        flash.fail_after_words(Some(1));
        assert_eq!(flash.write(0, &[0u8; 8]), Err(FlashError::Other));
        // First word landed, second did not
        assert_eq!(&flash.contents()[..8], &[0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(flash.write_count(), 0);
    }

    #[test]
    fn test_gate_depth() {
        let mut gate = MockIrqGate::new();
        gate.suspend();
        assert!(gate.is_suspended());
        gate.resume();
        assert!(!gate.is_suspended());
        assert_eq!((gate.suspends(), gate.resumes()), (1, 1));
    }
}
