//! Configuration partition on the STM32F4 internal flash
//!
//! The record lives in its own sector so erasing it never touches code.
//! On the 256 KiB parts that is sector 5, the last 128 KiB sector. The
//! firmware's memory.x ends FLASH at `0x0802_0000` to keep the image out
//! of it:
//!
//! ```text
//! 0x0800_0000  sectors 0-3  4 x 16 KiB  firmware
//! 0x0801_0000  sector 4     64 KiB      firmware
//! 0x0802_0000  sector 5     128 KiB     configuration
//! ```

use embassy_stm32::flash::{Blocking, Flash};
use embedded_storage::nor_flash::{check_erase, check_read, check_write};
use valvetimer_hal::flash::{ErrorType, FlashError, NorFlash, ReadNorFlash};
use valvetimer_hal::WORD_SIZE;

/// Total flash on the supported parts
pub const FLASH_SIZE: usize = 256 * 1024;

/// Offset of the configuration sector from the start of flash
pub const CONFIG_SECTOR_OFFSET: u32 = 0x2_0000;

/// Size of the configuration sector
pub const CONFIG_SECTOR_SIZE: usize = 128 * 1024;

const _: () = assert!(CONFIG_SECTOR_OFFSET as usize + CONFIG_SECTOR_SIZE == FLASH_SIZE);

/// Configuration sector as a NOR flash partition
///
/// Offsets are relative to the start of the sector. The whole sector is
/// one erase block; programming is done in 32-bit words.
pub struct ConfigFlash<'d> {
    flash: Flash<'d, Blocking>,
}

impl<'d> ConfigFlash<'d> {
    /// Wrap the flash driver
    pub fn new(flash: Flash<'d, Blocking>) -> Self {
        Self { flash }
    }

    /// Give back the flash driver
    pub fn release(self) -> Flash<'d, Blocking> {
        self.flash
    }
}

impl ErrorType for ConfigFlash<'_> {
    type Error = FlashError;
}

impl ReadNorFlash for ConfigFlash<'_> {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        check_read(self, offset, bytes.len()).map_err(FlashError::from_nor)?;
        self.flash
            .blocking_read(CONFIG_SECTOR_OFFSET + offset, bytes)
            .map_err(FlashError::from_nor)
    }

    fn capacity(&self) -> usize {
        CONFIG_SECTOR_SIZE
    }
}

impl NorFlash for ConfigFlash<'_> {
    const WRITE_SIZE: usize = WORD_SIZE;
    const ERASE_SIZE: usize = CONFIG_SECTOR_SIZE;

    /// Unlocks, erases and relocks; a refused unlock surfaces as an erase
    /// error
    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        check_erase(self, from, to).map_err(FlashError::from_nor)?;
        self.flash
            .blocking_erase(CONFIG_SECTOR_OFFSET + from, CONFIG_SECTOR_OFFSET + to)
            .map_err(FlashError::from_nor)
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        check_write(self, offset, bytes.len()).map_err(FlashError::from_nor)?;
        self.flash
            .blocking_write(CONFIG_SECTOR_OFFSET + offset, bytes)
            .map_err(FlashError::from_nor)
    }
}
