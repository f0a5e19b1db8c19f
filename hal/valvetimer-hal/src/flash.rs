//! Flash storage abstractions
//!
//! Block storage is expressed with the `embedded-storage` NOR flash traits:
//! erasable only in whole blocks (`ERASE_SIZE`), programmable only in
//! aligned words (`WRITE_SIZE`). Chip HALs expose their configuration
//! partition through these traits with offsets relative to the partition
//! start.

pub use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};

/// Width of one programming word in bytes
///
/// Records are laid out and programmed in units of this size.
pub const WORD_SIZE: usize = 4;

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Offset or length not aligned to the erase/write granularity
    NotAligned,
    /// Operation reaches beyond the partition
    OutOfBounds,
    /// Any other driver failure (locked, programming, sequencing)
    Other,
}

impl FlashError {
    /// Collapse a driver-specific error into its generic kind
    pub fn from_nor<E: NorFlashError>(error: E) -> Self {
        match error.kind() {
            NorFlashErrorKind::NotAligned => FlashError::NotAligned,
            NorFlashErrorKind::OutOfBounds => FlashError::OutOfBounds,
            _ => FlashError::Other,
        }
    }
}

impl NorFlashError for FlashError {
    fn kind(&self) -> NorFlashErrorKind {
        match self {
            FlashError::NotAligned => NorFlashErrorKind::NotAligned,
            FlashError::OutOfBounds => NorFlashErrorKind::OutOfBounds,
            FlashError::Other => NorFlashErrorKind::Other,
        }
    }
}
