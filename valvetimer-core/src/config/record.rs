//! Persisted configuration record
//!
//! A fixed 12-byte record, three programming words, stored at the start of
//! the configuration partition:
//!
//! ```text
//! offset  0   4         6        7            8          12
//!         ├───┼─────────┼────────┼────────────┼──────────┤
//!         │magic│ version │ seconds│ seconds_inv│ reserved │
//!         │ u32 │   u16   │   u8   │     u8     │   u32    │
//! ```
//!
//! All multi-byte fields are little-endian. `seconds_inv` is the bitwise
//! complement of `seconds` and lets a torn or bit-flipped record be told
//! apart from a valid one without a full checksum.

use valvetimer_hal::WORD_SIZE;

/// Magic number to identify a valid configuration record
pub const CONFIG_MAGIC: u32 = 0x5654_4346; // "VTCF"

/// Current record layout version
pub const CONFIG_VERSION: u16 = 1;

/// Shortest configurable countdown in seconds
pub const SECONDS_MIN: u8 = 3;

/// Longest configurable countdown in seconds
pub const SECONDS_MAX: u8 = 6;

/// Countdown used on first boot or after corruption
pub const SECONDS_DEFAULT: u8 = 3;

/// Encoded record length in bytes
pub const RECORD_LEN: usize = 12;

/// Encoded record length in programming words
pub const RECORD_WORDS: usize = RECORD_LEN / WORD_SIZE;

const _: () = assert!(RECORD_LEN % WORD_SIZE == 0);

/// Configuration record as stored in flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigRecord {
    /// Magic number for validation
    pub magic: u32,
    /// Record layout version
    pub version: u16,
    /// Countdown duration in seconds
    pub seconds: u8,
    /// Bitwise complement of `seconds`
    pub seconds_inv: u8,
    /// Always written as zero; anything else is rejected
    pub reserved: u32,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self::new(SECONDS_DEFAULT)
    }
}

impl ConfigRecord {
    /// Build a sealed record for `seconds`, clamped into the valid range
    pub const fn new(seconds: u8) -> Self {
        let seconds = clamp_seconds(seconds);
        Self {
            magic: CONFIG_MAGIC,
            version: CONFIG_VERSION,
            seconds,
            seconds_inv: !seconds,
            reserved: 0,
        }
    }

    /// Re-seal a record: clamp `seconds`, recompute the integrity field and
    /// reset the header and reserved word
    pub const fn sealed(self) -> Self {
        Self::new(self.seconds)
    }

    /// Check magic, version, range, the integrity field and the reserved word
    ///
    /// A valid record is exactly what [`sealed`](Self::sealed) produces, so
    /// re-sealing it never changes its encoding.
    pub const fn is_valid(&self) -> bool {
        self.magic == CONFIG_MAGIC
            && self.version == CONFIG_VERSION
            && self.seconds >= SECONDS_MIN
            && self.seconds <= SECONDS_MAX
            && self.seconds_inv == !self.seconds
            && self.reserved == 0
    }

    /// Serialize to the on-flash layout
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut bytes = [0u8; RECORD_LEN];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6] = self.seconds;
        bytes[7] = self.seconds_inv;
        bytes[8..12].copy_from_slice(&self.reserved.to_le_bytes());
        bytes
    }

    /// Parse the on-flash layout
    ///
    /// Any byte pattern decodes; use [`is_valid`](Self::is_valid) to decide
    /// whether the result can be trusted.
    pub fn decode(bytes: &[u8; RECORD_LEN]) -> Self {
        Self {
            magic: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            version: u16::from_le_bytes([bytes[4], bytes[5]]),
            seconds: bytes[6],
            seconds_inv: bytes[7],
            reserved: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        }
    }
}

/// Clamp a countdown into `SECONDS_MIN..=SECONDS_MAX`
pub const fn clamp_seconds(seconds: u8) -> u8 {
    if seconds < SECONDS_MIN {
        SECONDS_MIN
    } else if seconds > SECONDS_MAX {
        SECONDS_MAX
    } else {
        seconds
    }
}
