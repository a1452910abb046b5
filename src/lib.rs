//! This crate contains a CRC-8 engine used to validate frames received over a serial link,
//! eg CRSF radio telemetry. It uses the DVB-S2 polynomial (0xD5).
//!
//! The optimisation level is selected at build time using cargo features:
//! `opt-speed` (default) uses a 256-byte lookup table; `opt-size` runs the polynomial
//! bit-by-bit. `opt-hardware` has no implementation, and fails the build.
//!
//! ```
//! use crsf_crc::DefaultCrc;
//!
//! // An RC channels frame: sync, length, type, 22 bytes of packed channels, CRC.
//! let mut frame = [0; 26];
//! frame[0] = 0xc8;
//! frame[1] = 24;
//! frame[2] = 0x16;
//! frame[25] = 0xef;
//!
//! let crc = DefaultCrc::new();
//! // The CRC covers the type and payload; skip the sync and length bytes.
//! let len = frame[1] as usize + 1;
//! assert_eq!(crc.calculate_from(2, 0, &frame, len), frame[25]);
//! ```

#![no_std]

use core::fmt;

pub mod config;
pub mod crc;

pub use config::*;
pub use crc::*;

/// CRC-8/DVB-S2 generator polynomial.
pub const CRC_POLY: u8 = 0xd5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcError {
    /// The requested length runs past the end of the buffer.
    BufferSize { length: usize, available: usize },
    /// The offset doesn't fall before the end of the requested length.
    Offset { offset: usize, length: usize },
    /// The computed CRC doesn't match the one received.
    Mismatch { expected: u8, actual: u8 },
}

impl fmt::Display for CrcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferSize { length, available } => write!(
                f,
                "Length {length} exceeds the buffer size of {available} bytes"
            ),
            Self::Offset { offset, length } => {
                write!(f, "Offset {offset} must be less than length {length}")
            }
            Self::Mismatch { expected, actual } => write!(
                f,
                "CRC mismatch: expected {expected:#04x}, got {actual:#04x}"
            ),
        }
    }
}
