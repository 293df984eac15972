//! KNX Datapoint Types (DPT)
//!
//! Encoding and decoding of the value formats carried in a group telegram
//! payload. Encoders write the complete payload as it goes into a frame and
//! decoders accept the complete payload as a callback receives it.
//!
//! ## Payload conventions
//!
//! Values of 6 bits or less live in the low bits of payload byte 0 (the two
//! high bits of that byte belong to the command type and are handled by the
//! frame codec). Every wider value is preceded by a reserved `0x00` octet:
//!
//! ```text
//! 1-bit / 2-bit / 4-bit   [value]
//! 1-byte (u8 / i8)        [0x00, value]
//! 2-byte (i16, float)     [0x00, hi, lo]
//! 3-byte (time/date/rgb)  [0x00, b1, b2, b3]
//! 4-byte float            [0x00, b3, b2, b1, b0]
//! ```
//!
//! ## Supported DPT Families
//!
//! - **DPT 1.xxx** - Boolean (1 bit)
//! - **DPT 2.xxx** - 1-bit controlled (2 bits)
//! - **DPT 3.xxx** - 3-bit controlled (4 bits): dimming, blinds
//! - **DPT 5.xxx** - 8-bit unsigned: percentages, angles, counters
//! - **DPT 6.xxx** - 8-bit signed
//! - **DPT 8.xxx** - 16-bit signed
//! - **DPT 9.xxx** - 2-byte float: temperature, illuminance, humidity
//! - **DPT 10.001** - Time of day
//! - **DPT 11.001** - Date
//! - **DPT 14.xxx** - 4-byte IEEE float
//! - **DPT 232.600** - RGB color
//!
//! ## Usage
//!
//! ```rust
//! use knx_ip_node::dpt::{Dpt5, Dpt9, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 3];
//! let len = Dpt9::Temperature.encode(21.5, &mut buf)?;
//! assert_eq!(&buf[..len], &[0x00, 0x0C, 0x33]);
//!
//! let counter = Dpt5::Counter.decode(&[0x00, 42])?;
//! assert_eq!(counter, 42);
//! # Ok::<(), knx_ip_node::KnxError>(())
//! ```

use crate::error::{KnxError, Result};

pub mod dpt1;
pub mod dpt10;
pub mod dpt11;
pub mod dpt14;
pub mod dpt2;
pub mod dpt232;
pub mod dpt3;
pub mod dpt5;
pub mod dpt6;
pub mod dpt8;
pub mod dpt9;

#[doc(inline)]
pub use dpt1::Dpt1;
#[doc(inline)]
pub use dpt10::{Dpt10, TimeOfDay, Weekday};
#[doc(inline)]
pub use dpt11::{Date, Dpt11};
#[doc(inline)]
pub use dpt14::Dpt14;
#[doc(inline)]
pub use dpt2::{ControlledBit, Dpt2};
#[doc(inline)]
pub use dpt232::{Dpt232, Rgb};
#[doc(inline)]
pub use dpt3::{ControlCommand, Dpt3, StepCode};
#[doc(inline)]
pub use dpt5::Dpt5;
#[doc(inline)]
pub use dpt6::Dpt6;
#[doc(inline)]
pub use dpt8::Dpt8;
#[doc(inline)]
pub use dpt9::Dpt9;

/// Largest payload any supported DPT encodes to (4-byte float plus reserved octet).
pub const MAX_DPT_PAYLOAD: usize = 5;

/// The reserved leading octet of every multi-byte payload.
pub const RESERVED_OCTET: u8 = 0x00;

/// Trait for encoding values into a KNX payload.
pub trait DptEncode<T> {
    /// Encode `value` into `buf`, returning the number of payload bytes written.
    ///
    /// # Errors
    ///
    /// Returns a transport error if `buf` is too small, or a DPT error if the
    /// value cannot be represented.
    fn encode(&self, value: T, buf: &mut [u8]) -> Result<usize>;
}

/// Trait for decoding a KNX payload into a value.
pub trait DptDecode<T> {
    /// Decode a value from a complete payload.
    ///
    /// # Errors
    ///
    /// Returns a DPT error if the payload is too short or malformed.
    fn decode(&self, data: &[u8]) -> Result<T>;
}

#[inline]
pub(crate) fn ensure_buf(buf: &[u8], len: usize) -> Result<()> {
    if buf.len() < len {
        return Err(KnxError::buffer_too_small());
    }
    Ok(())
}

#[inline]
pub(crate) fn ensure_data(data: &[u8], len: usize) -> Result<()> {
    if data.len() < len {
        return Err(KnxError::invalid_dpt_data());
    }
    Ok(())
}
