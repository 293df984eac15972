//! DPT 3.xxx - 3-bit controlled (dimming and blinds)
//!
//! 4 bits in the low nibble of payload byte 0:
//!
//! ```text
//! ┌─────────┬─────────────┐
//! │ Control │  Stepcode   │
//! │  (1b)   │    (3b)     │
//! └─────────┴─────────────┘
//!    Bit 3     Bits 0-2
//! ```
//!
//! Stepcode 0 is Break (stop); 1-7 select 1, 2, 4 ... 64 intervals.
//!
//! ## Example
//!
//! ```rust
//! use knx_ip_node::dpt::{Dpt3, DptEncode, StepCode};
//!
//! let mut buf = [0u8; 1];
//! Dpt3::Dimming.encode((true, StepCode::Intervals4), &mut buf)?;
//! assert_eq!(buf, [0x0B]);
//! # Ok::<(), knx_ip_node::KnxError>(())
//! ```

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode};
use crate::error::Result;

/// DPT 3.xxx 3-bit controlled types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt3 {
    /// DPT 3.007 - Dimming control (decrease/increase)
    Dimming,
    /// DPT 3.008 - Blind control (up/down)
    Blind,
}

/// Stepcode values for 3-bit controlled types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StepCode {
    /// Break/Stop - halts the current operation
    Break = 0,
    /// 1 interval
    Intervals1 = 1,
    /// 2 intervals
    Intervals2 = 2,
    /// 4 intervals
    Intervals4 = 3,
    /// 8 intervals
    Intervals8 = 4,
    /// 16 intervals
    Intervals16 = 5,
    /// 32 intervals
    Intervals32 = 6,
    /// 64 intervals (maximum)
    Intervals64 = 7,
}

impl StepCode {
    /// Convert the low three bits of `value` to a stepcode.
    pub const fn from_bits(value: u8) -> Self {
        match value & 0x07 {
            0 => StepCode::Break,
            1 => StepCode::Intervals1,
            2 => StepCode::Intervals2,
            3 => StepCode::Intervals4,
            4 => StepCode::Intervals8,
            5 => StepCode::Intervals16,
            6 => StepCode::Intervals32,
            _ => StepCode::Intervals64,
        }
    }

    /// Number of intervals this stepcode represents (0 for Break)
    pub const fn intervals(self) -> u8 {
        match self {
            StepCode::Break => 0,
            other => 1 << (other as u8 - 1),
        }
    }
}

/// Decoded DPT 3 command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlCommand {
    /// Control bit: false = decrease/up, true = increase/down
    pub control: bool,
    /// Stepcode
    pub stepcode: StepCode,
}

impl Dpt3 {
    /// Get the DPT identifier string (e.g., "3.007")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt3::Dimming => "3.007",
            Dpt3::Blind => "3.008",
        }
    }

    /// Labels for the control bit (false, true)
    pub const fn control_labels(&self) -> (&'static str, &'static str) {
        match self {
            Dpt3::Dimming => ("decrease", "increase"),
            Dpt3::Blind => ("up", "down"),
        }
    }
}

impl DptEncode<ControlCommand> for Dpt3 {
    fn encode(&self, value: ControlCommand, buf: &mut [u8]) -> Result<usize> {
        DptEncode::<(bool, StepCode)>::encode(self, (value.control, value.stepcode), buf)
    }
}

impl DptEncode<(bool, StepCode)> for Dpt3 {
    fn encode(&self, value: (bool, StepCode), buf: &mut [u8]) -> Result<usize> {
        let control_bit = if value.0 { 0x08 } else { 0x00 };
        DptEncode::<u8>::encode(self, control_bit | value.1 as u8, buf)
    }
}

impl DptEncode<u8> for Dpt3 {
    fn encode(&self, value: u8, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 1)?;
        buf[0] = value & 0x0F;
        Ok(1)
    }
}

impl DptDecode<ControlCommand> for Dpt3 {
    fn decode(&self, data: &[u8]) -> Result<ControlCommand> {
        ensure_data(data, 1)?;
        Ok(ControlCommand {
            control: data[0] & 0x08 != 0,
            stepcode: StepCode::from_bits(data[0]),
        })
    }
}
