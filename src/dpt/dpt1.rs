//! DPT 1.xxx - Boolean (1-bit)
//!
//! The value is the LSB of payload byte 0. No reserved octet precedes it.
//!
//! ## Common Subtypes
//!
//! - **1.001** - Switch (off/on)
//! - **1.002** - Bool (false/true)
//! - **1.008** - UpDown (up/down)
//! - **1.009** - OpenClose (open/close)
//!
//! ## Example
//!
//! ```rust
//! use knx_ip_node::dpt::{Dpt1, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 1];
//! Dpt1::Switch.encode(true, &mut buf)?;
//! assert_eq!(buf, [0x01]);
//! assert!(Dpt1::Switch.decode(&buf)?);
//! # Ok::<(), knx_ip_node::KnxError>(())
//! ```

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode};
use crate::error::Result;

/// DPT 1.xxx Boolean types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt1 {
    /// DPT 1.001 - Switch (off/on)
    Switch,
    /// DPT 1.002 - Bool (false/true)
    Bool,
    /// DPT 1.003 - Enable (disable/enable)
    Enable,
    /// DPT 1.005 - Alarm (no alarm/alarm)
    Alarm,
    /// DPT 1.007 - Step (decrease/increase)
    Step,
    /// DPT 1.008 - UpDown (up/down)
    UpDown,
    /// DPT 1.009 - OpenClose (open/close)
    OpenClose,
    /// DPT 1.010 - Start (stop/start)
    Start,
}

impl Dpt1 {
    /// Get the DPT identifier string (e.g., "1.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt1::Switch => "1.001",
            Dpt1::Bool => "1.002",
            Dpt1::Enable => "1.003",
            Dpt1::Alarm => "1.005",
            Dpt1::Step => "1.007",
            Dpt1::UpDown => "1.008",
            Dpt1::OpenClose => "1.009",
            Dpt1::Start => "1.010",
        }
    }

    /// Get semantic labels for false/true values
    pub const fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Dpt1::Switch => ("off", "on"),
            Dpt1::Bool => ("false", "true"),
            Dpt1::Enable => ("disable", "enable"),
            Dpt1::Alarm => ("no alarm", "alarm"),
            Dpt1::Step => ("decrease", "increase"),
            Dpt1::UpDown => ("up", "down"),
            Dpt1::OpenClose => ("open", "close"),
            Dpt1::Start => ("stop", "start"),
        }
    }
}

impl DptEncode<bool> for Dpt1 {
    fn encode(&self, value: bool, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 1)?;
        buf[0] = u8::from(value);
        Ok(1)
    }
}

impl DptDecode<bool> for Dpt1 {
    fn decode(&self, data: &[u8]) -> Result<bool> {
        ensure_data(data, 1)?;
        Ok(data[0] & 0x01 != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let mut buf = [0xFFu8; 1];
        assert_eq!(Dpt1::Switch.encode(false, &mut buf).unwrap(), 1);
        assert_eq!(buf, [0x00]);
        Dpt1::Switch.encode(true, &mut buf).unwrap();
        assert_eq!(buf, [0x01]);
    }

    #[test]
    fn test_decode_ignores_upper_bits() {
        assert!(Dpt1::Switch.decode(&[0x3F]).unwrap());
        assert!(!Dpt1::Switch.decode(&[0x3E]).unwrap());
    }

    #[test]
    fn test_decode_empty() {
        assert!(Dpt1::Bool.decode(&[]).is_err());
    }

    #[test]
    fn test_encode_empty_buffer() {
        assert!(Dpt1::Bool.encode(true, &mut []).is_err());
    }

    #[test]
    fn test_identifier_and_labels() {
        assert_eq!(Dpt1::UpDown.identifier(), "1.008");
        assert_eq!(Dpt1::Switch.labels(), ("off", "on"));
    }
}
