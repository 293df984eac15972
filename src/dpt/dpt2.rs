//! DPT 2.xxx - 1-bit controlled (2 bits)
//!
//! ```text
//! bit 1: control (0 = no control, 1 = control)
//! bit 0: value
//! ```
//!
//! Raw `u8` values are masked to the low two bits.

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode};
use crate::error::Result;

/// DPT 2.xxx controlled boolean types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt2 {
    /// DPT 2.001 - Switch control
    SwitchControl,
    /// DPT 2.002 - Bool control
    BoolControl,
    /// DPT 2.008 - Direction control
    DirectionControl,
}

impl Dpt2 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt2::SwitchControl => "2.001",
            Dpt2::BoolControl => "2.002",
            Dpt2::DirectionControl => "2.008",
        }
    }
}

/// A value with a priority-control flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlledBit {
    /// Whether the sender takes priority control
    pub control: bool,
    /// The value itself
    pub value: bool,
}

impl ControlledBit {
    const fn bits(self) -> u8 {
        ((self.control as u8) << 1) | self.value as u8
    }
}

impl DptEncode<ControlledBit> for Dpt2 {
    fn encode(&self, value: ControlledBit, buf: &mut [u8]) -> Result<usize> {
        DptEncode::<u8>::encode(self, value.bits(), buf)
    }
}

impl DptEncode<u8> for Dpt2 {
    fn encode(&self, value: u8, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 1)?;
        buf[0] = value & 0x03;
        Ok(1)
    }
}

impl DptDecode<ControlledBit> for Dpt2 {
    fn decode(&self, data: &[u8]) -> Result<ControlledBit> {
        ensure_data(data, 1)?;
        Ok(ControlledBit {
            control: data[0] & 0x02 != 0,
            value: data[0] & 0x01 != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_controlled() {
        let mut buf = [0u8; 1];
        let value = ControlledBit {
            control: true,
            value: false,
        };
        Dpt2::SwitchControl.encode(value, &mut buf).unwrap();
        assert_eq!(buf, [0x02]);
    }

    #[test]
    fn test_encode_raw_masks() {
        let mut buf = [0u8; 1];
        Dpt2::BoolControl.encode(0xFFu8, &mut buf).unwrap();
        assert_eq!(buf, [0x03]);
    }

    #[test]
    fn test_decode() {
        let decoded: ControlledBit = Dpt2::SwitchControl.decode(&[0x03]).unwrap();
        assert!(decoded.control);
        assert!(decoded.value);
    }
}
