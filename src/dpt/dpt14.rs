//! DPT 14.xxx - 4-byte Float
//!
//! Payload is `[0x00, b3, b2, b1, b0]`, the IEEE-754 single precision bits in
//! big-endian order.
//!
//! [`DptDecode::decode`] reinterprets those bits. Older routing nodes instead
//! rebuilt a `u32` from the bytes and converted it numerically; that decoder
//! is kept as [`Dpt14::decode_integer_pattern`] for interoperability tests.

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode, RESERVED_OCTET};
use crate::error::Result;

/// DPT 14.xxx 4-byte float types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt14 {
    /// DPT 14.019 - Electric current (A)
    ElectricCurrent,
    /// DPT 14.027 - Electric potential (V)
    ElectricPotential,
    /// DPT 14.056 - Power (W)
    Power,
    /// DPT 14.068 - Temperature (°C)
    Temperature,
}

impl Dpt14 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt14::ElectricCurrent => "14.019",
            Dpt14::ElectricPotential => "14.027",
            Dpt14::Power => "14.056",
            Dpt14::Temperature => "14.068",
        }
    }

    /// Get the unit string
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt14::ElectricCurrent => "A",
            Dpt14::ElectricPotential => "V",
            Dpt14::Power => "W",
            Dpt14::Temperature => "°C",
        }
    }

    /// Decode the four value bytes as an unsigned integer converted to `f32`.
    ///
    /// This is not an IEEE decode: `1.0` (`0x3F800000`) comes back as
    /// `1065353216.0`.
    pub fn decode_integer_pattern(&self, data: &[u8]) -> Result<f32> {
        ensure_data(data, 5)?;
        let pattern = u32::from_be_bytes([data[1], data[2], data[3], data[4]]);
        Ok(pattern as f32)
    }
}

impl DptEncode<f32> for Dpt14 {
    fn encode(&self, value: f32, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 5)?;
        buf[0] = RESERVED_OCTET;
        buf[1..5].copy_from_slice(&value.to_be_bytes());
        Ok(5)
    }
}

impl DptDecode<f32> for Dpt14 {
    fn decode(&self, data: &[u8]) -> Result<f32> {
        ensure_data(data, 5)?;
        Ok(f32::from_be_bytes([data[1], data[2], data[3], data[4]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_one() {
        let mut buf = [0u8; 5];
        assert_eq!(Dpt14::Power.encode(1.0, &mut buf).unwrap(), 5);
        assert_eq!(buf, [0x00, 0x3F, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn test_ieee_decode() {
        let mut buf = [0u8; 5];
        for value in [0.0f32, -1.5, 230.25, 1.0e-6, f32::MAX] {
            Dpt14::ElectricPotential.encode(value, &mut buf).unwrap();
            assert_eq!(Dpt14::ElectricPotential.decode(&buf).unwrap(), value);
        }
    }

    #[test]
    fn test_integer_pattern_decode() {
        let value = Dpt14::Power
            .decode_integer_pattern(&[0x00, 0x3F, 0x80, 0x00, 0x00])
            .unwrap();
        assert_eq!(value, 1_065_353_216.0);
    }

    #[test]
    fn test_short_payload() {
        assert!(Dpt14::Power.decode(&[0x00, 0x3F, 0x80, 0x00]).is_err());
    }
}
