//! DPT 232.600 - RGB Color
//!
//! Payload is `[0x00, red, green, blue]`.

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode, RESERVED_OCTET};
use crate::error::Result;

/// DPT 232.600 RGB value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dpt232;

impl Dpt232 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        "232.600"
    }
}

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
}

impl DptEncode<Rgb> for Dpt232 {
    fn encode(&self, value: Rgb, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 4)?;
        buf[..4].copy_from_slice(&[RESERVED_OCTET, value.red, value.green, value.blue]);
        Ok(4)
    }
}

impl DptDecode<Rgb> for Dpt232 {
    fn decode(&self, data: &[u8]) -> Result<Rgb> {
        ensure_data(data, 4)?;
        Ok(Rgb {
            red: data[1],
            green: data[2],
            blue: data[3],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let mut buf = [0u8; 4];
        let color = Rgb {
            red: 0xFF,
            green: 0x80,
            blue: 0x01,
        };
        Dpt232.encode(color, &mut buf).unwrap();
        assert_eq!(buf, [0x00, 0xFF, 0x80, 0x01]);
        assert_eq!(Dpt232.decode(&buf).unwrap(), color);
    }
}
