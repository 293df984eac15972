//! DPT 5.xxx - 8-bit Unsigned Value
//!
//! Payload is `[0x00, value]`. Percentage and angle subtypes scale their
//! engineering value onto the full 0-255 range, the others map it directly.
//!
//! ## Example
//!
//! ```rust
//! use knx_ip_node::dpt::{Dpt5, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 2];
//! Dpt5::Percentage.encode(100, &mut buf)?;
//! assert_eq!(buf, [0x00, 0xFF]);
//! assert_eq!(Dpt5::Percentage.decode(&buf)?, 100);
//! # Ok::<(), knx_ip_node::KnxError>(())
//! ```

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode, RESERVED_OCTET};
use crate::error::{KnxError, Result};

/// DPT 5.xxx 8-bit unsigned types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt5 {
    /// DPT 5.001 - Percentage (0-100%)
    Percentage,
    /// DPT 5.003 - Angle (0-360°)
    Angle,
    /// DPT 5.004 - Percentage 0-255
    PercentU8,
    /// DPT 5.010 - Counter pulses (0-255)
    Counter,
}

impl Dpt5 {
    /// Get the DPT identifier string (e.g., "5.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt5::Percentage => "5.001",
            Dpt5::Angle => "5.003",
            Dpt5::PercentU8 => "5.004",
            Dpt5::Counter => "5.010",
        }
    }

    /// Get the unit string for this DPT
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt5::Percentage => "%",
            Dpt5::Angle => "°",
            Dpt5::PercentU8 => "",
            Dpt5::Counter => "pulses",
        }
    }

    /// Largest engineering value accepted by `encode`
    pub const fn max(&self) -> u16 {
        match self {
            Dpt5::Percentage => 100,
            Dpt5::Angle => 360,
            Dpt5::PercentU8 | Dpt5::Counter => 255,
        }
    }

    // Scaled subtypes round to nearest so that 0 and max survive a round trip.
    fn encode_scaled(self, value: u16) -> Result<u8> {
        if value > self.max() {
            return Err(KnxError::dpt_value_out_of_range());
        }
        let max = u32::from(self.max());
        Ok(match self {
            Dpt5::Percentage | Dpt5::Angle => ((u32::from(value) * 255 + max / 2) / max) as u8,
            Dpt5::PercentU8 | Dpt5::Counter => value as u8,
        })
    }

    fn decode_scaled(self, raw: u8) -> u16 {
        let max = u32::from(self.max());
        match self {
            Dpt5::Percentage | Dpt5::Angle => ((u32::from(raw) * max + 127) / 255) as u16,
            Dpt5::PercentU8 | Dpt5::Counter => u16::from(raw),
        }
    }
}

impl DptEncode<u16> for Dpt5 {
    fn encode(&self, value: u16, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 2)?;
        buf[0] = RESERVED_OCTET;
        buf[1] = self.encode_scaled(value)?;
        Ok(2)
    }
}

impl DptDecode<u16> for Dpt5 {
    fn decode(&self, data: &[u8]) -> Result<u16> {
        ensure_data(data, 2)?;
        Ok(self.decode_scaled(data[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_direct() {
        let mut buf = [0xFFu8; 2];
        assert_eq!(Dpt5::Counter.encode(42, &mut buf).unwrap(), 2);
        assert_eq!(buf, [0x00, 42]);
        assert_eq!(Dpt5::Counter.decode(&buf).unwrap(), 42);
    }

    #[test]
    fn test_percentage_scaling() {
        let mut buf = [0u8; 2];
        Dpt5::Percentage.encode(50, &mut buf).unwrap();
        assert_eq!(buf[1], 128);
        Dpt5::Percentage.encode(0, &mut buf).unwrap();
        assert_eq!(buf[1], 0);
        assert_eq!(Dpt5::Percentage.decode(&[0x00, 0xFF]).unwrap(), 100);
        assert_eq!(Dpt5::Percentage.decode(&[0x00, 128]).unwrap(), 50);
    }

    #[test]
    fn test_angle_scaling() {
        let mut buf = [0u8; 2];
        Dpt5::Angle.encode(360, &mut buf).unwrap();
        assert_eq!(buf[1], 255);
        assert_eq!(Dpt5::Angle.decode(&buf).unwrap(), 360);
    }

    #[test]
    fn test_out_of_range() {
        let mut buf = [0u8; 2];
        assert!(Dpt5::Percentage.encode(101, &mut buf).is_err());
        assert!(Dpt5::Counter.encode(256, &mut buf).is_err());
    }

    #[test]
    fn test_decode_reads_second_octet() {
        // Without the reserved octet the payload is too short
        assert!(Dpt5::Counter.decode(&[42]).is_err());
        assert_eq!(Dpt5::Counter.decode(&[0x3F, 7]).unwrap(), 7);
    }
}
