//! DPT 8.xxx - 16-bit Signed Value
//!
//! Payload is `[0x00, high, low]`, big-endian two's complement.

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode, RESERVED_OCTET};
use crate::error::Result;

/// DPT 8.xxx 16-bit signed types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt8 {
    /// DPT 8.001 - Pulse difference
    PulseDifference,
    /// DPT 8.002 - Time lag (ms)
    TimeLagMs,
    /// DPT 8.010 - Percentage difference (0.01 %)
    PercentDifference,
}

impl Dpt8 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt8::PulseDifference => "8.001",
            Dpt8::TimeLagMs => "8.002",
            Dpt8::PercentDifference => "8.010",
        }
    }

    /// Get the unit string
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt8::PulseDifference => "pulses",
            Dpt8::TimeLagMs => "ms",
            Dpt8::PercentDifference => "%",
        }
    }
}

impl DptEncode<i16> for Dpt8 {
    fn encode(&self, value: i16, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 3)?;
        buf[0] = RESERVED_OCTET;
        buf[1..3].copy_from_slice(&value.to_be_bytes());
        Ok(3)
    }
}

impl DptDecode<i16> for Dpt8 {
    fn decode(&self, data: &[u8]) -> Result<i16> {
        ensure_data(data, 3)?;
        Ok(i16::from_be_bytes([data[1], data[2]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let mut buf = [0u8; 3];
        assert_eq!(Dpt8::PulseDifference.encode(0x1234, &mut buf).unwrap(), 3);
        assert_eq!(buf, [0x00, 0x12, 0x34]);
        Dpt8::PulseDifference.encode(-2, &mut buf).unwrap();
        assert_eq!(buf, [0x00, 0xFF, 0xFE]);
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            Dpt8::TimeLagMs.decode(&[0x00, 0x80, 0x00]).unwrap(),
            i16::MIN
        );
        assert!(Dpt8::TimeLagMs.decode(&[0x00, 0x80]).is_err());
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 2];
        assert!(Dpt8::PulseDifference.encode(1, &mut buf).is_err());
    }
}
