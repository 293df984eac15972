//! DPT 6.xxx - 8-bit Signed Value
//!
//! Payload is `[0x00, value as two's complement]`.

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode, RESERVED_OCTET};
use crate::error::Result;

/// DPT 6.xxx 8-bit signed types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt6 {
    /// DPT 6.001 - Percentage (-128..127 %)
    Percent,
    /// DPT 6.010 - Counter pulses
    Counter,
}

impl Dpt6 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt6::Percent => "6.001",
            Dpt6::Counter => "6.010",
        }
    }

    /// Get the unit string
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt6::Percent => "%",
            Dpt6::Counter => "pulses",
        }
    }
}

impl DptEncode<i8> for Dpt6 {
    fn encode(&self, value: i8, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 2)?;
        buf[0] = RESERVED_OCTET;
        buf[1] = value.to_be_bytes()[0];
        Ok(2)
    }
}

impl DptDecode<i8> for Dpt6 {
    fn decode(&self, data: &[u8]) -> Result<i8> {
        ensure_data(data, 2)?;
        Ok(i8::from_be_bytes([data[1]]))
    }
}
