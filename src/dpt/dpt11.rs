//! DPT 11.001 - Date
//!
//! ```text
//! Payload: [0x00, 000D DDDD, 0000 MMMM, YYYY YYYY]
//! ```
//!
//! Day and month are masked to 5 and 4 bits. The year octet is carried raw
//! in both directions; interpreting it (KNX uses 0-99 with a 1990 pivot) is
//! left to the application.

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode, RESERVED_OCTET};
use crate::error::Result;

/// DPT 11.001 date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dpt11;

impl Dpt11 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        "11.001"
    }
}

/// Calendar date as carried on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    /// Day of month (1-31)
    pub day: u8,
    /// Month (1-12)
    pub month: u8,
    /// Raw year octet
    pub year: u8,
}

impl DptEncode<Date> for Dpt11 {
    fn encode(&self, value: Date, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 4)?;
        buf[0] = RESERVED_OCTET;
        buf[1] = value.day & 0x1F;
        buf[2] = value.month & 0x0F;
        buf[3] = value.year;
        Ok(4)
    }
}

impl DptDecode<Date> for Dpt11 {
    fn decode(&self, data: &[u8]) -> Result<Date> {
        ensure_data(data, 4)?;
        Ok(Date {
            day: data[1] & 0x1F,
            month: data[2] & 0x0F,
            year: data[3],
        })
    }
}
