//! DPT 10.001 - Time of Day
//!
//! ```text
//! Payload: [0x00, DDDH HHHH, 00MM MMMM, 00SS SSSS]
//!
//! D = Weekday (0 = no day, 1 = Monday ... 7 = Sunday)
//! H = Hours (0-23, 5 bits)
//! M = Minutes (0-59, 6 bits)
//! S = Seconds (0-59, 6 bits)
//! ```
//!
//! Each field is masked to its bit width on encode; no calendar validation
//! is performed.

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode, RESERVED_OCTET};
use crate::error::Result;

/// DPT 10.001 time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dpt10;

impl Dpt10 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        "10.001"
    }
}

/// Day of week as carried in the top three bits of the hours octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Weekday {
    /// No day given
    #[default]
    NoDay = 0,
    /// Monday
    Monday = 1,
    /// Tuesday
    Tuesday = 2,
    /// Wednesday
    Wednesday = 3,
    /// Thursday
    Thursday = 4,
    /// Friday
    Friday = 5,
    /// Saturday
    Saturday = 6,
    /// Sunday
    Sunday = 7,
}

impl Weekday {
    /// Convert the low three bits of `value` to a weekday.
    pub const fn from_bits(value: u8) -> Self {
        match value & 0x07 {
            0 => Weekday::NoDay,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            6 => Weekday::Saturday,
            _ => Weekday::Sunday,
        }
    }
}

/// Time of day with optional weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeOfDay {
    /// Day of week
    pub weekday: Weekday,
    /// Hours (0-23)
    pub hours: u8,
    /// Minutes (0-59)
    pub minutes: u8,
    /// Seconds (0-59)
    pub seconds: u8,
}

impl DptEncode<TimeOfDay> for Dpt10 {
    fn encode(&self, value: TimeOfDay, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 4)?;
        buf[0] = RESERVED_OCTET;
        buf[1] = ((value.weekday as u8) << 5) | (value.hours & 0x1F);
        buf[2] = value.minutes & 0x3F;
        buf[3] = value.seconds & 0x3F;
        Ok(4)
    }
}

impl DptDecode<TimeOfDay> for Dpt10 {
    fn decode(&self, data: &[u8]) -> Result<TimeOfDay> {
        ensure_data(data, 4)?;
        Ok(TimeOfDay {
            weekday: Weekday::from_bits(data[1] >> 5),
            hours: data[1] & 0x1F,
            minutes: data[2] & 0x3F,
            seconds: data[3] & 0x3F,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let mut buf = [0u8; 4];
        let time = TimeOfDay {
            weekday: Weekday::Wednesday,
            hours: 13,
            minutes: 45,
            seconds: 30,
        };
        assert_eq!(Dpt10.encode(time, &mut buf).unwrap(), 4);
        // weekday 3 in the top three bits: 0b011_01101
        assert_eq!(buf, [0x00, 0x6D, 45, 30]);
        assert_eq!(Dpt10.decode(&buf).unwrap(), time);
    }

    #[test]
    fn test_encode_masks_fields() {
        let mut buf = [0u8; 4];
        let time = TimeOfDay {
            weekday: Weekday::Sunday,
            hours: 0xFF,
            minutes: 0xFF,
            seconds: 0x40,
        };
        Dpt10.encode(time, &mut buf).unwrap();
        assert_eq!(buf, [0x00, 0xFF, 0x3F, 0x00]);
    }

    #[test]
    fn test_decode_short() {
        assert!(Dpt10.decode(&[0x00, 0x6D, 45]).is_err());
    }
}
