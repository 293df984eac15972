//! DPT 9.xxx - 2-byte Float
//!
//! ## Format
//!
//! ```text
//! Payload: [0x00, SEEE EMMM, MMMM MMMM]
//!
//! S = Sign bit, set whenever the encoded value is negative
//! E = Exponent (4 bits, 0-15)
//! M = Mantissa (low 11 bits of the two's complement mantissa)
//!
//! Value = 0.01 * mantissa * 2^E
//! ```
//!
//! ## Encoding
//!
//! The value is scaled by 100 and halved until it fits `[-2048, 2047]`, each
//! halving incrementing the exponent. The result is rounded half away from
//! zero and masked to 11 bits. The sign bit is taken from the input value, not
//! from the mantissa, so a negative value that rounds to a zero mantissa still
//! carries `S = 1`.
//!
//! ## Decoding
//!
//! [`DptDecode::decode`] treats `S` plus the 11 mantissa bits as a 12-bit two's
//! complement number. [`Dpt9::decode_concatenated`] keeps the historical
//! decoder that concatenates the raw bits into an `i16`; it agrees for
//! positive values only.
//!
//! ## Example
//!
//! ```rust
//! use knx_ip_node::dpt::{Dpt9, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 3];
//! Dpt9::Temperature.encode(-1.0, &mut buf)?;
//! assert_eq!(buf, [0x00, 0x87, 0x9C]);
//! assert_eq!(Dpt9::Temperature.decode(&buf)?, -1.0);
//! # Ok::<(), knx_ip_node::KnxError>(())
//! ```

use crate::dpt::{ensure_buf, ensure_data, DptDecode, DptEncode, RESERVED_OCTET};
use crate::error::{KnxError, Result};

/// DPT 9.xxx 2-byte float types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt9 {
    /// DPT 9.001 - Temperature (°C)
    Temperature,
    /// DPT 9.002 - Temperature difference (K)
    TemperatureDifference,
    /// DPT 9.004 - Illuminance (lux)
    Illuminance,
    /// DPT 9.005 - Wind speed (m/s)
    WindSpeed,
    /// DPT 9.006 - Pressure (Pa)
    Pressure,
    /// DPT 9.007 - Humidity (%)
    Humidity,
    /// DPT 9.008 - Air quality (ppm)
    AirQuality,
    /// DPT 9.020 - Voltage (mV)
    Voltage,
    /// DPT 9.021 - Current (mA)
    Current,
    /// DPT 9.024 - Power (kW)
    Power,
}

impl Dpt9 {
    /// Largest exponent the format can carry
    pub const MAX_EXPONENT: u8 = 15;

    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt9::Temperature => "9.001",
            Dpt9::TemperatureDifference => "9.002",
            Dpt9::Illuminance => "9.004",
            Dpt9::WindSpeed => "9.005",
            Dpt9::Pressure => "9.006",
            Dpt9::Humidity => "9.007",
            Dpt9::AirQuality => "9.008",
            Dpt9::Voltage => "9.020",
            Dpt9::Current => "9.021",
            Dpt9::Power => "9.024",
        }
    }

    /// Get the unit string
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt9::Temperature => "°C",
            Dpt9::TemperatureDifference => "K",
            Dpt9::Illuminance => "lux",
            Dpt9::WindSpeed => "m/s",
            Dpt9::Pressure => "Pa",
            Dpt9::Humidity => "%",
            Dpt9::AirQuality => "ppm",
            Dpt9::Voltage => "mV",
            Dpt9::Current => "mA",
            Dpt9::Power => "kW",
        }
    }

    /// Decode by concatenating `S` and the mantissa bits into an `i16`.
    ///
    /// This reproduces the decoder of older routing nodes. For negative
    /// values the result differs from [`DptDecode::decode`], because the
    /// 11-bit mantissa is not sign-extended.
    pub fn decode_concatenated(&self, data: &[u8]) -> Result<f32> {
        ensure_data(data, 3)?;
        let exponent = (data[1] & 0x78) >> 3;
        let mantissa = i16::from_be_bytes([data[1] & 0x87, data[2]]);
        Ok(0.01 * f32::from(mantissa) * (1u32 << exponent) as f32)
    }
}

// No f32::round in core.
#[inline]
fn round_half_away(value: f32) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

impl DptEncode<f32> for Dpt9 {
    fn encode(&self, value: f32, buf: &mut [u8]) -> Result<usize> {
        ensure_buf(buf, 3)?;
        if !value.is_finite() {
            return Err(KnxError::dpt_value_out_of_range());
        }

        let mut scaled = value * 100.0;
        let mut exponent = 0u8;
        while !(-2048.0..=2047.0).contains(&scaled) {
            scaled /= 2.0;
            exponent += 1;
            if exponent > Self::MAX_EXPONENT {
                return Err(KnxError::dpt_value_out_of_range());
            }
        }

        let mantissa = round_half_away(scaled) & 0x07FF;
        let mut high = (exponent << 3) | (mantissa >> 8) as u8;
        if value < 0.0 {
            high |= 0x80;
        }

        buf[0] = RESERVED_OCTET;
        buf[1] = high;
        buf[2] = (mantissa & 0xFF) as u8;
        Ok(3)
    }
}

impl DptDecode<f32> for Dpt9 {
    fn decode(&self, data: &[u8]) -> Result<f32> {
        ensure_data(data, 3)?;
        let high = data[1];
        let exponent = (high >> 3) & 0x0F;
        let bits = (i32::from(high & 0x07) << 8) | i32::from(data[2]);
        let mantissa = if high & 0x80 != 0 { bits - 2048 } else { bits };
        Ok(0.01 * mantissa as f32 * (1u32 << exponent) as f32)
    }
}
