//! KNX Individual Address implementation.
//!
//! Individual (physical) addresses identify devices on the bus.
//! Format: Area.Line.Member (e.g., 1.1.5)
//! - Area: 0-15 (4 bits)
//! - Line: 0-15 (4 bits)
//! - Member: 0-255 (8 bits)

use crate::error::{KnxError, Result};
use core::fmt;

/// KNX Individual Address (Area.Line.Member)
///
/// A routing node uses its own individual address as the source of every
/// frame it emits.
///
/// # Examples
///
/// ```
/// use knx_ip_node::IndividualAddress;
///
/// let addr = IndividualAddress::new(1, 1, 5).unwrap();
/// assert_eq!(addr.to_string(), "1.1.5");
///
/// let addr: IndividualAddress = "1.1.5".parse().unwrap();
/// assert_eq!(u16::from(addr), 0x1105);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndividualAddress {
    raw: u16,
}

impl IndividualAddress {
    /// Maximum area value (4 bits)
    pub const MAX_AREA: u8 = 15;
    /// Maximum line value (4 bits)
    pub const MAX_LINE: u8 = 15;
    /// Maximum member value (8 bits)
    pub const MAX_MEMBER: u8 = 255;

    /// Physical address a node starts with until configured: `1.1.0`.
    pub const DEFAULT_NODE: Self = Self::from_parts(1, 1, 0);

    /// Create an individual address, rejecting components that do not fit.
    ///
    /// # Errors
    ///
    /// Returns an addressing error if `area > 15` or `line > 15`.
    pub fn new(area: u8, line: u8, member: u8) -> Result<Self> {
        if area > Self::MAX_AREA || line > Self::MAX_LINE {
            return Err(KnxError::address_out_of_range());
        }
        Ok(Self::from_parts(area, line, member))
    }

    /// Create an individual address, masking each component to its bit width.
    #[inline]
    pub const fn from_parts(area: u8, line: u8, member: u8) -> Self {
        let raw = ((area as u16 & 0x0F) << 12) | ((line as u16 & 0x0F) << 8) | member as u16;
        Self { raw }
    }

    /// Get the raw u16 representation.
    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Get the area component (0-15).
    #[inline(always)]
    pub const fn area(self) -> u8 {
        ((self.raw >> 12) & 0x0F) as u8
    }

    /// Get the line component (0-15).
    #[inline(always)]
    pub const fn line(self) -> u8 {
        ((self.raw >> 8) & 0x0F) as u8
    }

    /// Get the member component (0-255).
    #[inline(always)]
    pub const fn member(self) -> u8 {
        (self.raw & 0xFF) as u8
    }

    /// Decompose into `(area, line, member)`.
    #[inline]
    pub const fn parts(self) -> (u8, u8, u8) {
        (self.area(), self.line(), self.member())
    }

    /// Encode the address into a byte buffer (big-endian).
    #[inline]
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 2 {
            return Err(KnxError::buffer_too_small());
        }
        buf[0..2].copy_from_slice(&self.raw.to_be_bytes());
        Ok(2)
    }

    /// Decode an address from a byte buffer (big-endian).
    #[inline]
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < 2 {
            return Err(KnxError::buffer_too_small());
        }
        Ok(Self {
            raw: u16::from_be_bytes([buf[0], buf[1]]),
        })
    }
}

impl fmt::Display for IndividualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.area(), self.line(), self.member())
    }
}

impl From<u16> for IndividualAddress {
    #[inline(always)]
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

impl From<IndividualAddress> for u16 {
    #[inline(always)]
    fn from(addr: IndividualAddress) -> u16 {
        addr.raw
    }
}

impl core::str::FromStr for IndividualAddress {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('.').map(|p| p.trim().parse::<u8>().ok());

        let (Some(Some(area)), Some(Some(line)), Some(Some(member)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(KnxError::invalid_individual_address());
        };

        Self::new(area, line, member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let addr = IndividualAddress::new(1, 1, 5).unwrap();
        assert_eq!(addr.parts(), (1, 1, 5));
    }

    #[test]
    fn test_new_invalid() {
        assert!(IndividualAddress::new(16, 0, 0).is_err());
        assert!(IndividualAddress::new(0, 16, 0).is_err());
    }

    #[test]
    fn test_from_parts_masks() {
        let addr = IndividualAddress::from_parts(0x1F, 0x12, 7);
        assert_eq!(addr.parts(), (0x0F, 0x02, 7));
    }

    #[test]
    fn test_decompose_all_ranges() {
        for area in 0..=IndividualAddress::MAX_AREA {
            for line in 0..=IndividualAddress::MAX_LINE {
                for member in [0u8, 1, 254, 255] {
                    let addr = IndividualAddress::from_parts(area, line, member);
                    assert_eq!(addr.parts(), (area, line, member));
                }
            }
        }
    }

    #[test]
    fn test_default_node_address() {
        assert_eq!(IndividualAddress::DEFAULT_NODE.raw(), 0x1100);
        assert_eq!(IndividualAddress::DEFAULT_NODE.to_string(), "1.1.0");
    }

    #[test]
    fn test_encode_decode() {
        let addr = IndividualAddress::new(15, 15, 255).unwrap();
        let mut buf = [0u8; 2];
        addr.encode(&mut buf).unwrap();
        assert_eq!(buf, [0xFF, 0xFF]);
        assert_eq!(IndividualAddress::decode(&buf).unwrap(), addr);
    }

    #[test]
    fn test_from_str() {
        let addr: IndividualAddress = "1.1.5".parse().unwrap();
        assert_eq!(addr.parts(), (1, 1, 5));
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("1.1".parse::<IndividualAddress>().is_err());
        assert!("16.1.1".parse::<IndividualAddress>().is_err());
        assert!("1.1.1.1".parse::<IndividualAddress>().is_err());
        assert!("1/1/1".parse::<IndividualAddress>().is_err());
    }
}
