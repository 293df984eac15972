//! KNX Group Address implementation.
//!
//! Group addresses identify functional datapoints. They use the 3-level
//! Area/Line/Member notation (e.g. `1/2/3`) and are stored as 16 bits:
//! - Area: 5 bits (0-31)
//! - Line: 3 bits (0-7)
//! - Member: 8 bits (0-255)

use crate::error::{KnxError, Result};
use core::fmt;

/// KNX Group Address
///
/// # Examples
///
/// ```
/// use knx_ip_node::GroupAddress;
///
/// // Checked construction
/// let addr = GroupAddress::new(1, 2, 3).unwrap();
/// assert_eq!(addr.to_string(), "1/2/3");
///
/// // Masking construction, out-of-range bits are dropped
/// let addr = GroupAddress::from_parts(33, 9, 3);
/// assert_eq!((addr.area(), addr.line(), addr.member()), (1, 1, 3));
///
/// // Parse from string
/// let addr: GroupAddress = "1/2/3".parse().unwrap();
/// assert_eq!(u16::from(addr), 0x0A03);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupAddress {
    raw: u16,
}

impl GroupAddress {
    /// Maximum area value (5 bits)
    pub const MAX_AREA: u8 = 31;
    /// Maximum line value (3 bits)
    pub const MAX_LINE: u8 = 7;
    /// Maximum member value (8 bits)
    pub const MAX_MEMBER: u8 = 255;

    /// The reserved "no address" value `0/0/0`. Nothing is ever sent to it.
    pub const UNASSIGNED: Self = Self { raw: 0 };

    /// Create a group address, rejecting components that do not fit their bit width.
    ///
    /// # Errors
    ///
    /// Returns an addressing error if `area > 31` or `line > 7`.
    pub fn new(area: u8, line: u8, member: u8) -> Result<Self> {
        if area > Self::MAX_AREA || line > Self::MAX_LINE {
            return Err(KnxError::address_out_of_range());
        }
        Ok(Self::from_parts(area, line, member))
    }

    /// Create a group address, masking each component to its bit width.
    #[inline]
    pub const fn from_parts(area: u8, line: u8, member: u8) -> Self {
        let raw = ((area as u16 & 0x1F) << 11) | ((line as u16 & 0x07) << 8) | member as u16;
        Self { raw }
    }

    /// Get the raw u16 representation of the address.
    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Get the area component (0-31).
    #[inline(always)]
    pub const fn area(self) -> u8 {
        ((self.raw >> 11) & 0x1F) as u8
    }

    /// Get the line component (0-7).
    #[inline(always)]
    pub const fn line(self) -> u8 {
        ((self.raw >> 8) & 0x07) as u8
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

    /// Whether this is the reserved `0/0/0` address.
    #[inline(always)]
    pub const fn is_unassigned(self) -> bool {
        self.raw == 0
    }

    /// Encode the address into a byte buffer (big-endian).
    ///
    /// # Errors
    ///
    /// Returns a transport error if `buf` is shorter than 2 bytes.
    #[inline]
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 2 {
            return Err(KnxError::buffer_too_small());
        }
        buf[0..2].copy_from_slice(&self.raw.to_be_bytes());
        Ok(2)
    }

    /// Decode an address from a byte buffer (big-endian).
    ///
    /// # Errors
    ///
    /// Returns a transport error if `buf` is shorter than 2 bytes.
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

impl From<u16> for GroupAddress {
    #[inline(always)]
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

impl From<GroupAddress> for u16 {
    #[inline(always)]
    fn from(addr: GroupAddress) -> u16 {
        addr.raw
    }
}

impl fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.area(), self.line(), self.member())
    }
}

impl core::str::FromStr for GroupAddress {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('/').map(|p| p.trim().parse::<u8>().ok());

        let (Some(Some(area)), Some(Some(line)), Some(Some(member)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(KnxError::invalid_group_address());
        };

        Self::new(area, line, member)
    }
}
