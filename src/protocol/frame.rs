//! KNXnet/IP header parsing and encoding.
//!
//! Every KNXnet/IP datagram opens with a 6-byte header. A node only accepts
//! the routing services; anything else (search, tunnelling, device
//! management) fails [`KnxnetIpHeader::parse`] with an unsupported service
//! type.
//!
//! ```text
//! 0      1      2             4             6
//! ┌──────┬──────┬─────────────┬─────────────┬──────────────
//! │ 0x06 │ 0x10 │ service, BE │ total, BE   │ cEMI body ...
//! └──────┴──────┴─────────────┴─────────────┴──────────────
//! ```

use crate::error::{KnxError, Result};
use crate::protocol::constants::{ServiceType, HEADER_SIZE_10, KNXNETIP_VERSION_10};

/// Marks rejection branches as cold
#[inline(always)]
#[cold]
const fn unlikely(b: bool) -> bool {
    b
}

/// The 6-byte KNXnet/IP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KnxnetIpHeader {
    /// Always [`HEADER_SIZE_10`] once parsed
    pub header_length: u8,
    /// Always [`KNXNETIP_VERSION_10`] once parsed
    pub protocol_version: u8,
    /// Routing service carried by the datagram
    pub service_type: ServiceType,
    /// Datagram length, header included
    pub total_length: u16,
}

impl KnxnetIpHeader {
    /// Encoded size
    pub const SIZE: usize = 6;

    /// Header announcing a body of `body_length` bytes
    pub const fn new(service_type: ServiceType, body_length: u16) -> Self {
        Self {
            header_length: HEADER_SIZE_10,
            protocol_version: KNXNETIP_VERSION_10,
            service_type,
            total_length: Self::SIZE as u16 + body_length,
        }
    }

    /// Validate and decode the first six bytes of `data`
    ///
    /// The total length field is reported as received and not checked
    /// against `data.len()`.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if:
    /// - Buffer is shorter than the header
    /// - Header length is not 6
    /// - Protocol version is not 1.0
    /// - Service type is not a routing service
    #[inline]
    pub fn parse(data: &[u8]) -> Result<Self> {
        if unlikely(data.len() < Self::SIZE) {
            return Err(KnxError::invalid_frame());
        }

        let header_length = data[0];
        let protocol_version = data[1];
        let service_type_raw = u16::from_be_bytes([data[2], data[3]]);
        let total_length = u16::from_be_bytes([data[4], data[5]]);

        if unlikely(header_length != HEADER_SIZE_10) {
            return Err(KnxError::invalid_frame());
        }

        if unlikely(protocol_version != KNXNETIP_VERSION_10) {
            return Err(KnxError::unsupported_version());
        }

        let service_type =
            ServiceType::from_u16(service_type_raw).ok_or_else(KnxError::unsupported_service_type)?;

        Ok(Self {
            header_length,
            protocol_version,
            service_type,
            total_length,
        })
    }

    /// Write the header to the start of `buf`
    ///
    /// # Errors
    ///
    /// Returns a transport error if `buf` is shorter than [`Self::SIZE`].
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < Self::SIZE {
            return Err(KnxError::buffer_too_small());
        }

        buf[0] = self.header_length;
        buf[1] = self.protocol_version;
        buf[2..4].copy_from_slice(&self.service_type.to_u16().to_be_bytes());
        buf[4..6].copy_from_slice(&self.total_length.to_be_bytes());

        Ok(Self::SIZE)
    }

    /// Body length announced by `total_length`
    pub const fn body_length(&self) -> u16 {
        self.total_length.saturating_sub(Self::SIZE as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_parse() {
        let data = [
            0x06, // header length
            0x10, // protocol version
            0x05, 0x30, // service type (ROUTING_INDICATION)
            0x00, 0x12, // total length (18 bytes)
        ];

        let header = KnxnetIpHeader::parse(&data).unwrap();
        assert_eq!(header.header_length, 0x06);
        assert_eq!(header.protocol_version, 0x10);
        assert_eq!(header.service_type, ServiceType::RoutingIndication);
        assert_eq!(header.total_length, 18);
        assert_eq!(header.body_length(), 12);
    }

    #[test]
    fn test_header_encode() {
        let header = KnxnetIpHeader::new(ServiceType::RoutingIndication, 12);
        let mut buf = [0u8; 6];
        let size = header.encode(&mut buf).unwrap();

        assert_eq!(size, 6);
        assert_eq!(buf, [0x06, 0x10, 0x05, 0x30, 0x00, 0x12]);
    }

    #[test]
    fn test_header_rejects_bad_constants() {
        let wrong_len = [0x05, 0x10, 0x05, 0x30, 0x00, 0x12];
        assert!(KnxnetIpHeader::parse(&wrong_len)
            .unwrap_err()
            .is_protocol_error());

        let wrong_version = [0x06, 0x20, 0x05, 0x30, 0x00, 0x12];
        assert!(matches!(
            KnxnetIpHeader::parse(&wrong_version),
            Err(KnxError::Protocol(e)) if e.is_unsupported_version()
        ));

        // SEARCH_REQUEST
        let wrong_service = [0x06, 0x10, 0x02, 0x01, 0x00, 0x0E];
        assert!(matches!(
            KnxnetIpHeader::parse(&wrong_service),
            Err(KnxError::Protocol(e)) if e.is_unsupported_service_type()
        ));
    }

    #[test]
    fn test_header_too_short() {
        assert!(KnxnetIpHeader::parse(&[0x06, 0x10, 0x05]).is_err());
        let mut buf = [0u8; 4];
        assert!(KnxnetIpHeader::new(ServiceType::RoutingIndication, 0)
            .encode(&mut buf)
            .is_err());
    }
}
