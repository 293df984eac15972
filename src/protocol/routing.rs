//! KNXnet/IP routing indications.
//!
//! A routing indication is one KNX group telegram sent as a UDP multicast
//! datagram. This node emits and accepts exactly one shape:
//!
//! ```text
//! Offset  Field                 Value
//! 0       header length         0x06
//! 1       protocol version      0x10
//! 2..4    service type          0x0530 (ROUTING_INDICATION)
//! 4..6    total length          17 + data_len, big-endian
//! 6       message code          0x29 (L_Data.ind)
//! 7       additional info len   0 on send, skipped on receive
//! 8       control field 1       0xBC
//! 9       control field 2       0xE0
//! 10..12  source                individual address
//! 12..14  destination           group address
//! 14      data_len              payload length
//! 15      TPCI                  command bits 3-2
//! 16..    payload               byte 0 bits 7-6 = command bits 1-0
//! end     checksum              XOR of every preceding byte
//! ```
//!
//! ## Example
//!
//! ```rust
//! use knx_ip_node::protocol::{decode_frame, encode_frame, CommandType, MAX_FRAME_SIZE};
//! use knx_ip_node::{ga, ia};
//!
//! let mut buf = [0u8; MAX_FRAME_SIZE];
//! let len = encode_frame(ia!(1, 1, 0), ga!(1/2/3), CommandType::Write, &[0x00, 42], &mut buf)?;
//! assert_eq!(len, 19);
//!
//! let frame = decode_frame(&buf[..len]).unwrap();
//! assert_eq!(frame.destination, ga!(1/2/3));
//! assert_eq!(frame.command, CommandType::Write);
//! assert_eq!(frame.payload(), &[0x00, 42]);
//! # Ok::<(), knx_ip_node::KnxError>(())
//! ```

use heapless::Vec;

use crate::addressing::{GroupAddress, IndividualAddress};
use crate::dpt::DptDecode;
use crate::error::{KnxError, Result};
use crate::protocol::cemi::{
    CEMIFrame, CommandType, ControlField1, ControlField2, LDataFrame, Tpci,
};
use crate::protocol::constants::{
    CEMIMessageCode, ServiceType, MAX_PAYLOAD_LEN, ROUTING_FRAME_OVERHEAD,
};
use crate::protocol::frame::KnxnetIpHeader;

/// Offset of the payload in an outbound frame
const PAYLOAD_OFFSET: usize = 16;

/// XOR fold of `bytes`
///
/// Folding a complete frame, checksum byte included, yields zero.
#[inline]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// What to do with the trailing checksum byte of inbound frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChecksumPolicy {
    /// Accept frames regardless of their checksum byte, or its absence
    #[default]
    Ignore,
    /// Reject frames that lack a checksum byte or whose XOR fold is non-zero
    Verify,
}

/// Builder for outbound routing indications
///
/// The control fields, message code and hop count are fixed; only the
/// addresses, the command and the payload vary.
#[derive(Debug, Clone, Copy)]
pub struct RoutingFrameBuilder<'a> {
    source: IndividualAddress,
    destination: GroupAddress,
    command: CommandType,
    payload: &'a [u8],
}

impl<'a> RoutingFrameBuilder<'a> {
    /// Create a new frame builder
    pub const fn new(
        source: IndividualAddress,
        destination: GroupAddress,
        command: CommandType,
        payload: &'a [u8],
    ) -> Self {
        Self {
            source,
            destination,
            command,
            payload,
        }
    }

    /// Number of payload bytes that go on the wire
    ///
    /// An empty payload still occupies one octet, which carries the low
    /// command bits.
    pub fn data_len(&self) -> usize {
        self.payload.len().max(1)
    }

    /// Calculate the total frame size
    pub fn size(&self) -> usize {
        ROUTING_FRAME_OVERHEAD + self.data_len()
    }

    /// Build the frame into a buffer
    ///
    /// Returns `Ok(0)` and writes nothing when the destination is the
    /// unassigned group address `0/0/0`. An empty payload is sent as a single
    /// zero octet, so the frame is 18 bytes long rather than 17.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Payload is longer than [`MAX_PAYLOAD_LEN`]
    /// - Buffer is too small
    pub fn build(&self, buf: &mut [u8]) -> Result<usize> {
        if self.destination.is_unassigned() {
            return Ok(0);
        }

        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(KnxError::payload_too_large());
        }

        let data_len = self.data_len();
        let total_size = self.size();
        if buf.len() < total_size {
            return Err(KnxError::buffer_too_small());
        }

        let body_length = (total_size - KnxnetIpHeader::SIZE) as u16;
        KnxnetIpHeader::new(ServiceType::RoutingIndication, body_length).encode(buf)?;

        buf[6] = CEMIMessageCode::LDataInd.to_u8();
        buf[7] = 0;
        buf[8] = ControlField1::default().raw();
        buf[9] = ControlField2::default().raw();
        buf[10..12].copy_from_slice(&self.source.raw().to_be_bytes());
        buf[12..14].copy_from_slice(&self.destination.raw().to_be_bytes());
        buf[14] = data_len as u8;
        buf[15] = Tpci::UnnumberedData.to_byte(self.command.apci_high());

        let payload_end = PAYLOAD_OFFSET + data_len;
        if self.payload.is_empty() {
            buf[PAYLOAD_OFFSET] = 0;
        } else {
            buf[PAYLOAD_OFFSET..payload_end].copy_from_slice(self.payload);
        }
        buf[PAYLOAD_OFFSET] = (buf[PAYLOAD_OFFSET] & 0x3F) | (self.command.apci_low() << 6);

        buf[payload_end] = checksum(&buf[..payload_end]);

        Ok(total_size)
    }
}

/// A decoded inbound routing indication
///
/// The payload is copied out of the datagram with the command bits cleared
/// from byte 0, so it can be handed to the DPT decoders as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingIndication {
    /// Sender
    pub source: IndividualAddress,
    /// Group the telegram is addressed to
    pub destination: GroupAddress,
    /// Application command
    pub command: CommandType,
    /// Control field 1 as received
    pub ctrl1: ControlField1,
    /// Control field 2 as received
    pub ctrl2: ControlField2,
    payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl RoutingIndication {
    /// Parse a routing indication
    ///
    /// The header total length is not cross-checked against the datagram
    /// size; trailing bytes after the payload are ignored unless `policy`
    /// asks for checksum verification.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if:
    /// - Header constants or service type are wrong
    /// - Message code is not `L_Data.ind`
    /// - Destination is not a group address
    /// - Data length is zero or the payload is truncated
    /// - `policy` is [`ChecksumPolicy::Verify`] and the checksum is missing or wrong
    pub fn parse(data: &[u8], policy: ChecksumPolicy) -> Result<Self> {
        let header = KnxnetIpHeader::parse(data)?;
        if header.service_type != ServiceType::RoutingIndication {
            return Err(KnxError::unsupported_service_type());
        }

        let cemi = CEMIFrame::parse(&data[KnxnetIpHeader::SIZE..])?;
        if cemi.message_code() != CEMIMessageCode::LDataInd {
            return Err(KnxError::invalid_message_code());
        }

        let ldata = cemi.as_ldata()?;
        let Some(destination) = ldata.destination_group() else {
            return Err(KnxError::not_group_addressed());
        };

        if policy == ChecksumPolicy::Verify {
            let end = KnxnetIpHeader::SIZE
                + cemi.service_info_offset()
                + LDataFrame::HEADER_SIZE
                + ldata.data_len();
            match data.get(..=end) {
                Some(frame) if checksum(frame) == 0 => {}
                _ => return Err(KnxError::invalid_checksum()),
            }
        }

        let mut payload = Vec::new();
        payload
            .extend_from_slice(ldata.data)
            .map_err(|_| KnxError::payload_too_large())?;
        payload[0] &= 0x3F;

        Ok(Self {
            source: ldata.source,
            destination,
            command: ldata.command(),
            ctrl1: ldata.ctrl1,
            ctrl2: ldata.ctrl2,
            payload,
        })
    }

    /// Payload with the command bits cleared
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Borrow as the message handed to callbacks
    #[inline]
    pub fn message(&self) -> GroupMessage<'_> {
        GroupMessage {
            command: self.command,
            destination: self.destination,
            source: self.source,
            data: &self.payload,
        }
    }
}

/// Encode one routing indication into `buf`
///
/// Returns the frame length, or `Ok(0)` without writing anything when
/// `destination` is `0/0/0`.
///
/// # Errors
///
/// See [`RoutingFrameBuilder::build`].
pub fn encode_frame(
    source: IndividualAddress,
    destination: GroupAddress,
    command: CommandType,
    payload: &[u8],
    buf: &mut [u8],
) -> Result<usize> {
    RoutingFrameBuilder::new(source, destination, command, payload).build(buf)
}

/// Decode a routing indication without checksum verification
///
/// Malformed frames and frames this node does not handle yield `None`.
pub fn decode_frame(bytes: &[u8]) -> Option<RoutingIndication> {
    RoutingIndication::parse(bytes, ChecksumPolicy::Ignore).ok()
}

/// A group telegram as seen by a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMessage<'m> {
    /// Application command
    pub command: CommandType,
    /// Group the telegram was addressed to
    pub destination: GroupAddress,
    /// Sender
    pub source: IndividualAddress,
    data: &'m [u8],
}

impl<'m> GroupMessage<'m> {
    /// Create a message over an already cleaned payload
    pub const fn new(
        command: CommandType,
        destination: GroupAddress,
        source: IndividualAddress,
        data: &'m [u8],
    ) -> Self {
        Self {
            command,
            destination,
            source,
            data,
        }
    }

    /// Raw payload bytes, command bits cleared
    #[inline]
    pub const fn data(&self) -> &'m [u8] {
        self.data
    }

    /// Decode the payload with a datapoint type
    ///
    /// ```rust
    /// use knx_ip_node::dpt::Dpt5;
    /// use knx_ip_node::protocol::{CommandType, GroupMessage};
    /// use knx_ip_node::{ga, ia};
    ///
    /// let msg = GroupMessage::new(CommandType::Write, ga!(1/2/3), ia!(1, 1, 5), &[0x00, 42]);
    /// let value: u16 = msg.decode(&Dpt5::Counter)?;
    /// assert_eq!(value, 42);
    /// # Ok::<(), knx_ip_node::KnxError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the decoder's error for payloads that are too short.
    #[inline]
    pub fn decode<T, D: DptDecode<T>>(&self, dpt: &D) -> Result<T> {
        dpt.decode(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::MAX_FRAME_SIZE;

    const SOURCE: IndividualAddress = IndividualAddress::from_parts(1, 1, 0);

    fn dest() -> GroupAddress {
        GroupAddress::from_parts(1, 2, 3)
    }

    fn encode(command: CommandType, payload: &[u8]) -> Vec<u8, MAX_FRAME_SIZE> {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = encode_frame(SOURCE, dest(), command, payload, &mut buf).unwrap();
        Vec::from_slice(&buf[..len]).unwrap()
    }

    #[test]
    fn test_encode_exact_bytes() {
        let frame = encode(CommandType::Write, &[0x00, 42]);
        let mut expected = [
            0x06, 0x10, 0x05, 0x30, 0x00, 0x13, // header, total 19
            0x29, 0x00, // L_Data.ind, no additional info
            0xBC, 0xE0, // control fields
            0x11, 0x00, // source 1.1.0
            0x0A, 0x03, // destination 1/2/3
            0x02, // data_len
            0x00, // TPCI, command bits 3-2 = 0
            0x80, 42, // payload, command bits 1-0 = 0b10 (write)
            0x00, // checksum placeholder
        ];
        expected[18] = checksum(&expected[..18]);
        assert_eq!(frame.as_slice(), &expected);
    }

    #[test]
    fn test_checksum_folds_to_zero() {
        for len in 0..=14usize {
            let payload = [0x5Au8; 14];
            let frame = encode(CommandType::Answer, &payload[..len]);
            assert_eq!(checksum(&frame), 0);
        }
    }

    #[test]
    fn test_roundtrip_all_lengths_and_commands() {
        for command in [CommandType::Read, CommandType::Answer, CommandType::Write] {
            for len in 0..=14usize {
                let mut payload = [0u8; 14];
                for (i, b) in payload.iter_mut().enumerate() {
                    *b = (i as u8).wrapping_mul(37);
                }
                // the top two bits of byte 0 belong to the command
                payload[0] &= 0x3F;
                let payload = &payload[..len];

                let frame = encode(command, payload);
                let decoded = decode_frame(&frame).unwrap();
                assert_eq!(decoded.source, SOURCE);
                assert_eq!(decoded.destination, dest());
                assert_eq!(decoded.command, command);
                if len == 0 {
                    assert_eq!(decoded.payload(), &[0x00]);
                } else {
                    assert_eq!(decoded.payload(), payload);
                }
            }
        }
    }

    #[test]
    fn test_empty_payload_padded_to_one_octet() {
        let builder = RoutingFrameBuilder::new(SOURCE, dest(), CommandType::Read, &[]);
        assert_eq!(builder.data_len(), 1);
        assert_eq!(builder.size(), 18);

        let frame = encode(CommandType::Read, &[]);
        assert_eq!(frame.len(), 18);
        assert_eq!(&frame[4..6], &[0x00, 0x12]);
        assert_eq!(frame[14], 1);
        assert_eq!(frame[16], 0x00);
    }

    #[test]
    fn test_high_command_bits_travel_in_tpci() {
        let frame = encode(CommandType::MemWrite, &[0x01]);
        assert_eq!(frame[15], 0b10);
        assert_eq!(frame[16], 0x81);
        let decoded = decode_frame(&frame).unwrap();
        assert_eq!(decoded.command, CommandType::MemWrite);
        assert_eq!(decoded.payload(), &[0x01]);
    }

    #[test]
    fn test_unassigned_destination_is_noop() {
        let mut buf = [0xAAu8; MAX_FRAME_SIZE];
        let len = encode_frame(
            SOURCE,
            GroupAddress::UNASSIGNED,
            CommandType::Write,
            &[0x01],
            &mut buf,
        )
        .unwrap();
        assert_eq!(len, 0);
        assert!(buf.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_encode_limits() {
        let mut small = [0u8; 18];
        assert!(encode_frame(SOURCE, dest(), CommandType::Write, &[0, 1], &mut small).is_err());

        let big = [0u8; MAX_PAYLOAD_LEN + 1];
        let mut buf = [0u8; MAX_FRAME_SIZE + 1];
        assert!(matches!(
            encode_frame(SOURCE, dest(), CommandType::Write, &big, &mut buf),
            Err(KnxError::Protocol(e)) if e.is_payload_too_large()
        ));

        let max = [0u8; MAX_PAYLOAD_LEN];
        let mut buf = [0u8; MAX_FRAME_SIZE];
        assert_eq!(
            encode_frame(SOURCE, dest(), CommandType::Write, &max, &mut buf).unwrap(),
            MAX_FRAME_SIZE
        );
    }

    #[test]
    fn test_rejects_wrong_header_constants() {
        let good = encode(CommandType::Write, &[0x01]);

        let mut frame = good.clone();
        frame[0] = 0x07;
        assert!(decode_frame(&frame).is_none());

        let mut frame = good.clone();
        frame[1] = 0x20;
        assert!(decode_frame(&frame).is_none());

        // ROUTING_BUSY parses as a header but is not an indication
        let mut frame = good.clone();
        frame[3] = 0x32;
        assert!(decode_frame(&frame).is_none());
    }

    #[test]
    fn test_rejects_wrong_message_code() {
        let mut frame = encode(CommandType::Write, &[0x01]);
        frame[6] = CEMIMessageCode::LDataReq.to_u8();
        assert!(matches!(
            RoutingIndication::parse(&frame, ChecksumPolicy::Ignore),
            Err(KnxError::Protocol(e)) if e.is_invalid_message_code()
        ));
    }

    #[test]
    fn test_rejects_individual_destination() {
        let mut frame = encode(CommandType::Write, &[0x01]);
        frame[9] &= 0x7F;
        assert!(matches!(
            RoutingIndication::parse(&frame, ChecksumPolicy::Ignore),
            Err(KnxError::Protocol(e)) if e.is_not_group_addressed()
        ));
    }

    #[test]
    fn test_rejects_truncated_and_zero_length() {
        let frame = encode(CommandType::Write, &[0x00, 1, 2, 3]);
        assert!(decode_frame(&frame[..18]).is_none());
        assert!(decode_frame(&frame[..4]).is_none());

        let mut frame = encode(CommandType::Write, &[0x01]);
        frame[14] = 0;
        assert!(decode_frame(&frame).is_none());
    }

    #[test]
    fn test_skips_additional_info() {
        // L_Data.ind with two bytes of additional info in front of the service info
        let mut data = [
            0x06, 0x10, 0x05, 0x30, 0x00, 0x14, // header
            0x29, 0x02, 0xAA, 0xBB, // cEMI with additional info
            0xBC, 0xE0, 0x11, 0x05, 0x0A, 0x03, 0x01, 0x00, 0x81, // write 1 to 1/2/3
            0x00, // checksum
        ];
        data[19] = checksum(&data[..19]);
        let frame = RoutingIndication::parse(&data, ChecksumPolicy::Verify).unwrap();
        assert_eq!(frame.source, IndividualAddress::from_parts(1, 1, 5));
        assert_eq!(frame.command, CommandType::Write);
        assert_eq!(frame.payload(), &[0x01]);
    }

    #[test]
    fn test_checksum_policy() {
        let mut frame = encode(CommandType::Write, &[0x01]);
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;

        // default behavior accepts a corrupted checksum
        assert!(decode_frame(&frame).is_some());
        assert!(matches!(
            RoutingIndication::parse(&frame, ChecksumPolicy::Verify),
            Err(KnxError::Protocol(e)) if e.is_invalid_checksum()
        ));

        // a frame without its checksum byte
        let good = encode(CommandType::Write, &[0x01]);
        let stripped = &good[..good.len() - 1];
        assert!(RoutingIndication::parse(stripped, ChecksumPolicy::Ignore).is_ok());
        assert!(RoutingIndication::parse(stripped, ChecksumPolicy::Verify).is_err());
        assert!(RoutingIndication::parse(&good, ChecksumPolicy::Verify).is_ok());
    }

    #[test]
    fn test_group_message_view() {
        let frame = decode_frame(&encode(CommandType::Write, &[0x00, 42])).unwrap();
        let msg = frame.message();
        assert_eq!(msg.command, CommandType::Write);
        assert_eq!(msg.destination, dest());
        assert_eq!(msg.data(), &[0x00, 42]);
        let value: u16 = msg.decode(&crate::dpt::Dpt5::Counter).unwrap();
        assert_eq!(value, 42);
    }
}
