//! Common External Message Interface (cEMI) implementation.
//!
//! cEMI is the KNX telegram format carried in the body of a routing
//! indication. This module parses the cEMI envelope and its `L_Data` service
//! information, and provides the bit-field accessors for the control octets.
//!
//! ## Frame Structure
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ Message Code (1 byte)                    │
//! ├──────────────────────────────────────────┤
//! │ Additional Info Length (1 byte)          │
//! ├──────────────────────────────────────────┤
//! │ Additional Info (variable, skipped)      │
//! ├──────────────────────────────────────────┤
//! │ Service Information (L_Data)             │
//! │  ├─ Control Field 1 (1 byte)             │
//! │  ├─ Control Field 2 (1 byte)             │
//! │  ├─ Source Address (2 bytes)             │
//! │  ├─ Destination Address (2 bytes)        │
//! │  ├─ Data Length (1 byte)                 │
//! │  ├─ TPCI (1 byte, carries APCI high)     │
//! │  └─ Data (data length bytes)             │
//! └──────────────────────────────────────────┘
//! ```
//!
//! The four bit command type is split across two octets: its high two bits
//! sit in the low bits of the TPCI octet, its low two bits in the top of data
//! byte 0.

use crate::addressing::{GroupAddress, IndividualAddress};
use crate::error::{KnxError, Result};
use crate::protocol::constants::{CEMIMessageCode, Priority, DEFAULT_HOP_COUNT};

/// Control Field 1 of `L_Data` frame
///
/// ```text
/// Bit 7: Frame Type (0=extended, 1=standard)
/// Bit 6: Reserved
/// Bit 5: Repeat (0=repeat, 1=do not repeat)
/// Bit 4: System Broadcast (0=system, 1=broadcast)
/// Bit 3-2: Priority (00=system, 01=normal, 10=urgent, 11=low)
/// Bit 1: Acknowledge Request (0=no ack, 1=ack requested)
/// Bit 0: Confirm (0=no error, 1=error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlField1 {
    raw: u8,
}

impl From<u8> for ControlField1 {
    #[inline(always)]
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl From<ControlField1> for u8 {
    #[inline(always)]
    fn from(ctrl: ControlField1) -> u8 {
        ctrl.raw
    }
}

impl ControlField1 {
    /// Get raw byte value
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.raw
    }

    /// Check if frame is standard (true) or extended (false)
    #[inline(always)]
    pub const fn is_standard_frame(self) -> bool {
        (self.raw & 0x80) != 0
    }

    /// Check if repeat flag is set (do not repeat if true)
    #[inline(always)]
    pub const fn do_not_repeat(self) -> bool {
        (self.raw & 0x20) != 0
    }

    /// Check if this is a system broadcast
    #[inline(always)]
    pub const fn is_broadcast(self) -> bool {
        (self.raw & 0x10) != 0
    }

    /// Get priority
    #[inline(always)]
    pub const fn priority(self) -> Priority {
        Priority::from_u8((self.raw >> 2) & 0x03)
    }

    /// Check if acknowledge is requested
    #[inline(always)]
    pub const fn ack_requested(self) -> bool {
        (self.raw & 0x02) != 0
    }

    /// Check if confirm error flag is set
    #[inline(always)]
    pub const fn has_error(self) -> bool {
        (self.raw & 0x01) != 0
    }

    /// Create a new Control Field 1
    pub const fn new(
        standard_frame: bool,
        do_not_repeat: bool,
        broadcast: bool,
        priority: Priority,
        ack_requested: bool,
        has_error: bool,
    ) -> Self {
        let mut raw = 0u8;

        if standard_frame {
            raw |= 0x80;
        }
        if do_not_repeat {
            raw |= 0x20;
        }
        if broadcast {
            raw |= 0x10;
        }
        raw |= (priority.to_u8() & 0x03) << 2;
        if ack_requested {
            raw |= 0x02;
        }
        if has_error {
            raw |= 0x01;
        }

        Self { raw }
    }
}

impl Default for ControlField1 {
    /// Control field of every outbound routing indication: `0xBC`
    #[inline]
    fn default() -> Self {
        Self::new(true, true, true, Priority::Low, false, false)
    }
}

/// Control Field 2 of `L_Data` frame
///
/// ```text
/// Bit 7: Destination Address Type (0=individual, 1=group)
/// Bit 6-4: Hop Count (0-7)
/// Bit 3-0: Extended Frame Format (0000=standard)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlField2 {
    raw: u8,
}

impl From<u8> for ControlField2 {
    #[inline(always)]
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl From<ControlField2> for u8 {
    #[inline(always)]
    fn from(ctrl: ControlField2) -> u8 {
        ctrl.raw
    }
}

impl ControlField2 {
    /// Get raw byte value
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.raw
    }

    /// Check if destination is group address (true) or individual (false)
    #[inline(always)]
    pub const fn is_group_address(self) -> bool {
        (self.raw & 0x80) != 0
    }

    /// Get hop count (0-7)
    #[inline(always)]
    pub const fn hop_count(self) -> u8 {
        (self.raw >> 4) & 0x07
    }

    /// Get extended frame format
    #[inline(always)]
    pub const fn extended_format(self) -> u8 {
        self.raw & 0x0F
    }

    /// Create a new Control Field 2
    pub const fn new(is_group: bool, hop_count: u8, extended_format: u8) -> Self {
        let mut raw = 0u8;

        if is_group {
            raw |= 0x80;
        }
        raw |= (hop_count & 0x07) << 4;
        raw |= extended_format & 0x0F;

        Self { raw }
    }
}

impl Default for ControlField2 {
    /// Group destination, hop count 6, standard format: `0xE0`
    #[inline]
    fn default() -> Self {
        Self::new(true, DEFAULT_HOP_COUNT, 0)
    }
}

/// TPCI (Transport Layer Protocol Control Information)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tpci {
    /// Unnumbered Data Packet (UDP)
    #[default]
    UnnumberedData,
    /// Numbered Data Packet (NDP) with sequence number
    NumberedData {
        /// Sequence number (0-15)
        sequence: u8,
    },
    /// Unnumbered Control Packet (UCP)
    UnnumberedControl,
    /// Numbered Control Packet (NCP) with sequence number
    NumberedControl {
        /// Sequence number (0-15)
        sequence: u8,
    },
}

impl Tpci {
    /// Parse TPCI from the TPCI octet
    pub const fn from_byte(byte: u8) -> Self {
        let sequence = (byte >> 2) & 0x0F;
        match (byte >> 6) & 0x03 {
            0b00 => Self::UnnumberedData,
            0b01 => Self::NumberedData { sequence },
            0b10 => Self::UnnumberedControl,
            _ => Self::NumberedControl { sequence },
        }
    }

    /// Build the TPCI octet, placing `apci_high` in its low two bits
    pub const fn to_byte(self, apci_high: u8) -> u8 {
        let (kind, sequence) = match self {
            Self::UnnumberedData => (0b00u8, 0u8),
            Self::NumberedData { sequence } => (0b01, sequence),
            Self::UnnumberedControl => (0b10, 0),
            Self::NumberedControl { sequence } => (0b11, sequence),
        };
        (kind << 6) | ((sequence & 0x0F) << 2) | (apci_high & 0x03)
    }

    /// Check if this is a data packet
    pub const fn is_data(self) -> bool {
        matches!(self, Self::UnnumberedData | Self::NumberedData { .. })
    }
}

/// Four bit application command carried by a telegram
///
/// Group communication uses `Read`, `Answer` and `Write`; the remaining codes
/// belong to device management and are passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandType {
    /// `A_GroupValue_Read`
    Read,
    /// `A_GroupValue_Response`
    Answer,
    /// `A_GroupValue_Write`
    Write,
    /// `A_IndividualAddress_Write`
    IndividualAddrWrite,
    /// `A_IndividualAddress_Read`
    IndividualAddrRequest,
    /// `A_IndividualAddress_Response`
    IndividualAddrResponse,
    /// `A_ADC_Read`
    AdcRead,
    /// `A_ADC_Response`
    AdcAnswer,
    /// `A_Memory_Read`
    MemRead,
    /// `A_Memory_Response`
    MemAnswer,
    /// `A_Memory_Write`
    MemWrite,
    /// `A_DeviceDescriptor_Read` (mask version)
    MaskVersionRead,
    /// `A_DeviceDescriptor_Response` (mask version)
    MaskVersionResponse,
    /// `A_Restart`
    Restart,
    /// Escape to extended APCI
    Escape,
    /// Unassigned code
    Unknown(u8),
}

impl CommandType {
    /// Decode the low four bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0x0 => Self::Read,
            0x1 => Self::Answer,
            0x2 => Self::Write,
            0x3 => Self::IndividualAddrWrite,
            0x4 => Self::IndividualAddrRequest,
            0x5 => Self::IndividualAddrResponse,
            0x6 => Self::AdcRead,
            0x7 => Self::AdcAnswer,
            0x8 => Self::MemRead,
            0x9 => Self::MemAnswer,
            0xA => Self::MemWrite,
            0xC => Self::MaskVersionRead,
            0xD => Self::MaskVersionResponse,
            0xE => Self::Restart,
            0xF => Self::Escape,
            other => Self::Unknown(other),
        }
    }

    /// Four bit wire code
    pub const fn bits(self) -> u8 {
        match self {
            Self::Read => 0x0,
            Self::Answer => 0x1,
            Self::Write => 0x2,
            Self::IndividualAddrWrite => 0x3,
            Self::IndividualAddrRequest => 0x4,
            Self::IndividualAddrResponse => 0x5,
            Self::AdcRead => 0x6,
            Self::AdcAnswer => 0x7,
            Self::MemRead => 0x8,
            Self::MemAnswer => 0x9,
            Self::MemWrite => 0xA,
            Self::MaskVersionRead => 0xC,
            Self::MaskVersionResponse => 0xD,
            Self::Restart => 0xE,
            Self::Escape => 0xF,
            Self::Unknown(bits) => bits & 0x0F,
        }
    }

    /// High two bits, stored in the TPCI octet
    #[inline]
    pub const fn apci_high(self) -> u8 {
        (self.bits() >> 2) & 0x03
    }

    /// Low two bits, stored in the top of data byte 0
    #[inline]
    pub const fn apci_low(self) -> u8 {
        self.bits() & 0x03
    }

    /// Reassemble the command from the TPCI octet and data byte 0
    #[inline]
    pub const fn from_octets(tpci: u8, first_data: u8) -> Self {
        Self::from_bits(((tpci & 0x03) << 2) | ((first_data & 0xC0) >> 6))
    }
}

/// cEMI `L_Data` service information
///
/// `data` still has the low command bits in the top of byte 0; use
/// [`LDataFrame::command`] to extract them.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LDataFrame<'a> {
    /// Control field 1
    pub ctrl1: ControlField1,
    /// Control field 2
    pub ctrl2: ControlField2,
    /// Source address (individual)
    pub source: IndividualAddress,
    /// Destination address (individual or group)
    pub destination_raw: u16,
    /// Raw TPCI octet
    pub tpci: u8,
    /// Application data, `data_len` bytes
    pub data: &'a [u8],
}

impl<'a> LDataFrame<'a> {
    /// Fixed fields before the data:
    /// Control1 + Control2 + Source(2) + Dest(2) + `data_len` + TPCI = 8 bytes
    pub const HEADER_SIZE: usize = 8;

    /// Parse `L_Data` service information from bytes
    ///
    /// Bytes past the declared data length (the routing checksum, padding)
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the fixed fields are truncated, the data
    /// length is zero, or fewer data bytes than declared are present.
    #[inline]
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < Self::HEADER_SIZE {
            return Err(KnxError::invalid_frame());
        }

        let data_len = data[6] as usize;
        // data byte 0 carries the low command bits, it must exist
        if data_len == 0 {
            return Err(KnxError::invalid_frame());
        }

        let data_end = Self::HEADER_SIZE + data_len;
        if data.len() < data_end {
            return Err(KnxError::invalid_frame());
        }

        Ok(Self {
            ctrl1: ControlField1::from(data[0]),
            ctrl2: ControlField2::from(data[1]),
            source: IndividualAddress::from(u16::from_be_bytes([data[2], data[3]])),
            destination_raw: u16::from_be_bytes([data[4], data[5]]),
            tpci: data[7],
            data: &data[Self::HEADER_SIZE..data_end],
        })
    }

    /// Declared data length
    #[inline]
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Command type assembled from the TPCI octet and data byte 0
    #[inline]
    pub fn command(&self) -> CommandType {
        CommandType::from_octets(self.tpci, self.data[0])
    }

    /// Get destination as group address (if applicable)
    #[inline]
    pub fn destination_group(&self) -> Option<GroupAddress> {
        self.ctrl2
            .is_group_address()
            .then(|| GroupAddress::from(self.destination_raw))
    }

    /// Get destination as individual address (if applicable)
    #[inline]
    pub fn destination_individual(&self) -> Option<IndividualAddress> {
        (!self.ctrl2.is_group_address()).then(|| IndividualAddress::from(self.destination_raw))
    }
}

/// cEMI Frame wrapper
///
/// Represents a complete cEMI frame with message code and payload.
#[derive(Debug)]
pub struct CEMIFrame<'a> {
    /// Message code
    pub message_code: CEMIMessageCode,
    /// Raw frame data (including message code)
    data: &'a [u8],
}

impl<'a> CEMIFrame<'a> {
    /// Minimum cEMI frame size (message code + add info length)
    pub const MIN_SIZE: usize = 2;

    /// Parse a cEMI frame from bytes
    ///
    /// # Errors
    ///
    /// Returns error if buffer is too small or message code is invalid
    #[inline]
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < Self::MIN_SIZE {
            return Err(KnxError::invalid_frame());
        }

        let message_code =
            CEMIMessageCode::from_u8(data[0]).ok_or_else(KnxError::invalid_message_code)?;

        Ok(Self { message_code, data })
    }

    /// Get the message code
    #[inline(always)]
    pub const fn message_code(&self) -> CEMIMessageCode {
        self.message_code
    }

    /// Get additional info length
    #[inline(always)]
    pub fn additional_info_length(&self) -> u8 {
        self.data[1]
    }

    /// Offset of the service information from the start of the cEMI frame
    #[inline]
    pub fn service_info_offset(&self) -> usize {
        Self::MIN_SIZE + self.additional_info_length() as usize
    }

    /// Get the service information (skipping message code and additional info)
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the additional info runs past the buffer
    #[inline]
    pub fn service_info(&self) -> Result<&'a [u8]> {
        self.data
            .get(self.service_info_offset()..)
            .ok_or_else(KnxError::invalid_frame)
    }

    /// Parse as `L_Data` frame
    ///
    /// # Errors
    ///
    /// Returns error if this is not an `L_Data` frame or parsing fails
    pub fn as_ldata(&self) -> Result<LDataFrame<'a>> {
        if !self.is_ldata() {
            return Err(KnxError::invalid_message_code());
        }
        LDataFrame::parse(self.service_info()?)
    }

    /// Check if this is an `L_Data` frame
    pub const fn is_ldata(&self) -> bool {
        matches!(
            self.message_code,
            CEMIMessageCode::LDataReq | CEMIMessageCode::LDataInd | CEMIMessageCode::LDataCon
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_field1_default() {
        let ctrl = ControlField1::default();
        assert_eq!(ctrl.raw(), 0xBC);
        assert!(ctrl.is_standard_frame());
        assert!(ctrl.do_not_repeat());
        assert!(ctrl.is_broadcast());
        assert_eq!(ctrl.priority(), Priority::Low);
        assert!(!ctrl.ack_requested());
        assert!(!ctrl.has_error());
    }

    #[test]
    fn test_control_field1_raw() {
        let ctrl = ControlField1::from(0x94u8);
        assert!(ctrl.is_standard_frame());
        assert!(!ctrl.do_not_repeat());
        assert_eq!(ctrl.priority(), Priority::Normal);
        assert_eq!(u8::from(ctrl), 0x94);
    }

    #[test]
    fn test_control_field2_default() {
        let ctrl = ControlField2::default();
        assert_eq!(ctrl.raw(), 0xE0);
        assert!(ctrl.is_group_address());
        assert_eq!(ctrl.hop_count(), 6);
        assert_eq!(ctrl.extended_format(), 0);
    }

    #[test]
    fn test_control_field2_individual_addr() {
        let ctrl = ControlField2::new(false, 5, 0);
        assert!(!ctrl.is_group_address());
        assert_eq!(ctrl.hop_count(), 5);
    }

    #[test]
    fn test_tpci_roundtrip() {
        assert_eq!(Tpci::UnnumberedData.to_byte(0b10), 0b0000_0010);
        let tpci = Tpci::from_byte(0b0100_1101);
        assert_eq!(tpci, Tpci::NumberedData { sequence: 3 });
        assert!(tpci.is_data());
        assert_eq!(tpci.to_byte(0b01), 0b0100_1101);
        assert!(!Tpci::from_byte(0b1000_0000).is_data());
    }

    #[test]
    fn test_command_type_bits() {
        for bits in 0..16u8 {
            assert_eq!(CommandType::from_bits(bits).bits(), bits);
        }
        assert_eq!(CommandType::from_bits(0x0B), CommandType::Unknown(0x0B));
        assert_eq!(CommandType::Write.apci_high(), 0);
        assert_eq!(CommandType::Write.apci_low(), 2);
        assert_eq!(CommandType::MemRead.apci_high(), 2);
    }

    #[test]
    fn test_command_from_octets() {
        assert_eq!(CommandType::from_octets(0x00, 0x81), CommandType::Write);
        assert_eq!(CommandType::from_octets(0x00, 0x40), CommandType::Answer);
        assert_eq!(CommandType::from_octets(0x03, 0x00), CommandType::MaskVersionRead);
    }

    #[test]
    fn test_ldata_frame_parse_group_write() {
        // Group write to 1/2/3 with value 0x01
        let data = [
            0xBC, // Control field 1
            0xE0, // Control field 2 (group address, hop count 6)
            0x11, 0x01, // Source: 1.1.1
            0x0A, 0x03, // Destination: 1/2/3
            0x01, // data length
            0x00, // TPCI (unnumbered data)
            0x81, // APCI low bits (write) + 6-bit data (0x01)
        ];

        let frame = LDataFrame::parse(&data).unwrap();
        assert_eq!(frame.source, IndividualAddress::new(1, 1, 1).unwrap());
        assert_eq!(
            frame.destination_group(),
            Some(GroupAddress::new(1, 2, 3).unwrap())
        );
        assert_eq!(frame.destination_individual(), None);
        assert_eq!(frame.command(), CommandType::Write);
        assert_eq!(frame.data, &[0x81]);
    }

    #[test]
    fn test_ldata_rejects_zero_and_truncated_length() {
        let zero = [0xBC, 0xE0, 0x11, 0x01, 0x0A, 0x03, 0x00, 0x00];
        assert!(LDataFrame::parse(&zero).is_err());

        let truncated = [0xBC, 0xE0, 0x11, 0x01, 0x0A, 0x03, 0x03, 0x00, 0x80, 0x00];
        assert!(LDataFrame::parse(&truncated).is_err());

        assert!(LDataFrame::parse(&[0xBC, 0xE0, 0x11]).is_err());
    }

    #[test]
    fn test_cemi_frame_parse() {
        let data = [
            0x29, // Message code: L_Data.ind
            0x00, // Add info length (none)
            0xBC, 0xE0, 0x11, 0x01, 0x0A, 0x03, 0x01, 0x00, 0x80,
        ];

        let cemi = CEMIFrame::parse(&data).unwrap();
        assert_eq!(cemi.message_code(), CEMIMessageCode::LDataInd);
        assert_eq!(cemi.additional_info_length(), 0);
        assert!(cemi.is_ldata());
        assert_eq!(cemi.as_ldata().unwrap().command(), CommandType::Write);
    }

    #[test]
    fn test_cemi_frame_with_additional_info() {
        let data = [
            0x29, // Message code: L_Data.ind
            0x04, // Add info length: 4 bytes
            0x01, 0x02, 0x03, 0x04, // Additional info (skipped)
            0xBC, 0xE0, 0x11, 0x01, 0x0A, 0x03, 0x01, 0x00, 0x80,
        ];

        let cemi = CEMIFrame::parse(&data).unwrap();
        assert_eq!(cemi.service_info_offset(), 6);
        assert_eq!(cemi.service_info().unwrap()[0], 0xBC);
        assert_eq!(cemi.as_ldata().unwrap().destination_raw, 0x0A03);
    }

    #[test]
    fn test_cemi_additional_info_overrun() {
        let data = [0x29, 0x10, 0xBC];
        let cemi = CEMIFrame::parse(&data).unwrap();
        assert!(cemi.service_info().is_err());
    }

    #[test]
    fn test_cemi_invalid_message_code() {
        assert!(CEMIFrame::parse(&[0xFF, 0x00]).is_err());
        // L_Busmon.ind is known but carries no L_Data
        let cemi = CEMIFrame::parse(&[0x2B, 0x00]).unwrap();
        assert!(cemi.as_ldata().is_err());
    }
}
