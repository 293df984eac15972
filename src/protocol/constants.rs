//! KNXnet/IP protocol constants and service type identifiers.

/// KNXnet/IP protocol version 1.0
pub const KNXNETIP_VERSION_10: u8 = 0x10;

/// Standard KNXnet/IP header length (6 bytes)
pub const HEADER_SIZE_10: u8 = 0x06;

/// Standard UDP port for KNXnet/IP communication
pub const KNXNETIP_DEFAULT_PORT: u16 = 3671;

/// KNXnet/IP multicast group for routing
pub const KNXNETIP_MULTICAST_ADDR: [u8; 4] = [224, 0, 23, 12];

/// Largest payload a routing indication can carry (`data_len` is one octet)
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Fixed bytes of a routing indication around the payload:
/// header (6) + cEMI (2) + service information (8) + checksum (1)
pub const ROUTING_FRAME_OVERHEAD: usize = 17;

/// Maximum size of a routing indication on the wire
pub const MAX_FRAME_SIZE: usize = ROUTING_FRAME_OVERHEAD + MAX_PAYLOAD_LEN;

/// Hop count written into every outbound frame
pub const DEFAULT_HOP_COUNT: u8 = 6;

// =============================================================================
// Service Type Identifiers
// =============================================================================

/// KNXnet/IP routing service type identifiers
///
/// Only the routing family (0x05xx) is understood; every other service type
/// is rejected at header parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ServiceType {
    /// `ROUTING_INDICATION` - Routing indication (multicast)
    RoutingIndication = 0x0530,
    /// `ROUTING_LOST_MESSAGE` - Routing lost message indication
    RoutingLostMessage = 0x0531,
    /// `ROUTING_BUSY` - Routing busy indication
    RoutingBusy = 0x0532,
    /// `ROUTING_SYSTEM_BROADCAST` - System broadcast
    RoutingSystemBroadcast = 0x0533,
}

impl ServiceType {
    /// Convert a u16 to `ServiceType`
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0530 => Some(Self::RoutingIndication),
            0x0531 => Some(Self::RoutingLostMessage),
            0x0532 => Some(Self::RoutingBusy),
            0x0533 => Some(Self::RoutingSystemBroadcast),
            _ => None,
        }
    }

    /// Convert `ServiceType` to u16
    pub const fn to_u16(self) -> u16 {
        self as u16
    }
}

// =============================================================================
// cEMI Message Codes
// =============================================================================

/// cEMI Message Codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CEMIMessageCode {
    /// `L_Data.req` - Data request
    LDataReq = 0x11,
    /// `L_Data.ind` - Data indication
    LDataInd = 0x29,
    /// `L_Busmon.ind` - Bus monitor indication
    LBusmonInd = 0x2B,
    /// `L_Data.con` - Data confirmation
    LDataCon = 0x2E,
}

impl CEMIMessageCode {
    /// Convert u8 to `CEMIMessageCode`
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x11 => Some(Self::LDataReq),
            0x29 => Some(Self::LDataInd),
            0x2B => Some(Self::LBusmonInd),
            0x2E => Some(Self::LDataCon),
            _ => None,
        }
    }

    /// Convert `CEMIMessageCode` to u8
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

// =============================================================================
// KNX Priority
// =============================================================================

/// KNX message priority levels
///
/// Outbound routing frames use `Low` (`0b11`), the value every router on the
/// line emits for ordinary group traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Priority {
    /// System priority
    System = 0b00,
    /// Normal priority
    Normal = 0b01,
    /// Urgent priority
    Urgent = 0b10,
    /// Low priority (default for group traffic)
    #[default]
    Low = 0b11,
}

impl Priority {
    /// Convert the low two bits of `value` to a priority
    pub const fn from_u8(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::System,
            0b01 => Self::Normal,
            0b10 => Self::Urgent,
            _ => Self::Low,
        }
    }

    /// Convert Priority to u8
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_roundtrip() {
        assert_eq!(
            ServiceType::from_u16(0x0530),
            Some(ServiceType::RoutingIndication)
        );
        assert_eq!(ServiceType::RoutingIndication.to_u16(), 0x0530);
        // tunnelling request is not a routing service
        assert_eq!(ServiceType::from_u16(0x0420), None);
    }

    #[test]
    fn test_frame_size_limits() {
        assert_eq!(MAX_FRAME_SIZE, 272);
    }

    #[test]
    fn test_priority_bits() {
        assert_eq!(Priority::from_u8(0xFF), Priority::Low);
        assert_eq!(Priority::default().to_u8(), 0b11);
    }
}
