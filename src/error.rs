//! Error types for KNX node operations.
//!
//! Errors are grouped by the subsystem that raised them. Each category wraps a
//! private kind enum and exposes `is_*` helpers, and carries a backtrace when
//! the `std` feature is enabled.

use core::fmt;

#[cfg(feature = "std")]
use std::backtrace::Backtrace;

/// Result type alias for KNX operations.
pub type Result<T> = core::result::Result<T, KnxError>;

// =============================================================================
// Error Kind Enums (Internal)
// =============================================================================

/// Protocol error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum ProtocolErrorKind {
    InvalidFrame,
    InvalidChecksum,
    UnsupportedVersion,
    UnsupportedServiceType,
    PayloadTooLarge,
    InvalidMessageCode,
    NotGroupAddressed,
}

/// Callback registry error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum RegistryErrorKind {
    CallbacksExhausted,
    BindingsExhausted,
    UnknownCallback,
    UnknownBinding,
}

/// Configuration registry error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum ConfigErrorKind {
    SlotsExhausted,
    SpaceExhausted,
    EmptyOptions,
    ValueTooLong,
    UnknownItem,
    TypeMismatch,
    UnknownOption,
}

/// Persistence error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum StorageErrorKind {
    StoreTooSmall,
    CommitFailed,
}

/// Transport error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum TransportErrorKind {
    SendFailed,
    ReceiveFailed,
    BufferTooSmall,
    SocketError,
}

/// Addressing error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum AddressingErrorKind {
    InvalidIndividualAddress,
    InvalidGroupAddress,
    InvalidIpAddress,
    OutOfRange,
}

/// DPT error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum DptErrorKind {
    InvalidData,
    ValueOutOfRange,
}

// =============================================================================
// Main Error Type
// =============================================================================

/// KNX node error.
///
/// This is the error type returned by every fallible operation in the crate.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KnxError {
    /// Frame parsing and validation errors
    Protocol(ProtocolError),
    /// Callback and binding registration errors
    Registry(RegistryError),
    /// Configuration item registration and access errors
    Config(ConfigError),
    /// Persistence errors
    Storage(StorageError),
    /// Transport errors (socket, send, receive)
    Transport(TransportError),
    /// Address construction and parsing errors
    Addressing(AddressingError),
    /// Datapoint type encoding and decoding errors
    Dpt(DptError),
}

// =============================================================================
// Structured Error Types
// =============================================================================

/// Protocol error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProtocolError {
    kind: ProtocolErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl ProtocolError {
    pub(crate) fn new(kind: ProtocolErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if this is an invalid frame error (truncated or inconsistent lengths)
    pub fn is_invalid_frame(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::InvalidFrame)
    }

    /// Check if the checksum did not verify
    pub fn is_invalid_checksum(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::InvalidChecksum)
    }

    /// Check if this is an unsupported header length or version error
    pub fn is_unsupported_version(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::UnsupportedVersion)
    }

    /// Check if the datagram is not a routing indication
    pub fn is_unsupported_service_type(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::UnsupportedServiceType)
    }

    /// Check if the payload does not fit a frame
    pub fn is_payload_too_large(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::PayloadTooLarge)
    }

    /// Check if the cEMI message code is not `L_Data.ind`
    pub fn is_invalid_message_code(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::InvalidMessageCode)
    }

    /// Check if the telegram targets an individual address
    pub fn is_not_group_addressed(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::NotGroupAddressed)
    }
}

/// Callback registry error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegistryError {
    kind: RegistryErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl RegistryError {
    pub(crate) fn new(kind: RegistryErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if a fixed capacity (callbacks or bindings) was exhausted
    pub fn is_capacity_exhausted(&self) -> bool {
        matches!(
            self.kind,
            RegistryErrorKind::CallbacksExhausted | RegistryErrorKind::BindingsExhausted
        )
    }

    /// Check if the callback id was never registered
    pub fn is_unknown_callback(&self) -> bool {
        matches!(self.kind, RegistryErrorKind::UnknownCallback)
    }

    /// Check if the binding id does not exist
    pub fn is_unknown_binding(&self) -> bool {
        matches!(self.kind, RegistryErrorKind::UnknownBinding)
    }
}

/// Configuration error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigError {
    kind: ConfigErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl ConfigError {
    pub(crate) fn new(kind: ConfigErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if the slot table or the byte blob is full
    pub fn is_capacity_exhausted(&self) -> bool {
        matches!(
            self.kind,
            ConfigErrorKind::SlotsExhausted | ConfigErrorKind::SpaceExhausted
        )
    }

    /// Check if an option item was registered without options
    pub fn is_empty_options(&self) -> bool {
        matches!(self.kind, ConfigErrorKind::EmptyOptions)
    }

    /// Check if a string value does not fit its declared length
    pub fn is_value_too_long(&self) -> bool {
        matches!(self.kind, ConfigErrorKind::ValueTooLong)
    }

    /// Check if the item id was never registered
    pub fn is_unknown_item(&self) -> bool {
        matches!(self.kind, ConfigErrorKind::UnknownItem)
    }

    /// Check if the item has a different type than the accessor
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ConfigErrorKind::TypeMismatch)
    }

    /// Check if an option value is not part of the option list
    pub fn is_unknown_option(&self) -> bool {
        matches!(self.kind, ConfigErrorKind::UnknownOption)
    }
}

/// Persistence error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StorageError {
    kind: StorageErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl StorageError {
    pub(crate) fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if the store cannot hold the persistence layout
    pub fn is_store_too_small(&self) -> bool {
        matches!(self.kind, StorageErrorKind::StoreTooSmall)
    }

    /// Check if the store rejected the commit
    pub fn is_commit_failed(&self) -> bool {
        matches!(self.kind, StorageErrorKind::CommitFailed)
    }
}

/// Transport error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportError {
    kind: TransportErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl TransportError {
    pub(crate) fn new(kind: TransportErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if buffer is too small
    pub fn is_buffer_too_small(&self) -> bool {
        matches!(self.kind, TransportErrorKind::BufferTooSmall)
    }

    /// Check if this is a socket error
    pub fn is_socket_error(&self) -> bool {
        matches!(self.kind, TransportErrorKind::SocketError)
    }

    /// Check if sending failed
    pub fn is_send_failed(&self) -> bool {
        matches!(self.kind, TransportErrorKind::SendFailed)
    }

    /// Check if receiving failed
    pub fn is_receive_failed(&self) -> bool {
        matches!(self.kind, TransportErrorKind::ReceiveFailed)
    }
}

/// Addressing error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressingError {
    kind: AddressingErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl AddressingError {
    pub(crate) fn new(kind: AddressingErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if address is out of range
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind, AddressingErrorKind::OutOfRange)
    }

    /// Check if a group address string could not be parsed
    pub fn is_invalid_group_address(&self) -> bool {
        matches!(self.kind, AddressingErrorKind::InvalidGroupAddress)
    }

    /// Check if an individual address string could not be parsed
    pub fn is_invalid_individual_address(&self) -> bool {
        matches!(self.kind, AddressingErrorKind::InvalidIndividualAddress)
    }

    /// Check if an IPv4 address string could not be parsed
    pub fn is_invalid_ip_address(&self) -> bool {
        matches!(self.kind, AddressingErrorKind::InvalidIpAddress)
    }
}

/// DPT error with optional backtrace
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DptError {
    kind: DptErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl DptError {
    pub(crate) fn new(kind: DptErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if value is out of range
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind, DptErrorKind::ValueOutOfRange)
    }

    /// Check if the payload is too short or malformed
    pub fn is_invalid_data(&self) -> bool {
        matches!(self.kind, DptErrorKind::InvalidData)
    }
}

// =============================================================================
// Convenience Constructors for KnxError
// =============================================================================

impl KnxError {
    // Protocol errors
    pub(crate) fn invalid_frame() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::InvalidFrame))
    }

    pub(crate) fn invalid_checksum() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::InvalidChecksum))
    }

    pub(crate) fn unsupported_version() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::UnsupportedVersion))
    }

    pub(crate) fn unsupported_service_type() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::UnsupportedServiceType))
    }

    pub(crate) fn payload_too_large() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::PayloadTooLarge))
    }

    pub(crate) fn invalid_message_code() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::InvalidMessageCode))
    }

    pub(crate) fn not_group_addressed() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::NotGroupAddressed))
    }

    // Registry errors
    pub(crate) fn callbacks_exhausted() -> Self {
        Self::Registry(RegistryError::new(RegistryErrorKind::CallbacksExhausted))
    }

    pub(crate) fn bindings_exhausted() -> Self {
        Self::Registry(RegistryError::new(RegistryErrorKind::BindingsExhausted))
    }

    pub(crate) fn unknown_callback() -> Self {
        Self::Registry(RegistryError::new(RegistryErrorKind::UnknownCallback))
    }

    pub(crate) fn unknown_binding() -> Self {
        Self::Registry(RegistryError::new(RegistryErrorKind::UnknownBinding))
    }

    // Config errors
    pub(crate) fn config_slots_exhausted() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::SlotsExhausted))
    }

    pub(crate) fn config_space_exhausted() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::SpaceExhausted))
    }

    pub(crate) fn empty_options() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::EmptyOptions))
    }

    pub(crate) fn config_value_too_long() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::ValueTooLong))
    }

    pub(crate) fn unknown_config_item() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::UnknownItem))
    }

    pub(crate) fn config_type_mismatch() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::TypeMismatch))
    }

    pub(crate) fn unknown_option() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::UnknownOption))
    }

    // Storage errors
    pub(crate) fn store_too_small() -> Self {
        Self::Storage(StorageError::new(StorageErrorKind::StoreTooSmall))
    }

    /// Error for [`NonVolatileStore`](crate::storage::NonVolatileStore)
    /// implementations whose backing device rejected a commit.
    pub fn commit_failed() -> Self {
        Self::Storage(StorageError::new(StorageErrorKind::CommitFailed))
    }

    // Transport errors
    pub(crate) fn buffer_too_small() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::BufferTooSmall))
    }

    /// Error for [`Transport`](crate::net::transport::Transport)
    /// implementations whose socket could not be set up.
    pub fn socket_error() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::SocketError))
    }

    /// Error for transports that failed to hand a datagram to the network.
    pub fn send_failed() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::SendFailed))
    }

    /// Error for transports that failed while receiving.
    pub fn receive_failed() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::ReceiveFailed))
    }

    // Addressing errors
    pub(crate) fn invalid_group_address() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::InvalidGroupAddress))
    }

    pub(crate) fn invalid_individual_address() -> Self {
        Self::Addressing(AddressingError::new(
            AddressingErrorKind::InvalidIndividualAddress,
        ))
    }

    pub(crate) fn invalid_ip_address() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::InvalidIpAddress))
    }

    pub(crate) fn address_out_of_range() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::OutOfRange))
    }

    // DPT errors
    pub(crate) fn invalid_dpt_data() -> Self {
        Self::Dpt(DptError::new(DptErrorKind::InvalidData))
    }

    pub(crate) fn dpt_value_out_of_range() -> Self {
        Self::Dpt(DptError::new(DptErrorKind::ValueOutOfRange))
    }
}

impl KnxError {
    /// True for frame parsing and validation errors
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, KnxError::Protocol(_))
    }

    /// True when a registration failed because a fixed capacity is used up
    pub fn is_capacity_exhausted(&self) -> bool {
        match self {
            KnxError::Registry(e) => e.is_capacity_exhausted(),
            KnxError::Config(e) => e.is_capacity_exhausted(),
            _ => false,
        }
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl fmt::Display for KnxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnxError::Protocol(e) => write!(f, "Protocol error: {:?}", e.kind),
            KnxError::Registry(e) => write!(f, "Registry error: {:?}", e.kind),
            KnxError::Config(e) => write!(f, "Config error: {:?}", e.kind),
            KnxError::Storage(e) => write!(f, "Storage error: {:?}", e.kind),
            KnxError::Transport(e) => write!(f, "Transport error: {:?}", e.kind),
            KnxError::Addressing(e) => write!(f, "Addressing error: {:?}", e.kind),
            KnxError::Dpt(e) => write!(f, "DPT error: {:?}", e.kind),
        }
    }
}

// Implement std::error::Error for std-based applications
#[cfg(feature = "std")]
impl std::error::Error for KnxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_helpers() {
        let KnxError::Registry(e) = KnxError::bindings_exhausted() else {
            panic!("expected registry error");
        };
        assert!(e.is_capacity_exhausted());
        assert!(!e.is_unknown_callback());

        let KnxError::Config(e) = KnxError::config_space_exhausted() else {
            panic!("expected config error");
        };
        assert!(e.is_capacity_exhausted());
    }

    #[test]
    fn test_display() {
        let err = KnxError::unsupported_service_type();
        assert_eq!(
            format!("{err}"),
            "Protocol error: UnsupportedServiceType"
        );
    }
}
