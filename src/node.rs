//! The routing node: physical address, callbacks and configuration in one
//! owned context.
//!
//! An application builds one [`KnxNode`], registers its callbacks and
//! configuration items, calls [`finish_registration`](KnxNode::finish_registration)
//! and optionally [`restore`](KnxNode::restore), then calls
//! [`poll`](KnxNode::poll) from its main loop. Each poll receives at most one
//! datagram and runs the matching callbacks before returning.
//!
//! ## Example
//!
//! ```rust
//! use core::cell::Cell;
//! use knx_ip_node::dpt::Dpt1;
//! use knx_ip_node::net::mock_transport::MockTransport;
//! use knx_ip_node::protocol::{encode_frame, CommandType, GroupMessage, MAX_FRAME_SIZE};
//! use knx_ip_node::{ga, ia, KnxNode, NodeConfig};
//!
//! let light = Cell::new(false);
//! let mut on_light = |msg: &GroupMessage<'_>| {
//!     if let Ok(on) = msg.decode(&Dpt1::Switch) {
//!         light.set(on);
//!     }
//! };
//!
//! let mut node: KnxNode<'_> = KnxNode::new(NodeConfig::default());
//! let id = node.register_callback("Light", &mut on_light, None)?;
//! node.assign(ga!(1/0/1), id)?;
//! node.finish_registration();
//!
//! let mut frame = [0u8; MAX_FRAME_SIZE];
//! let len = encode_frame(ia!(1, 1, 20), ga!(1/0/1), CommandType::Write, &[0x01], &mut frame)?;
//!
//! let mut transport = MockTransport::new();
//! transport.push_inbound(&frame[..len])?;
//! assert_eq!(node.poll(&mut transport)?, 1);
//! assert!(light.get());
//! # Ok::<(), knx_ip_node::KnxError>(())
//! ```

use crate::addressing::{GroupAddress, IndividualAddress};
use crate::callbacks::{BindingId, CallbackId, CallbackRegistry, DispatchPolicy, EnablePredicate, Handler};
use crate::config::ConfigRegistry;
use crate::dpt::{
    Date, Dpt1, Dpt10, Dpt11, Dpt14, Dpt2, Dpt232, Dpt3, Dpt5, Dpt6, Dpt8, Dpt9, DptEncode, Rgb,
    TimeOfDay, MAX_DPT_PAYLOAD,
};
use crate::error::Result;
use crate::net::transport::Transport;
use crate::protocol::cemi::CommandType;
use crate::protocol::constants::MAX_FRAME_SIZE;
use crate::protocol::routing::{encode_frame, ChecksumPolicy, RoutingIndication};
use crate::storage::{self, Layout, NonVolatileStore};

/// Runtime settings of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeConfig {
    /// Source address of every frame the node sends
    pub physical_address: IndividualAddress,
    /// How many callbacks one telegram may reach
    pub dispatch_policy: DispatchPolicy,
    /// Whether inbound checksums are verified
    pub checksum_policy: ChecksumPolicy,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            physical_address: IndividualAddress::DEFAULT_NODE,
            dispatch_policy: DispatchPolicy::default(),
            checksum_policy: ChecksumPolicy::default(),
        }
    }
}

/// A KNXnet/IP routing node
///
/// Capacities are fixed per instantiation: `CALLBACKS` handlers, `BINDINGS`
/// address bindings, `CONFIGS` configuration items in `SPACE` bytes.
pub struct KnxNode<
    'a,
    const CALLBACKS: usize = 10,
    const BINDINGS: usize = 10,
    const CONFIGS: usize = 10,
    const SPACE: usize = 100,
> {
    physical_address: IndividualAddress,
    checksum_policy: ChecksumPolicy,
    callbacks: CallbackRegistry<'a, CALLBACKS, BINDINGS>,
    config: ConfigRegistry<'a, CONFIGS, SPACE>,
}

impl<'a, const CALLBACKS: usize, const BINDINGS: usize, const CONFIGS: usize, const SPACE: usize>
    KnxNode<'a, CALLBACKS, BINDINGS, CONFIGS, SPACE>
{
    /// Create a node with empty registries
    pub fn new(config: NodeConfig) -> Self {
        Self {
            physical_address: config.physical_address,
            checksum_policy: config.checksum_policy,
            callbacks: CallbackRegistry::new(config.dispatch_policy),
            config: ConfigRegistry::new(),
        }
    }

    /// Source address of outbound frames
    #[inline]
    pub fn physical_address(&self) -> IndividualAddress {
        self.physical_address
    }

    /// Change the source address of outbound frames
    pub fn set_physical_address(&mut self, address: IndividualAddress) {
        knx_log!(info, "Physical address set to {}", address);
        self.physical_address = address;
    }

    /// Inbound checksum handling
    #[inline]
    pub fn checksum_policy(&self) -> ChecksumPolicy {
        self.checksum_policy
    }

    /// Callback registry
    #[inline]
    pub fn callbacks(&self) -> &CallbackRegistry<'a, CALLBACKS, BINDINGS> {
        &self.callbacks
    }

    /// Callback registry, mutable
    #[inline]
    pub fn callbacks_mut(&mut self) -> &mut CallbackRegistry<'a, CALLBACKS, BINDINGS> {
        &mut self.callbacks
    }

    /// Configuration registry
    #[inline]
    pub fn config(&self) -> &ConfigRegistry<'a, CONFIGS, SPACE> {
        &self.config
    }

    /// Configuration registry, mutable
    #[inline]
    pub fn config_mut(&mut self) -> &mut ConfigRegistry<'a, CONFIGS, SPACE> {
        &mut self.config
    }

    /// Shorthand for [`CallbackRegistry::register`]
    pub fn register_callback(
        &mut self,
        name: &'a str,
        handler: Handler<'a>,
        enabled: Option<EnablePredicate<'a>>,
    ) -> Result<CallbackId> {
        self.callbacks.register(name, handler, enabled)
    }

    /// Shorthand for [`CallbackRegistry::assign`]
    pub fn assign(&mut self, address: GroupAddress, callback: CallbackId) -> Result<BindingId> {
        self.callbacks.assign(address, callback)
    }

    /// End the registration phase
    ///
    /// The configuration values present now become the defaults that
    /// [`ConfigRegistry::restore_defaults`] returns to.
    pub fn finish_registration(&mut self) {
        self.config.snapshot_defaults();
        knx_log!(
            info,
            "Node {} ready: {} callbacks, {} bindings, {} config items",
            self.physical_address,
            self.callbacks.callback_count(),
            self.callbacks.binding_count(),
            self.config.len()
        );
    }

    /// Run one receive and dispatch cycle
    ///
    /// Returns the number of callbacks invoked. Datagrams that are not group
    /// routing indications, or that fail the checksum policy, are dropped and
    /// count as zero.
    ///
    /// # Errors
    ///
    /// Only transport errors are returned.
    pub fn poll<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<usize> {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let Some(len) = transport.receive(&mut buf)? else {
            return Ok(0);
        };

        let frame = match RoutingIndication::parse(&buf[..len], self.checksum_policy) {
            Ok(frame) => frame,
            Err(_) => {
                knx_log!(trace, "Dropped {} byte datagram", len);
                return Ok(0);
            }
        };

        knx_log!(
            debug,
            "Received {:?} for {} from {}",
            frame.command,
            frame.destination,
            frame.source
        );
        Ok(self.callbacks.dispatch(&frame.message()))
    }

    /// Send a group telegram with a raw payload
    ///
    /// Byte 0 of `payload` shares its two high bits with the command and must
    /// keep them clear. Sending to `0/0/0` does nothing.
    ///
    /// # Errors
    ///
    /// Returns a protocol error for payloads over 255 bytes, or the
    /// transport's error.
    pub fn send<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        payload: &[u8],
    ) -> Result<()> {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = encode_frame(self.physical_address, destination, command, payload, &mut buf)?;
        if len == 0 {
            knx_log!(trace, "Not sending {:?} to unassigned address", command);
            return Ok(());
        }
        transport.send(&buf[..len])?;
        knx_log!(debug, "Sent {:?} to {} ({} bytes)", command, destination, len);
        Ok(())
    }

    fn send_dpt<T, V, D>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        dpt: &D,
        value: V,
    ) -> Result<()>
    where
        T: Transport + ?Sized,
        D: DptEncode<V>,
    {
        let mut payload = [0u8; MAX_DPT_PAYLOAD];
        let len = dpt.encode(value, &mut payload)?;
        self.send(transport, destination, command, &payload[..len])
    }

    /// Send a boolean (DPT 1)
    pub fn send_1bit<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: bool,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt1::Switch, value)
    }

    /// Send a 2-bit control value (DPT 2), masked to two bits
    pub fn send_2bit<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: u8,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt2::SwitchControl, value)
    }

    /// Send a 4-bit control value (DPT 3), masked to four bits
    pub fn send_4bit<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: u8,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt3::Dimming, value)
    }

    /// Send a signed byte (DPT 6)
    pub fn send_1byte_int<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: i8,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt6::Counter, value)
    }

    /// Send an unsigned byte (DPT 5, unscaled)
    pub fn send_1byte_uint<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: u8,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt5::Counter, u16::from(value))
    }

    /// Send a signed 16-bit integer (DPT 8)
    pub fn send_2byte_int<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: i16,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt8::PulseDifference, value)
    }

    /// Send a 2-byte float (DPT 9)
    pub fn send_2byte_float<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: f32,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt9::Temperature, value)
    }

    /// Send a time of day (DPT 10)
    pub fn send_3byte_time<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: TimeOfDay,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt10, value)
    }

    /// Send a date (DPT 11)
    pub fn send_3byte_date<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: Date,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt11, value)
    }

    /// Send an RGB color (DPT 232)
    pub fn send_3byte_color<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: Rgb,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt232, value)
    }

    /// Send a 4-byte IEEE float (DPT 14)
    pub fn send_4byte_float<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        destination: GroupAddress,
        command: CommandType,
        value: f32,
    ) -> Result<()> {
        self.send_dpt(transport, destination, command, &Dpt14::Power, value)
    }

    /// Layout this node persists
    #[inline]
    pub const fn storage_layout() -> Layout {
        Layout::new(CALLBACKS, BINDINGS, CONFIGS, SPACE)
    }

    /// First store offset not used by [`save`](Self::save)
    #[inline]
    pub const fn first_free_storage_offset() -> usize {
        Self::storage_layout().end()
    }

    /// Persist bindings, physical address and configuration, then commit
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is smaller than the layout or
    /// the commit fails.
    pub fn save<S: NonVolatileStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        storage::save(store, &self.callbacks, &self.config, self.physical_address)
    }

    /// Restore state written by [`save`](Self::save)
    ///
    /// Returns `false`, leaving the node untouched, when the store was not
    /// written by a node with the same capacities. Stored bindings whose
    /// callback is not registered are dropped. Configuration items keep
    /// their defaults unless the stored value was explicitly set.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is smaller than the layout.
    pub fn restore<S: NonVolatileStore + ?Sized>(&mut self, store: &S) -> Result<bool> {
        match storage::restore(store, &mut self.callbacks, &mut self.config)? {
            Some(address) => {
                self.physical_address = address;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<const CALLBACKS: usize, const BINDINGS: usize, const CONFIGS: usize, const SPACE: usize>
    core::fmt::Debug for KnxNode<'_, CALLBACKS, BINDINGS, CONFIGS, SPACE>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KnxNode")
            .field("physical_address", &self.physical_address)
            .field("checksum_policy", &self.checksum_policy)
            .field("callbacks", &self.callbacks)
            .field("config", &self.config)
            .finish()
    }
}
