//! Network transport abstraction for KNXnet/IP routing.
//!
//! The node never touches sockets itself. Anything that can send a datagram
//! to the routing multicast group and hand back received datagrams can carry
//! the bus: a UDP socket, an embedded network stack, or a test double.
//!
//! ## Example
//!
//! ```rust
//! use knx_ip_node::net::transport::Transport;
//! use knx_ip_node::Result;
//!
//! /// Loops every frame straight back to the receiver.
//! struct Loopback {
//!     frame: Option<([u8; 32], usize)>,
//! }
//!
//! impl Transport for Loopback {
//!     fn send(&mut self, frame: &[u8]) -> Result<()> {
//!         let mut buf = [0u8; 32];
//!         buf[..frame.len()].copy_from_slice(frame);
//!         self.frame = Some((buf, frame.len()));
//!         Ok(())
//!     }
//!
//!     fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
//!         Ok(self.frame.take().map(|(data, len)| {
//!             buf[..len].copy_from_slice(&data[..len]);
//!             len
//!         }))
//!     }
//! }
//! ```

use crate::error::Result;

/// Datagram transport to the routing multicast group.
///
/// Both methods must return promptly: `receive` reports `Ok(None)` when no
/// datagram is waiting instead of blocking, so that one poll cycle never
/// suspends.
pub trait Transport {
    /// Send one complete frame to the multicast group.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the datagram could not be handed to the
    /// network.
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Receive one datagram into `buf`.
    ///
    /// Returns the number of bytes written, or `None` when nothing is
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns a transport error if receiving failed or the datagram does not
    /// fit `buf`.
    fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    #[inline]
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send(frame)
    }

    #[inline]
    fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        (**self).receive(buf)
    }
}
