//! Mock transport implementation for testing.
//!
//! [`MockTransport`] queues inbound datagrams and records outbound ones in
//! fixed-capacity `heapless` storage, so it works in `no_std` builds and in
//! doctests alike.
//!
//! ## Example
//!
//! ```rust
//! use knx_ip_node::net::mock_transport::MockTransport;
//! use knx_ip_node::net::transport::Transport;
//!
//! let mut mock = MockTransport::new();
//! mock.push_inbound(&[0x06, 0x10, 0x05, 0x30])?;
//!
//! let mut buf = [0u8; 16];
//! assert_eq!(mock.receive(&mut buf)?, Some(4));
//! assert_eq!(mock.receive(&mut buf)?, None);
//!
//! mock.send(&[0xAA, 0xBB])?;
//! assert_eq!(mock.sent()[0].as_slice(), &[0xAA, 0xBB]);
//! # Ok::<(), knx_ip_node::KnxError>(())
//! ```

use heapless::{Deque, Vec};

use crate::error::{KnxError, Result};
use crate::net::transport::Transport;
use crate::protocol::constants::MAX_FRAME_SIZE;

/// Number of datagrams each direction can hold
pub const MOCK_QUEUE_DEPTH: usize = 8;

/// One recorded or queued datagram
pub type Datagram = Vec<u8, MAX_FRAME_SIZE>;

/// Mock transport for testing KNX communication without a network.
///
/// - Datagrams queued with [`push_inbound`](Self::push_inbound) are returned
///   by `receive` in FIFO order; an empty queue reads as "nothing pending".
/// - Every datagram passed to `send` is recorded and visible through
///   [`sent`](Self::sent).
/// - [`set_fail_send`](Self::set_fail_send) simulates a network failure.
#[derive(Debug, Default)]
pub struct MockTransport {
    inbound: Deque<Datagram, MOCK_QUEUE_DEPTH>,
    sent: Vec<Datagram, MOCK_QUEUE_DEPTH>,
    fail_send: bool,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a datagram to be returned by the next `receive()` call.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the datagram exceeds
    /// [`MAX_FRAME_SIZE`] or the queue is full.
    pub fn push_inbound(&mut self, data: &[u8]) -> Result<()> {
        let datagram = Datagram::from_slice(data).map_err(|_| KnxError::buffer_too_small())?;
        self.inbound
            .push_back(datagram)
            .map_err(|_| KnxError::buffer_too_small())
    }

    /// Get all datagrams that were sent, oldest first.
    pub fn sent(&self) -> &[Datagram] {
        &self.sent
    }

    /// Get the last datagram that was sent.
    pub fn last_sent(&self) -> Option<&[u8]> {
        self.sent.last().map(|d| d.as_slice())
    }

    /// Clear the sent history.
    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    /// Number of queued inbound datagrams.
    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }

    /// Make subsequent `send()` calls fail.
    pub fn set_fail_send(&mut self, fail: bool) {
        self.fail_send = fail;
    }
}

impl Transport for MockTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        if self.fail_send {
            return Err(KnxError::send_failed());
        }
        let datagram = Datagram::from_slice(frame).map_err(|_| KnxError::send_failed())?;
        self.sent
            .push(datagram)
            .map_err(|_| KnxError::send_failed())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        let Some(datagram) = self.inbound.pop_front() else {
            return Ok(None);
        };
        if datagram.len() > buf.len() {
            return Err(KnxError::buffer_too_small());
        }
        buf[..datagram.len()].copy_from_slice(&datagram);
        Ok(Some(datagram.len()))
    }
}
