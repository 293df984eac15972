//! UDP multicast transport (requires the `std` feature).
//!
//! Binds the KNXnet/IP port on all interfaces, joins the routing group on the
//! chosen interface and switches the socket to non-blocking mode, so that
//! [`Transport::receive`] returns `Ok(None)` instead of waiting.

use std::io::ErrorKind;
use std::net::{SocketAddrV4, UdpSocket};

use crate::error::{KnxError, Result};
use crate::net::transport::Transport;
use crate::net::Ipv4Addr;
use crate::protocol::constants::KNXNETIP_DEFAULT_PORT;

/// Routing transport over a real UDP socket
#[derive(Debug)]
pub struct UdpMulticastTransport {
    socket: UdpSocket,
    group: SocketAddrV4,
}

impl UdpMulticastTransport {
    /// Join 224.0.23.12:3671 on `interface`.
    ///
    /// Pass [`Ipv4Addr::UNSPECIFIED`] to let the OS pick the interface.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the port cannot be bound or the group
    /// cannot be joined.
    pub fn bind(interface: impl Into<Ipv4Addr>) -> Result<Self> {
        let interface = interface.into();
        let group_ip: std::net::Ipv4Addr = Ipv4Addr::KNX_ROUTING.into();

        let socket = UdpSocket::bind(SocketAddrV4::new(
            std::net::Ipv4Addr::UNSPECIFIED,
            KNXNETIP_DEFAULT_PORT,
        ))
        .map_err(|_err| KnxError::socket_error())?;
        socket
            .join_multicast_v4(&group_ip, &interface.into())
            .map_err(|_err| KnxError::socket_error())?;
        socket
            .set_multicast_loop_v4(false)
            .map_err(|_err| KnxError::socket_error())?;
        socket
            .set_nonblocking(true)
            .map_err(|_err| KnxError::socket_error())?;

        knx_log!(info, "Joined {} on interface {}", Ipv4Addr::KNX_ROUTING, interface);

        Ok(Self {
            socket,
            group: SocketAddrV4::new(group_ip, KNXNETIP_DEFAULT_PORT),
        })
    }
}

impl Transport for UdpMulticastTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        match self.socket.send_to(frame, self.group) {
            Ok(_) => Ok(()),
            Err(_) => {
                knx_log!(warn, "Multicast send of {} bytes failed", frame.len());
                Err(KnxError::send_failed())
            }
        }
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        match self.socket.recv_from(buf) {
            Ok((len, _from)) => Ok(Some(len)),
            Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(_) => {
                knx_log!(warn, "Multicast receive failed");
                Err(KnxError::receive_failed())
            }
        }
    }
}
