//! Network types for KNX routing.
//!
//! The node talks to the bus through a [`Transport`](transport::Transport):
//! one datagram in, one datagram out. [`MockTransport`](mock_transport::MockTransport)
//! backs the tests, and with the `std` feature
//! [`UdpMulticastTransport`](udp::UdpMulticastTransport) joins the real
//! multicast group.

use core::fmt;

use crate::protocol::constants::KNXNETIP_MULTICAST_ADDR;

pub mod mock_transport;
pub mod transport;
#[cfg(feature = "std")]
pub mod udp;

/// `no_std` IPv4 address, used to pick the interface that joins the
/// routing group.
///
/// ```
/// use knx_ip_node::net::Ipv4Addr;
///
/// let iface: Ipv4Addr = "10.0.0.7".parse()?;
/// assert_eq!(iface.octets(), [10, 0, 0, 7]);
/// assert_eq!(Ipv4Addr::KNX_ROUTING.to_string(), "224.0.23.12");
/// # Ok::<(), knx_ip_node::KnxError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ipv4Addr {
    octets: [u8; 4],
}

impl Ipv4Addr {
    /// Address from its four octets
    #[inline]
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self {
            octets: [a, b, c, d],
        }
    }

    /// The four octets, most significant first
    #[inline]
    pub const fn octets(&self) -> [u8; 4] {
        self.octets
    }

    /// Unspecified address (0.0.0.0), lets the OS choose the interface.
    pub const UNSPECIFIED: Self = Self::new(0, 0, 0, 0);

    /// The KNXnet/IP routing multicast group (224.0.23.12).
    pub const KNX_ROUTING: Self = Self {
        octets: KNXNETIP_MULTICAST_ADDR,
    };

    /// True for 224.0.0.0/4
    #[inline]
    pub const fn is_multicast(&self) -> bool {
        self.octets[0] & 0xF0 == 0xE0
    }
}

impl From<[u8; 4]> for Ipv4Addr {
    #[inline]
    fn from(octets: [u8; 4]) -> Self {
        Self { octets }
    }
}

impl From<(u8, u8, u8, u8)> for Ipv4Addr {
    #[inline]
    fn from((a, b, c, d): (u8, u8, u8, u8)) -> Self {
        Self::new(a, b, c, d)
    }
}

impl From<Ipv4Addr> for [u8; 4] {
    #[inline]
    fn from(addr: Ipv4Addr) -> [u8; 4] {
        addr.octets
    }
}

#[cfg(feature = "std")]
impl From<Ipv4Addr> for std::net::Ipv4Addr {
    #[inline]
    fn from(addr: Ipv4Addr) -> Self {
        let [a, b, c, d] = addr.octets;
        std::net::Ipv4Addr::new(a, b, c, d)
    }
}

impl fmt::Display for Ipv4Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl core::str::FromStr for Ipv4Addr {
    type Err = crate::error::KnxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let mut octets = [0u8; 4];

        for octet in &mut octets {
            let part = parts
                .next()
                .ok_or_else(crate::error::KnxError::invalid_ip_address)?;
            *octet = part
                .parse()
                .map_err(|_| crate::error::KnxError::invalid_ip_address())?;
        }

        if parts.next().is_some() {
            return Err(crate::error::KnxError::invalid_ip_address());
        }

        Ok(Self { octets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let iface = Ipv4Addr::from((10, 0, 0, 7));
        assert_eq!(iface, Ipv4Addr::from([10, 0, 0, 7]));
        assert_eq!(<[u8; 4]>::from(iface), [10, 0, 0, 7]);
    }

    #[test]
    fn test_routing_group() {
        assert_eq!(Ipv4Addr::KNX_ROUTING.octets(), [224, 0, 23, 12]);
        assert!(Ipv4Addr::KNX_ROUTING.is_multicast());
        assert!(!Ipv4Addr::UNSPECIFIED.is_multicast());
        assert!(!Ipv4Addr::new(10, 0, 0, 7).is_multicast());
    }

    #[test]
    fn test_text_round_trip() {
        let parsed: Ipv4Addr = "224.0.23.12".parse().unwrap();
        assert_eq!(parsed, Ipv4Addr::KNX_ROUTING);
        assert_eq!(format!("{}", parsed), "224.0.23.12");
    }

    #[test]
    fn test_text_rejects_malformed() {
        for text in ["10.0.0", "10.0.0.300", "10.0.0.7.1", "ten.0.0.7", ""] {
            let err = text.parse::<Ipv4Addr>().unwrap_err();
            assert!(matches!(err, crate::error::KnxError::Addressing(e) if e.is_invalid_ip_address()));
        }
    }
}
