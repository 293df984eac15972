//! KNXnet/IP routing protocol implementation.
//!
//! This module contains the frame structures and parsing logic for the
//! routing indications a node exchanges on the multicast group: the
//! KNXnet/IP header, the cEMI envelope and `L_Data` service information,
//! and the complete routing frame codec.

pub mod cemi;
pub mod constants;
pub mod frame;
pub mod routing;

pub use cemi::*;
pub use constants::*;
pub use frame::*;
pub use routing::*;
