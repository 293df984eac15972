#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

//! ## Modules
//!
//! - [`addressing`]: group and individual addresses
//! - [`dpt`]: datapoint type codecs
//! - [`protocol`]: KNXnet/IP header, cEMI and routing indication codec
//! - [`callbacks`]: callback registry and dispatcher
//! - [`config`]: typed configuration registry
//! - [`storage`]: persistence layout and store trait
//! - [`net`]: transport trait and implementations
//! - [`node`]: the node tying everything together

// Macro modules (must be declared before use)
#[macro_use]
mod logging;
#[macro_use]
pub mod macros;

pub mod addressing;
pub mod callbacks;
pub mod config;
pub mod dpt;
pub mod error;
pub mod net;
pub mod node;
pub mod protocol;
pub mod storage;

// Re-export commonly used types
#[doc(inline)]
pub use addressing::{GroupAddress, IndividualAddress};
#[doc(inline)]
pub use callbacks::{CallbackRegistry, DispatchPolicy};
#[doc(inline)]
pub use config::ConfigRegistry;
#[doc(inline)]
pub use dpt::{Dpt1, Dpt5, Dpt9, DptDecode, DptEncode};
#[doc(inline)]
pub use error::{KnxError, Result};
#[doc(inline)]
pub use net::transport::Transport;
#[doc(inline)]
pub use node::{KnxNode, NodeConfig};
#[doc(inline)]
pub use protocol::routing::{ChecksumPolicy, GroupMessage};
#[doc(inline)]
pub use storage::{MemoryStore, NonVolatileStore};
