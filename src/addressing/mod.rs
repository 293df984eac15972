//! KNX addressing system.
//!
//! Both address kinds share the same 16-bit big-endian wire representation;
//! which one applies depends on the frame field (source is always individual,
//! destination is group when the control-2 address type bit is set).
//! - Individual addresses for physical devices (Area.Line.Member, 4/4/8 bits)
//! - Group addresses for functional datapoints (Area/Line/Member, 5/3/8 bits)

pub mod group;
pub mod individual;

pub use group::GroupAddress;
pub use individual::IndividualAddress;
