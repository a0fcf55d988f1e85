//! Core type definitions using newtype patterns for type safety.
//!
//! These types keep invalid targets unrepresentable once the command line has
//! been parsed.

mod port;
mod target;

pub use port::{Port, PortError};
pub use target::{HostResolver, ProbeTarget, Protocol, TargetError};
