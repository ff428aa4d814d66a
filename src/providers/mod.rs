//! Packet source implementations

mod memory;
mod udp;

pub use memory::MemoryProvider;
pub use udp::{DEFAULT_BIND_ADDR, UdpProvider};
