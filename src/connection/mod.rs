//! Connections: a running driver plus subscription helpers

mod udp;

pub use udp::UdpConnection;

#[cfg(test)]
mod tests;
