//! Schema-driven decoder for Forza Horizon "data out" telemetry.
//!
//! The game sends one fixed-size UDP datagram per physics tick. This crate
//! decodes those datagrams into typed records using a declarative field table
//! rather than hand-written parsing code.
//!
//! # Features
//!
//! - **Schema-driven decoding**: each field is an offset, a width and a target type
//! - **Canonical dash layout**: all 85 fields of the dash format, built in
//! - **Custom layouts**: alternative schemas loaded from YAML
//! - **Typed subscriptions**: adapt records into structs, optionally rate limited
//!
//! # Decoding a buffer
//!
//! ```rust
//! use fh_telemetry::schema::{DASH_PACKET_SIZE, dash_schema};
//!
//! let buffer = vec![0u8; DASH_PACKET_SIZE];
//! let record = fh_telemetry::decode(&buffer, &dash_schema()).unwrap();
//! assert_eq!(record.f32("CurrentEngineRpm"), Some(0.0));
//! assert_eq!(record.bool("IsRaceOn"), Some(false));
//! ```
//!
//! # Listening for the game
//!
//! ```rust,no_run
//! use fh_telemetry::{DashPacket, ListenerConfig, Telemetry, UpdateRate};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> fh_telemetry::Result<()> {
//!     let connection = Telemetry::listen(&ListenerConfig::default()).await?;
//!     let mut packets = Box::pin(connection.subscribe::<DashPacket>(UpdateRate::Max(10))?);
//!
//!     while let Some(packet) = packets.next().await {
//!         println!("rpms {}", packet.current_engine_rpm);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod adapters;
pub mod decoder;
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Packet layouts and configuration
pub mod config;
pub mod schema;

// Stream-based telemetry architecture
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;

// Core exports
pub use adapters::*;
pub use decoder::{decode, decode_field, encode};
pub use error::*;
pub use types::*;

// Main API exports
pub use config::ListenerConfig;
pub use connection::UdpConnection;
pub use schema::dash_schema;

/// Entry point for telemetry connections.
///
/// ```rust,no_run
/// use fh_telemetry::{ListenerConfig, Telemetry};
///
/// #[tokio::main]
/// async fn main() -> fh_telemetry::Result<()> {
///     let config = ListenerConfig::default().apply_env()?;
///     let connection = Telemetry::listen(&config).await?;
///     println!("listening on {:?}", connection.local_addr());
///     Ok(())
/// }
/// ```
pub struct Telemetry;

impl Telemetry {
    /// Bind a UDP socket and start decoding.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configured schema file cannot be read or is invalid
    /// - The receive buffer is smaller than the schema reads
    /// - The address cannot be bound
    /// - `first_packet_timeout_ms` is set and no packet arrives in time
    pub async fn listen(config: &ListenerConfig) -> Result<UdpConnection> {
        UdpConnection::bind(config).await
    }

    /// Decode packets from any provider, e.g. a recorded session held in memory.
    pub fn from_provider<P: provider::Provider>(
        provider: P,
        schema: std::sync::Arc<PacketSchema>,
    ) -> UdpConnection {
        UdpConnection::from_provider(provider, schema)
    }
}
