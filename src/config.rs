//! Listener configuration
//!
//! Settings come from an optional YAML file, then environment overrides:
//!
//! ```yaml
//! bind: 0.0.0.0:9999
//! max_packet_size: 1500
//! rate_hz: 60.0
//! schema: ./layouts/dash.yaml
//! first_packet_timeout_ms: 5000
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::schema::{MAX_DATAGRAM_SIZE, dash_schema, load_schema_file};
use crate::types::PacketSchema;
use crate::{Result, TelemetryError};

/// Environment variable overriding [`ListenerConfig::bind`].
pub const ENV_BIND: &str = "FH_TELEMETRY_BIND";
/// Environment variable overriding [`ListenerConfig::max_packet_size`].
pub const ENV_MAX_PACKET_SIZE: &str = "FH_TELEMETRY_MAX_PACKET_SIZE";
/// Environment variable overriding [`ListenerConfig::rate_hz`].
pub const ENV_RATE_HZ: &str = "FH_TELEMETRY_RATE_HZ";
/// Environment variable overriding [`ListenerConfig::schema`].
pub const ENV_SCHEMA: &str = "FH_TELEMETRY_SCHEMA";

/// Where and how to listen for telemetry datagrams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenerConfig {
    /// UDP listen address
    pub bind: SocketAddr,

    /// Receive buffer size in bytes
    pub max_packet_size: usize,

    /// Expected packet rate of the game in Hz
    pub rate_hz: f64,

    /// YAML schema replacing the built-in dash layout
    pub schema: Option<PathBuf>,

    /// Wait this long for a first record when binding
    pub first_packet_timeout_ms: Option<u64>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 9999)),
            max_packet_size: MAX_DATAGRAM_SIZE,
            rate_hz: 60.0,
            schema: None,
            first_packet_timeout_ms: None,
        }
    }
}

impl ListenerConfig {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TelemetryError::parse_error("listener config YAML", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TelemetryError::file_error(path.to_path_buf(), e))?;

        debug!(path = %path.display(), "Loaded listener config");
        Self::from_yaml_str(&yaml)
    }

    /// Apply `FH_TELEMETRY_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_BIND) {
            self.bind = parse_env(ENV_BIND, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_PACKET_SIZE) {
            self.max_packet_size = parse_env(ENV_MAX_PACKET_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_RATE_HZ) {
            self.rate_hz = parse_env(ENV_RATE_HZ, &value)?;
        }
        if let Some(value) = lookup(ENV_SCHEMA) {
            self.schema = (!value.trim().is_empty()).then(|| PathBuf::from(value.trim()));
        }

        self.validate()?;
        Ok(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_packet_size == 0 {
            return Err(TelemetryError::parse_error("max_packet_size", "must be greater than zero"));
        }
        if !self.rate_hz.is_finite() || self.rate_hz <= 0.0 {
            return Err(TelemetryError::parse_error(
                "rate_hz",
                format!("must be a positive number, got {}", self.rate_hz),
            ));
        }
        Ok(())
    }

    /// The configured schema file, or the built-in dash schema.
    ///
    /// Fails when the receive buffer could not hold a full packet.
    pub fn load_schema(&self) -> Result<Arc<PacketSchema>> {
        let schema = match &self.schema {
            Some(path) => {
                info!(path = %path.display(), "Loading schema file");
                Arc::new(load_schema_file(path)?)
            }
            None => dash_schema(),
        };

        if self.max_packet_size < schema.required_len() {
            return Err(TelemetryError::schema_validation_error(format!(
                "max_packet_size {} is smaller than the {} bytes the schema reads",
                self.max_packet_size,
                schema.required_len()
            )));
        }

        Ok(schema)
    }

    /// First-record wait as a duration.
    pub fn first_packet_timeout(&self) -> Option<Duration> {
        self.first_packet_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| TelemetryError::parse_error(key, format!("'{}': {}", value, e)))
}
