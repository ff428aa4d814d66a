//! Print engine speed from a running game's dash telemetry.

use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use fh_telemetry::{DashPacket, ListenerConfig, Telemetry, UpdateRate};

#[derive(Parser)]
#[command(name = "fh-dash")]
#[command(about = "Listen for Forza Horizon dash telemetry and print engine speed")]
#[command(long_about = None)]
struct Cli {
    /// YAML listener config
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// UDP address to listen on
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// YAML schema replacing the built-in dash layout
    #[arg(long, value_name = "PATH")]
    schema: Option<PathBuf>,

    /// Print at most this many lines per second (0 = every packet)
    #[arg(long, value_name = "HZ", default_value_t = 0)]
    rate: u32,
}

impl Cli {
    fn listener_config(&self) -> anyhow::Result<ListenerConfig> {
        self.listener_config_with(|key| std::env::var(key).ok())
    }

    /// File, then environment read through `lookup`, then flags.
    fn listener_config_with<F>(&self, lookup: F) -> anyhow::Result<ListenerConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match &self.config {
            Some(path) => ListenerConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ListenerConfig::default(),
        };

        let mut config = config.apply_env_from(lookup).context("Invalid FH_TELEMETRY_* environment override")?;
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(schema) = &self.schema {
            config.schema = Some(schema.clone());
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.listener_config()?;

    let connection = Telemetry::listen(&config)
        .await
        .with_context(|| format!("Failed to listen on {}", config.bind))?;
    info!(addr = ?connection.local_addr(), fields = connection.schema().len(), "Waiting for telemetry");

    let mut packets = Box::pin(
        connection
            .subscribe::<DashPacket>(UpdateRate::Max(cli.rate))
            .context("Schema does not provide the dash fields")?,
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            packet = packets.next() => match packet {
                Some(packet) => {
                    println!("rpms {}", packet.current_engine_rpm);
                    debug!(speed = packet.speed, gear = packet.gear, lap = packet.lap, "Dash packet");
                }
                None => {
                    info!("Telemetry source closed");
                    break;
                }
            },
        }
    }

    let stats = connection.stats();
    info!(received = stats.received, decoded = stats.decoded, skipped = stats.skipped, "Stopped");
    Ok(())
}
