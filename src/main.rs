//! Glovebridge - ESP32 sensor glove serial-to-HTTP bridge
//!
//! Reads labeled Flex/Accel/Gyro telegram lines from the glove's serial
//! port and serves the latest complete reading over a small HTTP API,
//! optionally appending saved readings to a CSV dataset.

use anyhow::Context;
use clap::{Parser, Subcommand};
use glovebridge::config::BridgeConfig;
use glovebridge::core::link::list_ports;
use glovebridge::server::{serve, AppState};
use glovebridge::{CsvRecorder, SensorBridge};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Glovebridge CLI
#[derive(Parser, Debug)]
#[command(
    name = "glovebridge",
    version,
    about = "ESP32 sensor glove serial-to-HTTP bridge",
    long_about = None
)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP bridge service
    Serve {
        /// Serial port name (e.g., COM3, /dev/ttyUSB0)
        #[arg(short, long)]
        port: Option<String>,

        /// Baud rate
        #[arg(short, long)]
        baud: Option<u32>,

        /// Per-line read timeout (milliseconds)
        #[arg(long)]
        read_timeout_ms: Option<u64>,

        /// Post-open settle delay (milliseconds)
        #[arg(long)]
        settle_ms: Option<u64>,

        /// HTTP listen address
        #[arg(short, long)]
        listen: Option<SocketAddr>,

        /// Dataset CSV path
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List available serial ports
    ListPorts {
        /// Show detailed info
        #[arg(short, long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Serve {
            port,
            baud,
            read_timeout_ms,
            settle_ms,
            listen,
            csv,
        } => {
            glovebridge::config::init_directories()
                .context("failed to create config directories")?;
            let mut config =
                BridgeConfig::load().map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?;

            // CLI flags override the config file
            if let Some(port) = port {
                config.serial.port = port;
            }
            if let Some(baud) = baud {
                config.serial.baud_rate = baud;
            }
            if let Some(ms) = read_timeout_ms {
                config.serial.read_timeout_ms = ms;
            }
            if let Some(ms) = settle_ms {
                config.serial.settle_delay_ms = ms;
            }
            if let Some(listen) = listen {
                config.http.listen = listen;
            }
            if let Some(csv) = csv {
                config.recording.csv_path = csv;
            }

            run_bridge(config).await
        }
        Commands::ListPorts { detailed } => print_ports(detailed),
    }
}

async fn run_bridge(config: BridgeConfig) -> anyhow::Result<()> {
    tracing::info!(
        port = %config.serial.port,
        listen = %config.http.listen,
        "starting glovebridge v{}",
        env!("CARGO_PKG_VERSION")
    );

    let bridge = Arc::new(SensorBridge::new(config.serial.clone(), config.line_bound));
    let recorder = CsvRecorder::open(&config.recording.csv_path).with_context(|| {
        format!(
            "failed to open dataset {}",
            config.recording.csv_path.display()
        )
    })?;

    serve(config.http.listen, AppState::new(bridge, recorder)).await
}

fn print_ports(detailed: bool) -> anyhow::Result<()> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }
    for info in ports {
        if detailed {
            println!("{}  {:?}", info.port_name, info.port_type);
        } else {
            println!("{}", info.port_name);
        }
    }
    Ok(())
}
