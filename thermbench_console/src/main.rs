//! # Thermbench Console Binary
//!
//! Headless monitoring console for a serial heater controller:
//! fixed-interval telemetry polling, CSV export and the temperature
//! interlocks, rendered through `tracing`.
//!
//! # Usage
//!
//! ```bash
//! # Monitor the configured port
//! thermbench --config console.toml
//!
//! # Override the port and command a setpoint at start
//! thermbench --port /dev/ttyUSB1 --setpoint 78
//!
//! # Device-free run with an injected temperature
//! thermbench --simulate --sim-temp 64.5
//!
//! # Verbose logging
//! thermbench -v
//! ```

#![deny(warnings)]

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thermbench_common::config::{ConfigError, ConsoleConfig};
use thermbench_core::display::TraceDisplay;
use thermbench_core::interlock::HeadlessPrompt;
use thermbench_core::session::Session;
use thermbench_core::transport::SerialLink;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Temperature injected when `--simulate` is given without a value.
const DEFAULT_SIM_TEMPERATURE: f64 = 25.0;

/// Thermbench - heater controller monitoring console
#[derive(Parser, Debug)]
#[command(name = "thermbench")]
#[command(version)]
#[command(about = "Serial heater controller monitoring console")]
#[command(long_about = None)]
struct Args {
    /// Path to the console configuration file (console.toml)
    #[arg(short, long, default_value = "console.toml")]
    config: PathBuf,

    /// Serial port override (e.g. /dev/ttyUSB0, COM7)
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate override
    #[arg(short, long)]
    baud: Option<u32>,

    /// Setpoint to command once connected [°C]
    #[arg(long)]
    setpoint: Option<String>,

    /// Run without a device, injecting a fixed temperature
    #[arg(short = 's', long)]
    simulate: bool,

    /// Injected temperature for --simulate [°C]
    #[arg(long, requires = "simulate")]
    sim_temp: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("console startup failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    setup_tracing(&args);

    info!("thermbench console v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(&args.config)?;
    if let Some(port) = args.port.clone() {
        config.port = port;
    }
    if let Some(baud) = args.baud {
        config.baud_rate = baud;
    }
    config.validate()?;

    let mut session = Session::new(
        config.clone(),
        Box::new(TraceDisplay::new()),
        Box::new(HeadlessPrompt),
    );

    if args.simulate {
        session.set_sim_temperature(Some(args.sim_temp.unwrap_or(DEFAULT_SIM_TEMPERATURE)));
    } else {
        let link = SerialLink::open(&config.port, config.baud_rate)?;
        session.connect(Box::new(link));
    }

    if let Some(ref setpoint) = args.setpoint {
        session.submit_setpoint(setpoint);
    }

    // Setup signal handler.
    let running = Arc::new(AtomicBool::new(true));
    let running_flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running_flag.store(false, Ordering::SeqCst);
    })?;

    // Poll loop.
    let interval = session.poll_interval();
    while running.load(Ordering::SeqCst) {
        session.tick();
        std::thread::sleep(interval);
    }

    session.shutdown();
    info!("thermbench console shutdown complete");
    Ok(())
}

/// Load console.toml. A missing file falls back to the built-in
/// defaults; a present but invalid file is a hard error.
fn load_config(path: &PathBuf) -> Result<ConsoleConfig, ConfigError> {
    match ConsoleConfig::load(path) {
        Ok(config) => {
            info!("Loaded configuration from {:?}", path);
            Ok(config)
        }
        Err(ConfigError::IoError(e)) => {
            warn!("No config at {:?} ({e}). Using built-in defaults.", path);
            Ok(ConsoleConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
