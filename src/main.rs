//! Infinistream controller — main entry point.
//!
//! Bootstraps logging and configuration, wires the adapters to the
//! control service, grounds every relay, then runs the 1 Hz control loop
//! until the process is terminated.

use std::fs;
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use infinistream::adapters::log_sink::{LogStatusSink, SinkFanout};
use infinistream::adapters::relay_board::RelayBoardClient;
use infinistream::adapters::sim::SimulatedHardware;
use infinistream::adapters::webhook::WebhookNotifier;
use infinistream::app::ports::{AnalogInputPort, DigitalInputPort, RelayPort};
use infinistream::app::service::ControlService;
use infinistream::config::{AppConfig, IoErrorPolicy, SystemConfig};

#[derive(Parser)]
#[command(name = "infinistream", version, about = "Greywater-recycling shower controller")]
struct Cli {
    /// Path to the JSON configuration file (defaults apply without one).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run against in-memory simulated hardware instead of the relay board.
    #[arg(long)]
    simulate: bool,

    /// Override the configured relay bank endpoints (repeatable, in bank
    /// order).
    #[arg(long = "board", value_name = "HOST:PORT")]
    boards: Vec<String>,

    /// Override the display webhook URL.
    #[arg(long, value_name = "URL")]
    webhook_url: Option<String>,

    /// Override the control loop period in milliseconds.
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => AppConfig::default(),
    };

    if !cli.boards.is_empty() {
        config.hw.relay_banks = cli.boards.clone();
    }
    if let Some(url) = &cli.webhook_url {
        config.hw.webhook_url = Some(url.clone());
    }
    if let Some(ms) = cli.interval_ms {
        config.system.tick_interval_ms = ms;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    config.validate()?;

    info!("Infinistream v{}", env!("CARGO_PKG_VERSION"));

    let mut sinks = SinkFanout::new();
    sinks.push(Box::new(LogStatusSink::new()));
    if let Some(url) = &config.hw.webhook_url {
        info!("display webhook: {url}");
        sinks.push(Box::new(WebhookNotifier::new(url.clone())));
    }

    let service = ControlService::new(&config);

    if cli.simulate {
        warn!("running against simulated hardware; no relays will move");
        run(service, SimulatedHardware::for_config(&config.hw), sinks, &config.system)
    } else {
        let board = RelayBoardClient::connect(&config.hw)?;
        run(service, board, sinks, &config.system)
    }
}

fn run(
    mut service: ControlService,
    mut hw: impl DigitalInputPort + AnalogInputPort + RelayPort,
    mut sinks: SinkFanout,
    system: &SystemConfig,
) -> Result<()> {
    service.apply_safe_plan(&mut hw)?;
    info!("entering control loop ({} ms tick)", system.tick_interval_ms);

    loop {
        if let Err(e) = service.tick(&mut hw, &mut sinks) {
            match system.io_error_policy {
                IoErrorPolicy::SkipTick => {
                    warn!("tick failed, actuators left as last commanded: {e}");
                }
                IoErrorPolicy::Terminate => {
                    error!("tick failed: {e}");
                    return Err(e.into());
                }
            }
        }
        thread::sleep(system.tick_interval());
    }
}
