//! EnviroControl node: runs the controller loop on the host.
//!
//! Sensors and outputs come from [`SimulatedBoard`]; the serial side is a
//! real port (`link.port`), so the node can be wired to a gateway or
//! straight to the dashboard through a null-modem pair.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use envirocontrol::adapters::config_file;
use envirocontrol::adapters::serial::SerialLink;
use envirocontrol::controller::sim::SimulatedBoard;
use envirocontrol::controller::{Controller, CycleOutcome};

/// Every n-th simulated climate read fails, to exercise the skip path.
const SIM_DROPOUT_EVERY: u64 = 25;
/// Cycles between summary log lines.
const SUMMARY_EVERY: u64 = 60;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("EnviroControl node v{}", env!("CARGO_PKG_VERSION"));

    let cli_config = std::env::args().nth(1);
    let config = config_file::resolve(cli_config.as_deref()).context("loading configuration")?;
    config.validate().context("validating configuration")?;

    let mut link = SerialLink::open(
        &config.link.port,
        config.link.baud_rate,
        Duration::from_millis(config.link.read_timeout_ms),
    )
    .with_context(|| format!("opening {}", config.link.port))?;

    let mut board = SimulatedBoard::new().with_dropouts(SIM_DROPOUT_EVERY);
    let mut controller = Controller::new(config.controller.clone());
    let interval = Duration::from_millis(u64::from(config.controller.cycle_interval_ms));

    info!(
        "controller: fan auto above {:.1}\u{00b0}C, light on below {}, cycle {} ms",
        config.controller.fan_auto_threshold_c,
        config.controller.darkness_threshold,
        config.controller.cycle_interval_ms
    );

    loop {
        match controller.cycle(&mut board, &mut link) {
            CycleOutcome::Emitted(report) => debug!(
                "TELEM | {:.2},{:.2},{} | fan={} light={} cmds={}",
                report.reading.temperature,
                report.reading.humidity,
                report.reading.light_raw,
                report.fan_on,
                report.light_on,
                report.commands_applied
            ),
            CycleOutcome::Skipped(e) => warn!("cycle skipped: {}", e),
        }

        if controller.cycle_count() % SUMMARY_EVERY == 0 {
            let state = controller.state();
            info!(
                "node: {} cycles, {} skipped | fan_override={} light={:?}",
                controller.cycle_count(),
                controller.skipped_count(),
                state.fan_override,
                state.light_mode
            );
        }

        thread::sleep(interval);
    }
}
