//! EnviroControl gateway: byte relay between the controller's UART and
//! the host's USB serial port.
//!
//! Losing either port ends the process with an error; restart it once the
//! cable is back.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::info;

use envirocontrol::adapters::config_file;
use envirocontrol::adapters::serial::SerialLink;
use envirocontrol::gateway::{Relay, RelayStats};

/// Interval between byte-counter log lines.
const STATS_EVERY: Duration = Duration::from_secs(60);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("EnviroControl gateway v{}", env!("CARGO_PKG_VERSION"));

    let cli_config = std::env::args().nth(1);
    let config = config_file::resolve(cli_config.as_deref()).context("loading configuration")?;
    config.validate().context("validating configuration")?;
    let gw = &config.gateway;

    let timeout = Duration::from_millis(config.link.read_timeout_ms);
    let device = SerialLink::open(&gw.device_port, gw.baud_rate, timeout)
        .with_context(|| format!("opening device port {}", gw.device_port))?;
    let host = SerialLink::open(&gw.host_port, gw.baud_rate, timeout)
        .with_context(|| format!("opening host port {}", gw.host_port))?;

    info!("relaying {} <-> {} at {} baud", gw.device_port, gw.host_port, gw.baud_rate);

    let mut relay = Relay::new(device, host);
    let idle = Duration::from_millis(gw.poll_interval_ms);
    let mut last_stats = Instant::now();

    loop {
        match relay.poll() {
            Ok(0) => thread::sleep(idle),
            Ok(_) => {}
            Err(e) => {
                log_stats(&relay.stats());
                return Err(e).context("gateway DISCONNECTED");
            }
        }
        if last_stats.elapsed() >= STATS_EVERY {
            log_stats(&relay.stats());
            last_stats = Instant::now();
        }
    }
}

fn log_stats(s: &RelayStats) {
    info!(
        "relay: upstream={}B downstream={}B dropped={}B read_failures={}",
        s.upstream, s.downstream, s.dropped, s.read_failures
    );
}
