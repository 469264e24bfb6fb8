//! Sensor/actuator controller: the on-device control cycle.
//!
//! ```text
//!  SensorPort ──▶ ┌───────────────────────────┐ ──▶ ActuatorPort
//!                 │        Controller         │
//!  link (cmds) ──▶│  OverrideState · rules    │ ──▶ link (sensor line)
//!                 └───────────────────────────┘
//! ```
//!
//! One [`Controller::cycle`] call is one pass of the device loop:
//!
//! 1. Acquire temperature and humidity; on a failed or NaN read, or a
//!    value too large for the line, the cycle is skipped entirely with no
//!    actuation and no line.  Pending command bytes
//!    stay on the link until the next good cycle.
//! 2. Drain pending command bytes in arrival order (last write wins).
//! 3. Fan: on if overridden, else on above the local auto threshold.
//! 4. Light: forced on/off, or on below the darkness threshold in Auto.
//! 5. Drive both outputs, then emit one `t,h,light\n` line.
//!
//! The caller owns the loop and the inter-cycle delay.

pub mod pins;
pub mod sim;
pub mod state;

use log::{debug, info, warn};

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::ControllerConfig;
use crate::error::SensorError;
use crate::protocol::{CommandByte, SensorReading, Transport, format_line};

pub use state::{LightMode, OverrideState};

/// Bytes pulled from the link per read while draining commands.
const DRAIN_CHUNK: usize = 16;

/// Raw output of the combined temperature/humidity sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSample {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

impl ClimateSample {
    /// Reject NaN / infinite fields, the sensor library's failure signal.
    pub fn validate(self) -> Result<Self, SensorError> {
        if !self.temperature_c.is_finite() {
            return Err(SensorError::InvalidTemperature);
        }
        if !self.humidity_pct.is_finite() {
            return Err(SensorError::InvalidHumidity);
        }
        Ok(self)
    }
}

/// What one cycle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// Outputs driven and a line emitted.
    Emitted(CycleReport),
    /// Sensor read failed; nothing was actuated or transmitted.
    Skipped(SensorError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub reading: SensorReading,
    pub fan_on: bool,
    pub light_on: bool,
    /// Valid command bytes applied during this cycle.
    pub commands_applied: usize,
}

/// The controller's state and rules.
pub struct Controller {
    config: ControllerConfig,
    state: OverrideState,
    cycle_count: u64,
    skipped_count: u64,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: OverrideState::default(),
            cycle_count: 0,
            skipped_count: 0,
        }
    }

    /// Run one control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]; `link` is the serial channel towards the gateway,
    /// read for command bytes and written with the sensor line.
    pub fn cycle<L: Transport>(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut L,
    ) -> CycleOutcome {
        self.cycle_count += 1;

        // 1. Acquire; never fabricate a reading.
        let climate = match hw.read_climate().and_then(ClimateSample::validate) {
            Ok(c) => c,
            Err(e) => return self.skip(e),
        };
        let light_raw = hw.read_light();
        let reading = SensorReading::new(climate.temperature_c, climate.humidity_pct, light_raw);
        let line = match format_line(&reading) {
            Ok(line) => line,
            Err(e) => {
                warn!("cycle {}: {:?} does not format ({})", self.cycle_count, reading, e);
                return self.skip(SensorError::OutOfRange);
            }
        };

        // 2. Commands queued since the previous cycle.
        let commands_applied = self.drain_commands(link);

        // 3 + 4. Outputs.
        let fan_on = self
            .state
            .fan_output(climate.temperature_c, self.config.fan_auto_threshold_c);
        let light_on = self
            .state
            .light_output(light_raw, self.config.darkness_threshold);

        // 5. Actuate, then report.
        hw.set_fan(fan_on);
        hw.set_light(light_on);

        if let Err(e) = link.write(line.as_bytes()).and_then(|_| link.flush()) {
            warn!("sensor line write failed: {:?}", e);
        }

        CycleOutcome::Emitted(CycleReport {
            reading,
            fan_on,
            light_on,
            commands_applied,
        })
    }

    /// Apply a single command byte.  Returns `true` if the state changed.
    pub fn apply_command(&mut self, command: CommandByte) -> bool {
        let changed = self.state.apply(command);
        if changed {
            info!(
                "CMD | {} -> fan_override={} light={:?}",
                command, self.state.fan_override, self.state.light_mode
            );
        }
        changed
    }

    /// Current override state.
    pub fn state(&self) -> OverrideState {
        self.state
    }

    /// Total cycles run, skipped ones included.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Cycles skipped because of a failed sensor read.
    pub fn skipped_count(&self) -> u64 {
        self.skipped_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn skip(&mut self, error: SensorError) -> CycleOutcome {
        self.skipped_count += 1;
        debug!("cycle {} skipped: {}", self.cycle_count, error);
        CycleOutcome::Skipped(error)
    }

    fn drain_commands<L: Transport>(&mut self, link: &mut L) -> usize {
        let mut applied = 0;
        let mut buf = [0u8; DRAIN_CHUNK];
        loop {
            let n = match link.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    warn!("command read failed: {:?}", e);
                    break;
                }
            };
            for &byte in &buf[..n] {
                match CommandByte::from_byte(byte) {
                    Some(command) => {
                        self.apply_command(command);
                        applied += 1;
                    }
                    None => debug!("ignoring byte 0x{:02x}", byte),
                }
            }
        }
        applied
    }
}
