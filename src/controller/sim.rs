//! Simulated board for host-side runs.
//!
//! Implements both [`SensorPort`] and [`ActuatorPort`] without hardware:
//! temperature and humidity sweep back and forth between bounds, the light
//! level follows a slow day/night ramp, and every `dropout_every`-th
//! climate read returns NaN like a flaky DHT-class sensor does.
//!
//! Deterministic: the same construction parameters give the same sample
//! sequence, which keeps the node binary's output reproducible.

use log::info;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::controller::ClimateSample;
use crate::error::SensorError;

/// One value bouncing linearly between two bounds.
#[derive(Debug, Clone, Copy)]
struct Sweep {
    value: f32,
    min: f32,
    max: f32,
    step: f32,
}

impl Sweep {
    fn next(&mut self) -> f32 {
        let current = self.value;
        let mut next = self.value + self.step;
        if next > self.max || next < self.min {
            self.step = -self.step;
            next = self.value + self.step;
        }
        self.value = next.clamp(self.min, self.max);
        current
    }
}

pub struct SimulatedBoard {
    temperature: Sweep,
    humidity: Sweep,
    light: Sweep,
    reads: u64,
    dropout_every: Option<u64>,
    fan_on: bool,
    light_on: bool,
}

impl SimulatedBoard {
    /// A room drifting between 22 °C and 32 °C, 35–60 % RH, full
    /// light range, no dropouts.
    pub fn new() -> Self {
        Self {
            temperature: Sweep {
                value: 24.0,
                min: 22.0,
                max: 32.0,
                step: 0.25,
            },
            humidity: Sweep {
                value: 45.0,
                min: 35.0,
                max: 60.0,
                step: 0.5,
            },
            light: Sweep {
                value: 700.0,
                min: 100.0,
                max: 1000.0,
                step: -20.0,
            },
            reads: 0,
            dropout_every: None,
            fan_on: false,
            light_on: false,
        }
    }

    /// Make every `n`-th climate read return NaN (`n >= 1`).
    pub fn with_dropouts(mut self, n: u64) -> Self {
        self.dropout_every = Some(n.max(1));
        self
    }

    pub fn fan_on(&self) -> bool {
        self.fan_on
    }

    pub fn light_on(&self) -> bool {
        self.light_on
    }
}

impl Default for SimulatedBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for SimulatedBoard {
    fn read_climate(&mut self) -> Result<ClimateSample, SensorError> {
        self.reads += 1;
        let temperature_c = self.temperature.next();
        let humidity_pct = self.humidity.next();
        if self.dropout_every.is_some_and(|n| self.reads % n == 0) {
            return Ok(ClimateSample {
                temperature_c: f32::NAN,
                humidity_pct: f32::NAN,
            });
        }
        Ok(ClimateSample {
            temperature_c,
            humidity_pct,
        })
    }

    fn read_light(&mut self) -> u16 {
        self.light.next().round() as u16
    }
}

impl ActuatorPort for SimulatedBoard {
    fn set_fan(&mut self, on: bool) {
        if on != self.fan_on {
            info!("SIM | fan {}", if on { "ON" } else { "OFF" });
        }
        self.fan_on = on;
    }

    fn set_light(&mut self, on: bool) {
        if on != self.light_on {
            info!("SIM | light {}", if on { "ON" } else { "OFF" });
        }
        self.light_on = on;
    }
}
