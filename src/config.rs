//! System configuration parameters
//!
//! All tunable parameters for the controller node, the gateway, and the
//! dashboard command source.  Values are resolved once at startup from a
//! JSON file (see [`crate::adapters::config_file`]) with per-field
//! defaults, so a partial file is valid.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub controller: ControllerConfig,
    pub threshold: ThresholdConfig,
    pub link: LinkConfig,
    pub store: StoreConfig,
    pub gateway: GatewayConfig,
    pub voice: VoiceConfig,
}

/// Controller (sensor/actuator node) parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Fan switches on automatically above this temperature (Celsius)
    pub fan_auto_threshold_c: f32,
    /// Light switches on in Auto mode below this ADC reading
    pub darkness_threshold: u16,
    /// Delay between control cycles (milliseconds)
    pub cycle_interval_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            fan_auto_threshold_c: 30.0,
            darkness_threshold: 500,
            cycle_interval_ms: 1000, // 1 Hz
        }
    }
}

/// Learned-threshold parameters used by the dashboard's proactive cooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Starting set-point (Celsius)
    pub default_c: f32,
    /// Lower clamp bound
    pub min_c: f32,
    /// Upper clamp bound
    pub max_c: f32,
    /// Adjustment per "too hot" / "too cold" phrase
    pub step_c: f32,
    /// Half-width of the hysteresis band around the set-point
    pub hysteresis_c: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            default_c: 26.0,
            min_c: 18.0,
            max_c: 32.0,
            step_c: 1.0,
            hysteresis_c: 0.5,
        }
    }
}

/// Host USB serial link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    /// Wait after opening the port (boards reset on DTR)
    pub settle_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".into(),
            baud_rate: 9600,
            read_timeout_ms: 1000,
            settle_ms: 2000,
        }
    }
}

/// Telemetry store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: String,
    /// Row count for "latest N" reports when none is given
    pub latest_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "smart_home_data.db".into(),
            latest_limit: 10,
        }
    }
}

/// Gateway relay ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Local link towards the controller node
    pub device_port: String,
    /// USB link towards the host
    pub host_port: String,
    pub baud_rate: u32,
    pub poll_interval_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            device_port: "/dev/ttyAMA0".into(),
            host_port: "/dev/ttyGS0".into(),
            baud_rate: 9600,
            poll_interval_ms: 1,
        }
    }
}

/// Voice front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub enabled: bool,
    /// Capture device index handed to the recognizer; `None` = system default
    pub microphone_index: Option<u32>,
    /// Speak acknowledgements back to the user
    pub spoken_replies: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            microphone_index: None,
            spoken_replies: true,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.controller;
        if !c.fan_auto_threshold_c.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "controller.fan_auto_threshold_c must be finite",
            ));
        }
        if c.cycle_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "controller.cycle_interval_ms must be > 0",
            ));
        }

        let t = &self.threshold;
        if !(t.min_c.is_finite() && t.max_c.is_finite() && t.min_c < t.max_c) {
            return Err(ConfigError::ValidationFailed(
                "threshold.min_c must be below threshold.max_c",
            ));
        }
        if !(t.min_c..=t.max_c).contains(&t.default_c) {
            return Err(ConfigError::ValidationFailed(
                "threshold.default_c must lie within [min_c, max_c]",
            ));
        }
        if !(t.step_c.is_finite() && t.step_c > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "threshold.step_c must be > 0",
            ));
        }
        if !(t.hysteresis_c.is_finite() && t.hysteresis_c >= 0.0) {
            return Err(ConfigError::ValidationFailed(
                "threshold.hysteresis_c must be >= 0",
            ));
        }

        if self.link.port.is_empty() || self.link.baud_rate == 0 {
            return Err(ConfigError::ValidationFailed(
                "link.port and link.baud_rate are required",
            ));
        }
        if self.store.path.is_empty() {
            return Err(ConfigError::ValidationFailed("store.path is required"));
        }
        if self.gateway.baud_rate == 0 {
            return Err(ConfigError::ValidationFailed(
                "gateway.baud_rate must be > 0",
            ));
        }
        Ok(())
    }
}
