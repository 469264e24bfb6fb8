//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller / CommandSource (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, serial link, telemetry store, voice
//! services, event sinks) implement these traits.  The domain consumes them
//! via generics, so neither the controller loop nor the command source
//! touches hardware or I/O directly.

use crate::config::SystemConfig;
use crate::controller::ClimateSample;
use crate::error::{LinkError, SensorError, VoiceError};
use crate::protocol::{CommandByte, SensorReading};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → controller)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the controller calls this once per cycle.
pub trait SensorPort {
    /// Read the combined temperature/humidity sensor.
    ///
    /// A sample whose fields are NaN is passed through as-is; the
    /// controller decides what counts as a failed read.
    fn read_climate(&mut self) -> Result<ClimateSample, SensorError>;

    /// Read the light sensor's raw ADC value.
    fn read_light(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: controller → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the controller drives both outputs every cycle.
pub trait ActuatorPort {
    fn set_fan(&mut self, on: bool);

    fn set_light(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Command link (driven adapter: command source → controller)
// ───────────────────────────────────────────────────────────────

/// Outbound half of the host serial link.
///
/// Fire-and-forget: `Ok(())` means the byte left the host, not that the
/// controller applied it.
pub trait CommandLink {
    fn send(&mut self, command: CommandByte) -> Result<(), LinkError>;
}

/// No port open: every send reports the link as down.
impl<L: CommandLink> CommandLink for Option<L> {
    fn send(&mut self, command: CommandByte) -> Result<(), LinkError> {
        match self {
            Some(link) => link.send(command),
            None => Err(LinkError::Disconnected),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Reading sink (driven adapter: command source → telemetry store)
// ───────────────────────────────────────────────────────────────

/// Append-only sink for accepted readings.
pub trait ReadingSink {
    type Error: core::fmt::Display;

    /// Persist one reading, returning its generated identity.
    fn append(&mut self, reading: &SensorReading) -> Result<i64, Self::Error>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / UI)
// ───────────────────────────────────────────────────────────────

/// The command source emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log, UI status bar).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Voice ports
// ───────────────────────────────────────────────────────────────

/// Speech-to-text front-end.  May block for seconds.
pub trait Recognizer {
    /// Capture and transcribe one utterance.  `Ok(None)` means nothing
    /// intelligible was heard.
    fn listen(&mut self) -> Result<Option<String>, VoiceError>;
}

/// Text-to-speech back-end.
pub trait Speaker {
    fn say(&mut self, text: &str) -> Result<(), VoiceError>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before returning or persisting.  Invalid
/// ranges are rejected with [`ConfigError::ValidationFailed`], not
/// silently clamped.
pub trait ConfigPort {
    /// Load configuration.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    Io(std::io::Error),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
