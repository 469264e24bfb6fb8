//! Mock adapters for integration tests.
//!
//! Each one records what it was asked to do so tests can assert on the
//! full history without a serial port, a database or a microphone.

use envirocontrol::app::events::AppEvent;
use envirocontrol::app::ports::{
    ActuatorPort, CommandLink, EventSink, ReadingSink, Recognizer, SensorPort, Speaker,
};
use envirocontrol::controller::ClimateSample;
use envirocontrol::error::{LinkError, SensorError, VoiceError};
use envirocontrol::protocol::{CommandByte, SensorReading};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Fan(bool),
    Light(bool),
}

// ── MockBoard ─────────────────────────────────────────────────

/// Sensor script plus actuator recorder.
///
/// Climate reads pop from `climate` in order; once it runs dry the last
/// value repeats.
pub struct MockBoard {
    pub climate: Vec<Result<ClimateSample, SensorError>>,
    pub light: u16,
    pub calls: Vec<ActuatorCall>,
    cursor: usize,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new(temperature_c: f32, humidity_pct: f32, light: u16) -> Self {
        Self::scripted(
            vec![Ok(ClimateSample {
                temperature_c,
                humidity_pct,
            })],
            light,
        )
    }

    pub fn scripted(climate: Vec<Result<ClimateSample, SensorError>>, light: u16) -> Self {
        Self {
            climate,
            light,
            calls: Vec::new(),
            cursor: 0,
        }
    }

    pub fn fan_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Fan(on) => Some(*on),
                ActuatorCall::Light(_) => None,
            })
            .unwrap_or(false)
    }

    pub fn light_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Light(on) => Some(*on),
                ActuatorCall::Fan(_) => None,
            })
            .unwrap_or(false)
    }
}

impl SensorPort for MockBoard {
    fn read_climate(&mut self) -> Result<ClimateSample, SensorError> {
        let idx = self.cursor.min(self.climate.len().saturating_sub(1));
        self.cursor += 1;
        self.climate
            .get(idx)
            .copied()
            .unwrap_or(Err(SensorError::ReadFailed))
    }

    fn read_light(&mut self) -> u16 {
        self.light
    }
}

impl ActuatorPort for MockBoard {
    fn set_fan(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Fan(on));
    }

    fn set_light(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Light(on));
    }
}

// ── MockLink ──────────────────────────────────────────────────

/// Command link that records bytes; flip `fail` to simulate a pulled cable.
#[derive(Default)]
pub struct MockLink {
    pub sent: Vec<u8>,
    pub fail: bool,
}

impl CommandLink for MockLink {
    fn send(&mut self, command: CommandByte) -> Result<(), LinkError> {
        if self.fail {
            return Err(LinkError::WriteFailed);
        }
        self.sent.push(command.as_byte());
        Ok(())
    }
}

// ── MockStore ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockStore {
    pub rows: Vec<SensorReading>,
    pub fail: bool,
}

impl ReadingSink for MockStore {
    type Error = String;

    fn append(&mut self, reading: &SensorReading) -> Result<i64, String> {
        if self.fail {
            return Err("database is locked".into());
        }
        self.rows.push(*reading);
        Ok(self.rows.len() as i64)
    }
}

// ── RecordingEventSink ────────────────────────────────────────

#[derive(Default)]
pub struct RecordingEventSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingEventSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Voice mocks ───────────────────────────────────────────────

/// Replays a fixed list of utterances, then hears nothing.
pub struct ScriptedRecognizer {
    pub utterances: Vec<Result<Option<String>, VoiceError>>,
}

impl Recognizer for ScriptedRecognizer {
    fn listen(&mut self) -> Result<Option<String>, VoiceError> {
        if self.utterances.is_empty() {
            Ok(None)
        } else {
            self.utterances.remove(0)
        }
    }
}

#[derive(Default)]
pub struct RecordingSpeaker {
    pub said: Vec<String>,
    pub broken: bool,
}

impl Speaker for RecordingSpeaker {
    fn say(&mut self, text: &str) -> Result<(), VoiceError> {
        if self.broken {
            return Err(VoiceError::SynthesisFailed);
        }
        self.said.push(text.to_string());
        Ok(())
    }
}
