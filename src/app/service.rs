//! Command source: the host-side hexagonal core.
//!
//! [`CommandSource`] turns user intents and voice phrases into command
//! bytes, folds inbound sensor lines into the store and the dashboard, and
//! runs proactive cooling against the learned threshold.  All I/O flows
//! through port traits injected at call sites.
//!
//! ```text
//!  sensor line ──▶ ┌──────────────────────────────┐ ──▶ ReadingSink
//!  intent      ──▶ │        CommandSource          │ ──▶ CommandLink
//!  phrase      ──▶ │ threshold · governor · dash   │ ──▶ EventSink / Speaker
//!                  └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::{LineError, LinkError};
use crate::protocol::{CommandByte, SensorReading, parse_line};

use super::commands::Intent;
use super::dashboard::{Dashboard, LinkStatus};
use super::events::AppEvent;
use super::ports::{CommandLink, EventSink, ReadingSink, Recognizer, Speaker};
use super::threshold::{FanGovernor, LearnedThreshold, ThermalFeedback};
use super::voice::{VoiceIntent, parse_phrase};

// ───────────────────────────────────────────────────────────────
// CommandSource
// ───────────────────────────────────────────────────────────────

pub struct CommandSource {
    threshold: LearnedThreshold,
    governor: FanGovernor,
    dashboard: Dashboard,
    /// The user is holding the fan on; proactive cooling keeps its hands off.
    manual_fan: bool,
    spoken_replies: bool,
}

impl CommandSource {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            threshold: LearnedThreshold::new(&config.threshold),
            governor: FanGovernor::new(config.threshold.hysteresis_c),
            dashboard: Dashboard::new(),
            manual_fan: false,
            spoken_replies: config.voice.spoken_replies,
        }
    }

    // ── Inbound telemetry ─────────────────────────────────────

    /// Process one line received from the gateway.
    ///
    /// A malformed line is reported and dropped.  A store failure is
    /// reported but does not reject the reading.
    pub fn handle_line(
        &mut self,
        line: &str,
        store: &mut impl ReadingSink,
        link: &mut impl CommandLink,
        sink: &mut impl EventSink,
    ) -> Result<SensorReading, LineError> {
        let reading = match parse_line(line) {
            Ok(r) => r,
            Err(error) => {
                self.reject(line, error, sink);
                return Err(error);
            }
        };

        let id = match store.append(&reading) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("store append failed: {}", e);
                sink.emit(&AppEvent::StoreFailed(e.to_string()));
                None
            }
        };

        self.dashboard.record(reading);
        sink.emit(&AppEvent::ReadingAccepted { reading, id });

        self.regulate(reading.temperature, link, sink);
        Ok(reading)
    }

    /// Report a line the decoder gave up on before parsing.
    pub fn reject(&mut self, line: &str, error: LineError, sink: &mut impl EventSink) {
        self.dashboard.note_rejected();
        sink.emit(&AppEvent::LineRejected {
            line: line.to_string(),
            error,
        });
    }

    // ── User intents ──────────────────────────────────────────

    /// Send every byte of `intent` in order.  Stops at the first failure.
    pub fn handle_intent(
        &mut self,
        intent: Intent,
        link: &mut impl CommandLink,
        sink: &mut impl EventSink,
    ) -> Result<(), LinkError> {
        for &command in intent.commands() {
            self.send(command, link, sink)?;
            self.note_user_command(command);
        }
        info!("intent {:?} handled", intent);
        sink.emit(&AppEvent::IntentHandled(intent));
        Ok(())
    }

    /// Move the learned threshold and re-check the latest temperature
    /// against it.  Returns the new threshold.
    pub fn handle_feedback(
        &mut self,
        feedback: ThermalFeedback,
        link: &mut impl CommandLink,
        sink: &mut impl EventSink,
    ) -> f32 {
        let from_c = self.threshold.value();
        let to_c = self.threshold.learn(feedback);
        sink.emit(&AppEvent::ThresholdChanged {
            feedback,
            from_c,
            to_c,
        });
        if let Some(latest) = self.dashboard.latest() {
            self.regulate(latest.temperature, link, sink);
        }
        to_c
    }

    /// Dispatch a recognised phrase.  Unmatched phrases and voice
    /// failures are no-ops.
    pub fn handle_phrase(
        &mut self,
        phrase: &str,
        link: &mut impl CommandLink,
        speaker: &mut impl Speaker,
        sink: &mut impl EventSink,
    ) -> Option<VoiceIntent> {
        let Some(voice_intent) = parse_phrase(phrase) else {
            debug!("no intent in {:?}", phrase);
            sink.emit(&AppEvent::PhraseIgnored(phrase.to_string()));
            return None;
        };

        let reply = match voice_intent {
            VoiceIntent::Command(intent) => match self.handle_intent(intent, link, sink) {
                Ok(()) => intent.acknowledgement().to_string(),
                Err(_) => "The controller is not connected.".to_string(),
            },
            VoiceIntent::Feedback(feedback) => {
                let to_c = self.handle_feedback(feedback, link, sink);
                match feedback {
                    ThermalFeedback::TooHot => {
                        format!("Okay, I'll keep it cooler. Target {to_c:.1} degrees.")
                    }
                    ThermalFeedback::TooCold => {
                        format!("Okay, I'll let it warm up. Target {to_c:.1} degrees.")
                    }
                }
            }
        };
        self.speak(&reply, speaker);
        Some(voice_intent)
    }

    /// Capture one utterance and dispatch it.
    pub fn listen(
        &mut self,
        recognizer: &mut impl Recognizer,
        link: &mut impl CommandLink,
        speaker: &mut impl Speaker,
        sink: &mut impl EventSink,
    ) -> Option<VoiceIntent> {
        match recognizer.listen() {
            Ok(Some(phrase)) => self.handle_phrase(&phrase, link, speaker, sink),
            Ok(None) => None,
            Err(e) => {
                warn!("voice: {}", e);
                None
            }
        }
    }

    // ── Link status ───────────────────────────────────────────

    /// Mark the link down.  Stays down until [`link_restored`](Self::link_restored).
    pub fn link_lost(&mut self, error: LinkError, sink: &mut impl EventSink) {
        if self.dashboard.link() == LinkStatus::Disconnected {
            return;
        }
        warn!("serial link lost: {}", error);
        self.dashboard.set_link(LinkStatus::Disconnected);
        sink.emit(&AppEvent::LinkLost(error));
    }

    /// The user reopened the port.
    pub fn link_restored(&mut self, sink: &mut impl EventSink) {
        self.dashboard.set_link(LinkStatus::Online);
        sink.emit(&AppEvent::LinkRestored);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn threshold(&self) -> f32 {
        self.threshold.value()
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn is_online(&self) -> bool {
        self.dashboard.link() == LinkStatus::Online
    }

    pub fn manual_fan(&self) -> bool {
        self.manual_fan
    }

    pub fn is_cooling(&self) -> bool {
        self.governor.is_cooling()
    }

    // ── Internal ──────────────────────────────────────────────

    fn send(
        &mut self,
        command: CommandByte,
        link: &mut impl CommandLink,
        sink: &mut impl EventSink,
    ) -> Result<(), LinkError> {
        if !self.is_online() {
            return Err(LinkError::Disconnected);
        }
        match link.send(command) {
            Ok(()) => {
                sink.emit(&AppEvent::CommandSent(command));
                Ok(())
            }
            Err(e) => {
                self.link_lost(e, sink);
                Err(e)
            }
        }
    }

    fn note_user_command(&mut self, command: CommandByte) {
        match command {
            CommandByte::FanOverride => self.manual_fan = true,
            CommandByte::FanAuto | CommandByte::ResetAll => {
                self.manual_fan = false;
                self.governor.reset();
            }
            CommandByte::LightOn | CommandByte::LightOff => {}
        }
    }

    fn regulate(&mut self, temperature_c: f32, link: &mut impl CommandLink, sink: &mut impl EventSink) {
        if self.manual_fan {
            return;
        }
        let before = self.governor.clone();
        if let Some(command) = self.governor.observe(temperature_c, self.threshold.value()) {
            info!(
                "proactive {} at {:.2}°C (threshold {:.1}°C)",
                command,
                temperature_c,
                self.threshold.value()
            );
            if self.send(command, link, sink).is_err() {
                // Not delivered; try again on the next reading.
                self.governor = before;
            }
        }
    }

    fn speak(&self, text: &str, speaker: &mut impl Speaker) {
        if !self.spoken_replies {
            return;
        }
        if let Err(e) = speaker.say(text) {
            warn!("voice: {}", e);
        }
    }
}
