//! Command source tests: telemetry ingestion, intents, voice, link status.

use envirocontrol::app::events::AppEvent;
use envirocontrol::app::{CommandSource, Intent, LinkStatus, Scene, ThermalFeedback, VoiceIntent};
use envirocontrol::config::SystemConfig;
use envirocontrol::error::{LineError, LinkError, VoiceError};
use envirocontrol::protocol::SensorReading;

use super::mock_hw::{
    MockLink, MockStore, RecordingEventSink, RecordingSpeaker, ScriptedRecognizer,
};

struct Rig {
    source: CommandSource,
    store: MockStore,
    link: MockLink,
    sink: RecordingEventSink,
    speaker: RecordingSpeaker,
}

impl Rig {
    fn new() -> Self {
        Self {
            source: CommandSource::new(&SystemConfig::default()),
            store: MockStore::default(),
            link: MockLink::default(),
            sink: RecordingEventSink::default(),
            speaker: RecordingSpeaker::default(),
        }
    }

    fn line(&mut self, line: &str) -> Result<SensorReading, LineError> {
        self.source
            .handle_line(line, &mut self.store, &mut self.link, &mut self.sink)
    }

    fn say(&mut self, phrase: &str) -> Option<VoiceIntent> {
        self.source
            .handle_phrase(phrase, &mut self.link, &mut self.speaker, &mut self.sink)
    }

    fn intent(&mut self, intent: Intent) -> Result<(), LinkError> {
        self.source.handle_intent(intent, &mut self.link, &mut self.sink)
    }

    fn sent(&self) -> &str {
        std::str::from_utf8(&self.link.sent).unwrap()
    }
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn example_line_is_stored_verbatim() {
    let mut rig = Rig::new();
    rig.line("25.3,48.0,612").unwrap();
    assert_eq!(rig.store.rows, vec![SensorReading::new(25.3, 48.0, 612)]);
    assert_eq!(
        rig.source.dashboard().latest(),
        Some(SensorReading::new(25.3, 48.0, 612))
    );
}

#[test]
fn malformed_lines_are_dropped_and_reading_continues() {
    let mut rig = Rig::new();
    for bad in ["25.3,48.0", "hot,48.0,612", "25.3,48.0,bright", "1,2,3,4", ""] {
        assert!(rig.line(bad).is_err(), "{bad:?} should be rejected");
    }
    rig.line("22.0,40.0,900").unwrap();

    assert_eq!(rig.store.rows.len(), 1);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::LineRejected { .. })),
        5
    );
    assert_eq!(rig.source.dashboard().counters(), (1, 5));
}

#[test]
fn store_outage_is_reported_not_fatal() {
    let mut rig = Rig::new();
    rig.store.fail = true;
    rig.line("22.0,40.0,900").unwrap();
    rig.store.fail = false;
    rig.line("22.1,40.0,900").unwrap();

    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::StoreFailed(_))), 1);
    assert_eq!(rig.store.rows.len(), 1);
    assert_eq!(rig.source.dashboard().series(), vec![22.0, 22.1]);
}

// ── Intents and scenes ────────────────────────────────────────

#[test]
fn each_switch_sends_exactly_one_byte() {
    let mut rig = Rig::new();
    for intent in [
        Intent::FanOn,
        Intent::FanAuto,
        Intent::LightOn,
        Intent::LightOff,
        Intent::ResetAll,
    ] {
        rig.intent(intent).unwrap();
    }
    assert_eq!(rig.sent(), "PNLlA");
}

#[test]
fn scenes_send_their_bundles_in_order() {
    let mut rig = Rig::new();
    rig.intent(Intent::Scene(Scene::Sleep)).unwrap();
    rig.intent(Intent::Scene(Scene::Wake)).unwrap();
    rig.intent(Intent::Scene(Scene::Home)).unwrap();
    assert_eq!(rig.sent(), "lNALA");
}

// ── Voice ─────────────────────────────────────────────────────

#[test]
fn good_night_phrase_runs_sleep_scene_and_answers() {
    let mut rig = Rig::new();
    assert_eq!(
        rig.say("Good night"),
        Some(VoiceIntent::Command(Intent::Scene(Scene::Sleep)))
    );
    assert_eq!(rig.sent(), "lN");
    assert_eq!(rig.speaker.said, vec!["Good night.".to_string()]);
}

#[test]
fn comfort_phrases_move_threshold_within_bounds() {
    let mut rig = Rig::new();
    for _ in 0..20 {
        rig.say("I'm freezing");
    }
    assert!((rig.source.threshold() - 32.0).abs() < 1e-6);
    for _ in 0..20 {
        rig.say("it's way too hot");
    }
    assert!((rig.source.threshold() - 18.0).abs() < 1e-6);

    let changes = rig.sink.count(|e| {
        matches!(
            e,
            AppEvent::ThresholdChanged {
                feedback: ThermalFeedback::TooHot,
                ..
            }
        )
    });
    assert_eq!(changes, 20, "clamped steps are still reported");
}

#[test]
fn broken_speaker_does_not_block_the_command() {
    let mut rig = Rig::new();
    rig.speaker.broken = true;
    rig.say("lights on");
    assert_eq!(rig.sent(), "L");
}

#[test]
fn recognizer_errors_and_silence_are_no_ops() {
    let mut rig = Rig::new();
    let mut mic = ScriptedRecognizer {
        utterances: vec![
            Err(VoiceError::CaptureFailed),
            Ok(None),
            Ok(Some("fan on".into())),
        ],
    };
    let mut heard = Vec::new();
    for _ in 0..3 {
        heard.push(rig.source.listen(
            &mut mic,
            &mut rig.link,
            &mut rig.speaker,
            &mut rig.sink,
        ));
    }
    assert_eq!(
        heard,
        vec![None, None, Some(VoiceIntent::Command(Intent::FanOn))]
    );
    assert_eq!(rig.sent(), "P");
}

// ── Proactive cooling ─────────────────────────────────────────

#[test]
fn oscillation_inside_band_sends_nothing() {
    let mut rig = Rig::new();
    for t in [25.6, 26.4, 25.7, 26.3, 25.9, 26.2, 25.6] {
        rig.line(&format!("{t},45.0,700")).unwrap();
    }
    assert_eq!(rig.sent(), "");
}

#[test]
fn band_crossings_send_override_and_release_once_each() {
    let mut rig = Rig::new();
    for t in [26.0, 26.6, 27.0, 26.8, 26.0, 25.6, 25.4, 25.0, 26.7] {
        rig.line(&format!("{t},45.0,700")).unwrap();
    }
    assert_eq!(rig.sent(), "PNP");
}

#[test]
fn manual_fan_hold_survives_cooling_down() {
    let mut rig = Rig::new();
    rig.say("turn the fan on");
    for t in [30.0, 20.0, 18.0] {
        rig.line(&format!("{t},45.0,700")).unwrap();
    }
    assert_eq!(rig.sent(), "P", "no proactive N while the user holds the fan");

    rig.say("fan back to auto");
    rig.line("27.0,45.0,700").unwrap();
    assert_eq!(rig.sent(), "PNP");
}

#[test]
fn reset_clears_proactive_state() {
    let mut rig = Rig::new();
    rig.line("28.0,45.0,700").unwrap();
    assert!(rig.source.is_cooling());
    rig.intent(Intent::ResetAll).unwrap();
    assert!(!rig.source.is_cooling());

    // Still hot: the governor asserts again after the reset.
    rig.line("28.0,45.0,700").unwrap();
    assert_eq!(rig.sent(), "PAP");
}

// ── Link status ───────────────────────────────────────────────

#[test]
fn lost_link_is_sticky_until_reconnect() {
    let mut rig = Rig::new();
    rig.link.fail = true;
    assert_eq!(rig.intent(Intent::LightOn), Err(LinkError::WriteFailed));
    assert_eq!(rig.source.dashboard().link(), LinkStatus::Disconnected);

    rig.link.fail = false;
    assert_eq!(rig.intent(Intent::LightOn), Err(LinkError::Disconnected));
    rig.line("29.0,45.0,700").unwrap();
    assert_eq!(rig.sent(), "", "proactive cooling also waits for the link");

    rig.source.link_restored(&mut rig.sink);
    rig.line("29.0,45.0,700").unwrap();
    assert_eq!(rig.sent(), "P");
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::LinkRestored)), 1);
}

#[test]
fn voice_reply_reports_missing_link() {
    let mut rig = Rig::new();
    rig.source.link_lost(LinkError::OpenFailed, &mut rig.sink);
    rig.say("lights off");
    assert_eq!(rig.sent(), "");
    assert_eq!(
        rig.speaker.said,
        vec!["The controller is not connected.".to_string()]
    );
}
