//! Phrase → intent matching.
//!
//! Matching is on whole lowercase word tokens, so `warmer` never matches
//! `warm` and `cooler` never matches `cool`.  Device commands win over
//! scenes, and scenes win over comfort feedback: "it's hot, fan on" turns
//! the fan on without moving the threshold.

use super::commands::{Intent, Scene};
use super::threshold::ThermalFeedback;

/// What a phrase asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceIntent {
    Command(Intent),
    Feedback(ThermalFeedback),
}

const LIGHT_WORDS: &[&str] = &["light", "lights", "lamp"];
const ON_WORDS: &[&str] = &["on", "start"];
const OFF_WORDS: &[&str] = &["off", "stop"];
const SLEEP_WORDS: &[&str] = &["sleep", "goodnight", "bedtime"];
const WAKE_WORDS: &[&str] = &["wake", "morning"];
const HOT_WORDS: &[&str] = &["hot", "warm", "cooler", "boiling"];
const COLD_WORDS: &[&str] = &["cold", "freezing", "warmer", "chilly"];

/// Match a recognised phrase.  `None` when nothing applies.
pub fn parse_phrase(phrase: &str) -> Option<VoiceIntent> {
    let lower = phrase.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has = |w: &str| words.iter().any(|x| *x == w);
    let any = |set: &[&str]| set.iter().any(|w| words.iter().any(|x| x == w));

    if has("reset") {
        return Some(VoiceIntent::Command(Intent::ResetAll));
    }

    if has("fan") {
        if any(ON_WORDS) {
            return Some(VoiceIntent::Command(Intent::FanOn));
        }
        if any(OFF_WORDS) || has("auto") || has("automatic") {
            return Some(VoiceIntent::Command(Intent::FanAuto));
        }
    }

    if any(LIGHT_WORDS) {
        if any(ON_WORDS) {
            return Some(VoiceIntent::Command(Intent::LightOn));
        }
        if any(OFF_WORDS) {
            return Some(VoiceIntent::Command(Intent::LightOff));
        }
    }

    if any(SLEEP_WORDS) || (has("good") && has("night")) {
        return Some(VoiceIntent::Command(Intent::Scene(Scene::Sleep)));
    }
    if any(WAKE_WORDS) {
        return Some(VoiceIntent::Command(Intent::Scene(Scene::Wake)));
    }
    if has("home") {
        return Some(VoiceIntent::Command(Intent::Scene(Scene::Home)));
    }

    if any(HOT_WORDS) {
        return Some(VoiceIntent::Feedback(ThermalFeedback::TooHot));
    }
    if any(COLD_WORDS) {
        return Some(VoiceIntent::Feedback(ThermalFeedback::TooCold));
    }

    None
}
