//! Learned comfort threshold and the proactive-cooling governor.
//!
//! ```text
//!            threshold + band ─────────────  ▲ crossing up   → send 'P'
//!   temp ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~   (no command inside the band)
//!            threshold − band ─────────────  ▼ crossing down → send 'N'
//! ```
//!
//! The threshold is host-local: it is never transmitted, only used to
//! decide when to assert or clear the controller's fan override.

use crate::config::ThresholdConfig;
use crate::protocol::CommandByte;

/// Direction of a user's comfort complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalFeedback {
    /// "It's hot / warm / make it cooler": lower the threshold.
    TooHot,
    /// "It's cold / freezing / make it warmer": raise the threshold.
    TooCold,
}

/// Clamped, step-adjusted temperature set-point.
#[derive(Debug, Clone)]
pub struct LearnedThreshold {
    value_c: f32,
    default_c: f32,
    min_c: f32,
    max_c: f32,
    step_c: f32,
}

impl LearnedThreshold {
    pub fn new(config: &ThresholdConfig) -> Self {
        Self {
            value_c: config.default_c.clamp(config.min_c, config.max_c),
            default_c: config.default_c,
            min_c: config.min_c,
            max_c: config.max_c,
            step_c: config.step_c,
        }
    }

    /// Current set-point (°C).
    pub fn value(&self) -> f32 {
        self.value_c
    }

    /// Clamp bounds `(min, max)`.
    pub fn bounds(&self) -> (f32, f32) {
        (self.min_c, self.max_c)
    }

    /// Move one step in the direction the feedback asks for.
    /// Returns the new value.
    pub fn learn(&mut self, feedback: ThermalFeedback) -> f32 {
        let delta = match feedback {
            ThermalFeedback::TooHot => -self.step_c,
            ThermalFeedback::TooCold => self.step_c,
        };
        self.value_c = (self.value_c + delta).clamp(self.min_c, self.max_c);
        self.value_c
    }

    /// Back to the configured default.
    pub fn reset(&mut self) {
        self.value_c = self.default_c.clamp(self.min_c, self.max_c);
    }
}

/// Hysteresis gate for the proactive fan override.
#[derive(Debug, Clone)]
pub struct FanGovernor {
    band_c: f32,
    /// `true` once `P` has been sent and not yet cleared.
    cooling: bool,
}

impl FanGovernor {
    pub fn new(band_c: f32) -> Self {
        Self {
            band_c,
            cooling: false,
        }
    }

    /// Feed one measured temperature.  Returns the command to send, if
    /// this sample is a genuine band crossing.
    pub fn observe(&mut self, temperature_c: f32, threshold_c: f32) -> Option<CommandByte> {
        if !self.cooling && temperature_c > threshold_c + self.band_c {
            self.cooling = true;
            Some(CommandByte::FanOverride)
        } else if self.cooling && temperature_c < threshold_c - self.band_c {
            self.cooling = false;
            Some(CommandByte::FanAuto)
        } else {
            None
        }
    }

    /// Whether the governor currently holds the fan override.
    pub fn is_cooling(&self) -> bool {
        self.cooling
    }

    /// Forget the held override (after a global reset).
    pub fn reset(&mut self) {
        self.cooling = false;
    }
}
