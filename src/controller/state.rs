//! Override state owned by the controller.
//!
//! Mutated only by received command bytes, persists across cycles, and is
//! lost on power loss.  Transitions are last-write-wins: a later command
//! fully replaces the intent of an earlier conflicting one.

use crate::protocol::CommandByte;

/// How the light output is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightMode {
    /// Follow the light sensor against the darkness threshold.
    #[default]
    Auto,
    ForcedOn,
    ForcedOff,
}

/// Command-driven overrides that supersede automatic actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverrideState {
    pub fan_override: bool,
    pub light_mode: LightMode,
}

impl OverrideState {
    /// Apply one command.  Returns `true` if the state changed.
    pub fn apply(&mut self, command: CommandByte) -> bool {
        let before = *self;
        match command {
            CommandByte::FanOverride => self.fan_override = true,
            CommandByte::FanAuto => self.fan_override = false,
            CommandByte::LightOn => self.light_mode = LightMode::ForcedOn,
            CommandByte::LightOff => self.light_mode = LightMode::ForcedOff,
            CommandByte::ResetAll => *self = Self::default(),
        }
        *self != before
    }

    /// Fan output for a valid temperature.
    pub fn fan_output(&self, temperature_c: f32, auto_threshold_c: f32) -> bool {
        self.fan_override || temperature_c > auto_threshold_c
    }

    /// Light output for a raw light reading.  Auto turns the light on
    /// strictly below the darkness threshold.
    pub fn light_output(&self, light_raw: u16, darkness_threshold: u16) -> bool {
        match self.light_mode {
            LightMode::ForcedOn => true,
            LightMode::ForcedOff => false,
            LightMode::Auto => light_raw < darkness_threshold,
        }
    }
}
