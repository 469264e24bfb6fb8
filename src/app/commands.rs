//! Inbound intents to the command source.
//!
//! These represent actions requested by the user (a dashboard switch or
//! a recognised voice phrase) that the
//! [`CommandSource`](super::service::CommandSource) turns into command
//! bytes.

use crate::protocol::CommandByte;

/// Named bundles of commands applied in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// Lights off, fan back to auto.
    Sleep,
    /// Clear all overrides, then lights on.
    Wake,
    /// Clear all overrides.
    Home,
}

impl Scene {
    pub fn commands(self) -> &'static [CommandByte] {
        match self {
            Self::Sleep => &[CommandByte::LightOff, CommandByte::FanAuto],
            Self::Wake => &[CommandByte::ResetAll, CommandByte::LightOn],
            Self::Home => &[CommandByte::ResetAll],
        }
    }
}

/// User intents the command source understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Manual fan override on.
    FanOn,
    /// Release the manual fan override.
    FanAuto,
    LightOn,
    LightOff,
    /// Clear every override (controller and host side).
    ResetAll,
    Scene(Scene),
}

impl Intent {
    /// The command bytes this intent puts on the wire, in order.
    pub fn commands(self) -> &'static [CommandByte] {
        match self {
            Self::FanOn => &[CommandByte::FanOverride],
            Self::FanAuto => &[CommandByte::FanAuto],
            Self::LightOn => &[CommandByte::LightOn],
            Self::LightOff => &[CommandByte::LightOff],
            Self::ResetAll => &[CommandByte::ResetAll],
            Self::Scene(scene) => scene.commands(),
        }
    }

    /// Short spoken confirmation.
    pub fn acknowledgement(self) -> &'static str {
        match self {
            Self::FanOn => "Fan on.",
            Self::FanAuto => "Fan back to automatic.",
            Self::LightOn => "Lights on.",
            Self::LightOff => "Lights off.",
            Self::ResetAll => "Everything back to automatic.",
            Self::Scene(Scene::Sleep) => "Good night.",
            Self::Scene(Scene::Wake) => "Good morning.",
            Self::Scene(Scene::Home) => "Welcome home.",
        }
    }
}
