//! Single-byte control commands (host → controller).
//!
//! No framing, no payload, no acknowledgement.  Bytes outside the alphabet
//! are ignored by the controller.

use core::fmt;

/// The closed command alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandByte {
    /// `P`: force the fan on (override asserted).
    FanOverride = b'P',
    /// `N`: clear the fan override, fan returns to auto.
    FanAuto = b'N',
    /// `L`: force the light on.
    LightOn = b'L',
    /// `l`: force the light off.
    LightOff = b'l',
    /// `A`: global reset: clear fan and light overrides.
    ResetAll = b'A',
}

impl CommandByte {
    /// Every command, in table order.
    pub const ALL: [CommandByte; 5] = [
        Self::FanOverride,
        Self::FanAuto,
        Self::LightOn,
        Self::LightOff,
        Self::ResetAll,
    ];

    /// Decode a received byte.  Returns `None` for anything outside the
    /// alphabet (line noise, stray newlines).
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'P' => Some(Self::FanOverride),
            b'N' => Some(Self::FanAuto),
            b'L' => Some(Self::LightOn),
            b'l' => Some(Self::LightOff),
            b'A' => Some(Self::ResetAll),
            _ => None,
        }
    }

    /// The byte as it goes on the wire.
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for CommandByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FanOverride => "fan override",
            Self::FanAuto => "fan auto",
            Self::LightOn => "light on",
            Self::LightOff => "light off",
            Self::ResetAll => "reset all",
        };
        write!(f, "{} ('{}')", label, self.as_byte() as char)
    }
}
