//! Error types for the EnviroControl library.
//!
//! One enum per subsystem.  They are `Copy` so they can be carried inside
//! events and cycle outcomes without allocation; binaries wrap them in
//! `anyhow` at the top level.  The SQLite-backed store has its own non-`Copy` error type in
//! [`crate::store`].

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The climate sensor did not answer (bus timeout, checksum failure).
    ReadFailed,
    /// Temperature came back as NaN or infinite.
    InvalidTemperature,
    /// Humidity came back as NaN or infinite.
    InvalidHumidity,
    /// Finite, but too large to format into a sensor line.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "climate sensor read failed"),
            Self::InvalidTemperature => write!(f, "temperature is not a number"),
            Self::InvalidHumidity => write!(f, "humidity is not a number"),
            Self::OutOfRange => write!(f, "reading does not fit a sensor line"),
        }
    }
}

impl std::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Line (wire format) errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    /// The line was empty after trimming.
    Empty,
    /// The line did not split into exactly three comma-separated fields.
    FieldCount(usize),
    /// Temperature field is not a finite decimal number.
    BadTemperature,
    /// Humidity field is not a finite decimal number.
    BadHumidity,
    /// Light field is not an unsigned integer ADC value.
    BadLight,
    /// The line exceeded the decoder's fixed buffer before a terminator.
    TooLong,
    /// The line is not valid ASCII/UTF-8 text.
    Encoding,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::FieldCount(n) => write!(f, "expected 3 fields, got {n}"),
            Self::BadTemperature => write!(f, "temperature field is not numeric"),
            Self::BadHumidity => write!(f, "humidity field is not numeric"),
            Self::BadLight => write!(f, "light field is not an integer"),
            Self::TooLong => write!(f, "line too long"),
            Self::Encoding => write!(f, "line is not text"),
        }
    }
}

impl std::error::Error for LineError {}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The port could not be opened.
    OpenFailed,
    /// A write to the port failed; the link is now considered lost.
    WriteFailed,
    /// A read from the port failed; the link is now considered lost.
    ReadFailed,
    /// The link was already marked disconnected; nothing was sent.
    Disconnected,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed => write!(f, "serial port open failed"),
            Self::WriteFailed => write!(f, "serial write failed"),
            Self::ReadFailed => write!(f, "serial read failed"),
            Self::Disconnected => write!(f, "serial link disconnected"),
        }
    }
}

impl std::error::Error for LinkError {}

// ---------------------------------------------------------------------------
// Voice errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceError {
    /// The recognizer could not capture audio (device busy, missing).
    CaptureFailed,
    /// The recognition backend could not be reached or returned an error.
    RecognitionFailed,
    /// Speech synthesis failed.
    SynthesisFailed,
}

impl fmt::Display for VoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CaptureFailed => write!(f, "audio capture failed"),
            Self::RecognitionFailed => write!(f, "speech recognition failed"),
            Self::SynthesisFailed => write!(f, "speech synthesis failed"),
        }
    }
}

impl std::error::Error for VoiceError {}
