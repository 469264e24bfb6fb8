//! Outbound application events.
//!
//! The [`CommandSource`](super::service::CommandSource) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, show them in a status bar, flash
//! a transient notice.

use crate::error::{LineError, LinkError};
use crate::protocol::{CommandByte, SensorReading};

use super::commands::Intent;
use super::threshold::ThermalFeedback;

/// Structured events emitted by the command source.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A line parsed and was handed to the store.  `id` is `None` when the
    /// store rejected it.
    ReadingAccepted {
        reading: SensorReading,
        id: Option<i64>,
    },

    /// A malformed line was discarded (transient notice).
    LineRejected { line: String, error: LineError },

    /// The store failed to persist an accepted reading.
    StoreFailed(String),

    /// A command byte left the host.
    CommandSent(CommandByte),

    /// A recognised intent was dispatched.
    IntentHandled(Intent),

    /// A voice phrase matched nothing.
    PhraseIgnored(String),

    /// The learned threshold moved.
    ThresholdChanged {
        feedback: ThermalFeedback,
        from_c: f32,
        to_c: f32,
    },

    /// The serial link went down (persistent until restored).
    LinkLost(LinkError),

    /// The serial link was reopened by the user.
    LinkRestored,
}
