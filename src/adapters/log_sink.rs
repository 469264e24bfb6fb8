//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one structured line per
//! [`AppEvent`] through the `log` facade.  Prefixes group the lines:
//! `TELEM` for readings, `CMD` for command traffic, `LINK` for the serial
//! connection, `VOICE` for phrase handling.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::ReadingAccepted { reading, id } => {
                info!(
                    "TELEM | T={:.2}\u{00b0}C | RH={:.2}% | light={} | row={}",
                    reading.temperature,
                    reading.humidity,
                    reading.light_raw,
                    id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                );
            }
            AppEvent::LineRejected { line, error } => {
                warn!("TELEM | rejected {:?}: {}", line, error);
            }
            AppEvent::StoreFailed(msg) => {
                warn!("TELEM | not stored: {}", msg);
            }
            AppEvent::CommandSent(command) => {
                info!("CMD | sent {}", command);
            }
            AppEvent::IntentHandled(intent) => {
                info!("CMD | intent {:?}", intent);
            }
            AppEvent::ThresholdChanged {
                feedback,
                from_c,
                to_c,
            } => {
                info!(
                    "CMD | threshold {:.1}\u{00b0}C -> {:.1}\u{00b0}C ({:?})",
                    from_c, to_c, feedback
                );
            }
            AppEvent::PhraseIgnored(phrase) => {
                info!("VOICE | no intent in {:?}", phrase);
            }
            AppEvent::LinkLost(error) => {
                warn!("LINK | disconnected: {} (type 'reconnect' to retry)", error);
            }
            AppEvent::LinkRestored => {
                info!("LINK | online");
            }
        }
    }
}
