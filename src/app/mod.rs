//! Host application core: pure domain logic, zero I/O.
//!
//! This module holds the command source's rules: intent mapping, phrase
//! matching, threshold learning with hysteresis, and the dashboard model.
//! All interaction with the serial link, the store and voice services
//! happens through **port traits** defined in [`ports`], so the whole layer
//! runs under test without a port or a database.

pub mod commands;
pub mod dashboard;
pub mod events;
pub mod ports;
pub mod service;
pub mod threshold;
pub mod voice;

pub use commands::{Intent, Scene};
pub use dashboard::{Dashboard, LinkStatus};
pub use events::AppEvent;
pub use service::CommandSource;
pub use threshold::{FanGovernor, LearnedThreshold, ThermalFeedback};
pub use voice::{VoiceIntent, parse_phrase};
