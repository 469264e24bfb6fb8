//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements            | Connects to                 |
//! |---------------|-----------------------|-----------------------------|
//! | `log_sink`    | EventSink             | `log` facade                |
//! | `config_file` | ConfigPort            | JSON file on disk           |
//! | `console`     | Recognizer, Speaker   | stdin lines / log output    |
//! | `serial`      | Transport, CommandLink| `serialport` device         |
//!
//! The telemetry store's [`ReadingSink`](crate::app::ports::ReadingSink)
//! lives in [`crate::store`].

pub mod config_file;
pub mod console;
pub mod log_sink;
#[cfg(feature = "host")]
pub mod serial;
