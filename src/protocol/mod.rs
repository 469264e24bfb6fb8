//! Wire protocol shared by the controller, the gateway and the host.
//!
//! ```text
//!  Controller ──"t,h,light\n"──▶ Gateway ──▶ Host
//!  Controller ◀──── 'P' 'N' 'L' 'l' 'A' ──── Host
//! ```
//!
//! Two message kinds, no framing beyond the line terminator, no
//! acknowledgements.

pub mod command;
pub mod line;
pub mod transport;

pub use command::CommandByte;
pub use line::{LineDecoder, MAX_LINE_LEN, SensorReading, format_line, parse_line};
pub use transport::{MemoryTransport, NullTransport, Transport};
