//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a subsystem against the
//! recording adapters in `mock_hw`.  Everything runs on the host with no
//! serial port, database or audio device.

mod command_source_tests;
mod controller_tests;
mod mock_hw;
mod pipeline_tests;
