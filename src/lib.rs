//! EnviroControl library.
//!
//! Three cooperating programs share this crate:
//!
//! ```text
//!  ┌────────────┐  t,h,light\n  ┌─────────┐  t,h,light\n  ┌────────────────┐
//!  │ Controller │ ────────────▶ │ Gateway │ ────────────▶ │ Command source │──▶ store
//!  │  (node)    │ ◀──────────── │  relay  │ ◀──────────── │  (dashboard)   │
//!  └────────────┘  P N L l A    └─────────┘  P N L l A    └────────────────┘
//! ```
//!
//! The pure-logic modules ([`controller`], [`gateway`], [`app`],
//! [`protocol`]) build without the `host` feature; the SQLite store and the
//! serial adapter need it.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod protocol;
#[cfg(feature = "host")]
pub mod store;
