//! Process-wide tracing setup for binaries embedding the SDK.
//!
//! The library crates only emit `tracing` events; installing a subscriber is
//! left to the application. This crate offers the default one.

/// Subscriber construction (filters, formats).
pub mod tracing;

pub use self::tracing::{LogFormat, init, init_with};
