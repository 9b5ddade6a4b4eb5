//! Tracing, logging, metrics (shared setup).
//!
//! The engine crates emit `tracing` events at their service-facing seams;
//! whatever embeds them (a server, a worker, a test binary) calls [`init`]
//! once at startup to get structured output.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::{init, init_with_filter};
