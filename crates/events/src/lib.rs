//! `splitledger-events` — domain event abstractions.
//!
//! The [`Event`] trait describes what aggregates emit, [`EventEnvelope`] is
//! the stream unit an embedding service would persist, and [`Projection`] is
//! the contract for read models built from the stream. Storage and transport
//! of envelopes are infrastructure concerns and live outside this workspace.

pub mod envelope;
pub mod event;
pub mod projection;

pub use envelope::EventEnvelope;
pub use event::Event;
pub use projection::Projection;
