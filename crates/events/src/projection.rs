use crate::{Event, EventEnvelope};

/// A projection builds a read model from an append-only event stream.
///
/// Read models are **disposable**: they can be deleted and rebuilt from
/// events at any time. Events are the source of truth; projections are
/// optimized views over them.
///
/// ## Idempotency
///
/// Applying the same envelope twice must produce the same result: events can
/// be redelivered (at-least-once delivery, replays, crash recovery).
/// Tracking per-stream sequence numbers and skipping anything already seen
/// is the usual strategy.
///
/// ## Persistence
///
/// This trait doesn't define how read models are stored - that's an
/// infrastructure concern. An in-memory map is enough for tests and for
/// embedding in a single-process service.
pub trait Projection {
    type Ev: Event;

    /// Apply a single event to the projection, updating the read model.
    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>);
}
