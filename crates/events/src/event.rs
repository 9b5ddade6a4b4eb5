use chrono::{DateTime, Utc};

/// A fact recorded by an aggregate.
///
/// Events are append-only, immutable data: once emitted they are never
/// edited, only superseded by later events. The dotted type name is the
/// stable contract a stored stream is replayed against; breaking payload
/// changes bump [`Event::version`] instead of renaming.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable dotted name of the concrete event
    /// (e.g. "expenses.group.expense_recorded").
    fn event_type(&self) -> &'static str;

    /// Schema version of this event type.
    fn version(&self) -> u32;

    /// Business time: when the fact happened, not when it was stored.
    fn occurred_at(&self) -> DateTime<Utc>;
}
