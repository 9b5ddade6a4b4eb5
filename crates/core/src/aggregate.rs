//! Aggregate traits: decide with `handle`, evolve with `apply`.

/// Aggregate root marker + minimal interface.
///
/// Deliberately small: how state transitions are modeled (pure functions,
/// event application) is the aggregate's own business, and nothing here
/// knows about storage or transport.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state; for
    /// event-sourced aggregates this is the count of applied events.
    fn version(&self) -> u64;
}

/// Pure, deterministic aggregate execution.
///
/// `handle` inspects current state and either rejects the command or
/// returns the events that record it (an expense group checks its roster
/// and share sums, then emits `ExpenseRecorded`). `apply` folds one event
/// into state and nothing else - no IO, no side effects, no clock reads.
/// Replaying the same events therefore always rebuilds the same aggregate.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event; keep `version()` in step
    /// (+1 per applied event).
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events a command produces. Must not mutate state; state
    /// only ever changes through `apply`.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}
