//! Expense group domain (pure domain logic: no IO, no persistence concerns).
//!
//! An [`ExpenseGroup`] is one gathering of people sharing costs - a trip, a
//! dinner, a household. It owns the participant roster and the recorded
//! expenses, and enforces the intake invariants (shares reconcile to totals,
//! only roster members pay or owe, closed groups are immutable).

pub mod expense;
pub mod group;

pub use expense::{Expense, Participant, Share};
pub use group::{
    AddParticipant, AmendExpense, CloseGroup, CreateGroup, ExpenseGroup, GroupCommand, GroupEvent,
    GroupId, GroupStatus, RecordExpense, RemoveExpense, RemoveParticipant,
};
