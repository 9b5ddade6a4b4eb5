//! Settlement error taxonomy.

use thiserror::Error;

use splitledger_core::{Amount, ExpenseId, ParticipantId};

/// Settlement failures.
///
/// All variants are non-retryable data-integrity failures: the engine either
/// returns a complete, internally consistent result or none at all. The
/// surrounding service decides how to map them (the first two point at bad
/// input upstream, the last at a defect).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// An expense's shares do not reconcile to its total beyond the one-cent
    /// tolerance.
    #[error(
        "expense {expense_id}: shares sum to {share_total} but the expense total is {expense_total}"
    )]
    MalformedExpense {
        expense_id: ExpenseId,
        expense_total: Amount,
        share_total: Amount,
    },

    /// A payer, share, or balance references a participant that cannot be
    /// resolved - a nil id from a collaborator's optional field, or an id
    /// missing from the roster at the report boundary.
    #[error("unresolvable reference to participant {participant_id}")]
    EmptyParticipant {
        /// The expense carrying the reference, when there is one.
        expense_id: Option<ExpenseId>,
        participant_id: ParticipantId,
    },

    /// The net balances do not sum to zero, so no transfer list can settle
    /// them. The aggregator and simplifier disagree on totals: a defect, not
    /// a user error.
    #[error("ledger is unbalanced: residual {residual} after settling")]
    UnbalancedLedger { residual: Amount },
}
