use serde::{Deserialize, Serialize};

use splitledger_core::{Amount, DomainResult, Entity, ExpenseId, ParticipantId, ValueObject};

/// A person taking part in shared expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Display name, joined onto balance reports at the boundary. Expected to
    /// be unique within a group (the original system used account usernames).
    pub name: String,
}

impl Entity for Participant {
    type Id = ParticipantId;

    fn id(&self) -> &ParticipantId {
        &self.id
    }
}

/// The portion of one expense attributed to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub participant_id: ParticipantId,
    /// Non-negative amount this participant owes toward the expense.
    pub amount: Amount,
}

impl ValueObject for Share {}

/// One paid expense, split among participants.
///
/// The payer advanced the full amount; each share records what one
/// participant owes toward it. The payer need not appear among the shares
/// (they may have paid entirely on others' behalf); when they do, their own
/// share cancels against the credit for paying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub payer_id: ParticipantId,
    /// Positive total, equal to the sum of the shares within
    /// [`Amount::EPSILON`].
    pub total: Amount,
    pub description: Option<String>,
    pub shares: Vec<Share>,
}

impl Expense {
    /// Sum of the share amounts (checked; a sum that overflows the
    /// representable range is a validation error).
    pub fn share_total(&self) -> DomainResult<Amount> {
        self.shares
            .iter()
            .try_fold(Amount::ZERO, |acc, share| acc.checked_add(share.amount))
    }

    /// Whether the shares reconcile to the total within [`Amount::EPSILON`].
    pub fn is_reconciled(&self) -> DomainResult<bool> {
        let diff = self.share_total()?.checked_sub(self.total)?;
        Ok(diff.abs() <= Amount::EPSILON)
    }
}
