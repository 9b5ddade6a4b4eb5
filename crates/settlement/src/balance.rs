//! Net-balance aggregation over expenses.

use std::collections::BTreeMap;

use splitledger_core::{Amount, ParticipantId};
use splitledger_expenses::Expense;

use crate::error::SettlementError;

/// Per-participant net position across a set of expenses.
///
/// Positive means the participant is owed money overall, negative that they
/// owe. Only participants that appeared in at least one expense (as payer or
/// share holder) are present. Keys iterate in identifier order, which keeps
/// downstream output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetBalance(BTreeMap<ParticipantId, Amount>);

impl NetBalance {
    /// The participant's net position; zero when absent.
    pub fn balance(&self, participant_id: ParticipantId) -> Amount {
        self.0.get(&participant_id).copied().unwrap_or(Amount::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, Amount)> + '_ {
        self.0.iter().map(|(&id, &amount)| (id, amount))
    }

    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every position is within [`Amount::EPSILON`] of zero.
    pub fn is_settled(&self) -> bool {
        self.0.values().all(|amount| amount.abs() <= Amount::EPSILON)
    }
}

impl FromIterator<(ParticipantId, Amount)> for NetBalance {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, Amount)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reduce a set of expenses to a per-participant net position.
///
/// Credits each payer with the expense total and debits each share's
/// participant with the owed amount; a payer who also holds a share cancels
/// against themselves. Accumulation happens in widened integer cents so long
/// expense lists cannot drift or overflow mid-sum. Each expense is
/// re-validated on the way in even though the group aggregate already
/// checked it at intake; the engine trusts nobody about reconciliation.
pub fn net_balances(expenses: &[Expense]) -> Result<NetBalance, SettlementError> {
    let mut cents: BTreeMap<ParticipantId, i128> = BTreeMap::new();

    for expense in expenses {
        validate_expense(expense)?;

        *cents.entry(expense.payer_id).or_default() += expense.total.cents() as i128;
        for share in &expense.shares {
            *cents.entry(share.participant_id).or_default() -= share.amount.cents() as i128;
        }
    }

    let mut balances = BTreeMap::new();
    for (id, value) in cents {
        // A position outside the representable range cannot be settled; report
        // it as the ledger invariant failure it is.
        let value = i64::try_from(value).map_err(|_| SettlementError::UnbalancedLedger {
            residual: clamped(value),
        })?;
        balances.insert(id, Amount::from_cents(value));
    }
    Ok(NetBalance(balances))
}

fn validate_expense(expense: &Expense) -> Result<(), SettlementError> {
    if expense.payer_id.is_nil() {
        return Err(SettlementError::EmptyParticipant {
            expense_id: Some(expense.id),
            participant_id: expense.payer_id,
        });
    }

    let mut share_total: i128 = 0;
    for share in &expense.shares {
        if share.participant_id.is_nil() {
            return Err(SettlementError::EmptyParticipant {
                expense_id: Some(expense.id),
                participant_id: share.participant_id,
            });
        }
        share_total += share.amount.cents() as i128;
    }

    let drift = share_total - expense.total.cents() as i128;
    if drift.abs() > Amount::EPSILON.cents() as i128 {
        return Err(SettlementError::MalformedExpense {
            expense_id: expense.id,
            expense_total: expense.total,
            share_total: clamped(share_total),
        });
    }
    Ok(())
}

fn clamped(cents: i128) -> Amount {
    Amount::from_cents(cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
}
