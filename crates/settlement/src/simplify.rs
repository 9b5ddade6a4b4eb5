//! Greedy debt simplification.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use splitledger_core::{Amount, ParticipantId};

use crate::balance::NetBalance;
use crate::error::SettlementError;

/// One directed repayment: `from` (the debtor) pays `to` (the creditor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Amount,
}

/// Reduce net balances to a short list of pairwise transfers.
///
/// Greedy matching: repeatedly pair the largest outstanding debtor with the
/// largest outstanding creditor, ties broken by ascending participant id so
/// output is reproducible. This does not always reach the theoretical
/// minimum transfer count (minimum-cardinality settlement is NP-hard); it is
/// the standard practical reduction, O(n log n) on the two heaps, and always
/// correct in amounts. Participants already within [`Amount::EPSILON`] of
/// zero are left alone.
///
/// An empty or already-settled map yields an empty list. Balances that do
/// not sum to ~zero cannot be settled and surface as
/// [`SettlementError::UnbalancedLedger`].
pub fn simplify(balances: &NetBalance) -> Result<Vec<Transfer>, SettlementError> {
    let eps = Amount::EPSILON.cents();

    // Max-heaps keyed by (outstanding cents, Reverse(id)): biggest amount
    // first, smallest id on ties.
    let mut debtors: BinaryHeap<(i64, Reverse<ParticipantId>)> = BinaryHeap::new();
    let mut creditors: BinaryHeap<(i64, Reverse<ParticipantId>)> = BinaryHeap::new();
    for (id, amount) in balances.iter() {
        let cents = amount.cents();
        if cents > eps {
            creditors.push((cents, Reverse(id)));
        } else if cents < -eps {
            debtors.push((-cents, Reverse(id)));
        }
    }

    let mut transfers = Vec::new();
    loop {
        let Some(&(debt, Reverse(debtor))) = debtors.peek() else {
            break;
        };
        let Some(&(credit, Reverse(creditor))) = creditors.peek() else {
            break;
        };
        debtors.pop();
        creditors.pop();

        let amount = debt.min(credit);
        transfers.push(Transfer {
            from: debtor,
            to: creditor,
            amount: Amount::from_cents(amount),
        });

        let debt_left = debt - amount;
        if debt_left > eps {
            debtors.push((debt_left, Reverse(debtor)));
        }
        let credit_left = credit - amount;
        if credit_left > eps {
            creditors.push((credit_left, Reverse(creditor)));
        }
    }

    // One side drained; whatever the other still owes (or is owed) beyond
    // epsilon means the input never summed to zero.
    let residual: i64 = debtors.iter().map(|&(cents, _)| cents).sum::<i64>()
        + creditors.iter().map(|&(cents, _)| cents).sum::<i64>();
    if residual > eps {
        return Err(SettlementError::UnbalancedLedger {
            residual: Amount::from_cents(residual),
        });
    }

    Ok(transfers)
}
