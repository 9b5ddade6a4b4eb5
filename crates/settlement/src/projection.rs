//! Incremental per-group balances read model.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use splitledger_core::{Amount, ExpenseId, ParticipantId};
use splitledger_events::{EventEnvelope, Projection};
use splitledger_expenses::{Expense, GroupEvent, GroupId};

use crate::balance::NetBalance;

/// Read model: net balances per group, maintained incrementally from group
/// events.
///
/// Rebuildable from the stream and idempotent: envelopes at or below a
/// group's last applied sequence number are skipped. At every point a
/// group's balances equal running [`crate::net_balances`] over its current
/// expenses - amendments and removals reverse the old expense before the new
/// state lands.
#[derive(Debug, Default)]
pub struct GroupBalances {
    groups: HashMap<GroupId, GroupLedger>,
}

#[derive(Debug, Default)]
struct GroupLedger {
    cents: BTreeMap<ParticipantId, i64>,
    /// How many expense lines reference each participant. Positions whose
    /// last reference disappears are pruned, so a rebuilt ledger matches
    /// batch aggregation exactly.
    references: BTreeMap<ParticipantId, u32>,
    expenses: HashMap<ExpenseId, Expense>,
    last_sequence: u64,
}

impl GroupLedger {
    fn apply_expense(&mut self, expense: &Expense, reverse: bool) {
        let sign: i64 = if reverse { -1 } else { 1 };
        *self.cents.entry(expense.payer_id).or_default() += sign * expense.total.cents();
        self.track(expense.payer_id, reverse);
        for share in &expense.shares {
            *self.cents.entry(share.participant_id).or_default() -= sign * share.amount.cents();
            self.track(share.participant_id, reverse);
        }
    }

    fn track(&mut self, id: ParticipantId, reverse: bool) {
        let count = self.references.entry(id).or_default();
        if reverse {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.references.remove(&id);
                self.cents.remove(&id);
            }
        } else {
            *count += 1;
        }
    }
}

impl GroupBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balances for a group, if any of its stream has been seen.
    pub fn balances(&self, group_id: GroupId) -> Option<NetBalance> {
        self.groups.get(&group_id).map(|ledger| {
            ledger
                .cents
                .iter()
                .map(|(&id, &cents)| (id, Amount::from_cents(cents)))
                .collect()
        })
    }
}

impl Projection for GroupBalances {
    type Ev = GroupEvent;

    fn apply(&mut self, envelope: &EventEnvelope<GroupEvent>) {
        let event = envelope.payload();
        let ledger = self.groups.entry(event.group_id()).or_default();
        if envelope.sequence_number() <= ledger.last_sequence {
            debug!(
                sequence = envelope.sequence_number(),
                last_applied = ledger.last_sequence,
                "skipping replayed group event"
            );
            return;
        }
        ledger.last_sequence = envelope.sequence_number();

        match event {
            GroupEvent::ExpenseRecorded(e) => {
                ledger.apply_expense(&e.expense, false);
                ledger.expenses.insert(e.expense.id, e.expense.clone());
            }
            GroupEvent::ExpenseAmended(e) => {
                if let Some(old) = ledger.expenses.remove(&e.expense.id) {
                    ledger.apply_expense(&old, true);
                }
                ledger.apply_expense(&e.expense, false);
                ledger.expenses.insert(e.expense.id, e.expense.clone());
            }
            GroupEvent::ExpenseRemoved(e) => {
                if let Some(old) = ledger.expenses.remove(&e.expense_id) {
                    ledger.apply_expense(&old, true);
                }
            }
            // Roster and lifecycle events carry no money.
            GroupEvent::GroupCreated(_)
            | GroupEvent::ParticipantAdded(_)
            | GroupEvent::ParticipantRemoved(_)
            | GroupEvent::GroupClosed(_) => {}
        }
    }
}
