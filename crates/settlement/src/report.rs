//! Boundary report: the settlement with display names joined in.
//!
//! The engine keys everything by participant id; presentation wants names.
//! The join happens here, at the edge, and nowhere deeper.

use std::collections::BTreeMap;

use serde::Serialize;

use splitledger_core::{Amount, ParticipantId};
use splitledger_expenses::{GroupId, Participant};

use crate::error::SettlementError;
use crate::settle::Settlement;

/// One settling repayment with display names attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferEntry {
    pub from_id: ParticipantId,
    pub from_name: String,
    pub to_id: ParticipantId,
    pub to_name: String,
    pub amount: Amount,
}

/// Wire-facing balance report for one group: summary keyed by display name,
/// transfers in settling order. Amounts serialize with exactly two
/// fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    pub group_id: GroupId,
    pub summary: BTreeMap<String, Amount>,
    pub transfers: Vec<TransferEntry>,
}

impl BalanceReport {
    /// Join roster display names onto a settlement.
    ///
    /// Fails with [`SettlementError::EmptyParticipant`] when a balance or
    /// transfer references a participant missing from `roster`; whether to
    /// filter such entries instead is the caller's policy, not the engine's.
    /// Roster names are assumed unique within a group (they key the summary).
    pub fn for_group(
        group_id: GroupId,
        settlement: &Settlement,
        roster: &[Participant],
    ) -> Result<Self, SettlementError> {
        let names: BTreeMap<ParticipantId, &str> =
            roster.iter().map(|p| (p.id, p.name.as_str())).collect();
        let resolve = |id: ParticipantId| {
            names
                .get(&id)
                .copied()
                .ok_or(SettlementError::EmptyParticipant {
                    expense_id: None,
                    participant_id: id,
                })
        };

        let mut summary = BTreeMap::new();
        for (id, amount) in settlement.summary.iter() {
            summary.insert(resolve(id)?.to_string(), amount);
        }

        let mut transfers = Vec::with_capacity(settlement.transfers.len());
        for transfer in &settlement.transfers {
            transfers.push(TransferEntry {
                from_id: transfer.from,
                from_name: resolve(transfer.from)?.to_string(),
                to_id: transfer.to,
                to_name: resolve(transfer.to)?.to_string(),
                amount: transfer.amount,
            });
        }

        Ok(Self {
            group_id,
            summary,
            transfers,
        })
    }
}
