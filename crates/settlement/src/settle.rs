//! The composed balance operation a surrounding service calls.

use tracing::debug;

use splitledger_expenses::Expense;

use crate::balance::{NetBalance, net_balances};
use crate::error::SettlementError;
use crate::simplify::{Transfer, simplify};

/// Net balances plus the transfers that settle them.
///
/// Applying every transfer (debtor pays, creditor receives) drives each
/// summary position within [`splitledger_core::Amount::EPSILON`] of zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub summary: NetBalance,
    pub transfers: Vec<Transfer>,
}

/// Aggregate a set of expenses and reduce the result to pairwise repayments.
///
/// This is the whole engine in one call: the equivalent of the balance
/// lookup a client performs for one expense group. Either a complete,
/// internally consistent [`Settlement`] comes back or an error; never a
/// partial result.
pub fn settle(expenses: &[Expense]) -> Result<Settlement, SettlementError> {
    let summary = net_balances(expenses)?;
    let transfers = simplify(&summary)?;
    debug!(
        expenses = expenses.len(),
        participants = summary.len(),
        transfers = transfers.len(),
        "settled expense set"
    );
    Ok(Settlement { summary, transfers })
}
