//! Shared-expense settlement engine (pure domain logic: no IO, no
//! persistence, no transport concerns).
//!
//! Two operations do the real work: [`net_balances`] reduces a set of
//! expenses to a per-participant net position, and [`simplify`] reduces
//! those positions to a short list of pairwise repayments. [`settle`]
//! composes the two; [`BalanceReport`] joins display names on at the
//! boundary, and [`GroupBalances`] keeps the same numbers incrementally
//! from the group event stream.

pub mod balance;
pub mod error;
pub mod projection;
pub mod report;
pub mod settle;
pub mod simplify;

pub use balance::{NetBalance, net_balances};
pub use error::SettlementError;
pub use projection::GroupBalances;
pub use report::{BalanceReport, TransferEntry};
pub use settle::{Settlement, settle};
pub use simplify::{Transfer, simplify};
