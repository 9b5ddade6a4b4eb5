//! Strongly-typed identifiers used across the domain.
//!
//! Each id is a UUID newtype so a participant can never stand in for an
//! expense (or vice versa) at a function boundary.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a participant (a person taking part in shared expenses).
///
/// Ordering follows the underlying UUID bytes; the settlement engine relies
/// on it for deterministic tie-breaking.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

/// Identifier of a single recorded expense.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

/// Identifier of an aggregate root.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateId(Uuid);

macro_rules! uuid_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Mint a fresh, time-ordered (UUIDv7) identifier. Tests that
            /// care about ordering should construct ids explicitly instead.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Whether this is the all-zero id. Dynamic-shape JSON from
            /// collaborators maps absent references to the nil UUID, which
            /// the engine must treat as unresolvable rather than as a
            /// participant.
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match Uuid::from_str(s) {
                    Ok(uuid) => Ok(Self(uuid)),
                    Err(e) => Err(DomainError::invalid_id(format!("{} {s:?}: {e}", $name))),
                }
            }
        }
    };
}

uuid_id!(ParticipantId, "participant id");
uuid_id!(ExpenseId, "expense id");
uuid_id!(AggregateId, "aggregate id");
