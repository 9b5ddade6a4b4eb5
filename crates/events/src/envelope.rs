use serde::{Deserialize, Serialize};
use uuid::Uuid;

use splitledger_core::AggregateId;

/// One stream position: an event plus the metadata an embedding service
/// needs to append, replay, and deduplicate it.
///
/// Streams are per aggregate and append-only; `sequence_number` starts at 1
/// and grows by one per envelope. Read models use it to skip redelivered
/// envelopes. The envelope id is minted at wrap time and is only ever used
/// as an opaque dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    aggregate_id: AggregateId,
    aggregate_type: String,
    sequence_number: u64,
    payload: E,
}

impl<E> EventEnvelope<E> {
    /// Wrap `payload` for position `sequence_number` (1-based) in the given
    /// aggregate's stream.
    pub fn new(
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            sequence_number,
            payload,
        }
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
