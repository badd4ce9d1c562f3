//! Events emitted by the Replica.

use serde::{Deserialize, Serialize};

use crate::domain::{Checkpoint, DispatchOutcome};

/// Event published on every accepted checkpoint and every dispatch attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplicaEvent {
    /// A signed checkpoint advanced the frontier.
    CheckpointAccepted(Checkpoint),
    /// A message was processed; `success` is false for failed deliveries.
    MessageProcessed(DispatchOutcome),
}

impl ReplicaEvent {
    /// Short event name for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckpointAccepted(_) => "checkpoint_accepted",
            Self::MessageProcessed(_) => "message_processed",
        }
    }
}
