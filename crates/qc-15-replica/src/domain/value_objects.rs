//! # Domain Value Objects
//!
//! Immutable value types for the Replica.

use super::errors::Hash;
use serde::{Deserialize, Serialize};

/// Per-message status register.
///
/// Transitions only move forward: `Unseen -> Proven -> Processed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageStatus {
    /// Never proven.
    #[default]
    Unseen,
    /// Inclusion verified against an accepted root, not yet dispatched.
    Proven,
    /// Dispatch attempted and recorded. Terminal.
    Processed,
}

impl MessageStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: MessageStatus) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::Proven) | (Self::Proven, Self::Processed)
        )
    }

    /// Single-byte storage encoding.
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Unseen => 0,
            Self::Proven => 1,
            Self::Processed => 2,
        }
    }

    /// Decode the storage encoding.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Unseen),
            1 => Some(Self::Proven),
            2 => Some(Self::Processed),
            _ => None,
        }
    }
}

/// Commitment to the remote tree: `root` covered `index + 1` leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Merkle root of the remote tree.
    pub root: Hash,
    /// Index of the last leaf covered by `root`.
    pub index: u32,
}

impl Checkpoint {
    /// Create a new checkpoint.
    pub fn new(root: Hash, index: u32) -> Self {
        Self { root, index }
    }
}

/// Checkpoint together with the updater's signature over it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCheckpoint {
    /// Signed commitment.
    pub checkpoint: Checkpoint,
    /// Opaque signature bytes, interpreted by the updater authority.
    pub signature: Vec<u8>,
}
