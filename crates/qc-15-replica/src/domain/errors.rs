//! # Domain Errors
//!
//! Error types for the Replica.
//!
//! Every variant of [`ReplicaError`] aborts the triggering call with no state
//! change. Recipient failures are not Replica errors: they are captured as
//! [`HandleError`] and recorded in the dispatch outcome.

use thiserror::Error;

use super::value_objects::MessageStatus;

/// Hash type (32-byte Keccak-256).
pub type Hash = [u8; 32];

/// Address type (32-byte, left-padded on 20-byte chains).
pub type Address = [u8; 32];

/// Replica error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicaError {
    /// Checkpoint index does not advance the frontier.
    #[error("Stale checkpoint: index {index} <= frontier {frontier}")]
    StaleCheckpoint {
        /// Submitted index
        index: u32,
        /// Highest accepted index
        frontier: u32,
    },

    /// Updater signature does not verify for the remote domain.
    #[error("Invalid updater signature")]
    InvalidSignature,

    /// Merkle proof has the wrong shape.
    #[error("Malformed proof: expected {expected} nodes, got {got}")]
    MalformedProof {
        /// Required proof length
        expected: usize,
        /// Supplied proof length
        got: usize,
    },

    /// Encoded message is shorter than the fixed header.
    #[error("Malformed message: {len} bytes")]
    MalformedMessage {
        /// Length of the supplied encoding
        len: usize,
    },

    /// Message is not addressed to this domain.
    #[error("Wrong destination domain: expected {expected}, got {got}")]
    WrongDomain {
        /// Local domain
        expected: u32,
        /// Message destination
        got: u32,
    },

    /// Message is not in the Proven state.
    #[error("Message not proven: {}", hex::encode(.0))]
    NotProven(Hash),

    /// Message was already proven (or processed).
    #[error("Message already proven: {}", hex::encode(.0))]
    AlreadyProven(Hash),

    /// A `process` call is already in flight on this Replica.
    #[error("Reentrant process call")]
    Reentrant,

    /// Caller did not supply enough gas to dispatch and finish bookkeeping.
    #[error("Insufficient gas: {available} < {required}")]
    InsufficientBudget {
        /// process_gas + reserve_gas
        required: u64,
        /// Caller's remaining gas
        available: u64,
    },

    /// Status write would skip a state or move backwards.
    #[error("Illegal status transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Message whose status was written
        leaf: Hash,
        /// Stored status
        from: MessageStatus,
        /// Requested status
        to: MessageStatus,
    },

    /// `prove_and_process` could not prove the message.
    #[error("Proof failed for message {}", hex::encode(.0))]
    ProofFailed(Hash),

    /// The delivery task ended without reporting an outcome.
    #[error("Delivery task failed: {0}")]
    Delivery(String),

    /// Storage adapter failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for Replica operations.
pub type ReplicaResult<T> = Result<T, ReplicaError>;

/// Failure reported by a message recipient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    /// Recipient exhausted its forwarded gas.
    #[error("Out of gas")]
    OutOfGas,

    /// Recipient rejected the message, with optional revert data.
    #[error("Reverted ({} bytes)", .0.len())]
    Revert(Vec<u8>),
}

impl HandleError {
    /// Data the recipient returned alongside the failure.
    pub fn return_data(&self) -> &[u8] {
        match self {
            Self::OutOfGas => &[],
            Self::Revert(data) => data,
        }
    }
}
