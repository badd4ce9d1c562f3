//! # Domain Invariants
//!
//! Business rules for the Replica.

use super::errors::{Hash, ReplicaError};
use super::value_objects::{Checkpoint, MessageStatus};

/// Depth of the remote merkle tree (up to 2^32 leaves).
pub const TREE_DEPTH: usize = 32;

/// Bytes of recipient return data kept per dispatch.
pub const MAX_RETURN_DATA: usize = 256;

/// Smallest `process_gas` that lets a recipient do meaningful work.
pub const MIN_PROCESS_GAS: u64 = 850_000;

/// Smallest `reserve_gas` that covers bookkeeping after the recipient returns.
pub const MIN_RESERVE_GAS: u64 = 15_000;

/// Invariant: checkpoints strictly advance the frontier.
///
/// With no frontier yet, any index is accepted.
pub fn invariant_checkpoint_advances(
    index: u32,
    frontier: Option<&Checkpoint>,
) -> Result<(), ReplicaError> {
    match frontier {
        Some(latest) if index <= latest.index => Err(ReplicaError::StaleCheckpoint {
            index,
            frontier: latest.index,
        }),
        _ => Ok(()),
    }
}

/// Invariant: a message is proven at most once.
pub fn invariant_unseen(leaf: &Hash, status: MessageStatus) -> Result<(), ReplicaError> {
    if status != MessageStatus::Unseen {
        return Err(ReplicaError::AlreadyProven(*leaf));
    }
    Ok(())
}

/// Invariant: only proven messages are processed.
pub fn invariant_proven(leaf: &Hash, status: MessageStatus) -> Result<(), ReplicaError> {
    if status != MessageStatus::Proven {
        return Err(ReplicaError::NotProven(*leaf));
    }
    Ok(())
}

/// Invariant: a status write moves exactly one step forward.
pub fn invariant_status_transition(
    leaf: &Hash,
    from: MessageStatus,
    to: MessageStatus,
) -> Result<(), ReplicaError> {
    if !from.can_transition_to(to) {
        return Err(ReplicaError::IllegalTransition {
            leaf: *leaf,
            from,
            to,
        });
    }
    Ok(())
}

/// Invariant: messages are only delivered on their destination domain.
pub fn invariant_destination(local_domain: u32, destination: u32) -> Result<(), ReplicaError> {
    if destination != local_domain {
        return Err(ReplicaError::WrongDomain {
            expected: local_domain,
            got: destination,
        });
    }
    Ok(())
}

/// Invariant: the caller funds the recipient call and the bookkeeping after it.
pub fn invariant_sufficient_budget(
    available: u64,
    process_gas: u64,
    reserve_gas: u64,
) -> Result<(), ReplicaError> {
    let required = process_gas.saturating_add(reserve_gas);
    if available < required {
        return Err(ReplicaError::InsufficientBudget {
            required,
            available,
        });
    }
    Ok(())
}
