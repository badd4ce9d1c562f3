//! # Domain Entities
//!
//! Core entities for the Replica.

use super::errors::{Address, Hash, HandleError};
use serde::{Deserialize, Serialize};

/// Cross-chain message, as committed to the remote tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Encoding version.
    pub version: u16,
    /// Domain the message was dispatched from.
    pub origin_domain: u32,
    /// Sender on the origin domain.
    pub sender: Address,
    /// Per-origin sequence number.
    pub nonce: u32,
    /// Domain the message is addressed to.
    pub destination_domain: u32,
    /// Recipient on the destination domain.
    pub recipient: Address,
    /// Opaque payload handed to the recipient.
    pub body: Vec<u8>,
}

/// Recorded result of the single delivery attempt for a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Leaf hash of the dispatched message.
    pub message_hash: Hash,
    /// Whether the recipient completed without failure.
    pub success: bool,
    /// First bytes of the recipient's return or revert data.
    pub return_data: Vec<u8>,
    /// Gas charged to the caller for the recipient call.
    pub gas_used: u64,
}

/// Computation budget.
///
/// Charging past the limit consumes everything that is left and fails,
/// so an exhausted meter always reports `remaining() == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    used: u64,
}

impl GasMeter {
    /// Create a meter with `limit` gas available.
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    /// Total gas this meter started with.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Gas consumed so far.
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Gas still available.
    pub fn remaining(&self) -> u64 {
        self.limit - self.used
    }

    /// Consume `amount` gas.
    pub fn charge(&mut self, amount: u64) -> Result<(), HandleError> {
        if amount > self.remaining() {
            self.used = self.limit;
            return Err(HandleError::OutOfGas);
        }
        self.used += amount;
        Ok(())
    }

    /// Consume whatever is left.
    pub fn exhaust(&mut self) {
        self.used = self.limit;
    }
}
