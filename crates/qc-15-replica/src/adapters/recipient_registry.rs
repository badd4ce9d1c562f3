//! In-Memory Recipient Registry
//!
//! Maps recipient addresses on the local domain to their handlers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::domain::Address;
use crate::ports::outbound::{MessageRecipient, RecipientRegistry};

/// Registry of deployed recipients.
#[derive(Default)]
pub struct InMemoryRecipientRegistry {
    recipients: RwLock<HashMap<Address, Arc<dyn MessageRecipient>>>,
}

impl InMemoryRecipientRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a handler at `address`, replacing any previous one.
    pub fn register(&self, address: Address, recipient: Arc<dyn MessageRecipient>) {
        info!(address = %hex::encode(address), "[qc-15] Recipient registered");
        self.recipients.write().insert(address, recipient);
    }

    /// Remove the handler at `address`. Returns whether one was present.
    pub fn remove(&self, address: &Address) -> bool {
        self.recipients.write().remove(address).is_some()
    }

    /// Number of registered recipients.
    pub fn len(&self) -> usize {
        self.recipients.read().len()
    }

    /// Whether no recipients are registered.
    pub fn is_empty(&self) -> bool {
        self.recipients.read().is_empty()
    }
}

impl RecipientRegistry for InMemoryRecipientRegistry {
    fn recipient(&self, address: &Address) -> Option<Arc<dyn MessageRecipient>> {
        self.recipients.read().get(address).cloned()
    }
}
