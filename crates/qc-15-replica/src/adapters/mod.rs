//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound ports: updater signature checks, recipient
//! lookup and the checkpoint/status store.

mod memory_store;
mod recipient_registry;
#[cfg(feature = "rocksdb")]
mod rocksdb_store;
mod updater_authority;

pub use memory_store::InMemoryReplicaStore;
pub use recipient_registry::InMemoryRecipientRegistry;
#[cfg(feature = "rocksdb")]
pub use rocksdb_store::{RocksDbConfig, RocksDbReplicaStore};
#[cfg(any(test, feature = "test-utils"))]
pub use updater_authority::sign_checkpoint;
pub use updater_authority::{
    address_from_verifying_key, checkpoint_digest, domain_hash, eth_signed_message_hash,
    recover_signer, EcdsaUpdaterAuthority, EthAddress, DOMAIN_HASH_SUFFIX,
};
