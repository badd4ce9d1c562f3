//! # QC-15 Cross-Chain Replica
//!
//! Destination-side half of an optimistic cross-chain message bridge.
//!
//! **Subsystem ID:** 15
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Mirror the merkle root of a remote domain's outgoing-message tree and
//! deliver each committed message to its local recipient exactly once:
//! - Updater-signed checkpoints with a strictly advancing index
//! - Depth-32 Keccak merkle proofs against any root ever accepted
//! - Bounded dispatch: fixed gas ceiling, deadline, 256-byte return cap
//!
//! ## Security Features
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Monotonic frontier | Stale or rolled-back checkpoints are rejected |
//! | Domain-bound signatures | Updater signs `(remote_domain, root, index)` |
//! | Status before dispatch | Message is Processed before the recipient runs |
//! | Reentrancy guard | One `process` in flight per Replica |
//! | Gas reserve | Caller keeps `reserve_gas` even if the recipient burns all |
//! | Return cap | Only the first 256 bytes of recipient data are kept |
//!
//! ## Module Structure
//!
//! ```text
//! qc-15-replica/
//! ├── domain/          # Message, Checkpoint, MessageStatus, GasMeter, errors
//! ├── algorithms/      # Merkle branch root, message codec
//! ├── ports/           # ReplicaApi (inbound) + authority/recipient/store (outbound)
//! ├── adapters/        # ECDSA authority, in-memory + RocksDB stores, registry
//! ├── application/     # ReplicaService, Dispatcher, ReentrancyGuard
//! ├── events.rs        # ReplicaEvent
//! ├── metrics.rs       # Prometheus metrics (feature = "metrics")
//! └── config.rs        # ReplicaConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod events;
pub mod metrics;
pub mod ports;

// Re-exports
pub use adapters::{EcdsaUpdaterAuthority, InMemoryRecipientRegistry, InMemoryReplicaStore};
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbReplicaStore};
pub use algorithms::{
    branch_root, decode_message, encode_message, keccak256, message_leaf, zero_hashes,
    MESSAGE_HEADER_LEN,
};
pub use application::{Dispatcher, ReplicaService};
pub use config::{ConfigError, ReplicaConfig};
pub use domain::{
    Address, Checkpoint, DispatchOutcome, GasMeter, HandleError, Hash, Message, MessageStatus,
    ReplicaError, ReplicaResult, SignedCheckpoint, MAX_RETURN_DATA, MIN_PROCESS_GAS,
    MIN_RESERVE_GAS, TREE_DEPTH,
};
pub use events::ReplicaEvent;
pub use ports::{
    MessageRecipient, MockUpdaterAuthority, RecipientRegistry, ReplicaApi, ReplicaStore,
    UpdaterAuthority,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
