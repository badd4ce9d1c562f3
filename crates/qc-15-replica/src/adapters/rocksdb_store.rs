//! # RocksDB Replica Store
//!
//! Durable `ReplicaStore` for production nodes.
//!
//! ## Column Families
//!
//! - `checkpoints` - root -> index (u32 big-endian)
//! - `messages` - leaf -> status byte
//! - `outcomes` - leaf -> bincode `DispatchOutcome`
//! - `metadata` - `latest` -> bincode `Checkpoint`
//!
//! Checkpoint writes go through a single `WriteBatch` so the root record and
//! the frontier can never diverge after a crash.

use rocksdb::{
    BlockBasedOptions, ColumnFamily, ColumnFamilyDescriptor, DBCompressionType, Options,
    WriteBatch, WriteOptions, DB,
};
use tracing::{debug, info};

use crate::domain::{
    invariant_status_transition, Checkpoint, DispatchOutcome, Hash, MessageStatus, ReplicaError,
    ReplicaResult,
};
use crate::ports::outbound::ReplicaStore;

/// Root -> index column family.
pub const CF_CHECKPOINTS: &str = "checkpoints";
/// Message status column family.
pub const CF_MESSAGES: &str = "messages";
/// Dispatch outcome column family.
pub const CF_OUTCOMES: &str = "outcomes";
/// Frontier and other singletons.
pub const CF_METADATA: &str = "metadata";

/// All column families used by the store.
pub const COLUMN_FAMILIES: &[&str] = &[CF_CHECKPOINTS, CF_MESSAGES, CF_OUTCOMES, CF_METADATA];

const LATEST_KEY: &[u8] = b"latest";

/// RocksDB tuning for the Replica store.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/replica".to_string(),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (small buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 4 * 1024 * 1024,
            write_buffer_size: 2 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

fn storage_err(context: &str, e: impl std::fmt::Display) -> ReplicaError {
    ReplicaError::Storage(format!("{}: {}", context, e))
}

/// RocksDB-backed checkpoint ledger and status register.
pub struct RocksDbReplicaStore {
    db: DB,
    config: RocksDbConfig,
}

impl RocksDbReplicaStore {
    /// Open or create the database.
    pub fn open(config: RocksDbConfig) -> ReplicaResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(DBCompressionType::Snappy);

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| storage_err("Failed to open RocksDB", e))?;

        info!(path = %config.path, "[qc-15] Replica store opened");
        Ok(Self { db, config })
    }

    fn cf(&self, name: &str) -> ReplicaResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| ReplicaError::Storage(format!("missing column family {}", name)))
    }

    fn write_opts(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.config.sync_writes);
        opts
    }
}

impl ReplicaStore for RocksDbReplicaStore {
    fn latest_checkpoint(&self) -> ReplicaResult<Option<Checkpoint>> {
        let raw = self
            .db
            .get_cf(self.cf(CF_METADATA)?, LATEST_KEY)
            .map_err(|e| storage_err("RocksDB get failed", e))?;
        raw.map(|bytes| {
            bincode::deserialize(&bytes).map_err(|e| storage_err("Corrupt frontier", e))
        })
        .transpose()
    }

    fn checkpoint_index(&self, root: &Hash) -> ReplicaResult<Option<u32>> {
        let raw = self
            .db
            .get_cf(self.cf(CF_CHECKPOINTS)?, root)
            .map_err(|e| storage_err("RocksDB get failed", e))?;
        raw.map(|bytes| {
            let bytes: [u8; 4] = bytes
                .as_slice()
                .try_into()
                .map_err(|_| ReplicaError::Storage("Corrupt checkpoint index".to_string()))?;
            Ok(u32::from_be_bytes(bytes))
        })
        .transpose()
    }

    fn put_checkpoint(&self, checkpoint: &Checkpoint) -> ReplicaResult<()> {
        let latest =
            bincode::serialize(checkpoint).map_err(|e| storage_err("Encode frontier", e))?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            self.cf(CF_CHECKPOINTS)?,
            checkpoint.root,
            checkpoint.index.to_be_bytes(),
        );
        batch.put_cf(self.cf(CF_METADATA)?, LATEST_KEY, latest);

        self.db
            .write_opt(batch, &self.write_opts())
            .map_err(|e| storage_err("RocksDB batch write failed", e))?;
        debug!(index = checkpoint.index, "[qc-15] Checkpoint persisted");
        Ok(())
    }

    fn message_status(&self, leaf: &Hash) -> ReplicaResult<MessageStatus> {
        let raw = self
            .db
            .get_cf(self.cf(CF_MESSAGES)?, leaf)
            .map_err(|e| storage_err("RocksDB get failed", e))?;
        match raw.as_deref() {
            None => Ok(MessageStatus::Unseen),
            Some([byte]) => MessageStatus::from_byte(*byte)
                .ok_or_else(|| ReplicaError::Storage(format!("Unknown status byte {}", byte))),
            Some(_) => Err(ReplicaError::Storage("Corrupt message status".to_string())),
        }
    }

    fn put_message_status(&self, leaf: &Hash, status: MessageStatus) -> ReplicaResult<()> {
        invariant_status_transition(leaf, self.message_status(leaf)?, status)?;
        self.db
            .put_cf_opt(
                self.cf(CF_MESSAGES)?,
                leaf,
                [status.to_byte()],
                &self.write_opts(),
            )
            .map_err(|e| storage_err("RocksDB put failed", e))
    }

    fn put_dispatch_outcome(&self, outcome: &DispatchOutcome) -> ReplicaResult<()> {
        let bytes = bincode::serialize(outcome).map_err(|e| storage_err("Encode outcome", e))?;
        self.db
            .put_cf_opt(
                self.cf(CF_OUTCOMES)?,
                outcome.message_hash,
                bytes,
                &self.write_opts(),
            )
            .map_err(|e| storage_err("RocksDB put failed", e))
    }

    fn dispatch_outcome(&self, leaf: &Hash) -> ReplicaResult<Option<DispatchOutcome>> {
        let raw = self
            .db
            .get_cf(self.cf(CF_OUTCOMES)?, leaf)
            .map_err(|e| storage_err("RocksDB get failed", e))?;
        raw.map(|bytes| {
            bincode::deserialize(&bytes).map_err(|e| storage_err("Corrupt outcome", e))
        })
        .transpose()
    }
}
