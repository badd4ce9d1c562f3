//! # Persistence Flows
//!
//! Replica state on RocksDB survives a restart: the frontier, accepted roots
//! and processed statuses are all reloaded, so a restart never reopens a
//! replay window.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use qc_15_replica::{
        Checkpoint, InMemoryRecipientRegistry, MessageStatus, ReplicaApi, ReplicaError,
        RocksDbConfig, RocksDbReplicaStore,
    };

    use crate::fixtures::{
        funded, init_test_logging, replica_with_store, updater_key, CountingRecipient,
        RemoteHome, LOCAL_DOMAIN,
    };

    const BOB: [u8; 32] = [0xB0; 32];

    fn open_store(dir: &TempDir) -> Arc<RocksDbReplicaStore> {
        let path = dir.path().to_string_lossy().to_string();
        Arc::new(RocksDbReplicaStore::open(RocksDbConfig::for_testing(path)).unwrap())
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        init_test_logging();
        let dir = TempDir::new().unwrap();
        let updater = updater_key(0x42);
        let bob = Arc::new(CountingRecipient::default());
        let registry = Arc::new(InMemoryRecipientRegistry::new());
        registry.register(BOB, bob.clone());

        let mut home = RemoteHome::new();
        home.dispatch(LOCAL_DOMAIN, BOB, b"first");
        home.dispatch(LOCAL_DOMAIN, BOB, b"second");
        let (root, index, signature) = home.sign(&updater);

        {
            let replica = replica_with_store(open_store(&dir), registry.clone());
            replica.checkpoint(root, index, &signature).unwrap();
            assert!(replica
                .prove_and_process(home.message(0), &home.proof(0), 0, &mut funded())
                .await
                .unwrap());
            assert!(replica.prove(home.leaf(1), &home.proof(1), 1).unwrap());
        }

        let replica = replica_with_store(open_store(&dir), registry);
        assert_eq!(
            replica.latest_checkpoint().unwrap(),
            Some(Checkpoint::new(root, index))
        );
        assert_eq!(
            replica.message_status(&home.leaf(0)).unwrap(),
            MessageStatus::Processed
        );
        assert!(replica.dispatch_outcome(&home.leaf(0)).unwrap().unwrap().success);

        // Processed stays processed
        assert_eq!(
            replica.process(home.message(0), &mut funded()).await,
            Err(ReplicaError::NotProven(home.leaf(0)))
        );
        // Proven before the restart is still deliverable
        assert!(replica
            .process(home.message(1), &mut funded())
            .await
            .unwrap());
        assert_eq!(bob.calls(), 2);

        // Frontier did not reset
        assert_eq!(
            replica.checkpoint(root, index, &signature),
            Err(ReplicaError::StaleCheckpoint {
                index,
                frontier: index
            })
        );
    }
}
