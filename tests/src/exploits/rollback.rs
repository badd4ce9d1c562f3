//! # Checkpoint Rollback
//!
//! An attacker replays an older, genuinely signed checkpoint to move the
//! frontier backwards, or reuses an index with a different root.

#[cfg(test)]
mod tests {
    use qc_15_replica::{Checkpoint, ReplicaApi, ReplicaError};

    use crate::fixtures::{Harness, LOCAL_DOMAIN};

    const ANY: [u8; 32] = [0x01; 32];

    #[test]
    fn test_old_signed_checkpoint_rejected() {
        let mut h = Harness::new();
        h.home.dispatch(LOCAL_DOMAIN, ANY, b"1");
        let old = h.home.sign(&h.updater);
        h.replica.checkpoint(old.0, old.1, &old.2).unwrap();

        h.home.dispatch(LOCAL_DOMAIN, ANY, b"2");
        h.relay_checkpoint().unwrap();

        assert_eq!(
            h.replica.checkpoint(old.0, old.1, &old.2),
            Err(ReplicaError::StaleCheckpoint {
                index: 0,
                frontier: 1
            })
        );
        assert_eq!(
            h.replica.latest_checkpoint().unwrap(),
            Some(Checkpoint::new(h.home.root(), 1))
        );
    }

    #[test]
    fn test_same_index_new_root_rejected() {
        let mut h = Harness::new();
        h.home.dispatch(LOCAL_DOMAIN, ANY, b"1");
        h.relay_checkpoint().unwrap();

        // Updater equivocates at the same index
        let forked_root = [0xF0; 32];
        let signature = qc_15_replica::adapters::sign_checkpoint(
            &h.updater,
            crate::fixtures::REMOTE_DOMAIN,
            &forked_root,
            0,
        );
        assert!(matches!(
            h.replica.checkpoint(forked_root, 0, &signature),
            Err(ReplicaError::StaleCheckpoint { .. })
        ));
        assert!(!h.replica.acceptable_root(&forked_root).unwrap());
    }

    #[test]
    fn test_stale_checked_before_signature() {
        let mut h = Harness::new();
        h.home.dispatch(LOCAL_DOMAIN, ANY, b"1");
        h.relay_checkpoint().unwrap();

        // Garbage signature at a stale index reports the staleness
        assert_eq!(
            h.replica.checkpoint([0x22; 32], 0, &[0u8; 3]),
            Err(ReplicaError::StaleCheckpoint {
                index: 0,
                frontier: 0
            })
        );
    }
}
