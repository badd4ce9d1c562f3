//! # Replay Attacks
//!
//! A relayer resubmits a delivered message hoping the recipient runs twice,
//! or submits a message committed for another domain.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qc_15_replica::{MessageStatus, ReplicaApi, ReplicaError};

    use crate::fixtures::{funded, CountingRecipient, Harness, LOCAL_DOMAIN};

    const VAULT: [u8; 32] = [0x7A; 32];

    #[tokio::test]
    async fn test_process_replay_rejected() {
        let mut h = Harness::new();
        let vault = Arc::new(CountingRecipient::default());
        h.registry.register(VAULT, vault.clone());
        h.home.dispatch(LOCAL_DOMAIN, VAULT, b"withdraw 100");
        h.relay_checkpoint().unwrap();
        h.prove(0).unwrap();

        assert!(h
            .replica
            .process(h.home.message(0), &mut funded())
            .await
            .unwrap());

        for _ in 0..3 {
            assert_eq!(
                h.replica.process(h.home.message(0), &mut funded()).await,
                Err(ReplicaError::NotProven(h.home.leaf(0)))
            );
        }
        assert_eq!(vault.calls(), 1);
    }

    #[tokio::test]
    async fn test_reprove_after_processing_rejected() {
        let mut h = Harness::new();
        h.registry
            .register(VAULT, Arc::new(CountingRecipient::default()));
        h.home.dispatch(LOCAL_DOMAIN, VAULT, b"withdraw 100");
        h.relay_checkpoint().unwrap();
        h.prove(0).unwrap();
        h.replica
            .process(h.home.message(0), &mut funded())
            .await
            .unwrap();

        // Re-proving cannot rewind Processed back to Proven
        assert_eq!(h.prove(0), Err(ReplicaError::AlreadyProven(h.home.leaf(0))));
        assert_eq!(
            h.replica.message_status(&h.home.leaf(0)).unwrap(),
            MessageStatus::Processed
        );
    }

    #[tokio::test]
    async fn test_prove_and_process_replay_rejected() {
        let mut h = Harness::new();
        let vault = Arc::new(CountingRecipient::default());
        h.registry.register(VAULT, vault.clone());
        h.home.dispatch(LOCAL_DOMAIN, VAULT, b"mint");
        h.relay_checkpoint().unwrap();

        let proof = h.home.proof(0);
        h.replica
            .prove_and_process(h.home.message(0), &proof, 0, &mut funded())
            .await
            .unwrap();
        assert_eq!(
            h.replica
                .prove_and_process(h.home.message(0), &proof, 0, &mut funded())
                .await,
            Err(ReplicaError::AlreadyProven(h.home.leaf(0)))
        );
        assert_eq!(vault.calls(), 1);
    }

    #[tokio::test]
    async fn test_cross_domain_replay_rejected() {
        let mut h = Harness::new();
        let vault = Arc::new(CountingRecipient::default());
        h.registry.register(VAULT, vault.clone());
        // Committed for a third domain, relayed here
        h.home.dispatch(LOCAL_DOMAIN + 1, VAULT, b"withdraw 100");
        h.relay_checkpoint().unwrap();
        assert!(h.prove(0).unwrap());

        assert_eq!(
            h.replica.process(h.home.message(0), &mut funded()).await,
            Err(ReplicaError::WrongDomain {
                expected: LOCAL_DOMAIN,
                got: LOCAL_DOMAIN + 1
            })
        );
        assert_eq!(vault.calls(), 0);
    }

    #[tokio::test]
    async fn test_tampered_body_not_proven() {
        let mut h = Harness::new();
        h.home.dispatch(LOCAL_DOMAIN, VAULT, b"withdraw 100");
        h.relay_checkpoint().unwrap();
        h.prove(0).unwrap();

        // Same header, different body: different leaf, never proven
        let mut forged = h.home.message(0).to_vec();
        let last = forged.len() - 1;
        forged[last] ^= 0xFF;
        assert!(matches!(
            h.replica.process(&forged, &mut funded()).await,
            Err(ReplicaError::NotProven(_))
        ));
    }
}
