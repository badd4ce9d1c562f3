//! # Forged Checkpoints
//!
//! Attempts to land a root the updater never signed: a different key, a
//! tampered root, a malleated (high-S) signature, or raw garbage.

#[cfg(test)]
mod tests {
    use qc_15_replica::adapters::sign_checkpoint;
    use qc_15_replica::{ReplicaApi, ReplicaError};

    use crate::fixtures::{updater_key, Harness, LOCAL_DOMAIN, REMOTE_DOMAIN};

    const ANY: [u8; 32] = [0x02; 32];

    /// secp256k1 group order, big-endian.
    const CURVE_ORDER: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
        0x41, 0x41,
    ];

    /// `n - s`, the other valid `s` for the same `r`.
    fn negate_s(s: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        let mut borrow = 0i16;
        for i in (0..32).rev() {
            let mut diff = CURVE_ORDER[i] as i16 - s[i] as i16 - borrow;
            borrow = if diff < 0 {
                diff += 256;
                1
            } else {
                0
            };
            out[i] = diff as u8;
        }
        out
    }

    fn assert_rejected(h: &Harness, root: [u8; 32], index: u32, signature: &[u8]) {
        assert_eq!(
            h.replica.checkpoint(root, index, signature),
            Err(ReplicaError::InvalidSignature)
        );
        assert!(!h.replica.acceptable_root(&root).unwrap());
        assert_eq!(h.replica.latest_checkpoint().unwrap(), None);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let mut h = Harness::new();
        h.home.dispatch(LOCAL_DOMAIN, ANY, b"x");
        let (root, index, signature) = h.home.sign(&updater_key(0x99));
        assert_rejected(&h, root, index, &signature);
    }

    #[test]
    fn test_tampered_root_rejected() {
        let mut h = Harness::new();
        h.home.dispatch(LOCAL_DOMAIN, ANY, b"x");
        let (_, index, signature) = h.home.sign(&h.updater);
        assert_rejected(&h, [0xAB; 32], index, &signature);
    }

    #[test]
    fn test_bumped_index_rejected() {
        let mut h = Harness::new();
        h.home.dispatch(LOCAL_DOMAIN, ANY, b"x");
        let (root, index, signature) = h.home.sign(&h.updater);
        assert_rejected(&h, root, index + 100, &signature);
    }

    #[test]
    fn test_malleated_signature_rejected() {
        let mut h = Harness::new();
        h.home.dispatch(LOCAL_DOMAIN, ANY, b"x");
        let (root, index, signature) = h.home.sign(&h.updater);

        let mut malleated = signature.clone();
        malleated[32..64].copy_from_slice(&negate_s(&signature[32..64]));
        malleated[64] = if signature[64] == 27 { 28 } else { 27 };
        assert_rejected(&h, root, index, &malleated);

        // The original still works
        h.replica.checkpoint(root, index, &signature).unwrap();
    }

    #[test]
    fn test_garbage_signatures_rejected() {
        let mut h = Harness::new();
        h.home.dispatch(LOCAL_DOMAIN, ANY, b"x");
        let root = h.home.root();
        assert_rejected(&h, root, 1, &[]);
        assert_rejected(&h, root, 1, &[0u8; 65]);
        assert_rejected(&h, root, 1, &[0xFF; 65]);
        assert_rejected(&h, root, 1, &[1u8; 64]);
    }

    #[test]
    fn test_signature_for_other_domain_rejected() {
        let mut h = Harness::new();
        h.home.dispatch(LOCAL_DOMAIN, ANY, b"x");
        let root = h.home.root();
        let signature = sign_checkpoint(&h.updater, REMOTE_DOMAIN + 7, &root, 1);
        assert_rejected(&h, root, 1, &signature);
    }
}
