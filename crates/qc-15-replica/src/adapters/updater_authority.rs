//! ECDSA Updater Authority Adapter
//!
//! Implements `UpdaterAuthority` for secp256k1 updaters identified by their
//! Ethereum address.
//!
//! ## Signed payload
//!
//! ```text
//! domain_hash = keccak256(remote_domain_be4 || "QC-REPLICA")
//! digest      = keccak256(domain_hash || root || index_be4)
//! prehash     = keccak256("\x19Ethereum Signed Message:\n32" || digest)
//! ```
//!
//! Signatures are 65 bytes `r || s || v`, `v` in {0, 1, 27, 28}. High-S
//! signatures are rejected (EIP-2).

use std::collections::HashMap;

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::algorithms::keccak256;
use crate::domain::Hash;
use crate::ports::outbound::UpdaterAuthority;

/// 20-byte Ethereum address of an updater.
pub type EthAddress = [u8; 20];

/// Suffix mixed into the domain hash so signatures cannot be replayed elsewhere.
pub const DOMAIN_HASH_SUFFIX: &[u8] = b"QC-REPLICA";

const ETH_SIGNED_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Hash binding signatures to one remote domain.
pub fn domain_hash(remote_domain: u32) -> Hash {
    let mut data = Vec::with_capacity(4 + DOMAIN_HASH_SUFFIX.len());
    data.extend_from_slice(&remote_domain.to_be_bytes());
    data.extend_from_slice(DOMAIN_HASH_SUFFIX);
    keccak256(&data)
}

/// Digest the updater signs for `(remote_domain, root, index)`.
pub fn checkpoint_digest(remote_domain: u32, root: &Hash, index: u32) -> Hash {
    let mut data = [0u8; 68];
    data[..32].copy_from_slice(&domain_hash(remote_domain));
    data[32..64].copy_from_slice(root);
    data[64..].copy_from_slice(&index.to_be_bytes());
    keccak256(&data)
}

/// Ethereum personal-message hash of a 32-byte digest.
pub fn eth_signed_message_hash(digest: &Hash) -> Hash {
    let mut data = Vec::with_capacity(ETH_SIGNED_PREFIX.len() + 32);
    data.extend_from_slice(ETH_SIGNED_PREFIX);
    data.extend_from_slice(digest);
    keccak256(&data)
}

/// Ethereum address of a public key.
pub fn address_from_verifying_key(key: &VerifyingKey) -> EthAddress {
    let encoded = key.to_encoded_point(false);
    // Skip the 0x04 uncompressed prefix
    let hash = keccak256(&encoded.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Recover the signer of `prehash` from a 65-byte signature.
pub fn recover_signer(prehash: &Hash, signature: &[u8]) -> Option<EthAddress> {
    if signature.len() != 65 {
        return None;
    }

    let recovery_byte = match signature[64] {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return None,
    };
    let recovery_id = RecoveryId::from_byte(recovery_byte)?;
    let sig = Signature::from_slice(&signature[..64]).ok()?;

    // normalize_s returns Some only for high-S signatures
    if sig.normalize_s().is_some() {
        return None;
    }

    let key = VerifyingKey::recover_from_prehash(prehash, &sig, recovery_id).ok()?;
    Some(address_from_verifying_key(&key))
}

/// Sign a checkpoint as the updater would.
#[cfg(any(test, feature = "test-utils"))]
pub fn sign_checkpoint(
    key: &k256::ecdsa::SigningKey,
    remote_domain: u32,
    root: &Hash,
    index: u32,
) -> Vec<u8> {
    let prehash = eth_signed_message_hash(&checkpoint_digest(remote_domain, root, index));
    let (sig, recovery_id) = key
        .sign_prehash_recoverable(&prehash)
        .expect("prehash signing cannot fail for a 32-byte digest");
    let mut out = sig.to_bytes().to_vec();
    out.push(recovery_id.to_byte() + 27);
    out
}

/// Updater authority backed by secp256k1 signature recovery.
///
/// Holds the current updater per remote domain; rotating an updater
/// invalidates signatures from the old key for future checkpoints.
#[derive(Debug, Default)]
pub struct EcdsaUpdaterAuthority {
    updaters: RwLock<HashMap<u32, EthAddress>>,
}

impl EcdsaUpdaterAuthority {
    /// Create an authority with no registered updaters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an authority with one registered updater.
    pub fn with_updater(remote_domain: u32, updater: EthAddress) -> Self {
        let authority = Self::new();
        authority.set_updater(remote_domain, updater);
        authority
    }

    /// Register or rotate the updater for a domain, returning the previous one.
    pub fn set_updater(&self, remote_domain: u32, updater: EthAddress) -> Option<EthAddress> {
        info!(
            remote_domain,
            updater = %hex::encode(updater),
            "[qc-15] Updater set"
        );
        self.updaters.write().insert(remote_domain, updater)
    }

    /// Current updater for a domain.
    pub fn updater(&self, remote_domain: u32) -> Option<EthAddress> {
        self.updaters.read().get(&remote_domain).copied()
    }
}

impl UpdaterAuthority for EcdsaUpdaterAuthority {
    fn verify_checkpoint(
        &self,
        remote_domain: u32,
        root: &Hash,
        index: u32,
        signature: &[u8],
    ) -> bool {
        let Some(expected) = self.updater(remote_domain) else {
            debug!(remote_domain, "[qc-15] No updater registered");
            return false;
        };

        let prehash = eth_signed_message_hash(&checkpoint_digest(remote_domain, root, index));
        match recover_signer(&prehash, signature) {
            Some(signer) => signer == expected,
            None => {
                debug!(
                    remote_domain,
                    len = signature.len(),
                    "[qc-15] Unrecoverable checkpoint signature"
                );
                false
            }
        }
    }
}
