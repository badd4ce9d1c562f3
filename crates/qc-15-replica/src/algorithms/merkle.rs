//! # Merkle Branch Verification
//!
//! Recomputes the root of the remote depth-32 tree from a leaf and its
//! sibling path.
//!
//! Node hash is `keccak256(left || right)`. Bit `i` of the leaf index says
//! whether the running node is the right (1) or left (0) child at level `i`.

use sha3::{Digest, Keccak256};

use crate::domain::{Hash, ReplicaError, TREE_DEPTH};

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Hash two nodes together.
fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Compute the root implied by `leaf` sitting at `index` with sibling path `proof`.
///
/// `proof[i]` is the sibling at level `i`, leaf level first. The proof must
/// have exactly [`TREE_DEPTH`] nodes.
///
/// # Time Complexity: O(depth)
pub fn branch_root(leaf: &Hash, proof: &[Hash], index: u32) -> Result<Hash, ReplicaError> {
    if proof.len() != TREE_DEPTH {
        return Err(ReplicaError::MalformedProof {
            expected: TREE_DEPTH,
            got: proof.len(),
        });
    }

    let mut current = *leaf;
    for (level, sibling) in proof.iter().enumerate() {
        current = if (index >> level) & 1 == 1 {
            hash_pair(sibling, &current)
        } else {
            hash_pair(&current, sibling)
        };
    }

    Ok(current)
}

/// Roots of empty subtrees: `zero[0]` is the empty leaf, `zero[i + 1] = H(zero[i], zero[i])`.
pub fn zero_hashes() -> [Hash; TREE_DEPTH] {
    let mut zeros = [[0u8; 32]; TREE_DEPTH];
    for level in 1..TREE_DEPTH {
        zeros[level] = hash_pair(&zeros[level - 1], &zeros[level - 1]);
    }
    zeros
}

/// Root of a depth-32 tree whose first leaves are `leaves` and the rest empty.
#[cfg(any(test, feature = "test-utils"))]
pub fn tree_root(leaves: &[Hash]) -> Hash {
    let zeros = zero_hashes();
    let mut level_nodes: Vec<Hash> = leaves.to_vec();

    for zero in zeros.iter() {
        if level_nodes.is_empty() {
            level_nodes.push(*zero);
        }
        level_nodes = level_nodes
            .chunks(2)
            .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(zero)))
            .collect();
    }

    level_nodes[0]
}

/// Sibling path for `leaves[index]` in a depth-32 tree padded with empty leaves.
#[cfg(any(test, feature = "test-utils"))]
pub fn build_branch(leaves: &[Hash], index: usize) -> Option<[Hash; TREE_DEPTH]> {
    if index >= leaves.len() {
        return None;
    }

    let zeros = zero_hashes();
    let mut proof = [[0u8; 32]; TREE_DEPTH];
    let mut level_nodes: Vec<Hash> = leaves.to_vec();
    let mut position = index;

    for (level, zero) in zeros.iter().enumerate() {
        proof[level] = level_nodes.get(position ^ 1).copied().unwrap_or(*zero);
        level_nodes = level_nodes
            .chunks(2)
            .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(zero)))
            .collect();
        position /= 2;
    }

    Some(proof)
}
