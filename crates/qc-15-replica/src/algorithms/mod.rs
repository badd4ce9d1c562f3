//! # Algorithms Module
//!
//! Pure functions: merkle branch verification and the message codec.

pub mod merkle;
pub mod message_codec;

pub use merkle::{branch_root, keccak256, zero_hashes};
pub use message_codec::{decode_message, encode_message, message_leaf, MESSAGE_HEADER_LEN};

#[cfg(any(test, feature = "test-utils"))]
pub use merkle::{build_branch, tree_root};
