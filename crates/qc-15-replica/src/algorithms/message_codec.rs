//! # Message Codec
//!
//! Fixed-layout wire encoding of [`Message`], all integers big-endian:
//!
//! ```text
//! version(2) | origin(4) | sender(32) | nonce(4) | destination(4) | recipient(32) | body(..)
//! ```
//!
//! The leaf hash is `keccak256` over the whole encoding.

use super::merkle::keccak256;
use crate::domain::{Address, Hash, Message, ReplicaError};

/// Length of the fixed header preceding the body.
pub const MESSAGE_HEADER_LEN: usize = 2 + 4 + 32 + 4 + 4 + 32;

const ORIGIN_OFFSET: usize = 2;
const SENDER_OFFSET: usize = ORIGIN_OFFSET + 4;
const NONCE_OFFSET: usize = SENDER_OFFSET + 32;
const DESTINATION_OFFSET: usize = NONCE_OFFSET + 4;
const RECIPIENT_OFFSET: usize = DESTINATION_OFFSET + 4;

/// Encode a message into its canonical bytes.
pub fn encode_message(message: &Message) -> Vec<u8> {
    let mut out = Vec::with_capacity(MESSAGE_HEADER_LEN + message.body.len());
    out.extend_from_slice(&message.version.to_be_bytes());
    out.extend_from_slice(&message.origin_domain.to_be_bytes());
    out.extend_from_slice(&message.sender);
    out.extend_from_slice(&message.nonce.to_be_bytes());
    out.extend_from_slice(&message.destination_domain.to_be_bytes());
    out.extend_from_slice(&message.recipient);
    out.extend_from_slice(&message.body);
    out
}

/// Decode canonical bytes into a message.
pub fn decode_message(bytes: &[u8]) -> Result<Message, ReplicaError> {
    if bytes.len() < MESSAGE_HEADER_LEN {
        return Err(ReplicaError::MalformedMessage { len: bytes.len() });
    }

    Ok(Message {
        version: u16::from_be_bytes([bytes[0], bytes[1]]),
        origin_domain: read_u32(bytes, ORIGIN_OFFSET),
        sender: read_address(bytes, SENDER_OFFSET),
        nonce: read_u32(bytes, NONCE_OFFSET),
        destination_domain: read_u32(bytes, DESTINATION_OFFSET),
        recipient: read_address(bytes, RECIPIENT_OFFSET),
        body: bytes[MESSAGE_HEADER_LEN..].to_vec(),
    })
}

/// Leaf hash of an encoded message.
pub fn message_leaf(encoded: &[u8]) -> Hash {
    keccak256(encoded)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_be_bytes(buf)
}

fn read_address(bytes: &[u8], offset: usize) -> Address {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&bytes[offset..offset + 32]);
    buf
}

impl Message {
    /// Canonical wire encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_message(self)
    }

    /// Parse the canonical wire encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplicaError> {
        decode_message(bytes)
    }

    /// Leaf hash identifying this message.
    pub fn leaf(&self) -> Hash {
        message_leaf(&self.to_bytes())
    }
}
