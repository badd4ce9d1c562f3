//! # Integration Tests
//!
//! Remote Home -> updater -> Replica -> recipient, with real signatures.

pub mod persistence;
