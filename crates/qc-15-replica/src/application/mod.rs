//! # Application Layer
//!
//! Replica service orchestration, bounded dispatch and the reentrancy guard.

pub mod dispatcher;
pub mod guard;
pub mod service;

pub use dispatcher::Dispatcher;
pub use guard::{GuardSlot, ReentrancyGuard};
pub use service::ReplicaService;
