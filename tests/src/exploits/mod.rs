//! # Exploit Simulations
//!
//! Each module replays a known bridge attack against the Replica and checks
//! that it fails without corrupting state.
//!
//! | Module | Attack |
//! |--------|--------|
//! | `replay` | Deliver the same message twice, or on the wrong domain |
//! | `reentrancy` | Recipient calls back into `process` mid-dispatch |
//! | `gas_griefing` | Recipient burns all gas to starve bookkeeping |
//! | `return_bomb` | Recipient returns megabytes to blow up copy cost |
//! | `rollback` | Resubmit an old checkpoint to roll the frontier back |
//! | `forged_signature` | Checkpoint not signed by the current updater |

pub mod forged_signature;
pub mod replay;
pub mod rollback;
