//! # Replica Configuration
//!
//! Immutable configuration fixed at construction.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{MIN_PROCESS_GAS, MIN_RESERVE_GAS};

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `process_gas` is below the safety minimum.
    #[error("process_gas {got} below minimum {min}")]
    ProcessGasTooLow {
        /// Configured value
        got: u64,
        /// Required minimum
        min: u64,
    },

    /// `reserve_gas` is below the safety minimum.
    #[error("reserve_gas {got} below minimum {min}")]
    ReserveGasTooLow {
        /// Configured value
        got: u64,
        /// Required minimum
        min: u64,
    },

    /// Local and remote domain are the same.
    #[error("local and remote domain are both {0}")]
    SameDomain(u32),

    /// Recipient calls would time out before they are first polled.
    #[error("dispatch_timeout_ms must be non-zero")]
    ZeroDispatchTimeout,

    /// Environment variable could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },
}

/// Replica configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaConfig {
    /// Domain this Replica delivers to.
    pub local_domain: u32,

    /// Domain whose Home tree this Replica tracks.
    pub remote_domain: u32,

    /// Gas forwarded to each recipient call.
    pub process_gas: u64,

    /// Gas kept back for bookkeeping after the recipient returns.
    pub reserve_gas: u64,

    /// Wall-clock deadline for a recipient call, in milliseconds.
    pub dispatch_timeout_ms: u64,

    /// Buffered events per subscriber before lagging.
    pub event_capacity: usize,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            local_domain: 2000,
            remote_domain: 1000,
            process_gas: MIN_PROCESS_GAS,
            reserve_gas: MIN_RESERVE_GAS,
            dispatch_timeout_ms: 5_000,
            event_capacity: 1024,
        }
    }
}

impl ReplicaConfig {
    /// Create a config for testing (short deadline).
    pub fn for_testing() -> Self {
        Self {
            dispatch_timeout_ms: 200,
            event_capacity: 64,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_REPLICA_LOCAL_DOMAIN` (default: 2000)
    /// - `QC_REPLICA_REMOTE_DOMAIN` (default: 1000)
    /// - `QC_REPLICA_PROCESS_GAS` (default: 850000)
    /// - `QC_REPLICA_RESERVE_GAS` (default: 15000)
    /// - `QC_REPLICA_DISPATCH_TIMEOUT_MS` (default: 5000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            local_domain: env_or("QC_REPLICA_LOCAL_DOMAIN", defaults.local_domain)?,
            remote_domain: env_or("QC_REPLICA_REMOTE_DOMAIN", defaults.remote_domain)?,
            process_gas: env_or("QC_REPLICA_PROCESS_GAS", defaults.process_gas)?,
            reserve_gas: env_or("QC_REPLICA_RESERVE_GAS", defaults.reserve_gas)?,
            dispatch_timeout_ms: env_or(
                "QC_REPLICA_DISPATCH_TIMEOUT_MS",
                defaults.dispatch_timeout_ms,
            )?,
            event_capacity: defaults.event_capacity,
        })
    }

    /// Check the safety minimums and the dispatch deadline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.process_gas < MIN_PROCESS_GAS {
            return Err(ConfigError::ProcessGasTooLow {
                got: self.process_gas,
                min: MIN_PROCESS_GAS,
            });
        }
        if self.reserve_gas < MIN_RESERVE_GAS {
            return Err(ConfigError::ReserveGasTooLow {
                got: self.reserve_gas,
                min: MIN_RESERVE_GAS,
            });
        }
        if self.local_domain == self.remote_domain {
            return Err(ConfigError::SameDomain(self.local_domain));
        }
        if self.dispatch_timeout_ms == 0 {
            return Err(ConfigError::ZeroDispatchTimeout);
        }
        Ok(())
    }

    /// Recipient call deadline.
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }

    /// Gas a caller must bring to `process`.
    pub fn required_gas(&self) -> u64 {
        self.process_gas.saturating_add(self.reserve_gas)
    }
}

fn env_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
        Err(_) => Ok(default),
    }
}
