//! # Dispatcher
//!
//! Bounded invocation of a message recipient.
//!
//! The recipient runs in its own task with a fresh meter holding exactly
//! `process_gas` and a wall-clock deadline. Reverts, gas exhaustion, panics
//! and timeouts all become a failed [`DispatchOutcome`]; nothing the
//! recipient does can fail the enclosing `process` call.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{
    invariant_sufficient_budget, DispatchOutcome, GasMeter, Hash, Message, ReplicaResult,
    MAX_RETURN_DATA,
};
use crate::ports::outbound::MessageRecipient;

/// Forwards messages to recipients under a gas ceiling and deadline.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    process_gas: u64,
    reserve_gas: u64,
    timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher.
    pub fn new(process_gas: u64, reserve_gas: u64, timeout: Duration) -> Self {
        Self {
            process_gas,
            reserve_gas,
            timeout,
        }
    }

    /// Gas forwarded to each recipient.
    pub fn process_gas(&self) -> u64 {
        self.process_gas
    }

    /// Fail unless `gas` covers the recipient call plus bookkeeping.
    pub fn ensure_budget(&self, gas: &GasMeter) -> ReplicaResult<()> {
        invariant_sufficient_budget(gas.remaining(), self.process_gas, self.reserve_gas)
    }

    /// Invoke `recipient` (if deployed) with `message`.
    ///
    /// The caller must have passed [`Self::ensure_budget`] and settles the
    /// gas afterwards with [`Self::charge_caller`].
    pub async fn dispatch(
        &self,
        recipient: Option<Arc<dyn MessageRecipient>>,
        message: &Message,
        leaf: Hash,
    ) -> DispatchOutcome {
        let Some(recipient) = recipient else {
            debug!(
                recipient = %hex::encode(message.recipient),
                "[qc-15] No recipient deployed"
            );
            return DispatchOutcome {
                message_hash: leaf,
                success: false,
                return_data: Vec::new(),
                gas_used: 0,
            };
        };

        let (success, mut return_data, gas_used) = self.invoke(recipient, message).await;
        return_data.truncate(MAX_RETURN_DATA);

        DispatchOutcome {
            message_hash: leaf,
            success,
            return_data,
            gas_used,
        }
    }

    /// Charge the caller for the gas the recipient used.
    ///
    /// After [`Self::ensure_budget`] passed, `gas` keeps at least
    /// `reserve_gas`.
    pub fn charge_caller(&self, gas: &mut GasMeter, outcome: &DispatchOutcome) {
        // gas_used <= process_gas <= remaining, so this never overdraws
        if gas.charge(outcome.gas_used).is_err() {
            warn!(
                gas_used = outcome.gas_used,
                "[qc-15] Caller meter overdrawn by dispatch"
            );
        }
    }

    async fn invoke(
        &self,
        recipient: Arc<dyn MessageRecipient>,
        message: &Message,
    ) -> (bool, Vec<u8>, u64) {
        let process_gas = self.process_gas;
        let origin = message.origin_domain;
        let sender = message.sender;
        let body = message.body.clone();

        let mut handle = tokio::spawn(async move {
            let mut meter = GasMeter::new(process_gas);
            let result = recipient.handle(&mut meter, origin, sender, &body).await;
            (result, meter.used())
        });

        match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(Ok((Ok(data), used))) => (true, data, used),
            Ok(Ok((Err(e), used))) => {
                debug!(error = %e, used, "[qc-15] Recipient failed");
                let mut data = e.return_data().to_vec();
                data.truncate(MAX_RETURN_DATA);
                (false, data, used)
            }
            Ok(Err(join_error)) => {
                warn!(error = %join_error, "[qc-15] Recipient panicked");
                (false, Vec::new(), process_gas)
            }
            Err(_) => {
                handle.abort();
                warn!(timeout = ?self.timeout, "[qc-15] Recipient timed out");
                (false, Vec::new(), process_gas)
            }
        }
    }
}
