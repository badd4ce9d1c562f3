//! # Replica Service
//!
//! Application service tying the checkpoint ledger, proof state machine and
//! bounded dispatcher together.
//!
//! ## Atomicity
//!
//! Every check-then-write runs under one write lock, so each entry point
//! commits all or nothing. The lock is never held across the recipient call;
//! the reentrancy guard covers that window instead.
//!
//! ## Delivery
//!
//! Once a message is marked Processed, the recipient call, the outcome
//! record and the event run in a spawned task that owns the guard slot.
//! Dropping the `process` future cannot reopen the guard early or lose the
//! outcome.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn, Instrument};

use crate::algorithms::{branch_root, message_leaf};
use crate::application::dispatcher::Dispatcher;
use crate::application::guard::{GuardSlot, ReentrancyGuard};
use crate::config::{ConfigError, ReplicaConfig};
use crate::domain::{
    invariant_checkpoint_advances, invariant_destination, invariant_proven, invariant_unseen,
    Checkpoint, DispatchOutcome, GasMeter, Hash, Message, MessageStatus, ReplicaError,
    ReplicaResult, SignedCheckpoint,
};
use crate::events::ReplicaEvent;
use crate::metrics;
use crate::ports::inbound::ReplicaApi;
use crate::ports::outbound::{
    MessageRecipient, RecipientRegistry, ReplicaStore, UpdaterAuthority,
};

/// Replica Service - receives checkpoints and delivers proven messages.
pub struct ReplicaService<A, S, R>
where
    A: UpdaterAuthority,
    S: ReplicaStore,
    R: RecipientRegistry,
{
    /// Configuration.
    config: ReplicaConfig,
    /// Remote updater signature check.
    authority: Arc<A>,
    /// Checkpoint ledger and status register.
    store: Arc<S>,
    /// Local recipients.
    registry: Arc<R>,
    /// Bounded recipient invocation.
    dispatcher: Dispatcher,
    /// Serializes check-then-write sections.
    write_lock: Mutex<()>,
    /// One `process` in flight at a time.
    guard: ReentrancyGuard,
    /// Event fan-out.
    events: broadcast::Sender<ReplicaEvent>,
}

impl<A, S, R> ReplicaService<A, S, R>
where
    A: UpdaterAuthority,
    S: ReplicaStore,
    R: RecipientRegistry,
{
    /// Create a new Replica service.
    ///
    /// Fails if the configuration is below the gas safety minimums.
    pub fn new(
        config: ReplicaConfig,
        authority: Arc<A>,
        store: Arc<S>,
        registry: Arc<R>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let dispatcher = Dispatcher::new(
            config.process_gas,
            config.reserve_gas,
            config.dispatch_timeout(),
        );
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        info!(
            local_domain = config.local_domain,
            remote_domain = config.remote_domain,
            process_gas = config.process_gas,
            reserve_gas = config.reserve_gas,
            "[qc-15] Replica initialized"
        );

        Ok(Self {
            config,
            authority,
            store,
            registry,
            dispatcher,
            write_lock: Mutex::new(()),
            guard: ReentrancyGuard::new(),
            events,
        })
    }

    /// Get configuration.
    pub fn config(&self) -> &ReplicaConfig {
        &self.config
    }

    /// Accept a checkpoint in its signed envelope form.
    pub fn checkpoint_signed(&self, signed: &SignedCheckpoint) -> ReplicaResult<()> {
        self.checkpoint(
            signed.checkpoint.root,
            signed.checkpoint.index,
            &signed.signature,
        )
    }

    /// Status checks, guard entry and the Processed write, under the write lock.
    ///
    /// The returned slot keeps the guard closed until the outcome is recorded.
    fn begin_process(&self, leaf: &Hash, gas: &GasMeter) -> ReplicaResult<GuardSlot> {
        let _write = self.write_lock.lock();
        invariant_proven(leaf, self.store.message_status(leaf)?)?;
        let slot = self.guard.enter()?;
        self.dispatcher.ensure_budget(gas)?;
        self.store
            .put_message_status(leaf, MessageStatus::Processed)?;
        Ok(slot)
    }
}

#[async_trait]
impl<A, S, R> ReplicaApi for ReplicaService<A, S, R>
where
    A: UpdaterAuthority,
    S: ReplicaStore,
    R: RecipientRegistry,
{
    #[instrument(skip(self, root, signature), fields(root = %hex::encode(root)))]
    fn checkpoint(&self, root: Hash, index: u32, signature: &[u8]) -> ReplicaResult<()> {
        let _write = self.write_lock.lock();

        let frontier = self.store.latest_checkpoint()?;
        if let Err(e) = invariant_checkpoint_advances(index, frontier.as_ref()) {
            warn!(error = %e, "[qc-15] Checkpoint rejected");
            metrics::record_checkpoint_rejected("stale");
            return Err(e);
        }

        if !self
            .authority
            .verify_checkpoint(self.config.remote_domain, &root, index, signature)
        {
            warn!("[qc-15] Checkpoint rejected: invalid signature");
            metrics::record_checkpoint_rejected("invalid_signature");
            return Err(ReplicaError::InvalidSignature);
        }

        let checkpoint = Checkpoint::new(root, index);
        self.store.put_checkpoint(&checkpoint)?;

        info!("[qc-15] Checkpoint accepted");
        metrics::record_checkpoint_accepted(index);
        emit(&self.events, ReplicaEvent::CheckpointAccepted(checkpoint));
        Ok(())
    }

    #[instrument(skip(self, leaf, proof), fields(leaf = %hex::encode(leaf)))]
    fn prove(&self, leaf: Hash, proof: &[Hash], index: u32) -> ReplicaResult<bool> {
        let _write = self.write_lock.lock();

        invariant_unseen(&leaf, self.store.message_status(&leaf)?)?;
        let root = branch_root(&leaf, proof, index)?;

        if self.store.checkpoint_index(&root)?.is_none() {
            debug!(root = %hex::encode(root), "[qc-15] Proof root not yet accepted");
            return Ok(false);
        }

        self.store.put_message_status(&leaf, MessageStatus::Proven)?;
        info!("[qc-15] Message proven");
        metrics::record_message_proven();
        Ok(true)
    }

    #[instrument(skip(self, message, gas), fields(len = message.len()))]
    async fn process(&self, message: &[u8], gas: &mut GasMeter) -> ReplicaResult<bool> {
        let decoded = Message::from_bytes(message)?;
        let leaf = message_leaf(message);
        invariant_destination(self.config.local_domain, decoded.destination_domain)?;

        let slot = self.begin_process(&leaf, gas)?;

        let delivery = Delivery {
            dispatcher: self.dispatcher.clone(),
            store: Arc::clone(&self.store),
            events: self.events.clone(),
            recipient: self.registry.recipient(&decoded.recipient),
            message: decoded,
            leaf,
            slot,
        };
        let outcome = tokio::spawn(delivery.run().in_current_span())
            .await
            .map_err(|e| ReplicaError::Delivery(e.to_string()))??;

        self.dispatcher.charge_caller(gas, &outcome);
        Ok(outcome.success)
    }

    async fn prove_and_process(
        &self,
        message: &[u8],
        proof: &[Hash],
        index: u32,
        gas: &mut GasMeter,
    ) -> ReplicaResult<bool> {
        let leaf = message_leaf(message);
        if !self.prove(leaf, proof, index)? {
            return Err(ReplicaError::ProofFailed(leaf));
        }
        self.process(message, gas).await
    }

    fn acceptable_root(&self, root: &Hash) -> ReplicaResult<bool> {
        Ok(self.store.checkpoint_index(root)?.is_some())
    }

    fn latest_checkpoint(&self) -> ReplicaResult<Option<Checkpoint>> {
        self.store.latest_checkpoint()
    }

    fn checkpoint_index(&self, root: &Hash) -> ReplicaResult<Option<u32>> {
        self.store.checkpoint_index(root)
    }

    fn message_status(&self, leaf: &Hash) -> ReplicaResult<MessageStatus> {
        self.store.message_status(leaf)
    }

    fn dispatch_outcome(&self, leaf: &Hash) -> ReplicaResult<Option<DispatchOutcome>> {
        self.store.dispatch_outcome(leaf)
    }

    fn subscribe(&self) -> broadcast::Receiver<ReplicaEvent> {
        self.events.subscribe()
    }
}

fn emit(events: &broadcast::Sender<ReplicaEvent>, event: ReplicaEvent) {
    debug!(event = event.name(), "[qc-15] Emitting event");
    // No subscribers is fine.
    let _ = events.send(event);
}

/// One delivery attempt for a message already marked Processed.
struct Delivery<S: ReplicaStore> {
    dispatcher: Dispatcher,
    store: Arc<S>,
    events: broadcast::Sender<ReplicaEvent>,
    recipient: Option<Arc<dyn MessageRecipient>>,
    message: Message,
    leaf: Hash,
    slot: GuardSlot,
}

impl<S: ReplicaStore> Delivery<S> {
    /// Dispatch, record the outcome and announce it, then reopen the guard.
    async fn run(self) -> ReplicaResult<DispatchOutcome> {
        let Delivery {
            dispatcher,
            store,
            events,
            recipient,
            message,
            leaf,
            slot,
        } = self;

        let outcome = dispatcher.dispatch(recipient, &message, leaf).await;
        store.put_dispatch_outcome(&outcome)?;

        info!(
            leaf = %hex::encode(leaf),
            success = outcome.success,
            gas_used = outcome.gas_used,
            "[qc-15] Message processed"
        );
        metrics::record_message_processed(outcome.success);
        emit(&events, ReplicaEvent::MessageProcessed(outcome.clone()));

        drop(slot);
        Ok(outcome)
    }
}
