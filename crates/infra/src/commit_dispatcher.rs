//! Commit fan-out to every configured sync target.
//!
//! ## Dispatch Flow
//!
//! ```text
//! (object type, ids, action)
//!   ↓
//! 1. Validate ids (non-empty, no blank id)           → Skipped(InvalidIds)
//!   ↓
//! 2. Update suppression (`<Type>:new` or `<Type>:<id>` locked) → Skipped(Locked)
//!   ↓
//! 3. For each enabled target, in id order:
//!      resolve connector   → unresolved: record, next target
//!      commit primary      → failure: record, continue
//!      commit cascades     (e.g. Order → Invoice)
//!   ↓
//! 4. Flush the log sink once
//! ```
//!
//! ## Failure Isolation
//!
//! A target that cannot be resolved, or whose connector fails, never prevents
//! delivery to the remaining targets. Failures are reported in the
//! `DeliveryReport`, nothing is retried.

use thiserror::Error;
use tracing::{debug, warn};

use commitfeed_core::TargetId;
use commitfeed_events::{
    Cascade, ChangeAction, CommitIds, CommitMessage, ConnectorError, ConnectorResolver, InvoiceCascade, ObjectType,
};

use crate::config::{SyncConfig, commit_note};
use crate::lock_store::{LockKey, LockStore, LockStoreError};
use crate::log_sink::{LogEntry, LogSink};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Lock(#[from] LockStoreError),
}

/// Why a change was not sent at all.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The entity is not synchronized.
    NotManaged,
    /// The entity is synchronized but the change resolved to no id.
    NoIds,
    /// The id payload is empty or contains a blank id.
    InvalidIds,
    /// An update raised while the object is locked.
    Locked,
}

/// One commit accepted by a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub target: TargetId,
    pub object_type: ObjectType,
}

/// One commit refused by a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub target: TargetId,
    pub object_type: ObjectType,
    pub error: ConnectorError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: Vec<Delivery>,
    pub failures: Vec<DeliveryFailure>,
    /// Enabled targets without a live connector.
    pub unresolved: Vec<TargetId>,
}

impl DeliveryReport {
    pub fn delivered_to(&self, object_type: ObjectType) -> Vec<&TargetId> {
        self.delivered
            .iter()
            .filter(|d| d.object_type == object_type)
            .map(|d| &d.target)
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.unresolved.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Skipped(SkipReason),
    Dispatched(DeliveryReport),
}

impl DispatchOutcome {
    pub fn report(&self) -> Option<&DeliveryReport> {
        match self {
            DispatchOutcome::Dispatched(report) => Some(report),
            DispatchOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            DispatchOutcome::Skipped(reason) => Some(*reason),
            DispatchOutcome::Dispatched(_) => None,
        }
    }
}

/// Sends classified changes to every configured target.
///
/// - `R`: connector resolver (e.g. `ConnectorRegistry`)
/// - `L`: lock store consulted for suppression
/// - `S`: log sink flushed once per dispatch
pub struct CommitDispatcher<R, L, S> {
    resolver: R,
    locks: L,
    log: S,
    targets: Vec<TargetId>,
    origin_label: String,
    store_name: String,
    cascades: Vec<Box<dyn Cascade>>,
}

impl<R, L, S> core::fmt::Debug for CommitDispatcher<R, L, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommitDispatcher")
            .field("targets", &self.targets)
            .field("origin_label", &self.origin_label)
            .field("cascades", &self.cascades.len())
            .finish_non_exhaustive()
    }
}

impl<R, L, S> CommitDispatcher<R, L, S> {
    /// Dispatcher for the enabled targets of `config`, with the invoice cascade.
    pub fn new(config: &SyncConfig, resolver: R, locks: L, log: S) -> Self {
        Self {
            resolver,
            locks,
            log,
            targets: config.enabled_targets().cloned().collect(),
            origin_label: config.origin_label.clone(),
            store_name: config.store_name.clone(),
            cascades: vec![Box::new(InvoiceCascade)],
        }
    }

    pub fn with_cascade(mut self, cascade: impl Cascade + 'static) -> Self {
        self.cascades.push(Box::new(cascade));
        self
    }

    pub fn without_cascades(mut self) -> Self {
        self.cascades.clear();
        self
    }

    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    pub fn log(&self) -> &S {
        &self.log
    }
}

impl<R, L, S> CommitDispatcher<R, L, S>
where
    R: ConnectorResolver,
    L: LockStore,
    S: LogSink,
{
    /// Deliver one change to every target, labelled with the configured
    /// origin and the store's commit note.
    ///
    /// Only lock store failures are errors; every other condition ends up in
    /// the returned outcome.
    pub fn dispatch(
        &self,
        object_type: ObjectType,
        ids: CommitIds,
        action: ChangeAction,
    ) -> Result<DispatchOutcome, DispatchError> {
        let note = commit_note(&self.store_name, object_type);
        self.dispatch_with(object_type, ids, action, self.origin_label.clone(), note)
    }

    /// Same as [`dispatch`](Self::dispatch) with a caller supplied origin
    /// label and note. Derived commits carry the same label and note.
    pub fn dispatch_with(
        &self,
        object_type: ObjectType,
        ids: CommitIds,
        action: ChangeAction,
        origin_label: impl Into<String>,
        note: impl Into<String>,
    ) -> Result<DispatchOutcome, DispatchError> {
        if !ids.is_deliverable() {
            debug!(%object_type, %action, "empty or blank ids, nothing to commit");
            return Ok(DispatchOutcome::Skipped(SkipReason::InvalidIds));
        }
        if action == ChangeAction::Update && self.is_suppressed(object_type, &ids)? {
            debug!(%object_type, "update suppressed by lock");
            return Ok(DispatchOutcome::Skipped(SkipReason::Locked));
        }

        let primary = CommitMessage::new(object_type, ids, action, origin_label, note);
        let derived = self.derived_commits(&primary)?;

        let mut report = DeliveryReport::default();
        for target in &self.targets {
            let Some(connector) = self.resolver.resolve(target) else {
                warn!(%target, "no connector for target");
                self.log.record(LogEntry::warn(format!("No connector available for target {target}")));
                report.unresolved.push(target.clone());
                continue;
            };

            for message in core::iter::once(&primary).chain(derived.iter()) {
                match connector.commit(message) {
                    Ok(()) => report.delivered.push(Delivery {
                        target: target.clone(),
                        object_type: message.object_type(),
                    }),
                    Err(error) => {
                        warn!(%target, object_type = %message.object_type(), %error, "commit failed");
                        self.log.record(LogEntry::error(format!(
                            "Commit of {} to {target} failed: {error}",
                            message.object_type()
                        )));
                        report.failures.push(DeliveryFailure {
                            target: target.clone(),
                            object_type: message.object_type(),
                            error,
                        });
                    }
                }
            }
        }

        self.log.flush(true);
        Ok(DispatchOutcome::Dispatched(report))
    }

    fn is_suppressed(&self, object_type: ObjectType, ids: &CommitIds) -> Result<bool, LockStoreError> {
        if self.locks.is_locked(&LockKey::creation(object_type))? {
            return Ok(true);
        }
        self.any_locked(object_type, ids)
    }

    /// Cascade commits for `primary`; none while any of its ids is locked.
    fn derived_commits(&self, primary: &CommitMessage) -> Result<Vec<CommitMessage>, LockStoreError> {
        let mut derived = Vec::new();
        for cascade in &self.cascades {
            let Some(message) = cascade.derive(primary) else {
                continue;
            };
            if self.any_locked(primary.object_type(), primary.ids())? {
                debug!(
                    source = %primary.object_type(),
                    derived = %message.object_type(),
                    "cascade suppressed by lock"
                );
                continue;
            }
            derived.push(message);
        }
        Ok(derived)
    }

    fn any_locked(&self, object_type: ObjectType, ids: &CommitIds) -> Result<bool, LockStoreError> {
        for id in ids.iter() {
            if self.locks.is_locked(&LockKey::entity(object_type, id))? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
