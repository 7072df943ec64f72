//! Lifecycle hook boundary.
//!
//! The persistence layer calls `on_create` after an entity is inserted,
//! `on_update` after it is updated and `on_before_delete` before it is removed.
//! Each hook classifies the entity, dispatches the resulting commit and then
//! applies the lock policy:
//!
//! - after a create: lock the created entity (and, for a variant, its product
//!   aggregate) so follow-up updates of the same unit of work stay silent
//! - after a product update: lock the product aggregate so translation and
//!   price updates flushed with it are not sent again per variant

use std::sync::Arc;

use thiserror::Error;

use commitfeed_catalog::EntitySnapshot;
use commitfeed_core::{DomainError, EntityId};
use commitfeed_events::{ChangeAction, ConnectorResolver, ObjectType};

use crate::classifier::{Classification, ClassifyError, EntityChangeClassifier};
use crate::commit_dispatcher::{CommitDispatcher, DispatchError, DispatchOutcome, SkipReason};
use crate::config::{LockPolicy, SyncConfig};
use crate::lock_store::{InMemoryLockStore, LockKey, LockStore, LockStoreError};
use crate::log_sink::LogSink;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListenerError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Lock(#[from] LockStoreError),
}

impl From<ClassifyError> for ListenerError {
    fn from(value: ClassifyError) -> Self {
        match value {
            ClassifyError::Domain(e) => ListenerError::Domain(e),
            ClassifyError::Lock(e) => ListenerError::Lock(e),
        }
    }
}

impl From<DispatchError> for ListenerError {
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::Lock(e) => ListenerError::Lock(e),
        }
    }
}

/// One lifecycle hook invocation.
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a> {
    pub action: ChangeAction,
    pub entity: EntitySnapshot<'a>,
}

impl<'a> ChangeEvent<'a> {
    pub fn new(action: ChangeAction, entity: impl Into<EntitySnapshot<'a>>) -> Self {
        Self {
            action,
            entity: entity.into(),
        }
    }
}

#[derive(Debug)]
pub struct ChangeListener<R, L, S> {
    classifier: EntityChangeClassifier<L>,
    dispatcher: CommitDispatcher<R, L, S>,
    locks: L,
    policy: LockPolicy,
}

impl<R, L, S> ChangeListener<R, L, S>
where
    L: Clone,
{
    pub fn new(config: &SyncConfig, resolver: R, locks: L, log: S) -> Self {
        Self::with_dispatcher(
            config.locks,
            locks.clone(),
            CommitDispatcher::new(config, resolver, locks, log),
        )
    }

    /// Listener around a prepared dispatcher; `locks` must be the store the
    /// dispatcher consults.
    pub fn with_dispatcher(policy: LockPolicy, locks: L, dispatcher: CommitDispatcher<R, L, S>) -> Self {
        Self {
            classifier: EntityChangeClassifier::new(locks.clone()),
            dispatcher,
            locks,
            policy,
        }
    }
}

impl<R, S> ChangeListener<R, Arc<InMemoryLockStore>, S> {
    /// Listener over a process-local lock store built from `config.locks`.
    pub fn in_memory(config: &SyncConfig, resolver: R, log: S) -> Self {
        Self::new(config, resolver, Arc::new(InMemoryLockStore::from_policy(&config.locks)), log)
    }
}

impl<R, L, S> ChangeListener<R, L, S> {
    pub fn dispatcher(&self) -> &CommitDispatcher<R, L, S> {
        &self.dispatcher
    }

    pub fn locks(&self) -> &L {
        &self.locks
    }

    pub fn policy(&self) -> LockPolicy {
        self.policy
    }
}

impl<R, L, S> ChangeListener<R, L, S>
where
    R: ConnectorResolver,
    L: LockStore,
    S: LogSink,
{
    pub fn handle(&self, event: ChangeEvent<'_>) -> Result<DispatchOutcome, ListenerError> {
        match event.action {
            ChangeAction::Create => self.on_create(event.entity),
            ChangeAction::Update => self.on_update(event.entity),
            ChangeAction::Delete => self.on_before_delete(event.entity),
        }
    }

    pub fn on_create<'a>(&self, entity: impl Into<EntitySnapshot<'a>>) -> Result<DispatchOutcome, ListenerError> {
        let entity = entity.into();
        let classification = self.classifier.classify(entity, ChangeAction::Create, false)?;
        let outcome = self.dispatch(&classification, ChangeAction::Create)?;

        if let (Some(object_type), true) = (classification.object_type(), self.policy.lock_on_create) {
            self.lock_created(object_type, entity)?;
        }
        Ok(outcome)
    }

    pub fn on_update<'a>(&self, entity: impl Into<EntitySnapshot<'a>>) -> Result<DispatchOutcome, ListenerError> {
        let entity = entity.into();
        let classification = self.classifier.classify(entity, ChangeAction::Update, true)?;
        let outcome = self.dispatch(&classification, ChangeAction::Update)?;

        let reached_dispatch = !matches!(
            outcome,
            DispatchOutcome::Skipped(SkipReason::NotManaged | SkipReason::NoIds)
        );
        if let EntitySnapshot::Product(product) = entity {
            if reached_dispatch && self.policy.lock_after_product_update {
                self.lock_product_root(product.id)?;
            }
        }
        Ok(outcome)
    }

    pub fn on_before_delete<'a>(
        &self,
        entity: impl Into<EntitySnapshot<'a>>,
    ) -> Result<DispatchOutcome, ListenerError> {
        let classification = self.classifier.classify(entity.into(), ChangeAction::Delete, false)?;
        self.dispatch(&classification, ChangeAction::Delete)
    }

    fn dispatch(&self, classification: &Classification, action: ChangeAction) -> Result<DispatchOutcome, ListenerError> {
        match classification {
            Classification::NotManaged => Ok(DispatchOutcome::Skipped(SkipReason::NotManaged)),
            Classification::Managed { ids: None, .. } => Ok(DispatchOutcome::Skipped(SkipReason::NoIds)),
            Classification::Managed {
                object_type,
                ids: Some(ids),
            } => Ok(self.dispatcher.dispatch(*object_type, ids.clone(), action)?),
        }
    }

    fn lock_created(&self, object_type: ObjectType, entity: EntitySnapshot<'_>) -> Result<(), ListenerError> {
        let id = entity.require_id()?;
        self.locks.lock(LockKey::entity(object_type, id.to_string()))?;
        if let EntitySnapshot::ProductVariant(variant) = entity {
            self.lock_product_root(variant.product)?;
        }
        Ok(())
    }

    fn lock_product_root(&self, product: Option<EntityId>) -> Result<(), ListenerError> {
        if let Some(root) = product {
            self.locks.lock(LockKey::base(ObjectType::Product, root))?;
        }
        Ok(())
    }
}
