//! Keyed suppression locks (dedup guard).
//!
//! A lock never blocks anything by itself; its presence tells the change feed
//! to stay silent for a key. Three key shapes exist per object type:
//!
//! - `<Type>:new` while an object of that type is being created from a remote side
//! - `<Type>:Base-<id>` while an aggregate root is mid-mutation
//! - `<Type>:<id>` for one specific entity
//!
//! Locks are in-process only. Two processes sharing a store can race past each
//! other's locks.

pub mod in_memory;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use commitfeed_core::EntityId;
use commitfeed_events::ObjectType;

pub use in_memory::InMemoryLockStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockStoreError {
    #[error("lock store poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LockSubject {
    Creation,
    Base(EntityId),
    Entity(String),
}

/// Lock key scoped to an object type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey {
    object_type: ObjectType,
    subject: LockSubject,
}

impl LockKey {
    /// In-flight creation marker for `object_type`.
    pub fn creation(object_type: ObjectType) -> Self {
        Self {
            object_type,
            subject: LockSubject::Creation,
        }
    }

    /// Aggregate root key (`Base-<id>`).
    pub fn base(object_type: ObjectType, root: EntityId) -> Self {
        Self {
            object_type,
            subject: LockSubject::Base(root),
        }
    }

    pub fn entity(object_type: ObjectType, id: impl Into<String>) -> Self {
        Self {
            object_type,
            subject: LockSubject::Entity(id.into()),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }
}

impl core::fmt::Display for LockKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.subject {
            LockSubject::Creation => write!(f, "{}:new", self.object_type),
            LockSubject::Base(root) => write!(f, "{}:Base-{}", self.object_type, root),
            LockSubject::Entity(id) => write!(f, "{}:{}", self.object_type, id),
        }
    }
}

/// Shared suppression lock store.
///
/// `lock` and `is_locked` use the current time; the `_at` variants take an
/// explicit instant so lifetimes can be evaluated deterministically.
pub trait LockStore: Send + Sync {
    fn lock_at(&self, key: LockKey, at: DateTime<Utc>) -> Result<(), LockStoreError>;

    fn is_locked_at(&self, key: &LockKey, at: DateTime<Utc>) -> Result<bool, LockStoreError>;

    /// Remove one lock; returns whether it was held.
    fn release(&self, key: &LockKey) -> Result<bool, LockStoreError>;

    /// Remove every lock (end of a unit of work).
    fn clear(&self) -> Result<(), LockStoreError>;

    fn lock(&self, key: LockKey) -> Result<(), LockStoreError> {
        self.lock_at(key, Utc::now())
    }

    fn is_locked(&self, key: &LockKey) -> Result<bool, LockStoreError> {
        self.is_locked_at(key, Utc::now())
    }
}

impl<S> LockStore for Arc<S>
where
    S: LockStore + ?Sized,
{
    fn lock_at(&self, key: LockKey, at: DateTime<Utc>) -> Result<(), LockStoreError> {
        (**self).lock_at(key, at)
    }

    fn is_locked_at(&self, key: &LockKey, at: DateTime<Utc>) -> Result<bool, LockStoreError> {
        (**self).is_locked_at(key, at)
    }

    fn release(&self, key: &LockKey) -> Result<bool, LockStoreError> {
        (**self).release(key)
    }

    fn clear(&self) -> Result<(), LockStoreError> {
        (**self).clear()
    }
}
