use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::config::{LockLifetime, LockPolicy};

use super::{LockKey, LockStore, LockStoreError};

/// In-memory lock store keyed by `LockKey`, remembering when each lock was taken.
///
/// Re-locking a held key refreshes its acquisition time.
#[derive(Debug, Default)]
pub struct InMemoryLockStore {
    lifetime: LockLifetime,
    locks: RwLock<HashMap<LockKey, DateTime<Utc>>>,
}

impl InMemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lifetime(lifetime: LockLifetime) -> Self {
        Self {
            lifetime,
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Store honouring the configured lock lifetime.
    pub fn from_policy(policy: &LockPolicy) -> Self {
        Self::with_lifetime(policy.lifetime)
    }

    pub fn lifetime(&self) -> LockLifetime {
        self.lifetime
    }

    /// Number of stored locks, expired ones included.
    pub fn len(&self) -> usize {
        self.locks.read().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop locks whose lifetime has elapsed at `at`; returns how many were dropped.
    pub fn purge_expired(&self, at: DateTime<Utc>) -> Result<usize, LockStoreError> {
        let mut locks = self.locks.write().map_err(|_| LockStoreError::Poisoned)?;
        let before = locks.len();
        locks.retain(|_, acquired| self.is_active(*acquired, at));
        Ok(before - locks.len())
    }

    fn is_active(&self, acquired: DateTime<Utc>, at: DateTime<Utc>) -> bool {
        match self.lifetime {
            LockLifetime::UntilReleased => true,
            LockLifetime::Expiring { seconds } => {
                let elapsed = at.signed_duration_since(acquired).num_seconds();
                u64::try_from(elapsed).map_or(true, |elapsed| elapsed < seconds)
            }
        }
    }
}

impl LockStore for InMemoryLockStore {
    fn lock_at(&self, key: LockKey, at: DateTime<Utc>) -> Result<(), LockStoreError> {
        let mut locks = self.locks.write().map_err(|_| LockStoreError::Poisoned)?;
        locks.insert(key, at);
        Ok(())
    }

    fn is_locked_at(&self, key: &LockKey, at: DateTime<Utc>) -> Result<bool, LockStoreError> {
        let locks = self.locks.read().map_err(|_| LockStoreError::Poisoned)?;
        Ok(locks
            .get(key)
            .is_some_and(|acquired| self.is_active(*acquired, at)))
    }

    fn release(&self, key: &LockKey) -> Result<bool, LockStoreError> {
        let mut locks = self.locks.write().map_err(|_| LockStoreError::Poisoned)?;
        Ok(locks.remove(key).is_some())
    }

    fn clear(&self) -> Result<(), LockStoreError> {
        let mut locks = self.locks.write().map_err(|_| LockStoreError::Poisoned)?;
        locks.clear();
        Ok(())
    }
}
