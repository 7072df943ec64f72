//! Connector boundary towards remote sync targets (mechanics only).
//!
//! A connector is the **transport handle** for one configured sync target. The
//! dispatcher never talks to the network itself; it hands a `CommitMessage` to
//! whatever connector the resolver returns for a target id.
//!
//! ## Delivery Semantics
//!
//! - **Fire-and-forget per target**: one attempt per target per dispatch, no retries
//! - **At-least-once-attempt**: a failed commit is reported, never replayed here
//! - **Transient absence**: a target without a live connector is skipped, not failed
//!
//! Retrying, timeouts and authentication belong to the connector implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use commitfeed_core::TargetId;

use crate::commit::CommitMessage;

/// Failure reported by a connector for a single commit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// The remote side refused the commit.
    #[error("commit rejected: {0}")]
    Rejected(String),

    /// The transport failed before the remote side answered.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Internal state of the connector is unusable (lock poisoning).
    #[error("connector state poisoned")]
    Poisoned,
}

/// Live handle to one sync target.
///
/// ## Thread Safety
///
/// Connectors are shared between the registry and in-flight dispatches, so the
/// trait requires `Send + Sync`.
pub trait Connector: Send + Sync {
    fn commit(&self, message: &CommitMessage) -> Result<(), ConnectorError>;
}

impl<C> Connector for Arc<C>
where
    C: Connector + ?Sized,
{
    fn commit(&self, message: &CommitMessage) -> Result<(), ConnectorError> {
        (**self).commit(message)
    }
}

/// Resolves a configured target id to a live connector.
///
/// Returning `None` means "not available right now"; callers treat it as a
/// skip, never as an error.
pub trait ConnectorResolver: Send + Sync {
    fn resolve(&self, target: &TargetId) -> Option<Arc<dyn Connector>>;
}

impl<R> ConnectorResolver for Arc<R>
where
    R: ConnectorResolver + ?Sized,
{
    fn resolve(&self, target: &TargetId) -> Option<Arc<dyn Connector>> {
        (**self).resolve(target)
    }
}

/// Registry of connectors keyed by target id.
///
/// Connectors can be registered and withdrawn at runtime (e.g. when a server
/// goes offline); the dispatcher only ever sees the current snapshot.
#[derive(Default)]
pub struct ConnectorRegistry {
    connectors: RwLock<HashMap<TargetId, Arc<dyn Connector>>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, target: TargetId, connector: Arc<dyn Connector>) {
        if let Ok(mut map) = self.connectors.write() {
            map.insert(target, connector);
        }
    }

    pub fn withdraw(&self, target: &TargetId) -> Option<Arc<dyn Connector>> {
        self.connectors.write().ok()?.remove(target)
    }

    pub fn len(&self) -> usize {
        self.connectors.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl core::fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut targets: Vec<TargetId> = self
            .connectors
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        targets.sort();
        f.debug_struct("ConnectorRegistry").field("targets", &targets).finish()
    }
}

impl ConnectorResolver for ConnectorRegistry {
    fn resolve(&self, target: &TargetId) -> Option<Arc<dyn Connector>> {
        self.connectors.read().ok()?.get(target).cloned()
    }
}
