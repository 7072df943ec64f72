//! In-memory connector for tests/dev.

use std::sync::{Mutex, mpsc};
use std::time::Duration;

use crate::commit::CommitMessage;
use crate::connector::{Connector, ConnectorError};

/// A subscription to the commits received by an in-memory connector.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<CommitMessage>,
}

impl Subscription {
    fn new(receiver: mpsc::Receiver<CommitMessage>) -> Self {
        Self { receiver }
    }

    /// Try to receive a commit without blocking.
    pub fn try_recv(&self) -> Result<CommitMessage, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a commit.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<CommitMessage, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain every commit received so far.
    pub fn drain(&self) -> Vec<CommitMessage> {
        self.receiver.try_iter().collect()
    }
}

/// In-memory sync target.
///
/// - No IO
/// - Keeps every accepted commit in arrival order
/// - Fans accepted commits out to live subscriptions
/// - Can be switched to reject commits, to exercise failure isolation
#[derive(Debug, Default)]
pub struct InMemoryConnector {
    received: Mutex<Vec<CommitMessage>>,
    subscribers: Mutex<Vec<mpsc::Sender<CommitMessage>>>,
    rejection: Mutex<Option<String>>,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A connector that refuses every commit with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        let connector = Self::default();
        connector.reject_with(Some(reason.into()));
        connector
    }

    /// Switch rejection on (`Some`) or off (`None`).
    pub fn reject_with(&self, reason: Option<String>) {
        if let Ok(mut r) = self.rejection.lock() {
            *r = reason;
        }
    }

    /// Snapshot of accepted commits, in arrival order.
    pub fn received(&self) -> Vec<CommitMessage> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();

        // A poisoned lock still yields a subscription; it just stays silent.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

impl Connector for InMemoryConnector {
    fn commit(&self, message: &CommitMessage) -> Result<(), ConnectorError> {
        let rejection = self.rejection.lock().map_err(|_| ConnectorError::Poisoned)?.clone();
        if let Some(reason) = rejection {
            return Err(ConnectorError::Rejected(reason));
        }

        self.received
            .lock()
            .map_err(|_| ConnectorError::Poisoned)?
            .push(message.clone());

        let mut subs = self.subscribers.lock().map_err(|_| ConnectorError::Poisoned)?;
        // Drop any dead subscribers while delivering.
        subs.retain(|tx| tx.send(message.clone()).is_ok());

        Ok(())
    }
}
