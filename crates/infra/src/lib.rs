//! Change feed runtime: configuration, suppression locks, classification,
//! commit fan-out and the lifecycle hook boundary.
//!
//! Nothing here performs IO towards sync targets; delivery goes through the
//! `Connector` trait of `commitfeed-events`.

pub mod classifier;
pub mod commit_dispatcher;
pub mod config;
pub mod listener;
pub mod lock_store;
pub mod log_sink;


pub use classifier::{Classification, ClassifyError, EntityChangeClassifier};
pub use commit_dispatcher::{
    CommitDispatcher, Delivery, DeliveryFailure, DeliveryReport, DispatchError, DispatchOutcome, SkipReason,
};
pub use config::{ConfigError, LockLifetime, LockPolicy, SyncConfig, TargetConfig};
pub use listener::{ChangeEvent, ChangeListener, ListenerError};
pub use lock_store::{InMemoryLockStore, LockKey, LockStore, LockStoreError};
pub use log_sink::{LogEntry, LogLevel, LogSink, MemoryLogSink, TracingLogSink};
