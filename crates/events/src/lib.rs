//! Change vocabulary and commit delivery mechanics.
//!
//! This crate defines what a change notification looks like on the wire
//! (`CommitMessage`), the closed vocabularies it is built from (`ObjectType`,
//! `ChangeAction`, `EntityKind`), the connector boundary towards sync targets,
//! and the cascade rules that derive secondary commits.

pub mod cascade;
pub mod change;
pub mod commit;
pub mod connector;
pub mod in_memory_connector;

pub use cascade::{Cascade, InvoiceCascade};
pub use change::{ChangeAction, EntityKind, ObjectType};
pub use commit::{CommitIds, CommitMessage};
pub use connector::{Connector, ConnectorError, ConnectorRegistry, ConnectorResolver};
pub use in_memory_connector::{InMemoryConnector, Subscription};
