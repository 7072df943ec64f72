//! `commitfeed-core`: shared building blocks for the change feed.
//!
//! This crate contains **pure** primitives (no infrastructure concerns): entity
//! identifiers, the identity trait every store entity implements, the error model
//! and the money value objects used by price comparisons.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{EntityId, TargetId};
pub use value_object::{MinorUnits, TaxPercent, ValueObject};
