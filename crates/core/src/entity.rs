//! Entity trait: identity of a store row across mutations.

use crate::error::{DomainError, DomainResult};
use crate::id::EntityId;

/// Minimal interface every store entity exposes to the change feed.
pub trait Entity {
    /// Stable kind name used in diagnostics (e.g. "ProductVariant").
    const KIND: &'static str;

    /// Returns the store identifier, `None` while the row is not yet persisted.
    fn id(&self) -> Option<EntityId>;

    /// Returns the identifier or a `MissingIdentifier` error.
    fn require_id(&self) -> DomainResult<EntityId> {
        self.id().ok_or_else(|| DomainError::missing_identifier(Self::KIND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(Option<EntityId>);

    impl Entity for Row {
        const KIND: &'static str = "Row";

        fn id(&self) -> Option<EntityId> {
            self.0
        }
    }

    #[test]
    fn require_id_returns_assigned_identifier() {
        assert_eq!(Row(Some(EntityId::new(3))).require_id().unwrap(), EntityId::new(3));
    }

    #[test]
    fn require_id_fails_for_unpersisted_row() {
        let err = Row(None).require_id().unwrap_err();
        assert_eq!(err, DomainError::MissingIdentifier { kind: "Row" });
    }
}
