//! Cascade rules: secondary commits derived from a primary one.
//!
//! - A cascade is a pure rule over the primary commit
//! - The dispatcher owns delivery and the lock checks for the source object
//! - Derived commits share ids, action, label and note with their primary

use crate::change::{ChangeAction, ObjectType};
use crate::commit::CommitMessage;

/// Rule deriving a commit for a dependent document.
pub trait Cascade: Send + Sync {
    /// Object type whose commits trigger this rule.
    fn source_type(&self) -> ObjectType;

    /// Object type of the derived commit.
    fn derived_type(&self) -> ObjectType;

    /// Whether an action on the source triggers derivation.
    fn triggers_on(&self, action: ChangeAction) -> bool;

    /// Derive the secondary commit, or `None` if the primary does not qualify.
    fn derive(&self, primary: &CommitMessage) -> Option<CommitMessage> {
        if primary.object_type() != self.source_type() || !self.triggers_on(primary.action()) {
            return None;
        }
        Some(primary.retyped(self.derived_type()))
    }
}

/// Invoices are documents derived from orders: once an order exists, every
/// further change to it must re-synchronize its invoice.
#[derive(Debug, Default, Copy, Clone)]
pub struct InvoiceCascade;

impl Cascade for InvoiceCascade {
    fn source_type(&self) -> ObjectType {
        ObjectType::Order
    }

    fn derived_type(&self) -> ObjectType {
        ObjectType::Invoice
    }

    fn triggers_on(&self, action: ChangeAction) -> bool {
        action != ChangeAction::Create
    }
}
