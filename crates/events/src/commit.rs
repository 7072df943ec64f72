use serde::{Deserialize, Serialize};

use commitfeed_core::EntityId;

use crate::change::{ChangeAction, ObjectType};

/// Identifiers carried by a commit: one scalar id or an ordered list.
///
/// Order of a list is significant and preserved on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommitIds {
    Single(String),
    Many(Vec<String>),
}

impl CommitIds {
    pub fn single(id: impl Into<String>) -> Self {
        Self::Single(id.into())
    }

    pub fn many<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(ids.into_iter().map(Into::into).collect())
    }

    /// Ordered list of entity ids, rendered as strings.
    pub fn from_entity_ids(ids: &[EntityId]) -> Self {
        Self::Many(ids.iter().map(ToString::to_string).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            CommitIds::Single(id) => core::slice::from_ref(id),
            CommitIds::Many(ids) => ids,
        };
        slice.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        match self {
            CommitIds::Single(_) => 1,
            CommitIds::Many(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A payload may only be delivered when it is non-empty and no id is blank.
    pub fn is_deliverable(&self) -> bool {
        !self.is_empty() && self.iter().all(|id| !id.trim().is_empty())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, CommitIds::Single(_))
    }
}

impl From<EntityId> for CommitIds {
    fn from(value: EntityId) -> Self {
        Self::Single(value.to_string())
    }
}

/// A normalized change notification delivered to one sync target.
///
/// Notes:
/// - `ids` is validated by the dispatcher before any message is built.
/// - `origin_label` identifies the emitting system to the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    object_type: ObjectType,
    ids: CommitIds,
    action: ChangeAction,
    origin_label: String,
    note: String,
}

impl CommitMessage {
    pub fn new(
        object_type: ObjectType,
        ids: CommitIds,
        action: ChangeAction,
        origin_label: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            object_type,
            ids,
            action,
            origin_label: origin_label.into(),
            note: note.into(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn ids(&self) -> &CommitIds {
        &self.ids
    }

    pub fn action(&self) -> ChangeAction {
        self.action
    }

    pub fn origin_label(&self) -> &str {
        &self.origin_label
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Same ids, action, label and note for a different object type.
    pub fn retyped(&self, object_type: ObjectType) -> Self {
        Self {
            object_type,
            ..self.clone()
        }
    }
}
