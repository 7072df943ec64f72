use serde::{Deserialize, Serialize};

use commitfeed_core::{Entity, EntityId};

/// Customer order. Its invoice is a derived document, never a store entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<EntityId>,
    pub number: Option<String>,
    pub customer: Option<EntityId>,
    pub currency_code: String,
}

impl Order {
    pub fn new(id: EntityId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

impl Entity for Order {
    const KIND: &'static str = "Order";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}
