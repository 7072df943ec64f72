use serde::{Deserialize, Serialize};

use commitfeed_core::{Entity, EntityId};

/// Customer account (synchronized as a third party).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<EntityId>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Customer {
    pub fn new(id: EntityId, email: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            email: email.into(),
            ..Self::default()
        }
    }
}

impl Entity for Customer {
    const KIND: &'static str = "Customer";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

/// Postal address, optionally attached to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    pub id: Option<EntityId>,
    pub customer: Option<EntityId>,
    pub street: String,
    pub city: String,
    pub postcode: String,
    pub country_code: String,
}

impl Address {
    pub fn new(id: EntityId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

impl Entity for Address {
    const KIND: &'static str = "Address";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}
