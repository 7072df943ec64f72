use serde::{Deserialize, Serialize};

/// What happened to a store entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl ChangeAction {
    pub const ALL: [ChangeAction; 3] = [ChangeAction::Create, ChangeAction::Update, ChangeAction::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Create => "create",
            ChangeAction::Update => "update",
            ChangeAction::Delete => "delete",
        }
    }
}

impl core::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object type as known by the remote sync server.
///
/// `Invoice` is never produced by classification; it only appears as a cascade
/// target derived from `Order` commits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Address,
    ThirdParty,
    Product,
    Order,
    Invoice,
}

impl ObjectType {
    /// Stable wire name (e.g. "ThirdParty").
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Address => "Address",
            ObjectType::ThirdParty => "ThirdParty",
            ObjectType::Product => "Product",
            ObjectType::Order => "Order",
            ObjectType::Invoice => "Invoice",
        }
    }
}

impl core::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of store entity a lifecycle hook was raised for.
///
/// Assigned once at the hook boundary; everything downstream matches on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Address,
    Customer,
    ProductVariant,
    Order,
    Product,
    ProductTranslation,
    ChannelPricing,
    Channel,
    Locale,
    TaxCategory,
    ProductOption,
    ProductOptionValue,
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Address,
        EntityKind::Customer,
        EntityKind::ProductVariant,
        EntityKind::Order,
        EntityKind::Product,
        EntityKind::ProductTranslation,
        EntityKind::ChannelPricing,
        EntityKind::Channel,
        EntityKind::Locale,
        EntityKind::TaxCategory,
        EntityKind::ProductOption,
        EntityKind::ProductOptionValue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Address => "Address",
            EntityKind::Customer => "Customer",
            EntityKind::ProductVariant => "ProductVariant",
            EntityKind::Order => "Order",
            EntityKind::Product => "Product",
            EntityKind::ProductTranslation => "ProductTranslation",
            EntityKind::ChannelPricing => "ChannelPricing",
            EntityKind::Channel => "Channel",
            EntityKind::Locale => "Locale",
            EntityKind::TaxCategory => "TaxCategory",
            EntityKind::ProductOption => "ProductOption",
            EntityKind::ProductOptionValue => "ProductOptionValue",
        }
    }

    /// Object type for kinds whose mutations always produce a commit candidate.
    pub fn managed_object_type(&self) -> Option<ObjectType> {
        match self {
            EntityKind::Address => Some(ObjectType::Address),
            EntityKind::Customer => Some(ObjectType::ThirdParty),
            EntityKind::ProductVariant => Some(ObjectType::Product),
            EntityKind::Order => Some(ObjectType::Order),
            _ => None,
        }
    }

    /// Object type for dependent kinds, which belong to another aggregate and
    /// only participate when dependents are explicitly included.
    pub fn dependent_object_type(&self) -> Option<ObjectType> {
        match self {
            EntityKind::Product | EntityKind::ProductTranslation | EntityKind::ChannelPricing => {
                Some(ObjectType::Product)
            }
            _ => None,
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
