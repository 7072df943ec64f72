//! Entity references handed over by lifecycle hooks.

use commitfeed_core::{DomainResult, Entity, EntityId};
use commitfeed_events::EntityKind;

use crate::locale::Locale;
use crate::order::Order;
use crate::party::{Address, Customer};
use crate::pricing::{Channel, ChannelPricing, TaxCategory};
use crate::product::{Product, ProductOption, ProductOptionValue, ProductTranslation, ProductVariant};

/// Borrowed view of the store entity a lifecycle hook was raised for.
///
/// The variant is chosen once, where the hook enters the change feed; every
/// later decision is an exhaustive `match` on it.
#[derive(Debug, Clone, Copy)]
pub enum EntitySnapshot<'a> {
    Address(&'a Address),
    Customer(&'a Customer),
    ProductVariant(&'a ProductVariant),
    Order(&'a Order),
    Product(&'a Product),
    /// A translation together with its owning product, when loaded.
    ProductTranslation {
        translation: &'a ProductTranslation,
        product: Option<&'a Product>,
    },
    ChannelPricing(&'a ChannelPricing),
    Channel(&'a Channel),
    Locale(&'a Locale),
    TaxCategory(&'a TaxCategory),
    ProductOption(&'a ProductOption),
    ProductOptionValue(&'a ProductOptionValue),
}

impl<'a> EntitySnapshot<'a> {
    pub fn translation(translation: &'a ProductTranslation, product: Option<&'a Product>) -> Self {
        EntitySnapshot::ProductTranslation { translation, product }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntitySnapshot::Address(_) => EntityKind::Address,
            EntitySnapshot::Customer(_) => EntityKind::Customer,
            EntitySnapshot::ProductVariant(_) => EntityKind::ProductVariant,
            EntitySnapshot::Order(_) => EntityKind::Order,
            EntitySnapshot::Product(_) => EntityKind::Product,
            EntitySnapshot::ProductTranslation { .. } => EntityKind::ProductTranslation,
            EntitySnapshot::ChannelPricing(_) => EntityKind::ChannelPricing,
            EntitySnapshot::Channel(_) => EntityKind::Channel,
            EntitySnapshot::Locale(_) => EntityKind::Locale,
            EntitySnapshot::TaxCategory(_) => EntityKind::TaxCategory,
            EntitySnapshot::ProductOption(_) => EntityKind::ProductOption,
            EntitySnapshot::ProductOptionValue(_) => EntityKind::ProductOptionValue,
        }
    }

    /// Store identifier of the entity itself.
    pub fn id(&self) -> Option<EntityId> {
        match self {
            EntitySnapshot::Address(e) => e.id(),
            EntitySnapshot::Customer(e) => e.id(),
            EntitySnapshot::ProductVariant(e) => e.id(),
            EntitySnapshot::Order(e) => e.id(),
            EntitySnapshot::Product(e) => e.id(),
            EntitySnapshot::ProductTranslation { translation, .. } => translation.id(),
            EntitySnapshot::ChannelPricing(e) => e.id(),
            EntitySnapshot::Channel(e) => e.id(),
            EntitySnapshot::Locale(e) => e.id(),
            EntitySnapshot::TaxCategory(e) => e.id(),
            EntitySnapshot::ProductOption(e) => e.id(),
            EntitySnapshot::ProductOptionValue(e) => e.id(),
        }
    }

    /// Identifier or `MissingIdentifier` naming the entity kind.
    pub fn require_id(&self) -> DomainResult<EntityId> {
        match self {
            EntitySnapshot::Address(e) => e.require_id(),
            EntitySnapshot::Customer(e) => e.require_id(),
            EntitySnapshot::ProductVariant(e) => e.require_id(),
            EntitySnapshot::Order(e) => e.require_id(),
            EntitySnapshot::Product(e) => e.require_id(),
            EntitySnapshot::ProductTranslation { translation, .. } => translation.require_id(),
            EntitySnapshot::ChannelPricing(e) => e.require_id(),
            EntitySnapshot::Channel(e) => e.require_id(),
            EntitySnapshot::Locale(e) => e.require_id(),
            EntitySnapshot::TaxCategory(e) => e.require_id(),
            EntitySnapshot::ProductOption(e) => e.require_id(),
            EntitySnapshot::ProductOptionValue(e) => e.require_id(),
        }
    }
}

macro_rules! impl_from_entity {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for EntitySnapshot<'a> {
                fn from(value: &'a $ty) -> Self {
                    EntitySnapshot::$variant(value)
                }
            }
        )*
    };
}

impl_from_entity!(
    Address => Address,
    Customer => Customer,
    ProductVariant => ProductVariant,
    Order => Order,
    Product => Product,
    ChannelPricing => ChannelPricing,
    Channel => Channel,
    Locale => Locale,
    TaxCategory => TaxCategory,
    ProductOption => ProductOption,
    ProductOptionValue => ProductOptionValue,
);

#[cfg(test)]
mod tests {
    use super::*;
    use commitfeed_core::DomainError;

    #[test]
    fn kind_follows_variant() {
        let order = Order::new(EntityId::new(4));
        let snapshot = EntitySnapshot::from(&order);
        assert_eq!(snapshot.kind(), EntityKind::Order);
        assert_eq!(snapshot.id(), Some(EntityId::new(4)));
    }

    #[test]
    fn translation_reports_its_own_id() {
        let product = Product::new(EntityId::new(1), "MUG");
        let translation = ProductTranslation {
            id: Some(EntityId::new(77)),
            locale: "en_US".to_string(),
            translatable: product.id,
            ..ProductTranslation::default()
        };
        let snapshot = EntitySnapshot::translation(&translation, Some(&product));
        assert_eq!(snapshot.kind(), EntityKind::ProductTranslation);
        assert_eq!(snapshot.require_id().unwrap(), EntityId::new(77));
    }

    #[test]
    fn unpersisted_entity_has_no_identifier() {
        let customer = Customer::default();
        let err = EntitySnapshot::from(&customer).require_id().unwrap_err();
        assert_eq!(err, DomainError::MissingIdentifier { kind: "Customer" });
    }
}
