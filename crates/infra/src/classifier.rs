//! Entity change classification.
//!
//! Maps a store entity to the object type sync targets know it as, and to the
//! ids the commit must carry. Sub-entities of a product (its translations,
//! channel prices, the product itself) are synchronized through variants, so
//! their changes fan out to variant ids.

use tracing::debug;

use commitfeed_catalog::{EntitySnapshot, Product};
use commitfeed_core::Entity;
use commitfeed_events::{ChangeAction, CommitIds, EntityKind, ObjectType};

use crate::lock_store::{LockKey, LockStore, LockStoreError};

/// Result of classifying one entity mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The entity is not synchronized.
    NotManaged,
    /// The entity maps to `object_type`; `ids` is `None` when nothing must be sent.
    Managed {
        object_type: ObjectType,
        ids: Option<CommitIds>,
    },
}

impl Classification {
    pub fn object_type(&self) -> Option<ObjectType> {
        match self {
            Classification::NotManaged => None,
            Classification::Managed { object_type, .. } => Some(*object_type),
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error(transparent)]
    Domain(#[from] commitfeed_core::DomainError),
    #[error(transparent)]
    Lock(#[from] LockStoreError),
}

#[derive(Debug, Clone)]
pub struct EntityChangeClassifier<L> {
    locks: L,
}

impl<L> EntityChangeClassifier<L> {
    pub fn new(locks: L) -> Self {
        Self { locks }
    }

    /// Object type for an entity kind, without looking at any instance.
    ///
    /// Primary kinds always map; dependent kinds only with `include_dependents`.
    pub fn object_type_of(kind: EntityKind, include_dependents: bool) -> Option<ObjectType> {
        kind.managed_object_type().or_else(|| {
            include_dependents
                .then(|| kind.dependent_object_type())
                .flatten()
        })
    }
}

impl<L> EntityChangeClassifier<L>
where
    L: LockStore,
{
    /// Classify a mutation of `entity`.
    ///
    /// Fails with `MissingIdentifier` when a managed entity has no id. The
    /// action is carried for diagnostics only; the mapping does not depend on it.
    pub fn classify(
        &self,
        entity: EntitySnapshot<'_>,
        action: ChangeAction,
        include_dependents: bool,
    ) -> Result<Classification, ClassifyError> {
        let Some(object_type) = Self::object_type_of(entity.kind(), include_dependents) else {
            return Ok(Classification::NotManaged);
        };
        let ids = self.ids_for(entity)?;
        debug!(kind = %entity.kind(), %action, %object_type, ids = ?ids, "classified change");
        Ok(Classification::Managed { object_type, ids })
    }

    fn ids_for(&self, entity: EntitySnapshot<'_>) -> Result<Option<CommitIds>, ClassifyError> {
        let own_id = entity.require_id()?;

        let ids = match entity {
            EntitySnapshot::Product(product) => self.variant_fan_out(product)?,
            EntitySnapshot::ProductTranslation { product: Some(product), .. } => self.variant_fan_out(product)?,
            EntitySnapshot::ProductTranslation { product: None, .. } => None,
            EntitySnapshot::ChannelPricing(pricing) => pricing.product_variant.map(CommitIds::from),
            _ => Some(CommitIds::from(own_id)),
        };
        Ok(ids)
    }

    /// All variant ids of a product, newest first; `None` while the product
    /// aggregate is locked or has no variant.
    fn variant_fan_out(&self, product: &Product) -> Result<Option<CommitIds>, ClassifyError> {
        let root = product.require_id()?;
        if self.locks.is_locked(&LockKey::base(ObjectType::Product, root))? {
            debug!(product = %root, "product aggregate locked, change not fanned out");
            return Ok(None);
        }
        let variants = product.variant_ids_newest_first();
        if variants.is_empty() {
            return Ok(None);
        }
        Ok(Some(CommitIds::from_entity_ids(&variants)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock_store::InMemoryLockStore;
    use commitfeed_catalog::{
        Address, Channel, ChannelPricing, Currency, Customer, Locale, Order, ProductOption, ProductOptionValue,
        ProductTranslation, ProductVariant, TaxCategory,
    };
    use commitfeed_core::{DomainError, EntityId};
    use std::sync::Arc;

    fn classifier() -> (EntityChangeClassifier<Arc<InMemoryLockStore>>, Arc<InMemoryLockStore>) {
        let locks = Arc::new(InMemoryLockStore::new());
        (EntityChangeClassifier::new(locks.clone()), locks)
    }

    fn managed(object_type: ObjectType, ids: Option<CommitIds>) -> Classification {
        Classification::Managed { object_type, ids }
    }

    #[test]
    fn primary_kinds_map_without_dependents() {
        let (c, _) = classifier();
        let address = Address::new(EntityId::new(1));
        let customer = Customer::new(EntityId::new(2), "jane@example.com");
        let variant = ProductVariant::new(EntityId::new(3), "MUG-RED", EntityId::new(30));
        let order = Order::new(EntityId::new(4));

        let cases = [
            (EntitySnapshot::from(&address), ObjectType::Address, "1"),
            (EntitySnapshot::from(&customer), ObjectType::ThirdParty, "2"),
            (EntitySnapshot::from(&variant), ObjectType::Product, "3"),
            (EntitySnapshot::from(&order), ObjectType::Order, "4"),
        ];
        for (snapshot, object_type, id) in cases {
            assert_eq!(
                c.classify(snapshot, ChangeAction::Create, false).unwrap(),
                managed(object_type, Some(CommitIds::single(id)))
            );
        }
    }

    #[test]
    fn dependent_kinds_require_flag() {
        let (c, _) = classifier();
        let product = Product::new(EntityId::new(1), "MUG").with_variants([EntityId::new(3)]);

        assert_eq!(
            c.classify(EntitySnapshot::from(&product), ChangeAction::Create, false).unwrap(),
            Classification::NotManaged
        );
        assert_eq!(
            c.classify(EntitySnapshot::from(&product), ChangeAction::Update, true).unwrap(),
            managed(ObjectType::Product, Some(CommitIds::many(["3"])))
        );
    }

    #[test]
    fn product_fans_out_to_variants_newest_first() {
        let (c, _) = classifier();
        let product = Product::new(EntityId::new(1), "MUG")
            .with_variants([EntityId::new(3), EntityId::new(4), EntityId::new(5)]);

        assert_eq!(
            c.classify(EntitySnapshot::from(&product), ChangeAction::Update, true).unwrap(),
            managed(ObjectType::Product, Some(CommitIds::many(["5", "4", "3"])))
        );
    }

    #[test]
    fn translation_resolves_through_owning_product() {
        let (c, locks) = classifier();
        let product = Product::new(EntityId::new(1), "MUG")
            .with_variants([EntityId::new(10), EntityId::new(11)]);
        let translation = ProductTranslation {
            id: Some(EntityId::new(99)),
            locale: "en_US".to_string(),
            translatable: product.id,
            ..ProductTranslation::default()
        };
        let snapshot = EntitySnapshot::translation(&translation, Some(&product));

        assert_eq!(
            c.classify(snapshot, ChangeAction::Update, true).unwrap(),
            managed(ObjectType::Product, Some(CommitIds::many(["11", "10"])))
        );

        locks.lock(LockKey::base(ObjectType::Product, EntityId::new(1))).unwrap();
        assert_eq!(
            c.classify(snapshot, ChangeAction::Update, true).unwrap(),
            managed(ObjectType::Product, None)
        );
    }

    #[test]
    fn translation_without_loaded_product_has_no_ids() {
        let (c, _) = classifier();
        let translation = ProductTranslation {
            id: Some(EntityId::new(99)),
            ..ProductTranslation::default()
        };
        assert_eq!(
            c.classify(EntitySnapshot::translation(&translation, None), ChangeAction::Update, true)
                .unwrap(),
            managed(ObjectType::Product, None)
        );
    }

    #[test]
    fn channel_pricing_resolves_to_variant() {
        let (c, _) = classifier();
        let mut bound = ChannelPricing::zero("WEB", Some(EntityId::new(10)));
        bound.id = Some(EntityId::new(500));
        let mut unbound = ChannelPricing::zero("WEB", None);
        unbound.id = Some(EntityId::new(501));

        assert_eq!(
            c.classify(EntitySnapshot::from(&bound), ChangeAction::Update, true).unwrap(),
            managed(ObjectType::Product, Some(CommitIds::single("10")))
        );
        assert_eq!(
            c.classify(EntitySnapshot::from(&unbound), ChangeAction::Update, true).unwrap(),
            managed(ObjectType::Product, None)
        );
    }

    #[test]
    fn unmanaged_kinds_are_never_managed() {
        let (c, _) = classifier();
        let channel = Channel::new("WEB", Currency::new("EUR", "Euro"));
        let locale = Locale::new("en_US");
        let category = TaxCategory { id: None, code: "std".to_string(), rates: vec![] };
        let option = ProductOption::default();
        let value = ProductOptionValue::default();

        for snapshot in [
            EntitySnapshot::from(&channel),
            EntitySnapshot::from(&locale),
            EntitySnapshot::from(&category),
            EntitySnapshot::from(&option),
            EntitySnapshot::from(&value),
        ] {
            for action in ChangeAction::ALL {
                assert_eq!(c.classify(snapshot, action, true).unwrap(), Classification::NotManaged);
            }
        }
    }

    #[test]
    fn managed_entity_without_id_is_an_error() {
        let (c, _) = classifier();
        let order = Order::default();
        let err = c.classify(EntitySnapshot::from(&order), ChangeAction::Delete, false).unwrap_err();
        assert_eq!(err, ClassifyError::Domain(DomainError::MissingIdentifier { kind: "Order" }));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_kind() -> impl Strategy<Value = EntityKind> {
            prop::sample::select(EntityKind::ALL.to_vec())
        }

        fn any_action() -> impl Strategy<Value = ChangeAction> {
            prop::sample::select(ChangeAction::ALL.to_vec())
        }

        proptest! {
            #![proptest_config(ProptestConfig { cases: 128, ..ProptestConfig::default() })]

            #[test]
            fn mapping_is_total_and_ignores_action(kind in any_kind(), _action in any_action(), deps in any::<bool>()) {
                let first = EntityChangeClassifier::<InMemoryLockStore>::object_type_of(kind, deps);
                let second = EntityChangeClassifier::<InMemoryLockStore>::object_type_of(kind, deps);
                prop_assert_eq!(first, second);

                if let Some(primary) = kind.managed_object_type() {
                    prop_assert_eq!(first, Some(primary));
                }
                if !deps && kind.managed_object_type().is_none() {
                    prop_assert_eq!(first, None);
                }
            }

            #[test]
            fn order_classification_is_deterministic_for_every_action(id in 1u64..u64::MAX, action in any_action()) {
                let (c, _) = classifier();
                let order = Order::new(EntityId::new(id));
                let a = c.classify(EntitySnapshot::from(&order), action, false).unwrap();
                let b = c.classify(EntitySnapshot::from(&order), ChangeAction::Create, true).unwrap();
                prop_assert_eq!(a.clone(), b);
                prop_assert_eq!(a, managed(ObjectType::Order, Some(CommitIds::single(id.to_string()))));
            }
        }
    }
}
