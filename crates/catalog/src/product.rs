use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use commitfeed_core::{DomainError, Entity, EntityId};

use crate::pricing::{ChannelPricing, TaxCategory};

/// Product aggregate: shared texts (per locale) and the ids of its variants.
///
/// Translations live at this level while synchronization happens per variant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<EntityId>,
    pub code: String,
    pub variants: Vec<EntityId>,
    /// Keyed by locale code.
    pub translations: BTreeMap<String, ProductTranslation>,
}

impl Product {
    pub fn new(id: EntityId, code: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn with_variants(mut self, variants: impl IntoIterator<Item = EntityId>) -> Self {
        self.variants = variants.into_iter().collect();
        self
    }

    pub fn translation(&self, locale_code: &str) -> Option<&ProductTranslation> {
        self.translations.get(locale_code)
    }

    /// Variant ids, most recently created first.
    pub fn variant_ids_newest_first(&self) -> Vec<EntityId> {
        let mut ids = self.variants.clone();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids.dedup();
        ids
    }
}

impl Entity for Product {
    const KIND: &'static str = "Product";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

/// Sellable unit of a product; the unit remote targets track.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: Option<EntityId>,
    pub code: String,
    pub product: Option<EntityId>,
    pub tax_category: Option<TaxCategory>,
    /// Keyed by channel code.
    pub channel_pricings: BTreeMap<String, ChannelPricing>,
}

impl ProductVariant {
    pub fn new(id: EntityId, code: impl Into<String>, product: EntityId) -> Self {
        Self {
            id: Some(id),
            code: code.into(),
            product: Some(product),
            ..Self::default()
        }
    }

    pub fn channel_pricing(&self, channel_code: &str) -> Option<&ChannelPricing> {
        self.channel_pricings.get(channel_code)
    }
}

impl Entity for ProductVariant {
    const KIND: &'static str = "ProductVariant";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

/// Per-locale product texts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductTranslation {
    pub id: Option<EntityId>,
    pub locale: String,
    /// Owning product.
    pub translatable: Option<EntityId>,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub meta_keywords: String,
    pub meta_description: String,
}

impl Entity for ProductTranslation {
    const KIND: &'static str = "ProductTranslation";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

pub type FieldGetter = fn(&ProductTranslation) -> &str;
pub type FieldSetter = fn(&mut ProductTranslation, String);

/// Translated product fields writable through the change feed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslatedField {
    Name,
    Slug,
    Description,
    ShortDescription,
    MetaKeywords,
    MetaDescription,
}

impl TranslatedField {
    pub const ALL: [TranslatedField; 6] = [
        TranslatedField::Name,
        TranslatedField::Slug,
        TranslatedField::Description,
        TranslatedField::ShortDescription,
        TranslatedField::MetaKeywords,
        TranslatedField::MetaDescription,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TranslatedField::Name => "name",
            TranslatedField::Slug => "slug",
            TranslatedField::Description => "description",
            TranslatedField::ShortDescription => "shortDescription",
            TranslatedField::MetaKeywords => "metaKeywords",
            TranslatedField::MetaDescription => "metaDescription",
        }
    }

    /// Getter/setter pair for this field.
    pub fn accessors(&self) -> (FieldGetter, FieldSetter) {
        match self {
            TranslatedField::Name => (|t| t.name.as_str(), |t, v| t.name = v),
            TranslatedField::Slug => (|t| t.slug.as_str(), |t, v| t.slug = v),
            TranslatedField::Description => (|t| t.description.as_str(), |t, v| t.description = v),
            TranslatedField::ShortDescription => {
                (|t| t.short_description.as_str(), |t, v| t.short_description = v)
            }
            TranslatedField::MetaKeywords => (|t| t.meta_keywords.as_str(), |t, v| t.meta_keywords = v),
            TranslatedField::MetaDescription => {
                (|t| t.meta_description.as_str(), |t, v| t.meta_description = v)
            }
        }
    }

    pub fn get<'t>(&self, translation: &'t ProductTranslation) -> &'t str {
        (self.accessors().0)(translation)
    }

    pub fn set(&self, translation: &mut ProductTranslation, value: String) {
        (self.accessors().1)(translation, value)
    }
}

impl core::str::FromStr for TranslatedField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TranslatedField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown translated field: {s}")))
    }
}

/// Product option (e.g. "Size") with per-locale names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: Option<EntityId>,
    pub code: String,
    pub translations: BTreeMap<String, OptionTranslation>,
}

impl Entity for ProductOption {
    const KIND: &'static str = "ProductOption";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionTranslation {
    pub locale: String,
    pub name: String,
}

/// Product option value (e.g. "XL") with per-locale labels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductOptionValue {
    pub id: Option<EntityId>,
    pub code: String,
    pub option: Option<EntityId>,
    pub translations: BTreeMap<String, OptionValueTranslation>,
}

impl Entity for ProductOptionValue {
    const KIND: &'static str = "ProductOptionValue";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionValueTranslation {
    pub locale: String,
    pub value: String,
}
