//! Catalog store model and idempotent field writers.
//!
//! This crate mirrors the shape of the catalog/order store as seen by the change
//! feed (products, variants, translations, channel prices, parties, orders) and
//! implements the "locate-or-create, compare, write-only-on-change" upserts for
//! multi-locale text and multi-channel prices. No IO, no storage.

pub mod locale;
pub mod order;
pub mod party;
pub mod prices;
pub mod pricing;
pub mod product;
pub mod snapshot;
pub mod translations;

pub use locale::{Locale, LocaleSettings};
pub use order::Order;
pub use party::{Address, Customer};
pub use prices::PricingWriter;
pub use pricing::{
    Channel, ChannelPricing, Currency, PriceBreakdown, PriceInput, PriceKind, TaxCategory, TaxRate,
};
pub use product::{
    OptionTranslation, OptionValueTranslation, Product, ProductOption, ProductOptionValue,
    ProductTranslation, ProductVariant, TranslatedField,
};
pub use snapshot::EntitySnapshot;
pub use translations::TranslationWriter;
