use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use commitfeed_core::{Entity, EntityId, MinorUnits, TaxPercent};

/// ISO currency (code + display name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
}

impl Currency {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Sales channel with its base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Option<EntityId>,
    pub code: String,
    pub base_currency: Currency,
}

impl Channel {
    pub fn new(code: impl Into<String>, base_currency: Currency) -> Self {
        Self {
            id: None,
            code: code.into(),
            base_currency,
        }
    }
}

impl Entity for Channel {
    const KIND: &'static str = "Channel";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

/// Tax rate as a fraction (0.2 for 20%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate {
    pub code: String,
    pub amount: Decimal,
}

/// Tax category attached to a variant. Only the first rate is used for prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCategory {
    pub id: Option<EntityId>,
    pub code: String,
    pub rates: Vec<TaxRate>,
}

impl TaxCategory {
    /// First rate in percent, zero when the category has no rate.
    pub fn first_rate_percent(&self) -> TaxPercent {
        self.rates
            .first()
            .map(|rate| TaxPercent::from_rate(rate.amount))
            .unwrap_or_else(TaxPercent::zero)
    }
}

impl Entity for TaxCategory {
    const KIND: &'static str = "TaxCategory";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

/// Price of one variant on one channel, in minor units.
///
/// Unique per (variant, channel code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPricing {
    pub id: Option<EntityId>,
    pub channel_code: String,
    pub product_variant: Option<EntityId>,
    pub price: MinorUnits,
    pub original_price: MinorUnits,
}

impl ChannelPricing {
    /// Zero-initialized row, as attached on first price write.
    pub fn zero(channel_code: impl Into<String>, product_variant: Option<EntityId>) -> Self {
        Self {
            id: None,
            channel_code: channel_code.into(),
            product_variant,
            price: MinorUnits::ZERO,
            original_price: MinorUnits::ZERO,
        }
    }

    pub fn amount(&self, kind: PriceKind) -> MinorUnits {
        match kind {
            PriceKind::Current => self.price,
            PriceKind::Original => self.original_price,
        }
    }

    pub fn set_amount(&mut self, kind: PriceKind, amount: MinorUnits) {
        match kind {
            PriceKind::Current => self.price = amount,
            PriceKind::Original => self.original_price = amount,
        }
    }
}

impl Entity for ChannelPricing {
    const KIND: &'static str = "ChannelPricing";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

/// Which of the two stored amounts a price field addresses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceKind {
    /// Selling price.
    Current,
    /// Price before discount ("compare at").
    Original,
}

/// Proposed price as received from a sync target.
///
/// Only the net amount drives the write; tax and currency are informative.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceInput {
    #[serde(rename = "ht", default)]
    pub net: Option<Decimal>,
    #[serde(rename = "vat", default)]
    pub tax_percent: Option<Decimal>,
    #[serde(rename = "code", default)]
    pub currency_code: Option<String>,
}

impl PriceInput {
    pub fn net(amount: Decimal) -> Self {
        Self {
            net: Some(amount),
            ..Self::default()
        }
    }
}

/// Read-side view of a variant price on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub net: Decimal,
    pub tax_percent: TaxPercent,
    pub currency_code: String,
    pub currency_name: String,
}
