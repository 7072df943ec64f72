//! Channel prices of product variants.
//!
//! Stored amounts are integer minor units. A proposed net amount is rounded
//! half up to two decimals before it is compared, so `12.345` and `12.35`
//! address the same stored value and the second write is not a change.

use rust_decimal::Decimal;

use commitfeed_core::MinorUnits;

use crate::pricing::{Channel, ChannelPricing, PriceBreakdown, PriceInput, PriceKind};
use crate::product::ProductVariant;

/// Reads and writes variant prices per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingWriter {
    default_channel: Option<String>,
}

impl PricingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_channel(mut self, code: impl Into<String>) -> Self {
        self.default_channel = Some(code.into());
        self
    }

    pub fn default_channel_code(&self) -> Option<&str> {
        self.default_channel.as_deref()
    }

    /// Channel used when a caller names none: the configured one, else the
    /// first of `channels`. A configured code missing from `channels` gives `None`.
    pub fn default_channel<'c>(&self, channels: &'c [Channel]) -> Option<&'c Channel> {
        match &self.default_channel {
            Some(code) => channels.iter().find(|channel| &channel.code == code),
            None => channels.first(),
        }
    }

    /// Price of `variant` on `channel`, with the variant's tax rate and the
    /// channel's base currency. A missing row reads as zero.
    pub fn get_channel_price(&self, variant: &ProductVariant, channel: &Channel, kind: PriceKind) -> PriceBreakdown {
        let net = variant
            .channel_pricing(&channel.code)
            .map(|row| row.amount(kind).to_decimal())
            .unwrap_or(Decimal::ZERO);
        let tax_percent = variant
            .tax_category
            .as_ref()
            .map(|category| category.first_rate_percent())
            .unwrap_or_default();

        PriceBreakdown {
            net,
            tax_percent,
            currency_code: channel.base_currency.code.clone(),
            currency_name: channel.base_currency.name.clone(),
        }
    }

    /// Write the proposed net amount; returns whether the variant changed.
    ///
    /// Input without a net amount (or one too large for minor units) is
    /// ignored. Creating the channel row is itself a change.
    pub fn set_channel_price(
        &self,
        variant: &mut ProductVariant,
        channel: &Channel,
        kind: PriceKind,
        input: &PriceInput,
    ) -> bool {
        let Some(proposed) = input.net.and_then(MinorUnits::from_decimal_half_up) else {
            return false;
        };

        let owner = variant.id;
        let mut created = false;
        let row = variant
            .channel_pricings
            .entry(channel.code.clone())
            .or_insert_with(|| {
                created = true;
                ChannelPricing::zero(channel.code.clone(), owner)
            });

        if row.amount(kind) == proposed {
            return created;
        }
        row.set_amount(kind, proposed);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{Currency, TaxCategory, TaxRate};
    use commitfeed_core::{EntityId, TaxPercent};
    use core::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn web() -> Channel {
        Channel::new("WEB", Currency::new("EUR", "Euro"))
    }

    fn variant() -> ProductVariant {
        ProductVariant::new(EntityId::new(10), "MUG-RED", EntityId::new(1))
    }

    #[test]
    fn rounded_amounts_are_compared_in_minor_units() {
        let writer = PricingWriter::new();
        let channel = web();
        let mut variant = variant();

        assert!(writer.set_channel_price(&mut variant, &channel, PriceKind::Current, &PriceInput::net(dec("12.345"))));
        assert_eq!(variant.channel_pricing("WEB").unwrap().price, MinorUnits::new(1235));

        assert!(!writer.set_channel_price(&mut variant, &channel, PriceKind::Current, &PriceInput::net(dec("12.345"))));
        assert!(!writer.set_channel_price(&mut variant, &channel, PriceKind::Current, &PriceInput::net(dec("12.35"))));
        assert!(writer.set_channel_price(&mut variant, &channel, PriceKind::Current, &PriceInput::net(dec("12.36"))));
        assert_eq!(variant.channel_pricing("WEB").unwrap().price, MinorUnits::new(1236));
    }

    #[test]
    fn creating_the_row_counts_as_change_even_for_zero() {
        let writer = PricingWriter::new();
        let mut variant = variant();

        assert!(writer.set_channel_price(&mut variant, &web(), PriceKind::Original, &PriceInput::net(Decimal::ZERO)));
        let row = variant.channel_pricing("WEB").unwrap();
        assert_eq!(row.product_variant, Some(EntityId::new(10)));
        assert_eq!(row.original_price, MinorUnits::ZERO);
    }

    #[test]
    fn missing_net_amount_writes_nothing() {
        let writer = PricingWriter::new();
        let mut variant = variant();

        assert!(!writer.set_channel_price(&mut variant, &web(), PriceKind::Current, &PriceInput::default()));
        assert!(variant.channel_pricings.is_empty());
    }

    #[test]
    fn current_and_original_are_independent() {
        let writer = PricingWriter::new();
        let channel = web();
        let mut variant = variant();

        writer.set_channel_price(&mut variant, &channel, PriceKind::Current, &PriceInput::net(dec("9.99")));
        assert!(writer.set_channel_price(&mut variant, &channel, PriceKind::Original, &PriceInput::net(dec("9.99"))));

        let row = variant.channel_pricing("WEB").unwrap();
        assert_eq!(row.price, row.original_price);
    }

    #[test]
    fn read_path_reports_tax_and_currency() {
        let writer = PricingWriter::new();
        let channel = web();
        let mut variant = variant();
        variant.tax_category = Some(TaxCategory {
            id: None,
            code: "standard".to_string(),
            rates: vec![TaxRate { code: "fr".to_string(), amount: dec("0.2") }],
        });
        writer.set_channel_price(&mut variant, &channel, PriceKind::Current, &PriceInput::net(dec("12.345")));

        let breakdown = writer.get_channel_price(&variant, &channel, PriceKind::Current);
        assert_eq!(breakdown.net, dec("12.35"));
        assert_eq!(breakdown.tax_percent.value(), Decimal::from(20));
        assert_eq!(breakdown.currency_code, "EUR");
        assert_eq!(breakdown.currency_name, "Euro");
    }

    #[test]
    fn default_channel_prefers_configured_code() {
        let channels = vec![web(), Channel::new("SHOP", Currency::new("USD", "US Dollar"))];

        assert_eq!(PricingWriter::new().default_channel(&channels).map(|c| c.code.as_str()), Some("WEB"));
        let writer = PricingWriter::new().with_default_channel("SHOP");
        assert_eq!(writer.default_channel_code(), Some("SHOP"));
        assert_eq!(writer.default_channel(&channels).map(|c| c.code.as_str()), Some("SHOP"));
        assert!(PricingWriter::new().with_default_channel("B2B").default_channel(&channels).is_none());
        assert!(PricingWriter::new().default_channel(&[]).is_none());
    }

    #[test]
    fn read_path_defaults_to_zero() {
        let breakdown = PricingWriter::new().get_channel_price(&variant(), &web(), PriceKind::Original);
        assert_eq!(breakdown.net, Decimal::ZERO);
        assert_eq!(breakdown.tax_percent, TaxPercent::zero());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

            #[test]
            fn repeating_a_write_is_never_a_change(cents in -10_000_000i64..10_000_000, scale in 0u32..5) {
                let writer = PricingWriter::new();
                let channel = web();
                let mut variant = variant();
                let input = PriceInput::net(Decimal::new(cents, scale));

                prop_assert!(writer.set_channel_price(&mut variant, &channel, PriceKind::Current, &input));
                prop_assert!(!writer.set_channel_price(&mut variant, &channel, PriceKind::Current, &input));
            }

            #[test]
            fn read_back_matches_rounded_write(cents in 0i64..10_000_000) {
                let writer = PricingWriter::new();
                let channel = web();
                let mut variant = variant();
                let amount = Decimal::new(cents, 3);

                writer.set_channel_price(&mut variant, &channel, PriceKind::Original, &PriceInput::net(amount));
                let read = writer.get_channel_price(&variant, &channel, PriceKind::Original).net;
                prop_assert_eq!(read, amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero));
            }
        }
    }
}
