//! Value objects: equality by value, not identity.
//!
//! Prices are stored and compared in **integer minor currency units** so that a
//! write is only reported as a change when the rounded amount actually differs.
//! Decimal inputs are converted once, at the boundary, with half-up rounding.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Marker trait for value objects (immutable, compared by value).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// An amount in minor currency units (e.g. cents).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl ValueObject for MinorUnits {}

impl MinorUnits {
    pub const ZERO: MinorUnits = MinorUnits(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    /// Convert a decimal major-unit amount, rounding half up to two decimals.
    ///
    /// Returns `None` when the amount does not fit in `i64` minor units.
    pub fn from_decimal_half_up(amount: Decimal) -> Option<Self> {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let minor = rounded.checked_mul(Decimal::ONE_HUNDRED)?;
        minor.to_i64().map(Self)
    }

    /// Major-unit decimal view (exact, two decimals).
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl core::fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.to_decimal(), f)
    }
}

/// A tax rate expressed in percent (20 for a 0.2 rate).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxPercent(Decimal);

impl ValueObject for TaxPercent {}

impl TaxPercent {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Build from a fractional rate as stored by tax categories.
    pub fn from_rate(rate: Decimal) -> Self {
        Self(rate * Decimal::ONE_HUNDRED)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}
