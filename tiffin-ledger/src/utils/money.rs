//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored as `f64`. Every sum goes through `Decimal` and is
//! rounded to 2 places once at the end, so `0.1 + 0.2` totals `0.30`.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal; non-finite values count as zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for serialization, rounded to 2 places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Running total with an entry count
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub amount: Decimal,
    pub count: i64,
}

impl Tally {
    pub fn add(&mut self, price: f64) {
        self.amount += to_decimal(price);
        self.count += 1;
    }

    pub fn merge(&mut self, other: Tally) {
        self.amount += other.amount;
        self.count += other.count;
    }

    pub fn total(&self) -> f64 {
        to_f64(self.amount)
    }
}

/// Sum a sequence of prices
pub fn sum_prices(prices: impl IntoIterator<Item = f64>) -> f64 {
    let total: Decimal = prices.into_iter().map(to_decimal).sum();
    to_f64(total)
}
