//! Pricing
//!
//! Prices are held in currency minor units (pence/cents). A line's discounted
//! price arrives from the storefront API as a loosely-typed number, so the
//! effective unit price is resolved here with an explicit finite check.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::items::LineItem;

/// Errors that can occur while converting cart amounts into money.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Amount does not fit into `i64` minor units.
    #[error("amount {0} does not fit in minor units")]
    Overflow(Decimal),
}

/// Resolves the price actually charged per unit.
///
/// Uses `price_discount` when it is a finite number, otherwise falls back to
/// `price`, otherwise to zero. Finite discounts beyond the [`Decimal`] range
/// saturate at its bounds.
pub fn effective_unit_price(price_discount: Option<f64>, price: Option<i64>) -> Decimal {
    price_discount
        .filter(|discounted| discounted.is_finite())
        .map(saturating_decimal)
        .or_else(|| price.map(Decimal::from))
        .unwrap_or(Decimal::ZERO)
}

/// Converts a finite float, clamping to the decimal range.
fn saturating_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        if value.abs() < 1.0 {
            Decimal::ZERO
        } else if value.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Calculates a line total for the given unit price and quantity.
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price.saturating_mul(Decimal::from(quantity))
}

/// Converts an amount in minor units into money, rounding half to even.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the rounded amount does not fit into `i64`.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor_units = amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
        .ok_or(PricingError::Overflow(amount))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Sums the line totals of the given items, in minor units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the sum exceeds the decimal range.
pub fn sum_totals(items: &[LineItem]) -> Result<Decimal, PricingError> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.total())
            .ok_or(PricingError::Overflow(acc))
    })
}

/// Calculates how much a line saves against its base price, in minor units.
///
/// Only lines whose effective unit price comes from a finite discounted price
/// below the base price save anything.
pub fn line_savings(item: &LineItem) -> Decimal {
    let Some(base) = item.price().map(Decimal::from) else {
        return Decimal::ZERO;
    };

    let unit = item.unit_price();

    if item.has_discount_price() && unit < base {
        line_total(base - unit, item.quantity())
    } else {
        Decimal::ZERO
    }
}
