//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{
    catalog::{Flavour, Image, Product, Size},
    fixtures::FixtureError,
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Currency code every price must use (e.g., "GBP")
    pub currency: String,

    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: u64,

    /// Product name
    pub name: String,

    /// Product image
    #[serde(default)]
    pub image: Option<Image>,

    /// Available flavours
    #[serde(default)]
    pub flavours: Vec<Flavour>,

    /// Available sizes
    pub sizes: Vec<SizeFixture>,
}

/// Size Fixture
#[derive(Debug, Deserialize)]
pub struct SizeFixture {
    /// Size id
    pub id: String,

    /// Size name
    pub name: String,

    /// Base price (e.g., "4.50 GBP")
    pub price: String,

    /// Discounted price (e.g., "3.99 GBP")
    #[serde(default)]
    pub price_discount: Option<String>,

    /// Discount descriptor, passed through untouched
    #[serde(default)]
    pub discount: Option<String>,
}

impl ProductFixture {
    /// Convert into a catalog product, checking every price uses `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed or uses another currency.
    pub fn try_into_product(self, currency: &'static Currency) -> Result<Product, FixtureError> {
        let sizes = self
            .sizes
            .into_iter()
            .map(|size| size.try_into_size(currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Product {
            id: self.id,
            name: self.name,
            image: self.image,
            flavours: self.flavours,
            sizes,
        })
    }
}

impl SizeFixture {
    fn try_into_size(self, currency: &'static Currency) -> Result<Size, FixtureError> {
        let price = parse_price_in(&self.price, currency)?
            .to_i64()
            .ok_or_else(|| FixtureError::InvalidPrice(self.price.clone()))?;

        let price_discount = self
            .price_discount
            .as_deref()
            .map(|discounted| parse_price_in(discounted, currency))
            .transpose()?;

        Ok(Size {
            id: self.id,
            name: self.name,
            price: Some(price),
            price_discount: price_discount.and_then(|minor_units| minor_units.to_f64()),
            discount: self.discount.map(serde_json::Value::String),
        })
    }
}

fn parse_price_in(s: &str, currency: &'static Currency) -> Result<Decimal, FixtureError> {
    let (minor_units, price_currency) = parse_price(s)?;

    if price_currency != currency {
        return Err(FixtureError::CurrencyMismatch(
            currency.iso_alpha_code.to_string(),
            price_currency.iso_alpha_code.to_string(),
        ));
    }

    Ok(minor_units)
}

/// Parse a price such as `"3.99 GBP"` into whole minor units of its currency.
///
/// # Errors
///
/// - [`FixtureError::InvalidPrice`]: not `AMOUNT CODE`, or the amount is not a
///   whole number of minor units.
/// - [`FixtureError::UnknownCurrency`]: the code is not supported.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let invalid = || FixtureError::InvalidPrice(s.to_string());

    let (amount, code) = s.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
    let currency = parse_currency(code.trim())?;

    let minor_units = (0..currency.exponent)
        .try_fold(amount.parse::<Decimal>().map_err(|_err| invalid())?, |acc, _| {
            acc.checked_mul(Decimal::TEN)
        })
        .filter(|minor_units| minor_units.fract().is_zero())
        .ok_or_else(invalid)?;

    Ok((minor_units.normalize(), currency))
}

/// Parse a supported currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes other than GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
