//! Items
//!
//! Cart line items. A [`NewLineItem`] is what an add-to-cart action supplies;
//! a [`LineItem`] is what the cart holds, with its total kept in step with its
//! quantity and prices.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::pricing::{effective_unit_price, line_total};

/// A product variant and requested quantity, as supplied to the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    /// Display label, not an identifier.
    pub product_name: String,

    /// Selected flavour.
    #[serde(default)]
    pub flavour_id: Option<u64>,

    /// Selected flavour name.
    #[serde(default)]
    pub flavour_name: String,

    /// Selected size.
    pub size_id: String,

    /// Selected size name.
    #[serde(default)]
    pub size_name: String,

    /// Base unit price in minor units.
    #[serde(default)]
    pub price: Option<i64>,

    /// Opaque discount descriptor, carried through untouched.
    #[serde(default)]
    pub discount: Option<Value>,

    /// Discounted unit price in minor units, possibly non-finite.
    #[serde(
        rename = "price_discount",
        default,
        deserialize_with = "deserialize_loose_number"
    )]
    pub price_discount: Option<f64>,

    /// Image identifier.
    #[serde(default)]
    pub image_id: Option<u64>,

    /// Image URL.
    #[serde(default)]
    pub image_url: Option<String>,

    /// Requested quantity.
    pub quantity: u32,
}

impl NewLineItem {
    /// Returns the key used to merge repeated adds of the same variant.
    pub fn key(&self) -> VariantKey<'_> {
        VariantKey {
            size_id: &self.size_id,
            flavour_name: &self.flavour_name,
            size_name: &self.size_name,
        }
    }
}

/// Identity of a line for merging: size id plus flavour and size names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantKey<'a> {
    /// Size id
    pub size_id: &'a str,

    /// Flavour name
    pub flavour_name: &'a str,

    /// Size name
    pub size_name: &'a str,
}

/// A line in the cart.
///
/// The total is derived from the quantity and the effective unit price and
/// is recomputed on every change, including deserialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NewLineItem")]
pub struct LineItem {
    #[serde(flatten)]
    details: NewLineItem,

    total: Decimal,
}

impl LineItem {
    /// Product display name
    pub fn product_name(&self) -> &str {
        &self.details.product_name
    }

    /// Flavour id
    pub fn flavour_id(&self) -> Option<u64> {
        self.details.flavour_id
    }

    /// Flavour name
    pub fn flavour_name(&self) -> &str {
        &self.details.flavour_name
    }

    /// Size id
    pub fn size_id(&self) -> &str {
        &self.details.size_id
    }

    /// Size name
    pub fn size_name(&self) -> &str {
        &self.details.size_name
    }

    /// Base unit price in minor units
    pub fn price(&self) -> Option<i64> {
        self.details.price
    }

    /// Opaque discount descriptor
    pub fn discount(&self) -> Option<&Value> {
        self.details.discount.as_ref()
    }

    /// Discounted unit price in minor units, as supplied
    pub fn price_discount(&self) -> Option<f64> {
        self.details.price_discount
    }

    /// Image id
    pub fn image_id(&self) -> Option<u64> {
        self.details.image_id
    }

    /// Image URL
    pub fn image_url(&self) -> Option<&str> {
        self.details.image_url.as_deref()
    }

    /// Requested quantity
    pub fn quantity(&self) -> u32 {
        self.details.quantity
    }

    /// Line total in minor units
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Returns the price charged per unit for this line.
    pub fn unit_price(&self) -> Decimal {
        effective_unit_price(self.details.price_discount, self.details.price)
    }

    /// Whether the unit price comes from a usable discounted price.
    pub fn has_discount_price(&self) -> bool {
        self.details
            .price_discount
            .is_some_and(|discounted| discounted.is_finite())
    }

    /// Returns the key used to merge repeated adds of the same variant.
    pub fn key(&self) -> VariantKey<'_> {
        self.details.key()
    }

    /// Grows the quantity, keeping this line's own prices.
    pub(crate) fn increase_quantity(&mut self, quantity: u32) {
        self.details.quantity = self.details.quantity.saturating_add(quantity);
        self.recompute_total();
    }

    /// Replaces the quantity.
    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.details.quantity = quantity;
        self.recompute_total();
    }

    fn recompute_total(&mut self) {
        self.total = line_total(self.unit_price(), self.details.quantity);
    }
}

impl From<NewLineItem> for LineItem {
    fn from(details: NewLineItem) -> Self {
        let mut item = Self {
            details,
            total: Decimal::ZERO,
        };

        item.recompute_total();

        item
    }
}

/// Accepts numbers, numeric strings and null; anything else reads as absent.
pub(crate) fn deserialize_loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Number(number)) => Some(number),
        Some(Loose::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(Loose::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn soap(quantity: u32) -> NewLineItem {
        NewLineItem {
            product_name: "Goat Milk Soap".to_string(),
            flavour_id: Some(1),
            flavour_name: "Original".to_string(),
            size_id: "S1".to_string(),
            size_name: "100g".to_string(),
            price: Some(100),
            quantity,
            ..NewLineItem::default()
        }
    }

    #[test]
    fn new_line_item_computes_total() {
        let item = LineItem::from(soap(3));

        assert_eq!(item.total(), Decimal::from(300));
    }

    #[test]
    fn nan_discount_uses_base_price() {
        let item = LineItem::from(NewLineItem {
            price_discount: Some(f64::NAN),
            ..soap(4)
        });

        assert_eq!(item.total(), Decimal::from(400));
        assert!(!item.has_discount_price());
    }

    #[test]
    fn quantity_changes_recompute_total() {
        let mut item = LineItem::from(NewLineItem {
            price_discount: Some(75.0),
            ..soap(1)
        });

        item.increase_quantity(2);
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.total(), Decimal::from(225));

        item.set_quantity(0);
        assert_eq!(item.total(), Decimal::ZERO);
    }

    #[test]
    fn increase_quantity_saturates() {
        let mut item = LineItem::from(soap(u32::MAX));

        item.increase_quantity(1);

        assert_eq!(item.quantity(), u32::MAX);
    }

    #[test]
    fn deserialises_storefront_field_names() -> TestResult {
        let item: NewLineItem = serde_json::from_value(json!({
            "productName": "Goat Milk Lotion",
            "flavourId": 2,
            "flavourName": "Lavender",
            "sizeId": "L250",
            "sizeName": "250ml",
            "price": 899,
            "discount": "10%",
            "price_discount": "809",
            "imageId": 7,
            "imageUrl": "/uploads/lotion.png",
            "quantity": 1
        }))?;

        assert_eq!(item.price_discount, Some(809.0));
        assert_eq!(item.discount, Some(json!("10%")));
        assert_eq!(item.image_url.as_deref(), Some("/uploads/lotion.png"));

        Ok(())
    }

    #[test]
    fn unusable_discount_values_read_as_absent() -> TestResult {
        for raw in [json!(null), json!("n/a"), json!({"amount": 5}), json!([1])] {
            let item: NewLineItem = serde_json::from_value(json!({
                "productName": "Goat Milk Soap",
                "sizeId": "S1",
                "price": 100,
                "price_discount": raw.clone(),
                "quantity": 1
            }))?;

            assert_eq!(item.price_discount, None, "raw value {raw} should be absent");
        }

        Ok(())
    }

    #[test]
    fn stored_total_is_recomputed_on_load() -> TestResult {
        let item: LineItem = serde_json::from_value(json!({
            "productName": "Goat Milk Soap",
            "sizeId": "S1",
            "price": 100,
            "quantity": 2,
            "total": 999_999
        }))?;

        assert_eq!(item.total(), Decimal::from(200));

        Ok(())
    }

    #[test]
    fn serialises_total_alongside_details() -> TestResult {
        let value = serde_json::to_value(LineItem::from(soap(2)))?;

        assert_eq!(value.get("sizeId"), Some(&json!("S1")));
        assert_eq!(value.get("quantity"), Some(&json!(2)));
        assert!(value.get("total").is_some(), "total should be serialised");

        Ok(())
    }
}
