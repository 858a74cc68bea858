//! Catalog
//!
//! Product collections as served by the storefront's REST API, and the
//! translation of a variant selection into a cart line.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::items::{NewLineItem, deserialize_loose_number};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Errors raised while reading the catalog or selecting a variant.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Product collection could not be parsed.
    #[error("Failed to parse product collection: {0}")]
    Json(#[from] serde_json::Error),

    /// No product with the given id.
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    /// Product has no flavour with the given id (product id, flavour id).
    #[error("Product {0} has no flavour {1}")]
    UnknownFlavour(u64, u64),

    /// Product has no size with the given id (product id, size id).
    #[error("Product {0} has no size {1}")]
    UnknownSize(u64, String),
}

/// Product image
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Image {
    /// Image id
    pub id: u64,

    /// Image URL
    pub url: String,
}

/// Flavour variant
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Flavour {
    /// Flavour id
    pub id: u64,

    /// Flavour name
    pub name: String,
}

/// Size variant with its pricing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Size {
    /// Size id
    pub id: String,

    /// Size name
    pub name: String,

    /// Base unit price in minor units
    #[serde(default)]
    pub price: Option<i64>,

    /// Discounted unit price in minor units
    #[serde(default, deserialize_with = "deserialize_loose_number")]
    pub price_discount: Option<f64>,

    /// Opaque discount descriptor
    #[serde(default)]
    pub discount: Option<Value>,
}

/// Product
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
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
    #[serde(default)]
    pub sizes: Vec<Size>,
}

impl Product {
    /// Build the add-to-cart input for a flavour and size of this product.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnknownFlavour`]: the flavour is not offered for this product.
    /// - [`CatalogError::UnknownSize`]: the size is not offered for this product.
    pub fn line_item(
        &self,
        flavour_id: Option<u64>,
        size_id: &str,
        quantity: u32,
    ) -> Result<NewLineItem, CatalogError> {
        let flavour = flavour_id
            .map(|flavour_id| {
                self.flavours
                    .iter()
                    .find(|flavour| flavour.id == flavour_id)
                    .ok_or(CatalogError::UnknownFlavour(self.id, flavour_id))
            })
            .transpose()?;

        let size = self
            .sizes
            .iter()
            .find(|size| size.id == size_id)
            .ok_or_else(|| CatalogError::UnknownSize(self.id, size_id.to_string()))?;

        Ok(NewLineItem {
            product_name: self.name.clone(),
            flavour_id: flavour.map(|flavour| flavour.id),
            flavour_name: flavour.map(|flavour| flavour.name.clone()).unwrap_or_default(),
            size_id: size.id.clone(),
            size_name: size.name.clone(),
            price: size.price,
            discount: size.discount.clone(),
            price_discount: size.price_discount,
            image_id: self.image.as_ref().map(|image| image.id),
            image_url: self.image.as_ref().map(|image| image.url.clone()),
            quantity,
        })
    }
}

/// Products keyed for lookup by their API id.
#[derive(Debug, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    product_keys: FxHashMap<u64, ProductKey>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if the collection cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;

        Ok(products.into_iter().collect())
    }

    /// Insert a product, replacing any product with the same id.
    pub fn insert(&mut self, product: Product) -> ProductKey {
        if let Some(&key) = self.product_keys.get(&product.id)
            && let Some(slot) = self.products.get_mut(key)
        {
            *slot = product;
            return key;
        }

        let id = product.id;
        let key = self.products.insert(product);
        self.product_keys.insert(id, key);

        key
    }

    /// Get a product by its key.
    pub fn get(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Get a product by its API id.
    pub fn product(&self, id: u64) -> Option<&Product> {
        self.product_keys
            .get(&id)
            .and_then(|key| self.products.get(*key))
    }

    /// Build the add-to-cart input for a product variant.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] for an unknown product, or
    /// the errors of [`Product::line_item`].
    pub fn line_item(
        &self,
        product_id: u64,
        flavour_id: Option<u64>,
        size_id: &str,
        quantity: u32,
    ) -> Result<NewLineItem, CatalogError> {
        self.product(product_id)
            .ok_or(CatalogError::ProductNotFound(product_id))?
            .line_item(flavour_id, size_id, quantity)
    }

    /// Iterate over the products.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product)> {
        self.products.iter()
    }

    /// Get the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut catalog = Catalog::new();

        for product in iter {
            catalog.insert(product);
        }

        catalog
    }
}
