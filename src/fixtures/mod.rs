//! Fixtures
//!
//! YAML fixture sets: a catalog under `catalog/<name>.yml` and a scripted
//! sequence of cart changes under `carts/<name>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    actions::CartAction,
    cart::CartStore,
    catalog::{Catalog, CatalogError, Product, ProductKey},
    fixtures::{
        carts::{CartFixture, CartStep},
        catalog::{CatalogFixture, parse_currency},
    },
};

pub mod carts;
pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between catalog and price
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No catalog loaded yet
    #[error("No catalog loaded yet; currency unknown")]
    NoCurrency,

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Variant selection error
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded products
    catalog: Catalog,

    /// Fixture key -> catalog key
    product_keys: FxHashMap<String, ProductKey>,

    /// Scripted cart changes
    steps: Vec<CartStep>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            product_keys: FxHashMap::default(),
            steps: Vec::new(),
            currency: None,
        }
    }

    /// Load a catalog from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a price
    /// is invalid or in another currency.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        let currency = parse_currency(&fixture.currency)?;

        if let Some(existing) = self.currency
            && existing != currency
        {
            return Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            ));
        }

        self.currency = Some(currency);

        for (key, product_fixture) in fixture.products {
            let product = product_fixture.try_into_product(currency)?;
            let product_key = self.catalog.insert(product);

            self.product_keys.insert(key, product_key);
        }

        debug!(
            name,
            products = self.catalog.len(),
            "loaded catalog fixture"
        );

        Ok(self)
    }

    /// Load a cart script from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        self.steps.extend(fixture.steps);

        debug!(name, steps = self.steps.len(), "loaded cart fixture");

        Ok(self)
    }

    /// Load a complete fixture set (catalog and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?.load_cart(name)?;

        Ok(fixture)
    }

    /// Get a product by its fixture key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        let product_key = self
            .product_keys
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))?;

        self.catalog
            .get(*product_key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get the loaded catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the scripted steps
    pub fn steps(&self) -> &[CartStep] {
        &self.steps
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Resolve the scripted steps into cart actions
    ///
    /// # Errors
    ///
    /// Returns an error if a step references an unknown product or variant.
    pub fn actions(&self) -> Result<Vec<CartAction>, FixtureError> {
        self.steps.iter().map(|step| self.action(step)).collect()
    }

    /// Build a cart by replaying the scripted steps
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog is loaded or a step cannot be resolved.
    pub fn cart(&self) -> Result<CartStore, FixtureError> {
        let mut cart = CartStore::new(self.currency()?);

        cart.replay(self.actions()?);

        Ok(cart)
    }

    fn action(&self, step: &CartStep) -> Result<CartAction, FixtureError> {
        Ok(match step {
            CartStep::Add {
                product,
                flavour,
                size,
                quantity,
            } => CartAction::Add(self.product(product)?.line_item(*flavour, size, *quantity)?),
            CartStep::Remove { size } => CartAction::Remove {
                size_id: size.clone(),
            },
            CartStep::UpdateQuantity { size, quantity } => CartAction::UpdateQuantity {
                size_id: size.clone(),
                quantity: *quantity,
            },
            CartStep::SetMeta { session, cart_id } => CartAction::SetMeta {
                session: session.clone(),
                cart_id: *cart_id,
            },
            CartStep::ClearMeta => CartAction::ClearMeta,
        })
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;
    use rusty_money::iso::GBP;
    use tempfile::{TempDir, tempdir};
    use testresult::TestResult;

    use super::*;

    const CATALOG: &str = "
currency: GBP
products:
  soap:
    id: 1
    name: Goat Milk Soap
    flavours:
      - id: 1
        name: Original
    sizes:
      - id: SOAP-100
        name: 100g
        price: 4.50 GBP
        price_discount: 3.99 GBP
";

    fn write_set(name: &str, catalog: &str, cart: &str) -> Result<TempDir, std::io::Error> {
        let dir = tempdir()?;

        fs::create_dir_all(dir.path().join("catalog"))?;
        fs::create_dir_all(dir.path().join("carts"))?;
        fs::write(dir.path().join("catalog").join(format!("{name}.yml")), catalog)?;
        fs::write(dir.path().join("carts").join(format!("{name}.yml")), cart)?;

        Ok(dir)
    }

    #[test]
    fn cart_replays_steps_through_catalog() -> TestResult {
        let dir = write_set(
            "basic",
            CATALOG,
            "
steps:
  - action: add
    product: soap
    flavour: 1
    size: SOAP-100
    quantity: 1
  - action: add
    product: soap
    flavour: 1
    size: SOAP-100
    quantity: 2
  - action: set_meta
    session: abc
    cart_id: 9
",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_catalog("basic")?.load_cart("basic")?;

        let cart = fixture.cart()?;

        assert_eq!(fixture.currency()?, GBP);
        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.line("SOAP-100").map(|line| line.total()),
            Some(Decimal::from(1197))
        );
        assert_eq!(cart.meta().cart_id, Some(9));

        Ok(())
    }

    #[test]
    fn unknown_product_key_errors() -> TestResult {
        let dir = write_set(
            "missing",
            CATALOG,
            "
steps:
  - action: add
    product: cheese
    size: CH-1
    quantity: 1
",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_catalog("missing")?.load_cart("missing")?;

        assert!(matches!(
            fixture.cart(),
            Err(FixtureError::ProductNotFound(key)) if key == "cheese"
        ));

        Ok(())
    }

    #[test]
    fn unknown_size_errors() -> TestResult {
        let dir = write_set(
            "size",
            CATALOG,
            "
steps:
  - action: add
    product: soap
    size: SOAP-999
    quantity: 1
",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_catalog("size")?.load_cart("size")?;

        assert!(matches!(
            fixture.cart(),
            Err(FixtureError::Catalog(CatalogError::UnknownSize(1, _)))
        ));

        Ok(())
    }

    #[test]
    fn cart_without_catalog_has_no_currency() {
        let fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(fixture.cart(), Err(FixtureError::NoCurrency)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(
            fixture.load_catalog("nothing"),
            Err(FixtureError::Io(_))
        ));
    }
}
