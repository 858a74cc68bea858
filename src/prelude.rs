//! Capra prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    actions::CartAction,
    cart::{CartState, CartStore},
    catalog::{Catalog, CatalogError, Flavour, Image, Product, ProductKey, Size},
    checkout::{CheckoutError, CheckoutGateway, OrderDraft, OrderLine, OrderReceipt, checkout},
    fixtures::{Fixture, FixtureError},
    items::{LineItem, NewLineItem, VariantKey},
    meta::CartMeta,
    pricing::{PricingError, effective_unit_price},
    storage::{CartStorage, FileStorage, MemoryStorage, StorageError},
    summary::{SummaryError, write_cart},
};
