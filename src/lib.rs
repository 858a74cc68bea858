//! Capra
//!
//! Capra is the cart state engine behind the goat-milk storefront: an owned
//! store of cart line items and session metadata, plus the catalog, storage
//! and checkout seams around it.

pub mod actions;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod fixtures;
pub mod items;
pub mod meta;
pub mod prelude;
pub mod pricing;
pub mod storage;
pub mod summary;
