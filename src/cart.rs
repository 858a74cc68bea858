//! Cart
//!
//! The cart store owns the line items and session metadata for one client
//! session. Every mutating operation is total: it always succeeds and keeps
//! each line's total in step with its quantity.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    items::{LineItem, NewLineItem},
    meta::CartMeta,
    pricing::{PricingError, line_savings, sum_totals, to_money},
};

/// Line items in display order plus session metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    #[serde(default)]
    items: Vec<LineItem>,

    #[serde(default)]
    meta: CartMeta,
}

impl CartState {
    /// Line items in insertion order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Session metadata
    pub fn meta(&self) -> &CartMeta {
        &self.meta
    }
}

/// Cart Store
#[derive(Debug, Clone)]
pub struct CartStore {
    state: CartState,
    currency: &'static Currency,
}

impl CartStore {
    /// Create an empty cart priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_state(CartState::default(), currency)
    }

    /// Create a cart from previously captured state.
    pub fn with_state(state: CartState, currency: &'static Currency) -> Self {
        CartStore { state, currency }
    }

    /// Add a line, merging it into an existing line for the same variant.
    ///
    /// Lines match on size id, flavour name and size name. A merged line keeps
    /// its own prices; the incoming item's prices are discarded.
    pub fn add(&mut self, item: NewLineItem) {
        let key = item.key();

        if let Some(existing) = self.state.items.iter_mut().find(|line| line.key() == key) {
            existing.increase_quantity(item.quantity);

            debug!(
                size_id = existing.size_id(),
                added = item.quantity,
                quantity = existing.quantity(),
                total = %existing.total(),
                "merged line item"
            );
        } else {
            let line = LineItem::from(item);

            debug!(
                size_id = line.size_id(),
                quantity = line.quantity(),
                total = %line.total(),
                "appended line item"
            );

            self.state.items.push(line);
        }
    }

    /// Remove every line with the given size id, whatever its flavour or size name.
    pub fn remove(&mut self, size_id: &str) {
        let before = self.state.items.len();

        self.state.items.retain(|line| line.size_id() != size_id);

        debug!(
            size_id,
            removed = before - self.state.items.len(),
            "removed line items"
        );
    }

    /// Set the quantity of the first line with the given size id.
    ///
    /// Does nothing if no line matches.
    pub fn update_quantity(&mut self, size_id: &str, quantity: u32) {
        let Some(line) = self
            .state
            .items
            .iter_mut()
            .find(|line| line.size_id() == size_id)
        else {
            trace!(size_id, "no line item to update");
            return;
        };

        line.set_quantity(quantity);

        debug!(
            size_id,
            quantity,
            total = %line.total(),
            "updated line item quantity"
        );
    }

    /// Overwrite the session metadata. Absent values are stored as absent.
    pub fn set_meta(&mut self, session: Option<String>, cart_id: Option<u64>) {
        self.state.meta = CartMeta::new(session, cart_id);

        debug!(
            session = self.state.meta.session.as_deref(),
            cart_id = self.state.meta.cart_id,
            "set cart meta"
        );
    }

    /// Reset the session metadata, leaving line items alone.
    pub fn clear_meta(&mut self) {
        self.state.meta = CartMeta::default();

        debug!("cleared cart meta");
    }

    /// Drop all line items and metadata.
    pub fn clear(&mut self) {
        self.state = CartState::default();

        debug!("cleared cart");
    }

    /// Get the line items in display order.
    pub fn items(&self) -> &[LineItem] {
        self.state.items()
    }

    /// Iterate over the line items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.state.items.iter()
    }

    /// Find the first line with the given size id.
    pub fn line(&self, size_id: &str) -> Option<&LineItem> {
        self.iter().find(|line| line.size_id() == size_id)
    }

    /// Get the session metadata.
    pub fn meta(&self) -> &CartMeta {
        self.state.meta()
    }

    /// Get the current state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Consume the store, returning its state.
    pub fn into_state(self) -> CartState {
        self.state
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the sum does not fit into minor units.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        to_money(sum_totals(self.items())?, self.currency)
    }

    /// Calculate how much the discounted prices save against base prices.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the sum does not fit into minor units.
    pub fn savings(&self) -> Result<Money<'static, Currency>, PricingError> {
        let savings = self.iter().try_fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line_savings(line))
                .ok_or(PricingError::Overflow(acc))
        })?;

        to_money(savings, self.currency)
    }
}
