//! Checkout
//!
//! Reads the final cart state into an order draft for the remote e-commerce
//! API. Submitting the draft goes through [`CheckoutGateway`]; the cart is
//! only cleared once the gateway accepts the order.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::CartStore,
    pricing::{PricingError, sum_totals, to_money},
};

/// Errors that can occur while preparing or submitting an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// The cart is not linked to a server-side session or cart record.
    #[error("cart has no session or cart id")]
    NoSession,

    /// A line has a quantity of zero (size id).
    #[error("line {0} has a quantity of zero")]
    ZeroQuantity(String),

    /// The remote API refused the order.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One line of an order draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product display name
    pub product_name: String,

    /// Flavour id
    pub flavour_id: Option<u64>,

    /// Size id
    pub size_id: String,

    /// Quantity ordered
    pub quantity: u32,

    /// Effective unit price in minor units
    pub unit_price: Decimal,

    /// Line total in minor units
    pub total: Decimal,
}

/// An order ready to be submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Server-side cart session
    pub session: Option<String>,

    /// Server-side cart record id
    pub cart_id: Option<u64>,

    /// ISO currency code
    pub currency: &'static str,

    /// Ordered lines, in cart order
    pub lines: Vec<OrderLine>,

    /// Sum of line totals in minor units
    pub subtotal: i64,
}

impl OrderDraft {
    /// Capture the cart's current state as an order draft.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart has no lines.
    /// - [`CheckoutError::NoSession`]: neither a session nor a cart id is set.
    /// - [`CheckoutError::ZeroQuantity`]: a line has a quantity of zero.
    /// - [`CheckoutError::Pricing`]: the subtotal does not fit into minor units.
    pub fn from_cart(cart: &CartStore) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let meta = cart.meta();

        if !meta.is_linked() {
            return Err(CheckoutError::NoSession);
        }

        let lines = cart
            .iter()
            .map(|line| {
                if line.quantity() == 0 {
                    return Err(CheckoutError::ZeroQuantity(line.size_id().to_string()));
                }

                Ok(OrderLine {
                    product_name: line.product_name().to_string(),
                    flavour_id: line.flavour_id(),
                    size_id: line.size_id().to_string(),
                    quantity: line.quantity(),
                    unit_price: line.unit_price(),
                    total: line.total(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal = to_money(sum_totals(cart.items())?, cart.currency())?;

        Ok(OrderDraft {
            session: meta.session.clone(),
            cart_id: meta.cart_id,
            currency: cart.currency().iso_alpha_code,
            lines,
            subtotal: subtotal.to_minor_units(),
        })
    }
}

/// Confirmation returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    /// Order reference assigned by the remote API
    pub order_id: String,
}

/// Seam to the remote e-commerce API.
#[cfg_attr(test, mockall::automock)]
pub trait CheckoutGateway {
    /// Submit an order draft.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Rejected`] if the remote API refuses the order.
    fn submit(&self, draft: &OrderDraft) -> Result<OrderReceipt, CheckoutError>;
}

/// Submit the cart as an order, clearing it once the order is accepted.
///
/// # Errors
///
/// Returns the errors of [`OrderDraft::from_cart`] and of the gateway. The
/// cart is left untouched on error.
pub fn checkout(
    cart: &mut CartStore,
    gateway: &impl CheckoutGateway,
) -> Result<OrderReceipt, CheckoutError> {
    let draft = OrderDraft::from_cart(cart)?;

    let receipt = gateway.submit(&draft).inspect_err(|error| {
        warn!(
            cart_id = draft.cart_id,
            error = %error,
            "order submission failed"
        );
    })?;

    info!(
        order_id = receipt.order_id.as_str(),
        cart_id = draft.cart_id,
        lines = draft.lines.len(),
        subtotal = draft.subtotal,
        "order submitted"
    );

    cart.clear();

    Ok(receipt)
}
