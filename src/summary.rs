//! Summary
//!
//! Terminal rendering of a cart: one row per line, then the totals and the
//! session the cart is linked to.

use std::io;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartStore,
    items::LineItem,
    pricing::{PricingError, to_money},
};

/// Errors that can occur when writing a cart summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Output could not be written.
    #[error("Failed to write summary: {0}")]
    Io(#[from] io::Error),
}

/// Write the cart as a table followed by its totals.
///
/// # Errors
///
/// Returns a [`SummaryError`] if an amount cannot be represented or the
/// output cannot be written.
pub fn write_cart(out: &mut impl io::Write, cart: &CartStore) -> Result<(), SummaryError> {
    if cart.is_empty() {
        writeln!(out, "\nCart is empty")?;
    } else {
        let mut builder = Builder::default();

        builder.push_record(["#", "Product", "Variant", "Unit", "Qty", "Total"]);

        for (idx, line) in cart.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.product_name().to_string(),
                variant_label(line),
                format_minor(line.unit_price(), cart.currency())?,
                line.quantity().to_string(),
                format_minor(line.total(), cart.currency())?,
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "\n{table}")?;
    }

    writeln!(out, " Subtotal: {}", cart.subtotal()?)?;
    writeln!(out, " Savings:  {}", cart.savings()?)?;
    writeln!(out, " Items:    {}", cart.total_quantity())?;

    let meta = cart.meta();

    writeln!(
        out,
        " Session:  {} (cart {})",
        meta.session.as_deref().unwrap_or("-"),
        meta.cart_id
            .map_or_else(|| "-".to_string(), |cart_id| cart_id.to_string())
    )?;

    Ok(())
}

fn variant_label(line: &LineItem) -> String {
    match (line.flavour_name(), line.size_name()) {
        ("", "") => line.size_id().to_string(),
        ("", size) => size.to_string(),
        (flavour, "") => flavour.to_string(),
        (flavour, size) => format!("{flavour} / {size}"),
    }
}

fn format_minor(amount: Decimal, currency: &'static Currency) -> Result<String, PricingError> {
    Ok(to_money(amount, currency)?.to_string())
}
