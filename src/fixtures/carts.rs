//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for a cart script in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Steps applied to an empty cart, in order
    pub steps: Vec<CartStep>,
}

/// One scripted change, referencing products by fixture key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CartStep {
    /// Add a product variant
    Add {
        /// Product fixture key
        product: String,

        /// Flavour id, if the product has flavours
        #[serde(default)]
        flavour: Option<u64>,

        /// Size id
        size: String,

        /// Quantity to add
        quantity: u32,
    },

    /// Remove every line with a size id
    Remove {
        /// Size id
        size: String,
    },

    /// Set a line's quantity
    UpdateQuantity {
        /// Size id
        size: String,

        /// New quantity
        quantity: u32,
    },

    /// Link the cart to a server-side session
    SetMeta {
        /// Session
        #[serde(default)]
        session: Option<String>,

        /// Cart id
        #[serde(default)]
        cart_id: Option<u64>,
    },

    /// Unlink the cart
    ClearMeta,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn steps_parse_from_yaml() -> TestResult {
        let fixture: CartFixture = serde_norway::from_str(
            "
steps:
  - action: add
    product: soap
    flavour: 1
    size: SOAP-100
    quantity: 2
  - action: update_quantity
    size: SOAP-100
    quantity: 3
  - action: set_meta
    session: abc
  - action: clear_meta
",
        )?;

        assert_eq!(
            fixture.steps,
            [
                CartStep::Add {
                    product: "soap".to_string(),
                    flavour: Some(1),
                    size: "SOAP-100".to_string(),
                    quantity: 2,
                },
                CartStep::UpdateQuantity {
                    size: "SOAP-100".to_string(),
                    quantity: 3,
                },
                CartStep::SetMeta {
                    session: Some("abc".to_string()),
                    cart_id: None,
                },
                CartStep::ClearMeta,
            ]
        );

        Ok(())
    }
}
