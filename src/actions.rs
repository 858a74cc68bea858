//! Actions
//!
//! Reducer-style messages for the cart store, so a host can queue, log or
//! replay the changes its components request.

use serde::{Deserialize, Serialize};

use crate::{cart::CartStore, items::NewLineItem};

/// A single change to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartAction {
    /// Add or merge a line item.
    Add(NewLineItem),

    /// Remove every line with this size id.
    Remove {
        /// Size id to remove
        size_id: String,
    },

    /// Set the quantity of the first line with this size id.
    UpdateQuantity {
        /// Size id to update
        size_id: String,

        /// New quantity
        quantity: u32,
    },

    /// Overwrite the session metadata.
    SetMeta {
        /// Server-side cart session
        #[serde(default)]
        session: Option<String>,

        /// Server-side cart record id
        #[serde(default)]
        cart_id: Option<u64>,
    },

    /// Reset the session metadata.
    ClearMeta,
}

impl CartStore {
    /// Apply a single action.
    pub fn dispatch(&mut self, action: CartAction) {
        match action {
            CartAction::Add(item) => self.add(item),
            CartAction::Remove { size_id } => self.remove(&size_id),
            CartAction::UpdateQuantity { size_id, quantity } => {
                self.update_quantity(&size_id, quantity);
            }
            CartAction::SetMeta { session, cart_id } => self.set_meta(session, cart_id),
            CartAction::ClearMeta => self.clear_meta(),
        }
    }

    /// Apply actions in order.
    pub fn replay(&mut self, actions: impl IntoIterator<Item = CartAction>) {
        for action in actions {
            self.dispatch(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso;
    use serde_json::json;
    use testresult::TestResult;

    use crate::meta::CartMeta;

    use super::*;

    #[test]
    fn actions_deserialise_from_tagged_json() -> TestResult {
        let actions: Vec<CartAction> = serde_json::from_value(json!([
            {
                "type": "add",
                "productName": "Goat Milk Soap",
                "flavourName": "Original",
                "sizeId": "S1",
                "price": 100,
                "quantity": 2
            },
            { "type": "update_quantity", "size_id": "S1", "quantity": 4 },
            { "type": "set_meta", "session": "abc" },
            { "type": "clear_meta" },
            { "type": "remove", "size_id": "S9" }
        ]))?;

        let mut cart = CartStore::new(iso::GBP);
        cart.replay(actions);

        let line = cart.line("S1").ok_or("missing line")?;

        assert_eq!(line.quantity(), 4);
        assert_eq!(line.total(), Decimal::from(400));
        assert_eq!(cart.meta(), &CartMeta::default());

        Ok(())
    }

    #[test]
    fn set_meta_without_fields_clears_previous_values() {
        let mut cart = CartStore::new(iso::GBP);

        cart.dispatch(CartAction::SetMeta {
            session: Some("abc".to_string()),
            cart_id: None,
        });
        cart.dispatch(CartAction::SetMeta {
            session: None,
            cart_id: None,
        });

        assert_eq!(cart.meta(), &CartMeta::default());
    }

    #[test]
    fn replay_matches_direct_calls() {
        let soap = NewLineItem {
            product_name: "Goat Milk Soap".to_string(),
            size_id: "S1".to_string(),
            price: Some(100),
            quantity: 1,
            ..NewLineItem::default()
        };

        let mut direct = CartStore::new(iso::GBP);
        direct.add(soap.clone());
        direct.add(soap.clone());
        direct.remove("S1");
        direct.add(soap.clone());

        let mut replayed = CartStore::new(iso::GBP);
        replayed.replay([
            CartAction::Add(soap.clone()),
            CartAction::Add(soap.clone()),
            CartAction::Remove {
                size_id: "S1".to_string(),
            },
            CartAction::Add(soap),
        ]);

        assert_eq!(direct.state(), replayed.state());
    }
}
