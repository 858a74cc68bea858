//! Cart metadata

use serde::{Deserialize, Serialize};

/// Identifiers linking the local cart to a server-side cart record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMeta {
    /// Server-side cart session
    #[serde(default)]
    pub session: Option<String>,

    /// Server-side cart record id
    #[serde(default)]
    pub cart_id: Option<u64>,
}

impl CartMeta {
    /// Create metadata from the given identifiers.
    pub fn new(session: Option<String>, cart_id: Option<u64>) -> Self {
        Self { session, cart_id }
    }

    /// Whether either identifier is set.
    pub fn is_linked(&self) -> bool {
        self.session.is_some() || self.cart_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn default_is_unlinked() {
        assert!(!CartMeta::default().is_linked());
        assert!(CartMeta::new(None, Some(7)).is_linked());
    }

    #[test]
    fn serialises_absent_fields_as_null() -> TestResult {
        let value = serde_json::to_value(CartMeta::default())?;

        assert_eq!(value, json!({"session": null, "cartId": null}));

        Ok(())
    }
}
