//! Behavioural tests for the cart store's five operations.

use rust_decimal::Decimal;
use rusty_money::iso;
use testresult::TestResult;

use capra::{cart::CartStore, items::NewLineItem, meta::CartMeta, pricing::effective_unit_price};

fn item(size_id: &str, flavour_name: &str, size_name: &str, quantity: u32) -> NewLineItem {
    NewLineItem {
        product_name: "Goat Milk Soap".to_string(),
        flavour_name: flavour_name.to_string(),
        size_id: size_id.to_string(),
        size_name: size_name.to_string(),
        price: Some(100),
        quantity,
        ..NewLineItem::default()
    }
}

fn assert_totals_consistent(cart: &CartStore) {
    for line in cart.iter() {
        let expected = effective_unit_price(line.price_discount(), line.price())
            * Decimal::from(line.quantity());

        assert_eq!(line.total(), expected, "stale total on {}", line.size_id());
    }
}

#[test]
fn distinct_triples_each_get_a_line() {
    let mut cart = CartStore::new(iso::GBP);
    let sizes = ["S1", "S2", "S3"];
    let flavours = ["Original", "Honey"];
    let names = ["100g", "200g"];

    for size in sizes {
        for flavour in flavours {
            for name in names {
                cart.add(item(size, flavour, name, 1));
            }
        }
    }

    assert_eq!(cart.len(), sizes.len() * flavours.len() * names.len());
    assert_totals_consistent(&cart);
}

#[test]
fn repeated_adds_accumulate_quantity() -> TestResult {
    let mut cart = CartStore::new(iso::GBP);
    let quantities = [1, 4, 2, 7, 3];

    for quantity in quantities {
        cart.add(item("S1", "Original", "100g", quantity));
        assert_totals_consistent(&cart);
    }

    let line = cart.line("S1").ok_or("missing line")?;

    assert_eq!(cart.len(), 1);
    assert_eq!(line.quantity(), quantities.iter().sum::<u32>());

    Ok(())
}

#[test]
fn merge_ignores_incoming_prices() -> TestResult {
    let mut cart = CartStore::new(iso::GBP);

    cart.add(NewLineItem {
        price: Some(100),
        ..item("S1", "Original", "", 2)
    });
    cart.add(NewLineItem {
        price: Some(999),
        price_discount: Some(1.0),
        ..item("S1", "Original", "", 3)
    });

    let line = cart.line("S1").ok_or("missing line")?;

    assert_eq!(line.quantity(), 5);
    assert_eq!(line.total(), Decimal::from(500));

    Ok(())
}

#[test]
fn nan_discount_scenario() -> TestResult {
    let mut cart = CartStore::new(iso::GBP);

    cart.add(NewLineItem {
        price: Some(100),
        price_discount: Some(f64::NAN),
        ..item("S1", "Original", "", 4)
    });

    assert_eq!(cart.line("S1").ok_or("missing line")?.total(), Decimal::from(400));

    Ok(())
}

#[test]
fn remove_ignores_flavour_and_size_names() {
    let mut cart = CartStore::new(iso::GBP);

    cart.add(item("S1", "Original", "100g", 1));
    cart.add(item("S1", "Lavender", "100g", 1));
    cart.add(item("S1", "Original", "Gift box", 1));
    cart.add(item("S2", "Original", "100g", 1));

    cart.remove("S1");

    assert_eq!(cart.len(), 1);
    assert!(cart.iter().all(|line| line.size_id() == "S2"));
}

#[test]
fn update_quantity_is_last_writer_wins() -> TestResult {
    let mut cart = CartStore::new(iso::GBP);
    cart.add(item("S1", "Original", "100g", 1));

    cart.update_quantity("S1", 9);
    cart.update_quantity("S1", 2);

    assert_eq!(cart.line("S1").ok_or("missing line")?.quantity(), 2);
    assert_totals_consistent(&cart);

    Ok(())
}

#[test]
fn update_quantity_on_missing_size_changes_nothing() {
    let mut cart = CartStore::new(iso::GBP);
    cart.add(item("S1", "Original", "100g", 1));
    cart.set_meta(Some("abc".to_string()), Some(3));

    let before = cart.state().clone();
    cart.update_quantity("S2", 5);

    assert_eq!(cart.state(), &before);
}

#[test]
fn clear_meta_always_yields_empty_meta() {
    let mut cart = CartStore::new(iso::GBP);

    for (session, cart_id) in [
        (None, None),
        (Some("abc".to_string()), None),
        (None, Some(7)),
        (Some("def".to_string()), Some(8)),
    ] {
        cart.set_meta(session, cart_id);
        cart.clear_meta();

        assert_eq!(cart.meta(), &CartMeta::default());
    }
}

#[test]
fn set_meta_with_nothing_does_not_keep_old_values() {
    let mut cart = CartStore::new(iso::GBP);

    cart.set_meta(Some("abc".to_string()), None);
    cart.set_meta(None, None);

    assert_eq!(cart.meta(), &CartMeta::new(None, None));
}
