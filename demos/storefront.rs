//! Storefront Example
//!
//! This example walks through a full storefront session: browsing a small
//! organic-produce catalog, filling a cart (with a duplicate add merging
//! into an existing line), checking out through the instant gateway and
//! printing the rendered receipt.

use std::io;

use anyhow::Result;

use orchard::prelude::*;
use rusty_money::{Money, iso::USD};

/// Prints a toast-style message for every cart notification.
#[derive(Debug, Default)]
struct ToastObserver;

#[expect(clippy::print_stdout, reason = "Example code")]
impl CartObserver for ToastObserver {
    fn on_line_added(&mut self, line: &CartLine<'_>) {
        println!("[toast] {} added to your cart", line.name());
    }

    fn on_quantity_increased(&mut self, id: &LineId, quantity: u32) {
        println!("[toast] {id} already in cart, quantity increased to {quantity}");
    }

    fn on_line_removed(&mut self, id: &LineId) {
        println!("[toast] {id} removed from cart");
    }

    fn on_cart_cleared(&mut self) {
        println!("[toast] cart cleared");
    }

    fn on_checkout_failed(&mut self, reason: &str) {
        println!("[toast] checkout failed: {reason}");
    }
}

/// Storefront Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let mut catalog = Catalog::default();
    catalog.insert(
        Product::new("Organic Apples", Money::from_minor(499, USD), 42)
            .with_image("https://cdn.example/apples.png"),
    );
    catalog.insert(Product::new("Kale Bunch", Money::from_minor(300, USD), 7));
    catalog.insert(Product::new("Heirloom Tomatoes", Money::from_minor(349, USD), 0));

    println!("Catalog:");
    for product in catalog.values() {
        println!(
            "  {:<20} {:>7}  [{}]",
            product.name,
            product.price.to_string(),
            product.stock_status()
        );
    }
    println!();

    let mut store = CartStore::with_observer(USD, ToastObserver);

    for (index, product) in catalog.values().enumerate() {
        if product.stock_status() == StockStatus::OutOfStock {
            continue;
        }

        store.add_line(product.candidate(LineId::new(format!("P{index}"))?))?;
    }

    // A second add of the same product merges instead of duplicating.
    if let Some(product) = catalog.values().next() {
        store.add_line(product.candidate(LineId::new("P0")?))?;
    }

    let totals = store.totals()?;
    println!();
    println!(
        "Cart: {} items, subtotal {}",
        totals.item_count, totals.subtotal
    );
    println!();

    let mut gateway = InstantGateway::new();
    let receipt = store.checkout(&mut gateway, &SystemClock)?;

    receipt.write_to(&mut io::stdout())?;

    Ok(())
}
