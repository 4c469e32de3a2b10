//! Receipt

use std::io;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::Cart,
    totals::{Totals, TotalsError, line_total},
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// One itemized row on a receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Display name of the purchased item.
    pub name: String,

    /// Id of the cart line this row came from.
    pub id: String,

    /// Units purchased.
    pub quantity: u32,

    /// Price per unit, frozen at add time.
    pub unit_price: Money<'a, Currency>,

    /// Unit price times quantity.
    pub total: Money<'a, Currency>,
}

/// Final receipt for a checked-out cart.
///
/// The receipt owns its rows; it stays valid after the cart it was built
/// from is cleared. Its subtotal equals the cart's derived subtotal at the
/// moment it was built.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    reference: String,
    placed_at: Timestamp,
    lines: SmallVec<[ReceiptLine<'a>; 8]>,
    item_count: u64,
    subtotal: Money<'a, Currency>,
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from the current cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns a `TotalsError` if a line total overflows or money
    /// arithmetic fails.
    pub fn from_cart(
        cart: &Cart<'a>,
        reference: impl Into<String>,
        placed_at: Timestamp,
    ) -> Result<Self, TotalsError> {
        let totals = cart.totals()?;

        let lines = cart
            .iter()
            .map(|line| {
                Ok(ReceiptLine {
                    name: line.name().to_string(),
                    id: line.id().as_str().to_string(),
                    quantity: line.quantity().get(),
                    unit_price: *line.unit_price(),
                    total: line_total(line)?,
                })
            })
            .collect::<Result<_, TotalsError>>()?;

        Ok(Self {
            reference: reference.into(),
            placed_at,
            lines,
            item_count: totals.item_count,
            subtotal: totals.subtotal,
            currency: cart.currency(),
        })
    }

    /// The order reference issued by the checkout gateway.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// When the order was placed.
    #[must_use]
    pub fn placed_at(&self) -> Timestamp {
        self.placed_at
    }

    /// The itemized rows, in cart display order.
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Total units across all rows.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Sum of all row totals, excluding tax and shipping.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// The derived totals this receipt was built from.
    #[must_use]
    pub fn totals(&self) -> Totals<'a> {
        Totals {
            item_count: self.item_count,
            subtotal: self.subtotal,
        }
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Render the receipt as a formatted table.
    ///
    /// # Errors
    ///
    /// Returns a `ReceiptError::IO` if the writer fails.
    pub fn write_to(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        writeln!(out, "ORDER RECEIPT").map_err(|_err| ReceiptError::IO)?;
        writeln!(out, "Order {}", self.reference).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, "{}", self.placed_at.strftime("%Y-%m-%d %H:%M UTC"))
            .map_err(|_err| ReceiptError::IO)?;

        let mut builder = Builder::default();
        builder.push_record(["Qty", "Item", "Unit", "Total"]);

        for line in &self.lines {
            builder.push_record([
                line.quantity.to_string(),
                line.name.clone(),
                line.unit_price.to_string(),
                line.total.to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::first(), Alignment::right());
        table.modify(Columns::new(2..), Alignment::right());

        writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)?;

        writeln!(out, "Total items: {}", self.item_count).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, "Subtotal: {}", self.subtotal).map_err(|_err| ReceiptError::IO)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::lines::{Candidate, CartLine, LineId};

    use super::*;

    fn test_cart<'a>() -> TestResult<Cart<'a>> {
        let lines = vec![
            CartLine::from_candidate(
                Candidate::new(LineId::new("P1")?, "Organic Apples", Money::from_minor(499, USD)),
                NonZeroU32::new(2).expect("test quantities are non-zero"),
            ),
            CartLine::from_candidate(
                Candidate::new(LineId::new("P2")?, "Kale Bunch", Money::from_minor(300, USD)),
                NonZeroU32::MIN,
            ),
        ];

        Ok(Cart::with_lines(lines, USD)?)
    }

    #[test]
    fn receipt_subtotal_matches_cart_totals() -> TestResult {
        let cart = test_cart()?;

        let receipt = Receipt::from_cart(&cart, "ORD-0001", Timestamp::UNIX_EPOCH)?;

        assert_eq!(receipt.subtotal(), cart.totals()?.subtotal);
        assert_eq!(receipt.item_count(), 3);

        Ok(())
    }

    #[test]
    fn receipt_rows_follow_cart_display_order() -> TestResult {
        let cart = test_cart()?;

        let receipt = Receipt::from_cart(&cart, "ORD-0001", Timestamp::UNIX_EPOCH)?;

        let names: Vec<&str> = receipt
            .lines()
            .iter()
            .map(|line| line.name.as_str())
            .collect();

        assert_eq!(names, vec!["Organic Apples", "Kale Bunch"]);
        assert_eq!(
            receipt.lines().first().map(|line| line.total),
            Some(Money::from_minor(998, USD))
        );

        Ok(())
    }

    #[test]
    fn receipt_for_empty_cart_has_no_rows_and_zero_subtotal() -> TestResult {
        let cart = Cart::new(USD);

        let receipt = Receipt::from_cart(&cart, "ORD-0002", Timestamp::UNIX_EPOCH)?;

        assert!(receipt.lines().is_empty());
        assert_eq!(receipt.subtotal(), Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn write_to_renders_items_and_summary() -> TestResult {
        let cart = test_cart()?;
        let receipt = Receipt::from_cart(&cart, "ORD-0001", Timestamp::UNIX_EPOCH)?;

        let mut rendered = Vec::new();
        receipt.write_to(&mut rendered)?;
        let rendered = String::from_utf8(rendered)?;

        assert!(rendered.contains("ORDER RECEIPT"), "missing header");
        assert!(rendered.contains("Order ORD-0001"), "missing reference");
        assert!(rendered.contains("Organic Apples"), "missing item row");
        assert!(rendered.contains("Total items: 3"), "missing item count");
        assert!(rendered.contains("Subtotal: $9.98"), "missing subtotal");

        Ok(())
    }
}
