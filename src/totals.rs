//! Derived totals

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{cart::Cart, lines::CartLine};

/// Errors that can occur while deriving totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalsError {
    /// A line total overflowed the minor-unit range.
    #[error("line total for {id} overflows the minor-unit range")]
    LineTotalOverflow {
        /// Id of the offending line.
        id: String,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Aggregate totals derived from a cart snapshot.
///
/// Never the source of truth: the cart's lines are, and totals are
/// recomputed from them in full on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals<'a> {
    /// Sum of quantities across all lines.
    pub item_count: u64,

    /// Sum of unit price times quantity across all lines.
    pub subtotal: Money<'a, Currency>,
}

/// Calculates the total for a single line: unit price times quantity.
///
/// # Errors
///
/// Returns [`TotalsError::LineTotalOverflow`] if the multiplication leaves
/// the minor-unit range.
pub fn line_total<'a>(line: &CartLine<'a>) -> Result<Money<'a, Currency>, TotalsError> {
    let minor = line
        .unit_price()
        .to_minor_units()
        .checked_mul(i64::from(line.quantity().get()))
        .ok_or_else(|| TotalsError::LineTotalOverflow {
            id: line.id().as_str().to_string(),
        })?;

    Ok(Money::from_minor(minor, line.unit_price().currency()))
}

/// Calculates the derived totals for a cart, from scratch.
///
/// # Errors
///
/// - [`TotalsError::LineTotalOverflow`]: A line total left the minor-unit range.
/// - [`TotalsError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn cart_totals<'a>(cart: &Cart<'a>) -> Result<Totals<'a>, TotalsError> {
    let mut item_count = 0u64;
    let mut subtotal: Money<'a, Currency> = Money::from_minor(0, cart.currency());

    for line in cart.iter() {
        item_count += u64::from(line.quantity().get());
        subtotal = subtotal.add(line_total(line)?)?;
    }

    Ok(Totals {
        item_count,
        subtotal,
    })
}
