//! Cart

use std::num::NonZeroU32;

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    lines::{Candidate, CartLine, LineId},
    totals::{Totals, TotalsError, cart_totals},
};

/// Errors related to cart construction or mutation.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line's currency differs from the cart currency (id, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(LineId, &'static str, &'static str),

    /// Two lines share the same id.
    #[error("Duplicate line id {0}")]
    DuplicateLine(LineId),
}

/// Outcome of a successful cart mutation.
///
/// Every mutating operation reports what actually happened through one of
/// these, so presentation code can decide how to surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line entered the cart with quantity one.
    LineAdded {
        /// Id of the added line.
        id: LineId,
    },

    /// The line was already in the cart, so its quantity went up by one.
    QuantityIncreased {
        /// Id of the merged line.
        id: LineId,
        /// The line's quantity after the increase.
        quantity: u32,
    },

    /// An existing line's quantity was set to a new value.
    QuantitySet {
        /// Id of the updated line.
        id: LineId,
        /// The line's quantity after the update.
        quantity: u32,
    },

    /// A line left the cart.
    LineRemoved {
        /// Id of the removed line.
        id: LineId,
    },

    /// All lines left the cart.
    Cleared,
}

/// The cart snapshot: an ordered collection of lines keyed by id.
///
/// Lines are kept in insertion order, which is also display order. The
/// snapshot is the single source of truth; totals are always derived from it
/// via [`Cart::totals`], never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if a line's currency differs from the cart
    /// currency, or if two lines share an id.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        for (i, line) in lines.iter().enumerate() {
            let line_currency = line.unit_price().currency();

            if line_currency != currency {
                return Err(CartError::CurrencyMismatch(
                    line.id().clone(),
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if lines
                .iter()
                .take(i)
                .any(|earlier| earlier.id() == line.id())
            {
                return Err(CartError::DuplicateLine(line.id().clone()));
            }
        }

        Ok(Cart { lines, currency })
    }

    /// Add a candidate to the cart.
    ///
    /// If a line with the candidate's id already exists, its quantity goes up
    /// by one and the candidate's price is ignored (the price was frozen when
    /// the line first entered the cart). Otherwise a new line is appended
    /// with quantity one.
    ///
    /// # Errors
    ///
    /// Returns a `CartError::CurrencyMismatch` if the candidate's currency
    /// differs from the cart currency.
    pub fn add(&mut self, candidate: Candidate<'a>) -> Result<CartEvent, CartError> {
        let candidate_currency = candidate.unit_price().currency();

        if candidate_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                candidate.id().clone(),
                candidate_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.id() == candidate.id())
        {
            line.increment_quantity();

            return Ok(CartEvent::QuantityIncreased {
                id: line.id().clone(),
                quantity: line.quantity().get(),
            });
        }

        let line = CartLine::from_candidate(candidate, NonZeroU32::MIN);
        let id = line.id().clone();
        self.lines.push(line);

        Ok(CartEvent::LineAdded { id })
    }

    /// Remove the line with the given id.
    ///
    /// Returns `None` if no such line exists; removing an absent id is a
    /// silent no-op, not an error.
    pub fn remove(&mut self, id: &LineId) -> Option<CartEvent> {
        let position = self.lines.iter().position(|line| line.id() == id)?;
        let line = self.lines.remove(position);

        Some(CartEvent::LineRemoved {
            id: line.id().clone(),
        })
    }

    /// Set the quantity of the line with the given id.
    ///
    /// A quantity of zero removes the line, exactly as [`Cart::remove`]
    /// would. Returns `None` if no such line exists.
    pub fn set_quantity(&mut self, id: &LineId, quantity: u32) -> Option<CartEvent> {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            return self.remove(id);
        };

        let line = self.lines.iter_mut().find(|line| line.id() == id)?;
        line.set_quantity(quantity);

        Some(CartEvent::QuantitySet {
            id: line.id().clone(),
            quantity: quantity.get(),
        })
    }

    /// Remove every line from the cart.
    pub fn clear(&mut self) -> CartEvent {
        self.lines.clear();

        CartEvent::Cleared
    }

    /// Calculate the cart's derived totals.
    ///
    /// Totals are recomputed from the lines on every call; nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns a `TotalsError` if a line total overflows or money arithmetic
    /// fails.
    pub fn totals(&self) -> Result<Totals<'a>, TotalsError> {
        cart_totals(self)
    }

    /// Get the line with the given id, if present.
    pub fn line(&self, id: &LineId) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Iterate over the lines in display (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Get the number of distinct lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use super::*;

    fn candidate<'a>(id: &str, minor: i64) -> Candidate<'a> {
        Candidate::new(
            LineId::new(id).expect("test ids are non-empty"),
            format!("Product {id}"),
            Money::from_minor(minor, USD),
        )
    }

    fn id(id: &str) -> LineId {
        LineId::new(id).expect("test ids are non-empty")
    }

    #[test]
    fn add_new_line_starts_at_quantity_one() -> TestResult {
        let mut cart = Cart::new(USD);

        let event = cart.add(candidate("P1", 499))?;

        assert_eq!(event, CartEvent::LineAdded { id: id("P1") });
        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.line(&id("P1")).map(|line| line.quantity().get()),
            Some(1)
        );

        Ok(())
    }

    #[test]
    fn add_duplicate_id_merges_instead_of_duplicating() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add(candidate("P1", 499))?;
        let event = cart.add(candidate("P1", 499))?;

        assert_eq!(
            event,
            CartEvent::QuantityIncreased {
                id: id("P1"),
                quantity: 2
            }
        );
        assert_eq!(cart.len(), 1, "equal ids must merge into one line");

        Ok(())
    }

    #[test]
    fn add_duplicate_keeps_the_frozen_price() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add(candidate("P1", 499))?;
        cart.add(candidate("P1", 999))?;

        let line = cart.line(&id("P1")).expect("line should be present");

        assert_eq!(line.unit_price(), &Money::from_minor(499, USD));

        Ok(())
    }

    #[test]
    fn add_currency_mismatch_errors_and_leaves_cart_unchanged() -> TestResult {
        let mut cart = Cart::new(GBP);

        let result = cart.add(candidate("P1", 499));

        match result {
            Err(CartError::CurrencyMismatch(line_id, line_currency, cart_currency)) => {
                assert_eq!(line_id, id("P1"));
                assert_eq!(line_currency, USD.iso_alpha_code);
                assert_eq!(cart_currency, GBP.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn remove_deletes_present_line() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(candidate("P1", 200))?;
        cart.add(candidate("P2", 300))?;

        let event = cart.remove(&id("P1"));

        assert_eq!(event, Some(CartEvent::LineRemoved { id: id("P1") }));
        assert_eq!(cart.len(), 1);
        assert!(cart.line(&id("P2")).is_some());

        Ok(())
    }

    #[test]
    fn remove_absent_id_is_a_no_op() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(candidate("P1", 200))?;

        let before = cart.clone();
        let event = cart.remove(&id("P9"));

        assert_eq!(event, None);
        assert_eq!(cart, before, "snapshot must be structurally unchanged");

        Ok(())
    }

    #[test]
    fn set_quantity_updates_existing_line() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(candidate("P1", 499))?;

        let event = cart.set_quantity(&id("P1"), 5);

        assert_eq!(
            event,
            Some(CartEvent::QuantitySet {
                id: id("P1"),
                quantity: 5
            })
        );

        Ok(())
    }

    #[test]
    fn set_quantity_zero_removes_the_line() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(candidate("P1", 499))?;

        let event = cart.set_quantity(&id("P1"), 0);

        assert_eq!(event, Some(CartEvent::LineRemoved { id: id("P1") }));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn set_quantity_on_absent_line_is_a_no_op() {
        let mut cart = Cart::new(USD);

        assert_eq!(cart.set_quantity(&id("P1"), 3), None);
        assert_eq!(cart.set_quantity(&id("P1"), 0), None);
    }

    #[test]
    fn clear_empties_the_cart_from_any_state() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(candidate("P1", 200))?;
        cart.add(candidate("P2", 300))?;

        let event = cart.clear();

        assert_eq!(event, CartEvent::Cleared);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn iter_preserves_insertion_order() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(candidate("P2", 300))?;
        cart.add(candidate("P1", 200))?;
        cart.add(candidate("P2", 300))?;

        let ids: Vec<&str> = cart.iter().map(|line| line.id().as_str()).collect();

        assert_eq!(ids, vec!["P2", "P1"], "merge must not reorder lines");

        Ok(())
    }

    #[test]
    fn with_lines_rejects_duplicate_ids() -> TestResult {
        let lines = vec![
            CartLine::from_candidate(candidate("P1", 200), NonZeroU32::MIN),
            CartLine::from_candidate(candidate("P1", 300), NonZeroU32::MIN),
        ];

        let result = Cart::with_lines(lines, USD);

        assert!(matches!(result, Err(CartError::DuplicateLine(_))));

        Ok(())
    }

    #[test]
    fn with_lines_rejects_currency_mismatch() {
        let lines = vec![CartLine::from_candidate(
            candidate("P1", 200),
            NonZeroU32::MIN,
        )];

        let result = Cart::with_lines(lines, GBP);

        assert!(matches!(result, Err(CartError::CurrencyMismatch(..))));
    }
}
