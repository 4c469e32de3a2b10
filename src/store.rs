//! Cart store

use crate::{
    cart::{Cart, CartError, CartEvent},
    checkout::{CheckoutError, CheckoutGateway},
    clock::Clock,
    lines::{Candidate, CartLine, LineId},
    receipt::Receipt,
    totals::{Totals, TotalsError},
};

use rusty_money::iso::Currency;

/// Observer for cart notifications.
///
/// Every user-visible notification flows through here: presentation code
/// implements the callbacks it cares about (toasts, badges, logging) and
/// ignores the rest via the default empty bodies. The store remains the
/// single writer of cart state; observers only watch.
pub trait CartObserver {
    /// A new line entered the cart.
    fn on_line_added(&mut self, _line: &CartLine<'_>) {}

    /// An add merged into an existing line; its quantity went up by one.
    fn on_quantity_increased(&mut self, _id: &LineId, _quantity: u32) {}

    /// A line's quantity was set to a new value.
    fn on_quantity_set(&mut self, _id: &LineId, _quantity: u32) {}

    /// A line left the cart.
    fn on_line_removed(&mut self, _id: &LineId) {}

    /// The whole cart was cleared.
    fn on_cart_cleared(&mut self) {}

    /// A checkout attempt failed; the cart was left untouched.
    fn on_checkout_failed(&mut self, _reason: &str) {}

    /// An order went through and the cart was cleared.
    fn on_order_placed(&mut self, _receipt: &Receipt<'_>) {}
}

/// An observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {}

/// The cart store: a cart snapshot plus its surrounding UI state.
///
/// One store is constructed at application-root scope per session and passed
/// to consumers explicitly; no other component mutates the snapshot.
#[derive(Debug)]
pub struct CartStore<'a, O: CartObserver = NoopObserver> {
    cart: Cart<'a>,
    observer: O,
    is_open: bool,
    loading: bool,
    last_error: Option<String>,
}

impl<'a> CartStore<'a> {
    /// Create a store with an empty cart and no observer.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_observer(currency, NoopObserver)
    }
}

impl<'a, O: CartObserver> CartStore<'a, O> {
    /// Create a store with an empty cart and the given observer.
    #[must_use]
    pub fn with_observer(currency: &'static Currency, observer: O) -> Self {
        Self {
            cart: Cart::new(currency),
            observer,
            is_open: false,
            loading: false,
            last_error: None,
        }
    }

    /// Restore a store around a previously persisted cart.
    #[must_use]
    pub fn with_cart(cart: Cart<'a>, observer: O) -> Self {
        Self {
            cart,
            observer,
            is_open: false,
            loading: false,
            last_error: None,
        }
    }

    /// Add a candidate line to the cart.
    ///
    /// A brand-new line opens the cart UI; merging into an existing line
    /// does not.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the candidate's currency differs from the
    /// cart currency; the cart is left unchanged.
    pub fn add_line(&mut self, candidate: Candidate<'a>) -> Result<CartEvent, CartError> {
        let event = self.cart.add(candidate)?;

        match &event {
            CartEvent::LineAdded { id } => {
                self.is_open = true;

                if let Some(line) = self.cart.line(id) {
                    self.observer.on_line_added(line);
                }
            }
            CartEvent::QuantityIncreased { id, quantity } => {
                self.observer.on_quantity_increased(id, *quantity);
            }
            CartEvent::QuantitySet { .. } | CartEvent::LineRemoved { .. } | CartEvent::Cleared => {}
        }

        Ok(event)
    }

    /// Remove the line with the given id; a silent no-op if absent.
    pub fn remove_line(&mut self, id: &LineId) -> Option<CartEvent> {
        let event = self.cart.remove(id)?;

        if let CartEvent::LineRemoved { id } = &event {
            self.observer.on_line_removed(id);
        }

        Some(event)
    }

    /// Set the quantity of the line with the given id.
    ///
    /// Zero removes the line; a missing line is a silent no-op.
    pub fn set_quantity(&mut self, id: &LineId, quantity: u32) -> Option<CartEvent> {
        let event = self.cart.set_quantity(id, quantity)?;

        match &event {
            CartEvent::QuantitySet { id, quantity } => {
                self.observer.on_quantity_set(id, *quantity);
            }
            CartEvent::LineRemoved { id } => {
                self.observer.on_line_removed(id);
            }
            CartEvent::LineAdded { .. }
            | CartEvent::QuantityIncreased { .. }
            | CartEvent::Cleared => {}
        }

        Some(event)
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) -> CartEvent {
        let event = self.cart.clear();
        self.observer.on_cart_cleared();

        event
    }

    /// Check out the cart through the given gateway.
    ///
    /// On success the order's receipt is returned, the cart is cleared and
    /// the cart UI closes. On gateway failure the cart lines, the open flag
    /// and everything else observable stay exactly as they were, the failure
    /// is recorded in [`CartStore::last_error`] and signalled to the
    /// observer, and nothing is retried automatically.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: There was nothing to check out.
    /// - [`CheckoutError::Totals`]: Totals could not be derived.
    /// - [`CheckoutError::Gateway`]: The simulated order placement failed.
    pub fn checkout(
        &mut self,
        gateway: &mut impl CheckoutGateway,
        clock: &impl Clock,
    ) -> Result<Receipt<'a>, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = self.cart.totals()?;

        self.loading = true;
        self.last_error = None;

        match gateway.place_order(&self.cart, &totals) {
            Ok(confirmation) => {
                let receipt =
                    match Receipt::from_cart(&self.cart, confirmation.reference, clock.now()) {
                        Ok(receipt) => receipt,
                        Err(err) => {
                            self.loading = false;
                            return Err(CheckoutError::Totals(err));
                        }
                    };

                self.cart.clear();
                self.is_open = false;
                self.loading = false;
                self.observer.on_order_placed(&receipt);

                Ok(receipt)
            }
            Err(err) => {
                self.loading = false;
                self.last_error = Some(err.to_string());
                self.observer.on_checkout_failed(&err.to_string());

                Err(CheckoutError::Gateway(err))
            }
        }
    }

    /// The current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// The cart's derived totals.
    ///
    /// # Errors
    ///
    /// Returns a `TotalsError` if a line total overflows or money
    /// arithmetic fails.
    pub fn totals(&self) -> Result<Totals<'a>, TotalsError> {
        self.cart.totals()
    }

    /// Whether the cart UI is visible.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Open or close the cart UI.
    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    /// Whether a checkout call is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// The most recent checkout failure, if the last checkout failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The observer, for inspection in tests.
    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }
}
