//! Checkout

use thiserror::Error;

use crate::{cart::Cart, totals::{Totals, TotalsError}};

/// Errors returned by a checkout gateway.
///
/// All of these are transient: the cart is left untouched and the caller may
/// simply retry the checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The simulated network call timed out.
    #[error("checkout request timed out")]
    Timeout,

    /// The gateway refused the order.
    #[error("order was declined: {0}")]
    Declined(String),
}

/// Errors that can occur while checking out.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was attempted on an empty cart.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Error deriving totals from the cart.
    #[error(transparent)]
    Totals(#[from] TotalsError),

    /// The gateway rejected or failed the order.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Confirmation returned by a gateway for a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Order reference to print on the receipt.
    pub reference: String,
}

/// The order-placement collaborator behind checkout.
///
/// Checkout is simulated in this system; there is no real payment
/// processing. Implementations stand in for the network call and decide
/// whether the order goes through.
pub trait CheckoutGateway {
    /// Place an order for the given cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the simulated call fails; the caller
    /// guarantees the cart is left unchanged in that case.
    fn place_order(
        &mut self,
        cart: &Cart<'_>,
        totals: &Totals<'_>,
    ) -> Result<Confirmation, GatewayError>;
}

/// A gateway that approves every order and mints sequential references.
#[derive(Debug, Default)]
pub struct InstantGateway {
    placed: u64,
}

impl InstantGateway {
    /// Create a new gateway with no orders placed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders placed so far.
    #[must_use]
    pub fn placed(&self) -> u64 {
        self.placed
    }
}

impl CheckoutGateway for InstantGateway {
    fn place_order(
        &mut self,
        _cart: &Cart<'_>,
        _totals: &Totals<'_>,
    ) -> Result<Confirmation, GatewayError> {
        self.placed += 1;

        Ok(Confirmation {
            reference: format!("ORD-{:04}", self.placed),
        })
    }
}
