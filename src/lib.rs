//! Orchard
//!
//! Orchard is a shopping cart, checkout and receipt engine for small storefronts.

pub mod cache;
pub mod cart;
pub mod checkout;
pub mod clock;
pub mod lines;
pub mod persist;
pub mod prelude;
pub mod products;
pub mod receipt;
pub mod store;
pub mod totals;
