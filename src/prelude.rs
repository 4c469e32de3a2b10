//! Orchard prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cache::TtlCache,
    cart::{Cart, CartError, CartEvent},
    checkout::{CheckoutError, CheckoutGateway, Confirmation, GatewayError, InstantGateway},
    clock::{Clock, SystemClock},
    lines::{Candidate, CartLine, LineError, LineId},
    persist::PersistError,
    products::{Catalog, Product, ProductKey, StockStatus},
    receipt::{Receipt, ReceiptError},
    store::{CartObserver, CartStore, NoopObserver},
    totals::{Totals, TotalsError},
};
