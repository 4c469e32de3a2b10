//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};

use crate::lines::{Candidate, LineId};

/// Stock quantities below this count as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// A catalog of products keyed by [`ProductKey`].
pub type Catalog<'a> = SlotMap<ProductKey, Product<'a>>;

/// Stock status derived from a product's stock quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    /// Plenty in stock.
    InStock,

    /// Stocked, but below the low-stock threshold.
    LowStock,

    /// Nothing left.
    OutOfStock,
}

impl StockStatus {
    /// Derive the status for a quantity using [`DEFAULT_LOW_STOCK_THRESHOLD`].
    #[must_use]
    pub fn for_quantity(quantity: u32) -> Self {
        Self::for_quantity_with_threshold(quantity, DEFAULT_LOW_STOCK_THRESHOLD)
    }

    /// Derive the status for a quantity with an explicit low-stock threshold.
    ///
    /// Zero is always out of stock, regardless of the threshold.
    #[must_use]
    pub fn for_quantity_with_threshold(quantity: u32, threshold: u32) -> Self {
        if quantity == 0 {
            Self::OutOfStock
        } else if quantity < threshold {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::InStock => "in-stock",
            Self::LowStock => "low-stock",
            Self::OutOfStock => "out-of-stock",
        };

        f.write_str(label)
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Product price
    pub price: Money<'a, Currency>,

    /// Units currently in stock
    pub stock_quantity: u32,

    /// Product image reference
    pub image: Option<String>,
}

impl<'a> Product<'a> {
    /// Create a new product with no image.
    pub fn new(name: impl Into<String>, price: Money<'a, Currency>, stock_quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            stock_quantity,
            image: None,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// The product's stock status at the default threshold.
    #[must_use]
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::for_quantity(self.stock_quantity)
    }

    /// Mint a cart candidate for this product, freezing its current price.
    #[must_use]
    pub fn candidate(&self, id: LineId) -> Candidate<'a> {
        let candidate = Candidate::new(id, self.name.clone(), self.price);

        match &self.image {
            Some(image) => candidate.with_image(image.clone()),
            None => candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn zero_quantity_is_out_of_stock() {
        assert_eq!(StockStatus::for_quantity(0), StockStatus::OutOfStock);
    }

    #[test]
    fn below_threshold_is_low_stock() {
        assert_eq!(StockStatus::for_quantity(1), StockStatus::LowStock);
        assert_eq!(StockStatus::for_quantity(9), StockStatus::LowStock);
    }

    #[test]
    fn at_or_above_threshold_is_in_stock() {
        assert_eq!(StockStatus::for_quantity(10), StockStatus::InStock);
        assert_eq!(StockStatus::for_quantity(250), StockStatus::InStock);
    }

    #[test]
    fn explicit_threshold_overrides_the_default() {
        assert_eq!(
            StockStatus::for_quantity_with_threshold(3, 5),
            StockStatus::LowStock
        );
        assert_eq!(
            StockStatus::for_quantity_with_threshold(3, 2),
            StockStatus::InStock
        );
        assert_eq!(
            StockStatus::for_quantity_with_threshold(0, 0),
            StockStatus::OutOfStock
        );
    }

    #[test]
    fn status_labels_match_storefront_badges() {
        assert_eq!(StockStatus::InStock.to_string(), "in-stock");
        assert_eq!(StockStatus::LowStock.to_string(), "low-stock");
        assert_eq!(StockStatus::OutOfStock.to_string(), "out-of-stock");
    }

    #[test]
    fn candidate_freezes_the_current_price() -> TestResult {
        let mut catalog = Catalog::default();
        let key = catalog.insert(
            Product::new("Heirloom Tomatoes", Money::from_minor(349, USD), 24)
                .with_image("https://cdn.example/tomatoes.png"),
        );

        let product = catalog.get(key).expect("product was just inserted");
        let candidate = product.candidate(LineId::new("tomatoes")?);

        assert_eq!(candidate.unit_price(), &Money::from_minor(349, USD));

        Ok(())
    }
}
