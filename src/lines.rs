//! Cart lines

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors related to line construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    /// The line identifier was empty or whitespace-only.
    #[error("line id must not be empty")]
    EmptyId,
}

/// Identifier of a distinct line in the cart.
///
/// Equal ids are merged into a single line, never duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineId(String);

impl LineId {
    /// Create a new line id.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::EmptyId`] if the id is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, LineError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(LineError::EmptyId);
        }

        Ok(Self(id))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line candidate: everything a [`CartLine`] carries except a quantity.
///
/// The unit price is frozen here, at the moment the candidate is built from
/// the catalog. It is never re-fetched after the line enters the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    id: LineId,
    name: String,
    image: Option<String>,
    unit_price: Money<'a, Currency>,
}

impl<'a> Candidate<'a> {
    /// Create a new candidate with the given id, display name and unit price.
    pub fn new(id: LineId, name: impl Into<String>, unit_price: Money<'a, Currency>) -> Self {
        Self {
            id,
            name: name.into(),
            image: None,
            unit_price,
        }
    }

    /// Attach an image reference for display purposes.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// The candidate's id.
    pub fn id(&self) -> &LineId {
        &self.id
    }

    /// The candidate's unit price.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }
}

/// One distinct item in the cart, with its own quantity and frozen unit price.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    id: LineId,
    name: String,
    image: Option<String>,
    unit_price: Money<'a, Currency>,
    quantity: NonZeroU32,
}

impl<'a> CartLine<'a> {
    /// Create a line from a candidate with the given starting quantity.
    #[must_use]
    pub fn from_candidate(candidate: Candidate<'a>, quantity: NonZeroU32) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            image: candidate.image,
            unit_price: candidate.unit_price,
            quantity,
        }
    }

    /// The line's id.
    pub fn id(&self) -> &LineId {
        &self.id
    }

    /// The line's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The line's image reference, if any.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// The unit price frozen when the line was first added.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// The line's quantity, always at least one.
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    pub(crate) fn increment_quantity(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }
}
