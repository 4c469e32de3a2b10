//! Cart persistence
//!
//! Optional snapshot persistence across sessions. The store never touches
//! the disk on its own; the surrounding application decides whether and
//! where to save.

use std::{fs, num::NonZeroU32, path::Path};

use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    lines::{Candidate, CartLine, LineError, LineId},
};

/// Errors that can occur while saving or loading a cart snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    /// IO error reading or writing the snapshot file
    #[error("Failed to access snapshot file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A persisted line had a zero quantity
    #[error("Line {0} has a zero quantity")]
    ZeroQuantity(String),

    /// A persisted line had an invalid id
    #[error(transparent)]
    Line(#[from] LineError),

    /// The persisted lines violated a cart invariant
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Serialized form of a single cart line.
#[derive(Debug, Serialize, Deserialize)]
struct LineRecord {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    unit_price_minor: i64,
    quantity: u32,
}

/// Serialized form of a cart snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct CartRecord {
    currency: String,
    lines: Vec<LineRecord>,
}

/// Save a cart snapshot to the given path as YAML.
///
/// # Errors
///
/// Returns a `PersistError` if the file cannot be written or the snapshot
/// cannot be serialized.
pub fn save(cart: &Cart<'_>, path: &Path) -> Result<(), PersistError> {
    let record = CartRecord {
        currency: cart.currency().iso_alpha_code.to_string(),
        lines: cart
            .iter()
            .map(|line| LineRecord {
                id: line.id().as_str().to_string(),
                name: line.name().to_string(),
                image: line.image().map(ToString::to_string),
                unit_price_minor: line.unit_price().to_minor_units(),
                quantity: line.quantity().get(),
            })
            .collect(),
    };

    let yaml = serde_norway::to_string(&record)?;
    fs::write(path, yaml)?;

    Ok(())
}

/// Load a cart snapshot from the given path.
///
/// # Errors
///
/// Returns a `PersistError` if the file cannot be read or parsed, if the
/// currency code is unknown, if a line has a zero quantity or an empty id,
/// or if the lines violate a cart invariant (duplicate ids, mixed
/// currencies).
pub fn load(path: &Path) -> Result<Cart<'static>, PersistError> {
    let yaml = fs::read_to_string(path)?;
    let record: CartRecord = serde_norway::from_str(&yaml)?;

    let currency = iso::find(&record.currency)
        .ok_or_else(|| PersistError::UnknownCurrency(record.currency.clone()))?;

    let lines = record
        .lines
        .into_iter()
        .map(|line| {
            let quantity = NonZeroU32::new(line.quantity)
                .ok_or_else(|| PersistError::ZeroQuantity(line.id.clone()))?;

            let mut candidate = Candidate::new(
                LineId::new(line.id)?,
                line.name,
                Money::from_minor(line.unit_price_minor, currency),
            );

            if let Some(image) = line.image {
                candidate = candidate.with_image(image);
            }

            Ok(CartLine::from_candidate(candidate, quantity))
        })
        .collect::<Result<Vec<_>, PersistError>>()?;

    Ok(Cart::with_lines(lines, currency)?)
}
