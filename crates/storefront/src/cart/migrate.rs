//! Boundary validation and schema migration for stored cart lines.
//!
//! Stored records are untrusted: they may come from an older client, be
//! hand-edited, or be keyed by a display slug instead of a product id. Each
//! record is validated on its own so one bad line never costs the visitor the
//! rest of the cart.
//!
//! # Rules
//!
//! - A record missing `id`, `name` or `price` is dropped.
//! - A record whose `id` is not a canonical product id is dropped. In a
//!   version 1 payload these are lines keyed by slug, which cannot be resolved
//!   at checkout and are not repaired.
//! - A missing `slug` is backfilled from `id`.
//! - Quantity is normalized into `[moq, max_stock]`.
//! - A later record with the same `(id, variant)` as an earlier one is dropped.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use shopfront_core::{Price, ProductId};

use super::line::{CartLine, DEFAULT_MAX_STOCK, DEFAULT_MOQ, clamp_quantity};
use crate::persist::{Decoded, LEGACY_VERSION};

/// Result of migrating a decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migrated {
    /// Lines that passed validation, in stored order.
    pub lines: Vec<CartLine>,
    /// Records that were discarded.
    pub dropped: usize,
    /// Records that were kept but changed (slug backfill, quantity clamp).
    pub repaired: usize,
}

impl Migrated {
    /// Whether the stored payload differs from what would be written now.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.dropped > 0 || self.repaired > 0
    }
}

/// Loosely-typed stored line. Every field is optional so that validation,
/// not deserialization, decides what happens to an incomplete record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLine {
    id: Option<String>,
    #[serde(alias = "variantKey")]
    variant: Option<String>,
    name: Option<String>,
    image: Option<String>,
    slug: Option<String>,
    price: Option<Decimal>,
    quantity: Option<u32>,
    max_stock: Option<u32>,
    moq: Option<u32>,
}

/// Why a stored record was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum Rejection {
    #[error("record has the wrong shape: {0}")]
    Shape(String),
    #[error("record is missing {0}")]
    MissingField(&'static str),
    #[error("legacy record keyed by {0}")]
    LegacyId(String),
    #[error("record id {0} is not canonical")]
    InvalidId(String),
    #[error("record price is negative")]
    NegativePrice,
}

enum Outcome {
    Kept(CartLine),
    Repaired(CartLine),
}

/// Migrate a decoded payload to current cart lines.
#[must_use]
pub fn migrate(decoded: Decoded) -> Migrated {
    let version = decoded.version;
    let mut migrated = Migrated {
        lines: Vec::with_capacity(decoded.records.len()),
        dropped: 0,
        repaired: 0,
    };

    for record in decoded.records {
        match validate(record, version) {
            Ok(outcome) => {
                let (line, repaired) = match outcome {
                    Outcome::Kept(line) => (line, false),
                    Outcome::Repaired(line) => (line, true),
                };
                if migrated
                    .lines
                    .iter()
                    .any(|l| l.matches(line.id, line.variant_key.as_deref()))
                {
                    tracing::warn!(id = %line.id, "Dropping duplicate stored cart line");
                    migrated.dropped += 1;
                    continue;
                }
                if repaired {
                    migrated.repaired += 1;
                }
                migrated.lines.push(line);
            }
            Err(Rejection::LegacyId(id)) => {
                tracing::warn!(%id, "Removing legacy cart line with non-canonical id");
                migrated.dropped += 1;
            }
            Err(reason) => {
                tracing::warn!(%reason, version, "Dropping invalid stored cart line");
                migrated.dropped += 1;
            }
        }
    }

    migrated
}

fn validate(record: Value, version: u64) -> Result<Outcome, Rejection> {
    let stored: StoredLine =
        serde_json::from_value(record).map_err(|e| Rejection::Shape(e.to_string()))?;

    let raw_id = non_empty(stored.id).ok_or(Rejection::MissingField("id"))?;
    let name = non_empty(stored.name).ok_or(Rejection::MissingField("name"))?;
    let amount = stored.price.ok_or(Rejection::MissingField("price"))?;

    let id = ProductId::parse(&raw_id).map_err(|_| {
        if version == LEGACY_VERSION {
            Rejection::LegacyId(raw_id.clone())
        } else {
            Rejection::InvalidId(raw_id.clone())
        }
    })?;
    let price = Price::new(amount).map_err(|_| Rejection::NegativePrice)?;

    let mut repaired = false;

    let slug = non_empty(stored.slug).unwrap_or_else(|| {
        repaired = true;
        raw_id.clone()
    });

    let moq = stored.moq.unwrap_or(DEFAULT_MOQ).max(1);
    let max_stock = stored.max_stock.unwrap_or(DEFAULT_MAX_STOCK);
    let stored_quantity = stored.quantity.unwrap_or(0);
    let quantity = clamp_quantity(u64::from(stored_quantity), moq, max_stock);
    if quantity != stored_quantity {
        repaired = true;
    }

    let line = CartLine {
        id,
        variant_key: stored.variant,
        name,
        image: stored.image.unwrap_or_default(),
        slug,
        price,
        quantity,
        max_stock,
        moq,
    };

    Ok(if repaired {
        Outcome::Repaired(line)
    } else {
        Outcome::Kept(line)
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
