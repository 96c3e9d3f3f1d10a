//! Cart line records and quantity rules.

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::{Price, ProductId};

/// Upper quantity bound used when the catalog does not report stock.
pub const DEFAULT_MAX_STOCK: u32 = 9999;

/// Minimum order quantity used when the catalog does not report one.
pub const DEFAULT_MOQ: u32 = 1;

/// One purchasable entry in the cart.
///
/// Identity is the pair `(id, variant_key)`; `None` is its own variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: ProductId,
    #[serde(rename = "variant", skip_serializing_if = "Option::is_none")]
    pub variant_key: Option<String>,
    pub name: String,
    pub image: String,
    pub slug: String,
    pub price: Price,
    pub quantity: u32,
    pub max_stock: u32,
    pub moq: u32,
}

impl CartLine {
    /// Whether this line has the identity `(id, variant_key)`.
    #[must_use]
    pub fn matches(&self, id: ProductId, variant_key: Option<&str>) -> bool {
        self.id == id && self.variant_key.as_deref() == variant_key
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.line_total(self.quantity)
    }
}

/// An item descriptor supplied by the catalog when adding to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: ProductId,
    pub variant_key: Option<String>,
    pub name: String,
    pub image: String,
    pub slug: String,
    pub price: Price,
    /// Units available, `None` when the catalog does not track stock.
    ///
    /// Only `None` falls back to [`DEFAULT_MAX_STOCK`]; `Some(0)` is kept as a
    /// zero cap, and such a line holds a single unit.
    pub max_stock: Option<u32>,
    /// Minimum order quantity, `None` means [`DEFAULT_MOQ`].
    pub moq: Option<u32>,
}

impl CartItem {
    /// Effective minimum order quantity, never below 1.
    #[must_use]
    pub fn effective_moq(&self) -> u32 {
        self.moq.unwrap_or(DEFAULT_MOQ).max(1)
    }

    /// Effective stock cap.
    #[must_use]
    pub fn effective_max_stock(&self) -> u32 {
        self.max_stock.unwrap_or(DEFAULT_MAX_STOCK)
    }

    /// Build a fresh line holding `quantity` units, bounded by MOQ and stock.
    #[must_use]
    pub fn into_line(self, quantity: u32) -> CartLine {
        let moq = self.effective_moq();
        let max_stock = self.effective_max_stock();
        CartLine {
            quantity: clamp_quantity(u64::from(quantity.max(1)), moq, max_stock),
            id: self.id,
            variant_key: self.variant_key,
            name: self.name,
            image: self.image,
            slug: self.slug,
            price: self.price,
            max_stock,
            moq,
        }
    }
}

/// Clamp `quantity` into `[moq, max_stock]`, never below one unit.
///
/// When the stock cap is below the MOQ the line cannot be satisfied either way;
/// the cap wins so the cart never claims more units than exist.
#[must_use]
pub fn clamp_quantity(quantity: u64, moq: u32, max_stock: u32) -> u32 {
    let floored = quantity.max(u64::from(moq));
    let capped = floored.min(u64::from(max_stock));
    u32::try_from(capped).unwrap_or(max_stock).max(1)
}
