//! Product catalog records and their conversion into cart and wishlist items.
//!
//! The catalog is read-only here: a YAML document of product rows, each with
//! optional variants. Products enter the cart and wishlist only through
//! [`CatalogProduct::to_cart_item`] and [`CatalogProduct::to_wishlist_item`],
//! which apply the stock and MOQ fallbacks in one place.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use shopfront_core::{Price, ProductId};
use thiserror::Error;

use crate::cart::CartItem;
use crate::wishlist::WishlistItem;

/// Badge shown on featured products.
const FEATURED_BADGE: &str = "Featured";

/// Errors that can occur when reading the catalog or picking a product.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// No product with this id.
    #[error("product not found: {0}")]
    NotFound(String),

    /// The product has no variant with this name.
    #[error("unknown variant '{variant}' for product {product}")]
    UnknownVariant { product: ProductId, variant: String },

    /// The product (or chosen variant) has no stock.
    #[error("out of stock: {0}")]
    OutOfStock(String),
}

/// One purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogVariant {
    /// Display name, also used as the cart variant key.
    pub name: String,
    /// Variant price; the product price applies when absent.
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
}

/// A product row as published by the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Price,
    #[serde(default)]
    pub compare_at_price: Option<Price>,
    /// Units on hand for products without variants.
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub moq: Option<u32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating_avg: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub variants: Vec<CatalogVariant>,
}

impl CatalogProduct {
    /// Units available across the product.
    ///
    /// With variants this is the sum of their quantities (missing counts as 0).
    /// Without variants it is the product quantity, `None` if untracked.
    #[must_use]
    pub fn total_stock(&self) -> Option<u32> {
        if self.variants.is_empty() {
            return self.quantity;
        }
        Some(
            self.variants
                .iter()
                .map(|v| v.quantity.unwrap_or(0))
                .fold(0u32, u32::saturating_add),
        )
    }

    /// Whether any unit can be sold. Untracked stock counts as available.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.total_stock().is_none_or(|stock| stock > 0)
    }

    /// Cheapest variant price, if the product has variants.
    #[must_use]
    pub fn min_variant_price(&self) -> Option<Price> {
        self.variants
            .iter()
            .map(|v| v.price.unwrap_or(self.price))
            .min()
    }

    /// Variant named `name`.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&CatalogVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// First product image, or `""`.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or("", String::as_str)
    }

    /// Cart descriptor for this product, or for one of its variants.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownVariant` if `variant` names no variant,
    /// or `CatalogError::OutOfStock` if nothing can be sold.
    pub fn to_cart_item(&self, variant: Option<&str>) -> Result<CartItem, CatalogError> {
        let (price, stock) = match variant {
            Some(name) => {
                let v = self
                    .variant(name)
                    .ok_or_else(|| CatalogError::UnknownVariant {
                        product: self.id,
                        variant: name.to_string(),
                    })?;
                (v.price.unwrap_or(self.price), v.quantity)
            }
            None => (self.price, self.total_stock()),
        };

        if stock == Some(0) {
            return Err(CatalogError::OutOfStock(self.name.clone()));
        }

        Ok(CartItem {
            id: self.id,
            variant_key: variant.map(str::to_string),
            name: self.name.clone(),
            image: self.primary_image().to_string(),
            slug: self.slug.clone(),
            price,
            max_stock: stock,
            moq: self.moq,
        })
    }

    /// Wishlist entry for this product.
    #[must_use]
    pub fn to_wishlist_item(&self) -> WishlistItem {
        WishlistItem {
            id: self.id.to_string(),
            name: self.name.clone(),
            price: self.min_variant_price().unwrap_or(self.price),
            original_price: self.compare_at_price,
            image: self.primary_image().to_string(),
            slug: self.slug.clone(),
            rating: self.rating_avg,
            review_count: self.review_count,
            badge: self.featured.then(|| FEATURED_BADGE.to_string()),
            notes: self.notes.clone(),
            origin: self.origin.clone(),
            in_stock: self.in_stock(),
        }
    }
}

/// A set of products, looked up by id or slug.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    products: Vec<CatalogProduct>,
}

impl Catalog {
    /// Parse a YAML catalog document with a top-level `products` list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Yaml` if the document does not match.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse the catalog at `path`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, or
    /// `CatalogError::Yaml` if it cannot be parsed.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_yaml(&yaml)?;
        tracing::debug!(path = %path.display(), products = catalog.products.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// All products.
    #[must_use]
    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    /// Product with `id`.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Product with `slug`.
    #[must_use]
    pub fn get_by_slug(&self, slug: &str) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// Product with `id`, as an error when missing.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this id.
    pub fn require(&self, id: ProductId) -> Result<&CatalogProduct, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}
