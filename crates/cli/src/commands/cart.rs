//! Cart commands.

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::ProductId;
use shopfront_storefront::cart::{CartLine, CartStore};
use shopfront_storefront::catalog::Catalog;

use super::CommandResult;

#[derive(Serialize)]
struct CartView<'a> {
    lines: &'a [CartLine],
    count: u64,
    subtotal: Decimal,
}

/// Lines, item count and subtotal.
pub fn list(cart: &CartStore) -> CommandResult {
    Ok(serde_json::to_value(CartView {
        lines: cart.lines(),
        count: cart.count(),
        subtotal: cart.subtotal(),
    })?)
}

/// Add a catalog product to the cart.
pub fn add(
    cart: &mut CartStore,
    catalog: &Catalog,
    product: ProductId,
    variant: Option<&str>,
    quantity: Option<u32>,
) -> CommandResult {
    let item = catalog.require(product)?.to_cart_item(variant)?;
    cart.add(item, quantity);
    tracing::info!(%product, ?variant, "Added to cart");
    list(cart)
}

/// Remove a line.
pub fn remove(cart: &mut CartStore, product: ProductId, variant: Option<&str>) -> CommandResult {
    cart.remove(product, variant);
    list(cart)
}

/// Set a line quantity.
pub fn set_quantity(
    cart: &mut CartStore,
    product: ProductId,
    variant: Option<&str>,
    quantity: i64,
) -> CommandResult {
    cart.set_quantity(product, variant, quantity);
    list(cart)
}

/// Remove every line.
pub fn clear(cart: &mut CartStore) -> CommandResult {
    cart.clear();
    tracing::info!("Cart cleared");
    list(cart)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use shopfront_storefront::storage::MemoryStorage;

    use super::*;

    const CATALOG: &str = r"
products:
  - id: 7b1f3c52-0d7e-4a43-9b8e-2f6a4c1d9e10
    name: Raw Shea Butter
    slug: raw-shea-butter
    price: '10.00'
    quantity: 10
    moq: 3
";

    fn shea() -> ProductId {
        ProductId::parse("7b1f3c52-0d7e-4a43-9b8e-2f6a4c1d9e10").unwrap()
    }

    #[test]
    fn test_add_then_list() {
        let catalog = Catalog::from_yaml(CATALOG).unwrap();
        let mut cart = CartStore::load(Arc::new(MemoryStorage::new()));

        let output = add(&mut cart, &catalog, shea(), None, None).unwrap();
        assert_eq!(output["count"], 3);
        assert_eq!(output["subtotal"], "30.00");
        assert_eq!(output["lines"][0]["slug"], "raw-shea-butter");
        assert_eq!(output["lines"][0]["maxStock"], 10);
    }

    #[test]
    fn test_add_unknown_product() {
        let catalog = Catalog::from_yaml(CATALOG).unwrap();
        let mut cart = CartStore::load(Arc::new(MemoryStorage::new()));
        assert!(add(&mut cart, &catalog, ProductId::new_v4(), None, None).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_below_moq_removes() {
        let catalog = Catalog::from_yaml(CATALOG).unwrap();
        let mut cart = CartStore::load(Arc::new(MemoryStorage::new()));
        add(&mut cart, &catalog, shea(), None, Some(5)).unwrap();

        let output = set_quantity(&mut cart, shea(), None, 2).unwrap();
        assert_eq!(output["count"], 0);
        assert_eq!(output["lines"].as_array().unwrap().len(), 0);
    }
}
