//! Integration tests for catalog products flowing into a storefront session.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal::Decimal;
use shopfront_integration_tests::ScratchDir;
use shopfront_storefront::Storefront;
use shopfront_storefront::catalog::{Catalog, CatalogError};
use shopfront_storefront::events::CartEvent;

const CATALOG: &str = r"
products:
  - id: 7b1f3c52-0d7e-4a43-9b8e-2f6a4c1d9e10
    name: Raw Shea Butter
    slug: raw-shea-butter
    price: '45.00'
    quantity: 6
    moq: 2
    featured: true
  - id: 0c9a1e44-8f2b-4d6a-a1c3-5e7f9b2d4a68
    name: Black Soap
    slug: black-soap
    price: '20.00'
    variants:
      - name: 250g
        quantity: 0
      - name: 500g
        price: '35.00'
        quantity: 4
";

#[tokio::test]
async fn test_catalog_to_cart_and_wishlist() {
    let dir = ScratchDir::new("session-catalog");
    let catalog = Catalog::load(&dir.write("catalog.yaml", CATALOG)).await.unwrap();
    let shea = catalog.get_by_slug("raw-shea-butter").unwrap();
    let soap = catalog.get_by_slug("black-soap").unwrap();

    let mut session = Storefront::open_dir(dir.path()).unwrap();
    let mut events = session.cart().subscribe();

    session.cart_mut().add(shea.to_cart_item(None).unwrap(), None);
    session.cart_mut().add(shea.to_cart_item(None).unwrap(), Some(10));
    session.cart_mut().add(soap.to_cart_item(Some("500g")).unwrap(), Some(1));
    assert!(session.wishlist_mut().add(soap.to_wishlist_item()));

    assert!(matches!(
        soap.to_cart_item(Some("250g")),
        Err(CatalogError::OutOfStock(_))
    ));

    assert_eq!(
        events.try_recv().unwrap(),
        CartEvent::Updated {
            count: 2,
            subtotal: Decimal::from(90)
        }
    );
    assert_eq!(events.try_recv().unwrap(), CartEvent::OpenRequested);

    drop(session);
    let reopened = Storefront::open_dir(dir.path()).unwrap();
    let lines = reopened.cart().lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].quantity, 6);
    assert_eq!(lines[1].variant_key.as_deref(), Some("500g"));
    assert_eq!(lines[1].quantity, 1);
    assert_eq!(reopened.cart().subtotal(), Decimal::from(305));
    assert!(reopened.wishlist().contains(&soap.id.to_string()));
}
