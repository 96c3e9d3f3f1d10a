//! Integration tests for CMS resolution from a YAML snapshot file.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::{TimeZone, Utc};
use shopfront_integration_tests::ScratchDir;
use shopfront_storefront::cms::{CmsResolver, CmsSource, FileCmsSource};

const SNAPSHOT: &str = r##"
settings:
  site_name: Shea Market
  site_tagline: Straight from the cooperative
  primary_color: ""
  free_shipping_threshold: 250
content:
  - id: c1
    section: hero
    block_key: headline
    title: Pure shea
    button_text: Shop now
    button_url: /shop
    metadata:
      align: left
banners:
  - id: b1
    name: Harmattan Sale
    type: promo
    position: top
    background_color: "#1f2937"
    text_color: "#ffffff"
    start_date: 2025-01-01T00:00:00Z
    end_date: 2025-12-31T23:59:59Z
  - id: b2
    name: Next Season
    type: promo
    position: top
    start_date: 2026-01-01T00:00:00Z
"##;

#[tokio::test]
async fn test_resolver_from_file() {
    let dir = ScratchDir::new("cms-file");
    let path = dir.write("cms.yaml", SNAPSHOT);

    let mut cms = CmsResolver::new();
    assert!(cms.refresh(&FileCmsSource::new(path)).await);

    assert_eq!(cms.get_setting("site_name"), "Shea Market");
    assert_eq!(cms.get_setting("primary_color"), "#2563eb");
    assert_eq!(cms.get_setting("free_shipping_threshold"), "250");
    assert_eq!(cms.get_setting("currency"), "GHS");

    let hero = cms.get_content("hero", "headline").unwrap();
    assert_eq!(hero.button_url.as_deref(), Some("/shop"));
    assert_eq!(hero.metadata["align"], "left");

    let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
    let live = cms.active_banners(Some("top"), now);
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].name, "Harmattan Sale");
}

#[tokio::test]
async fn test_missing_file_keeps_previous_snapshot() {
    let dir = ScratchDir::new("cms-missing");
    let path = dir.write("cms.yaml", SNAPSHOT);
    let source = FileCmsSource::new(&path);

    let mut cms = CmsResolver::new();
    assert!(cms.refresh(&source).await);
    let refreshed_at = cms.refreshed_at();

    std::fs::remove_file(&path).unwrap();
    assert!(source.fetch().await.is_err());
    assert!(!cms.refresh(&source).await);

    assert_eq!(cms.get_setting("site_name"), "Shea Market");
    assert_eq!(cms.refreshed_at(), refreshed_at);
}

#[tokio::test]
async fn test_malformed_file_falls_back_to_defaults() {
    let dir = ScratchDir::new("cms-malformed");
    let path = dir.write("cms.yaml", "settings: [not, a, map]\n");

    let mut cms = CmsResolver::new();
    assert!(!cms.refresh(&FileCmsSource::new(path)).await);
    assert_eq!(cms.get_setting("currency_symbol"), "GH\u{20b5}");
    assert!(cms.refreshed_at().is_none());
}
