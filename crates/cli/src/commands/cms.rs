//! CMS commands.

use chrono::{DateTime, Utc};
use serde_json::json;
use shopfront_storefront::cms::{CmsResolver, FileCmsSource, RestCmsSource};
use shopfront_storefront::config::CmsConfig;

use super::CommandResult;

/// Build a resolver from the configured CMS source.
///
/// A failed fetch is logged by the resolver and answers fall back to defaults.
pub async fn resolver(config: &CmsConfig) -> Result<CmsResolver, Box<dyn std::error::Error>> {
    let mut cms = CmsResolver::new();
    match config {
        CmsConfig::Remote { base_url, api_key } => {
            let source = RestCmsSource::new(base_url.clone(), api_key.clone())?;
            cms.refresh(&source).await;
        }
        CmsConfig::File(path) => {
            cms.refresh(&FileCmsSource::new(path.clone())).await;
        }
        CmsConfig::None => {
            tracing::warn!("No CMS configured, using default settings");
        }
    }
    Ok(cms)
}

/// A resolved setting.
pub fn setting(cms: &CmsResolver, key: &str) -> CommandResult {
    Ok(json!({ "key": key, "value": cms.get_setting(key) }))
}

/// Banners live at `now`.
pub fn banners(cms: &CmsResolver, position: Option<&str>, now: DateTime<Utc>) -> CommandResult {
    Ok(serde_json::to_value(cms.active_banners(position, now))?)
}

/// An active content block, or `null`.
pub fn content(cms: &CmsResolver, section: &str, key: &str) -> CommandResult {
    Ok(serde_json::to_value(cms.get_content(section, key))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::Value;
    use shopfront_storefront::cms::parse_snapshot;

    use super::*;

    fn cms() -> CmsResolver {
        CmsResolver::from_snapshot(
            parse_snapshot(
                r"
settings:
  site_name: Shea Market
content:
  - id: c1
    section: hero
    block_key: headline
    title: Pure shea
banners:
  - id: b1
    name: Launch
    type: announcement
    position: top
",
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_setting_with_default() {
        let cms = cms();
        assert_eq!(setting(&cms, "site_name").unwrap()["value"], "Shea Market");
        assert_eq!(setting(&cms, "currency").unwrap()["value"], "GHS");
    }

    #[test]
    fn test_banners_and_content() {
        let cms = cms();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        let top = banners(&cms, Some("top"), now).unwrap();
        assert_eq!(top[0]["type"], "announcement");
        assert_eq!(banners(&cms, Some("footer"), now).unwrap(), json!([]));

        assert_eq!(content(&cms, "hero", "headline").unwrap()["title"], "Pure shea");
        assert_eq!(content(&cms, "hero", "missing").unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_resolver_without_source_uses_defaults() {
        let cms = resolver(&CmsConfig::None).await.unwrap();
        assert!(cms.refreshed_at().is_none());
        assert_eq!(cms.get_setting("primary_color"), "#2563eb");
    }
}
