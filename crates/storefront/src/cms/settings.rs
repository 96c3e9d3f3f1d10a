//! Site settings with documented fallbacks.

use std::collections::HashMap;

use serde_json::Value;

/// Settings every page may ask for, with the value used when the CMS has none.
pub const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    ("site_name", ""),
    ("site_tagline", ""),
    ("site_logo", ""),
    ("contact_email", ""),
    ("contact_phone", ""),
    ("contact_address", ""),
    ("social_facebook", ""),
    ("social_instagram", ""),
    ("social_twitter", ""),
    ("social_tiktok", ""),
    ("social_snapchat", ""),
    ("social_youtube", ""),
    ("primary_color", "#2563eb"),
    ("secondary_color", "#FBF6F2"),
    ("currency", "GHS"),
    ("currency_symbol", "GH\u{20b5}"),
];

/// Default value for `key`, if it is a documented setting.
#[must_use]
pub fn default_setting(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Key/value site settings as stored in the CMS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSettings {
    values: HashMap<String, String>,
}

impl SiteSettings {
    /// Build settings from raw `(key, value)` rows.
    ///
    /// String values are kept as-is. `null` values are skipped. Any other JSON
    /// value is kept as its JSON text.
    #[must_use]
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let values = rows
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect();
        Self { values }
    }

    /// The stored value for `key`, falling back to its default, then to `""`.
    ///
    /// An empty stored value counts as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .or_else(|| default_setting(key))
            .unwrap_or("")
    }

    /// Number of stored settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let settings = SiteSettings::default();
        assert_eq!(settings.get("currency"), "GHS");
        assert_eq!(settings.get("currency_symbol"), "GH\u{20b5}");
        assert_eq!(settings.get("site_name"), "");
        assert_eq!(settings.get("unknown_key"), "");
    }

    #[test]
    fn test_stored_value_wins() {
        let settings = SiteSettings::from_rows([
            ("site_name".to_string(), json!("Shea Market")),
            ("primary_color".to_string(), json!("#111111")),
        ]);
        assert_eq!(settings.get("site_name"), "Shea Market");
        assert_eq!(settings.get("primary_color"), "#111111");
        assert_eq!(settings.get("secondary_color"), "#FBF6F2");
    }

    #[test]
    fn test_empty_stored_value_falls_back() {
        let settings = SiteSettings::from_rows([("currency".to_string(), json!(""))]);
        assert_eq!(settings.get("currency"), "GHS");
    }

    #[test]
    fn test_non_string_values() {
        let settings = SiteSettings::from_rows([
            ("free_shipping_threshold".to_string(), json!(250)),
            ("maintenance".to_string(), json!(false)),
            ("site_logo".to_string(), Value::Null),
        ]);
        assert_eq!(settings.get("free_shipping_threshold"), "250");
        assert_eq!(settings.get("maintenance"), "false");
        assert_eq!(settings.len(), 2);
    }
}
