//! Where CMS snapshots come from.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{Banner, CmsError, CmsSnapshot, ContentBlock, SiteSettings};

/// Request timeout for tables API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Path prefix of the tables API.
const REST_PREFIX: &str = "rest/v1/";

/// A source of CMS data.
pub trait CmsSource {
    /// Fetch a complete snapshot of settings, content blocks and banners.
    fn fetch(&self) -> impl Future<Output = Result<CmsSnapshot, CmsError>> + Send;
}

/// One row of the `site_settings` table.
#[derive(Debug, Deserialize)]
struct SettingRow {
    key: String,
    value: Value,
}

// =============================================================================
// Tables API
// =============================================================================

/// Reads the CMS tables over a PostgREST-style HTTP API.
#[derive(Clone)]
pub struct RestCmsSource {
    client: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl std::fmt::Debug for RestCmsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCmsSource")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl RestCmsSource {
    /// Create a source for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `CmsError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: Url, api_key: SecretString) -> Result<Self, CmsError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Build the URL for `table` with PostgREST query parameters.
    fn table_url(&self, table: &str, query: &[(&str, &str)]) -> Result<Url, CmsError> {
        let mut url = self.base_url.join(&format!("{REST_PREFIX}{table}"))?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, CmsError> {
        let url = self.table_url(table, query)?;
        tracing::debug!(%table, "Fetching CMS table");

        let key = self.api_key.expose_secret();
        let rows = self
            .client
            .get(url)
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<T>>()
            .await?;
        Ok(rows)
    }
}

impl CmsSource for RestCmsSource {
    async fn fetch(&self) -> Result<CmsSnapshot, CmsError> {
        let active = [("select", "*"), ("is_active", "eq.true")];
        let (settings, content, banners) = tokio::try_join!(
            self.get_rows::<SettingRow>("site_settings", &[("select", "key,value")]),
            self.get_rows::<ContentBlock>("cms_content", &active),
            self.get_rows::<Banner>("banners", &active),
        )?;

        Ok(CmsSnapshot {
            settings: SiteSettings::from_rows(settings.into_iter().map(|r| (r.key, r.value))),
            content,
            banners,
        })
    }
}

// =============================================================================
// YAML snapshot file
// =============================================================================

/// On-disk snapshot layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotFile {
    settings: HashMap<String, Value>,
    content: Vec<ContentBlock>,
    banners: Vec<Banner>,
}

/// Reads a CMS snapshot from a YAML file.
///
/// ```yaml
/// settings:
///   site_name: Shea Market
///   currency: GHS
/// content:
///   - id: c1
///     section: hero
///     block_key: headline
///     title: Pure shea, straight from the cooperative
/// banners: []
/// ```
#[derive(Debug, Clone)]
pub struct FileCmsSource {
    path: PathBuf,
}

impl FileCmsSource {
    /// Create a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse a YAML snapshot document.
///
/// # Errors
///
/// Returns `CmsError::Yaml` if the document does not match the snapshot layout.
pub fn parse_snapshot(yaml: &str) -> Result<CmsSnapshot, CmsError> {
    let file: SnapshotFile = serde_yaml::from_str(yaml)?;
    Ok(CmsSnapshot {
        settings: SiteSettings::from_rows(file.settings),
        content: file.content,
        banners: file.banners,
    })
}

impl CmsSource for FileCmsSource {
    async fn fetch(&self) -> Result<CmsSnapshot, CmsError> {
        let yaml = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CmsError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_snapshot(&yaml)
    }
}
