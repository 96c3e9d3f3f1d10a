//! CMS-managed site settings, content blocks and banners.
//!
//! # Architecture
//!
//! - A [`CmsSource`] produces a complete [`CmsSnapshot`] in one call
//! - [`CmsResolver`] keeps the last good snapshot in memory
//! - Getters never fail: missing settings resolve to documented defaults
//!
//! A failed refresh is logged and the previous snapshot stays in place, so a
//! CMS outage degrades to stale (or default) copy rather than an error page.
//!
//! # Example
//!
//! ```rust,ignore
//! let source = FileCmsSource::new("cms.yaml");
//! let mut cms = CmsResolver::new();
//! cms.refresh(&source).await;
//!
//! let name = cms.get_setting("site_name");
//! let top = cms.active_banners(Some("top"), Utc::now());
//! ```

mod content;
mod settings;
mod source;

pub use content::{Banner, ContentBlock};
pub use settings::{DEFAULT_SETTINGS, SiteSettings, default_setting};
pub use source::{CmsSource, FileCmsSource, RestCmsSource, parse_snapshot};

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur when fetching CMS data.
#[derive(Debug, Error)]
pub enum CmsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Table URL could not be built.
    #[error("invalid CMS URL: {0}")]
    Url(#[from] url::ParseError),

    /// Snapshot file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not valid.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Everything the CMS publishes at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CmsSnapshot {
    pub settings: SiteSettings,
    pub content: Vec<ContentBlock>,
    pub banners: Vec<Banner>,
}

/// In-memory view of the CMS for one session.
#[derive(Debug, Clone, Default)]
pub struct CmsResolver {
    snapshot: CmsSnapshot,
    refreshed_at: Option<DateTime<Utc>>,
}

impl CmsResolver {
    /// Create a resolver that answers with defaults until refreshed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver from an already-fetched snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: CmsSnapshot) -> Self {
        Self {
            snapshot,
            refreshed_at: Some(Utc::now()),
        }
    }

    /// Replace the snapshot with a fresh one from `source`.
    ///
    /// On failure the error is logged and the previous snapshot is kept.
    /// Returns whether the snapshot was replaced.
    pub async fn refresh<S: CmsSource>(&mut self, source: &S) -> bool {
        match source.fetch().await {
            Ok(snapshot) => {
                tracing::info!(
                    settings = snapshot.settings.len(),
                    content = snapshot.content.len(),
                    banners = snapshot.banners.len(),
                    "CMS snapshot loaded"
                );
                self.snapshot = snapshot;
                self.refreshed_at = Some(Utc::now());
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching CMS data, keeping previous snapshot");
                false
            }
        }
    }

    /// When the snapshot was last replaced, `None` if never.
    #[must_use]
    pub const fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// All settings.
    #[must_use]
    pub const fn settings(&self) -> &SiteSettings {
        &self.snapshot.settings
    }

    /// A setting value, falling back to its documented default, then `""`.
    #[must_use]
    pub fn get_setting(&self, key: &str) -> &str {
        self.snapshot.settings.get(key)
    }

    /// The active content block at `(section, block_key)`.
    #[must_use]
    pub fn get_content(&self, section: &str, block_key: &str) -> Option<&ContentBlock> {
        self.snapshot
            .content
            .iter()
            .find(|c| c.is_active && c.section == section && c.block_key == block_key)
    }

    /// Banners live at `now`, optionally restricted to one position.
    #[must_use]
    pub fn active_banners(&self, position: Option<&str>, now: DateTime<Utc>) -> Vec<&Banner> {
        self.snapshot
            .banners
            .iter()
            .filter(|b| position.is_none_or(|p| b.position == p))
            .filter(|b| b.is_live(now))
            .collect()
    }
}
