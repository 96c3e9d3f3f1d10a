//! Shopfront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_DATA_DIR` - Directory holding the cart and wishlist slots (default: `.shopfront`)
//! - `SHOPFRONT_CMS_URL` - Base URL of the CMS tables API
//! - `SHOPFRONT_CMS_API_KEY` - API key for the tables API (required when `SHOPFRONT_CMS_URL` is set)
//! - `SHOPFRONT_CMS_FILE` - YAML CMS snapshot, used when no URL is configured
//! - `SHOPFRONT_CATALOG_FILE` - YAML product catalog

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Shopfront configuration.
#[derive(Debug, Clone)]
pub struct ShopfrontConfig {
    /// Directory for file-backed slots
    pub data_dir: PathBuf,
    /// Where CMS settings, content and banners come from
    pub cms: CmsConfig,
    /// Product catalog file, if configured
    pub catalog_file: Option<PathBuf>,
}

/// CMS source selection.
#[derive(Clone, Default)]
pub enum CmsConfig {
    /// Remote tables API
    Remote {
        /// Base URL, e.g. `https://project.example-host.co`
        base_url: Url,
        /// API key sent with every request
        api_key: SecretString,
    },
    /// Local YAML snapshot
    File(PathBuf),
    /// No CMS configured; every setting resolves to its default
    #[default]
    None,
}

impl std::fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote { base_url, .. } => f
                .debug_struct("Remote")
                .field("base_url", &base_url.as_str())
                .field("api_key", &"[REDACTED]")
                .finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::None => f.write_str("None"),
        }
    }
}

impl ShopfrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, or if the CMS URL is set
    /// without a usable API key.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("SHOPFRONT_DATA_DIR", ".shopfront"));
        let cms = CmsConfig::from_env()?;
        let catalog_file = get_optional_env("SHOPFRONT_CATALOG_FILE").map(PathBuf::from);

        Ok(Self {
            data_dir,
            cms,
            catalog_file,
        })
    }
}

impl CmsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        if let Some(raw_url) = get_optional_env("SHOPFRONT_CMS_URL") {
            let base_url = Url::parse(&raw_url).map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_CMS_URL".to_string(), e.to_string())
            })?;
            let api_key = get_validated_secret("SHOPFRONT_CMS_API_KEY")?;
            return Ok(Self::Remote { base_url, api_key });
        }

        Ok(get_optional_env("SHOPFRONT_CMS_FILE").map_or(Self::None, |path| Self::File(path.into())))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the key from the CMS dashboard."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-anon-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.k3Q", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_cms_config_debug_redacts_key() {
        let config = CmsConfig::Remote {
            base_url: Url::parse("https://cms.shopfront.test").unwrap(),
            api_key: SecretString::from("super_secret_api_key"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("cms.shopfront.test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
    }

    #[test]
    fn test_cms_config_default_is_none() {
        assert!(matches!(CmsConfig::default(), CmsConfig::None));
    }
}
