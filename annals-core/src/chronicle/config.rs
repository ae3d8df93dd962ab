//! Chronicler configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. `.annals/config.json` - Project-level config
//! 2. `~/.config/annals/config.json` - Global config
//! 3. Built-in defaults
//!
//! ## Directory Structure
//!
//! ```text
//! .annals/
//! ├── config.json   # Model, endpoint, language, API key variable
//! ├── system.txt    # Custom system instruction (optional)
//! └── user.txt      # User template with {{name}}, {{localized_name}}, {{language}} (optional)
//! ```
//!
//! The API key itself never lives in a file; `api_key_env` names the
//! environment variable that holds it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Chronicler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronicleConfig {
    /// Provider model ID (e.g., "gemini-2.5-flash")
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable name containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Provider endpoint root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language the narrative should be written in
    #[serde(default = "default_language")]
    pub language: String,

    /// Optional request timeout; no timeout when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for ChronicleConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            language: default_language(),
            timeout_seconds: None,
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_language() -> String {
    "简体中文".to_string()
}

/// Provider API key, resolved once at construction
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl ChronicleConfig {
    /// Check the static parts of the config (model, endpoint)
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_model(&self.model)?;

        let url = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(())
    }

    /// Read the API key from the process environment
    pub fn resolve_api_key(&self) -> Result<ApiKey, ConfigError> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Read the API key through an arbitrary lookup
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Result<ApiKey, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(ApiKey::new(key.trim())),
            _ => Err(ConfigError::MissingApiKey {
                env: self.api_key_env.clone(),
            }),
        }
    }

    /// Load config from a directory's config.json
    ///
    /// Returns `Ok(None)` when the directory does not exist and defaults when
    /// it exists without a config.json. A config.json that cannot be read or
    /// parsed is an error.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = dir.join("config.json");
        if !config_path.exists() {
            if dir.exists() {
                return Ok(Some(Self::default()));
            }
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ConfigRead {
            path: config_path.clone(),
            source,
        })?;
        let config = serde_json::from_str(&content)
            .map_err(|source| ConfigError::InvalidConfigFile { path: config_path, source })?;
        Ok(Some(config))
    }

    /// Load configuration with project -> global -> defaults precedence
    pub fn load_from_directories(
        project_dir: Option<&Path>,
        global_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        for dir in [project_dir, global_dir].into_iter().flatten() {
            if let Some(config) = Self::load_from_dir(dir)? {
                return Ok(config);
            }
        }
        Ok(Self::default())
    }
}

/// Check that a model identifier can be placed in the request path
///
/// Gemini model ids are made of ASCII letters, digits, `.`, `-` and `_`.
pub fn validate_model(model: &str) -> Result<(), ConfigError> {
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel);
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_');
    if !model.chars().all(allowed) {
        return Err(ConfigError::InvalidModel {
            model: model.to_string(),
        });
    }
    Ok(())
}

/// Platform-specific global config directory for annals
///
/// - Linux: `~/.config/annals/`
/// - macOS: `~/Library/Application Support/annals/`
/// - Windows: `%APPDATA%\annals\`
pub fn global_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "annals").map(|dirs| dirs.config_dir().to_path_buf())
}
